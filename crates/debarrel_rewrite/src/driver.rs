use anyhow::{Result, anyhow};
use dashmap::DashSet;
use debarrel_core::{BARREL_FILES, CollectorConfig, FileStore, FsStore, collect_sources};
use log::{debug, info, trace, warn};
use rayon::prelude::*;
use std::{
    path::{Path, PathBuf},
    thread,
};

use crate::{
    config::Config,
    transform::{FileRewrite, Transformer},
    types::{FileFailure, RunSummary},
};

pub fn run_fix_imports(mut cfg: Config) -> Result<RunSummary> {
    info!("Starting barrel import rewrite");

    cfg.initialize()?;
    let root = cfg.root()?.clone();

    debug!("Collecting source files with glob: {:?}", cfg.glob);
    let collector_cfg = CollectorConfig { root: root.clone(), glob: cfg.glob.clone() };
    let files = collect_sources(&collector_cfg)?;
    if files.is_empty() {
        warn!("No source files found under {}", root.display());
        return Err(anyhow!("No source files found under {}", root.display()));
    }
    info!("Found {} source files", files.len());

    rewrite_tree(&FsStore, &cfg, &files)
}

/// Rewrites `files` and then deletes every barrel touched along the way.
///
/// Runs in three phases so no file is read after any file was written:
/// every file's new text is computed in parallel, then all files are written
/// back, then barrels are deleted one by one. A failure in one file is
/// recorded in the summary and never stops its siblings.
pub fn rewrite_tree(store: &dyn FileStore, cfg: &Config, files: &[PathBuf]) -> Result<RunSummary> {
    let root = cfg.root()?;
    let touched: DashSet<PathBuf> = DashSet::new();
    let transformer = Transformer::new(store, &touched, root);

    info!("Processing {} files in parallel", files.len());
    let results: Vec<(&PathBuf, Result<FileRewrite>)> = files
        .par_iter()
        .map(|file| {
            debug!("Thread {:?} processing: {}", thread::current().id(), file.display());
            (file, transformer.transform_file(file))
        })
        .collect();

    let mut summary =
        RunSummary { files_processed: files.len(), dry_run: cfg.dry_run, ..Default::default() };
    let mut rewrites = Vec::new();
    for (file, result) in results {
        match result {
            Ok(rewrite) => rewrites.push(rewrite),
            Err(e) => {
                warn!("Error rewriting {}: {:#}", file.display(), e);
                summary.failures.push(failure(root, file, &e));
            }
        }
    }

    for rewrite in &rewrites {
        summary.statements_rewritten += rewrite.statements_rewritten;
        if rewrite.changed() {
            summary.files_rewritten += 1;
        }
        summary.issues.extend(rewrite.issues.iter().cloned());
    }

    if cfg.dry_run {
        info!("Dry run, not writing {} files", rewrites.len());
    } else {
        let write_failures: Vec<FileFailure> = rewrites
            .par_iter()
            .filter_map(|rewrite| {
                store.write(&rewrite.path, &rewrite.rewritten).err().map(|e| {
                    warn!("Error writing {}: {:#}", rewrite.path.display(), e);
                    failure(root, &rewrite.path, &e)
                })
            })
            .collect();
        summary.failures.extend(write_failures);
    }

    // The root's own barrel goes too, even if nothing imported through it
    if let Some(root_barrel) =
        BARREL_FILES.iter().map(|name| root.join(name)).find(|p| store.is_file(p))
    {
        trace!("Scheduling root barrel {}", root_barrel.display());
        touched.insert(root_barrel);
    }

    let mut barrels: Vec<PathBuf> = touched.into_iter().collect();
    barrels.sort();
    if cfg.dry_run || cfg.keep_barrels {
        info!("Keeping {} barrel files", barrels.len());
    } else {
        for barrel in &barrels {
            info!("Deleting barrel file {}", barrel.display());
            match store.remove(barrel) {
                Ok(()) => summary.barrels_deleted += 1,
                Err(e) => {
                    warn!("Error deleting {}: {:#}", barrel.display(), e);
                    summary.failures.push(failure(root, barrel, &e));
                }
            }
        }
    }
    summary.barrels = barrels;
    summary.failures.sort_by(|a, b| a.file.cmp(&b.file));

    info!(
        "Rewrite complete. {} statements in {} files, {} barrels deleted, {} failures",
        summary.statements_rewritten,
        summary.files_rewritten,
        summary.barrels_deleted,
        summary.failures.len()
    );
    Ok(summary)
}

fn failure(root: &Path, file: &Path, err: &anyhow::Error) -> FileFailure {
    FileFailure {
        file: file.strip_prefix(root).unwrap_or(file).to_string_lossy().to_string(),
        error: format!("{:#}", err),
    }
}
