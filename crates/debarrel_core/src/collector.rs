use anyhow::{Context, Result};
use ignore::{WalkBuilder, overrides::OverrideBuilder};
use log::{debug, trace};
use std::path::PathBuf;

pub struct CollectorConfig {
    pub root: PathBuf,
    /// Gitignore-style pattern relative to `root`, e.g. `**/*.ts`
    pub glob: String,
}

/// Enumerates every regular file under `root` matching the configured pattern.
///
/// The result is sorted so runs are reproducible.
pub fn collect_sources(cfg: &CollectorConfig) -> Result<Vec<PathBuf>> {
    debug!("Collecting source files");
    let root = &cfg.root;

    let mut overrides = OverrideBuilder::new(root);
    overrides.add(&cfg.glob).with_context(|| format!("Invalid glob pattern '{}'", cfg.glob))?;
    let overrides = overrides.build()?;

    debug!("Walking directory tree from root: {}", root.display());
    let walker = WalkBuilder::new(root)
        .hidden(false)
        .ignore(true)
        .git_ignore(true)
        .overrides(overrides)
        .build();

    let mut files: Vec<PathBuf> = Vec::new();
    for res in walker {
        let dent = res?;
        let p = dent.path();
        if !dent.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        trace!("Matched source file with glob '{}': {}", cfg.glob, p.display());
        files.push(p.to_path_buf());
    }
    files.sort();
    debug!("Collected {} source files", files.len());
    Ok(files)
}
