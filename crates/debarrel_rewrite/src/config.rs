use anyhow::{Result, anyhow};
use clap::Parser;
use debarrel_core::DEFAULT_SOURCE_GLOB;
use log::{debug, info};
use std::{env, path::PathBuf};

/// Working root used when `--root` is not given, relative to the invocation directory
pub const DEFAULT_ROOT: &str = "client/src";

#[derive(Debug, Clone, Parser)]
#[command(name = "fix")]
#[command(about = "Replace barrel imports with direct, extension-qualified imports")]
pub struct Config {
    /// Root directory of the sources to rewrite (defaults to ./client/src)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Glob pattern, relative to the root, selecting the files to rewrite
    #[arg(long, default_value = DEFAULT_SOURCE_GLOB)]
    pub glob: String,

    /// Resolve and report, but write and delete nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Rewrite imports but leave barrel files in place
    #[arg(long)]
    pub keep_barrels: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl Config {
    /// Resolve the root directory against the current directory
    pub fn initialize(&mut self) -> Result<()> {
        let root = match self.root.take() {
            Some(r) => {
                debug!("Using provided root directory: {:?}", r);
                r
            }
            None => {
                debug!("No root provided, using {}", DEFAULT_ROOT);
                env::current_dir()?.join(DEFAULT_ROOT)
            }
        };
        let root = root.canonicalize().unwrap_or(root);
        if !root.is_dir() {
            return Err(anyhow!("Root {} is not a directory", root.display()));
        }
        info!("Using root directory: {}", root.display());

        self.root = Some(root);
        Ok(())
    }

    /// Get the root directory, returning an error if not initialized
    pub fn root(&self) -> Result<&PathBuf> {
        self.root
            .as_ref()
            .ok_or_else(|| anyhow!("Config not initialized - call initialize() first"))
    }
}
