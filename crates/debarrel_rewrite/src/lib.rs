//! Barrel import removal for TypeScript projects.
//!
//! This crate rewrites relative import statements so they point straight at
//! the file declaring each symbol instead of at a barrel (`index.ts`) that
//! re-exports it, appends the executable `.js` extension to every relative
//! path, and finally deletes the barrels it resolved through.
//!
//! Statements are matched textually, not parsed into an AST.
//!
//! # Examples
//!
//! ```no_run
//! use debarrel_rewrite::{Config, run_fix_imports};
//! use std::io::{BufWriter, Write};
//!
//! # fn main() -> anyhow::Result<()> {
//! let cfg = Config {
//!     root: Some(std::path::PathBuf::from("/path/to/project/client/src")),
//!     glob: "**/*.ts".to_string(),
//!     dry_run: true,
//!     keep_barrels: false,
//!     json: false,
//! };
//!
//! let summary = run_fix_imports(cfg.clone())?;
//!
//! let mut stdout = BufWriter::new(std::io::stdout());
//! debarrel_rewrite::print_report(&mut stdout, &summary, cfg.root.as_deref())?;
//! stdout.flush()?;
//! # Ok(())
//! # }
//! ```

mod barrel;
mod config;
mod driver;
mod error;
mod reporter;
mod statement;
mod symbols;
mod transform;
mod types;

// Re-export public API
pub use barrel::{BarrelResolver, Replacement, reexport_targets};
pub use config::{Config, DEFAULT_ROOT};
pub use driver::{rewrite_tree, run_fix_imports};
pub use error::{RewriteError, RewriteResult};
pub use reporter::{print_json, print_report};
pub use statement::{Binding, ImportStatement};
pub use symbols::find_declared;
pub use transform::{FileRewrite, FixedStatement, Transformer};
pub use types::{FileFailure, IssueKind, RunSummary, StatementIssue};
