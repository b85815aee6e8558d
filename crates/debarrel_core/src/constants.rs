//! Constants for file extensions and barrel lookup.
//!
//! Sources are authored with the `.ts` extension and executed as `.js`, so
//! rewritten import paths always carry the executable extension.

/// Extension the sources are written with
pub const AUTHORING_EXTENSION: &str = "ts";

/// Extension expected at run time, forced onto every rewritten import path
pub const EXECUTABLE_EXTENSION: &str = "js";

/// Barrel file names to try when a destination is a directory (in priority order)
pub const BARREL_FILES: &[&str] = &["index.ts", "index.js"];

/// Default tree-scoped pattern for the files to rewrite
pub const DEFAULT_SOURCE_GLOB: &str = "**/*.ts";
