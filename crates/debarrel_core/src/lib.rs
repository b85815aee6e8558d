//! Core utilities for debarrel.
//!
//! This crate provides the plumbing the import rewriter stands on:
//! - Collecting the source files to rewrite
//! - Reading, writing and deleting files through a [`FileStore`]
//! - Resolving relative import stems to concrete files and barrels

mod collector;
mod constants;
mod resolver;
mod store;

// Re-export public API
pub use collector::{CollectorConfig, collect_sources};
pub use constants::{AUTHORING_EXTENSION, BARREL_FILES, DEFAULT_SOURCE_GLOB, EXECUTABLE_EXTENSION};
pub use resolver::{
    as_import_path, detect_extension, find_barrel, has_known_extension, join_relative,
    to_executable_extension,
};
pub use store::{FileStore, FsStore};
