use serde::Serialize;
use std::path::PathBuf;

use crate::error::RewriteError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MalformedStatement,
    UnresolvedDestination,
    SymbolNotFound,
    CyclicBarrel,
    /// The statement was rewritten, but onto a path without a known extension
    MissingExtension,
}

impl IssueKind {
    /// Statement-level kind of an error; `None` for errors that fail the whole file.
    pub fn of(err: &RewriteError) -> Option<Self> {
        match err {
            RewriteError::MalformedStatement { .. } => Some(IssueKind::MalformedStatement),
            RewriteError::UnresolvedDestination { .. } => Some(IssueKind::UnresolvedDestination),
            RewriteError::SymbolNotFound { .. } => Some(IssueKind::SymbolNotFound),
            RewriteError::CyclicBarrel { .. } => Some(IssueKind::CyclicBarrel),
            RewriteError::Unreadable { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatementIssue {
    /// Relative to the working root
    pub file: String,
    pub statement: String,
    pub kind: IssueKind,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub file: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub files_processed: usize,
    pub files_rewritten: usize,
    pub statements_rewritten: usize,
    /// Every barrel touched during resolution, sorted
    pub barrels: Vec<PathBuf>,
    pub barrels_deleted: usize,
    pub issues: Vec<StatementIssue>,
    pub failures: Vec<FileFailure>,
    pub dry_run: bool,
}

impl RunSummary {
    pub fn files_succeeded(&self) -> usize {
        self.files_processed.saturating_sub(self.failures.len())
    }
}
