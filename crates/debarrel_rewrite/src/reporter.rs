use std::{
    collections::BTreeMap,
    env,
    io::{self, Write},
    path::Path,
};

use colored::Colorize;
use log::{debug, trace};

use crate::types::{IssueKind, RunSummary, StatementIssue};

/// Path of `relative_to_root` as seen from the current directory, for clickable links
fn display_path(root: Option<&Path>, relative_to_root: &str) -> String {
    let Some(root) = root else {
        return relative_to_root.to_string();
    };
    let abs_path = root.join(relative_to_root);
    match env::current_dir() {
        Ok(cwd) => match abs_path.strip_prefix(&cwd) {
            Ok(rel) => rel.to_string_lossy().to_string(),
            Err(_) => abs_path.to_string_lossy().to_string(),
        },
        Err(_) => {
            debug!("Failed to get current directory");
            abs_path.to_string_lossy().to_string()
        }
    }
}

/// Collapse a possibly multi-line statement onto one line
fn one_line(statement: &str) -> String {
    statement.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn kind_label(kind: IssueKind) -> colored::ColoredString {
    match kind {
        IssueKind::MalformedStatement => "malformed".red().bold(),
        IssueKind::UnresolvedDestination => "unresolved".yellow(),
        IssueKind::SymbolNotFound => "not found".yellow(),
        IssueKind::CyclicBarrel => "cycle".yellow(),
        IssueKind::MissingExtension => "no extension".yellow(),
    }
}

pub fn print_report<W: Write>(
    writer: &mut W,
    summary: &RunSummary,
    root: Option<&Path>,
) -> io::Result<()> {
    debug!("Printing report for {} issues", summary.issues.len());

    if !summary.issues.is_empty() {
        let mut by_file: BTreeMap<&str, Vec<&StatementIssue>> = BTreeMap::new();
        for issue in &summary.issues {
            by_file.entry(issue.file.as_str()).or_default().push(issue);
        }
        debug!("Grouped issues into {} files", by_file.len());

        writeln!(
            writer,
            "{} {} import statements left untouched or incomplete\n",
            "⚠".yellow().bold(),
            summary.issues.len().to_string().yellow()
        )?;

        for (file, issues) in by_file {
            trace!("Processing file: {} with {} issues", file, issues.len());
            writeln!(writer, "{}", display_path(root, file).bright_white().bold())?;
            for (idx, issue) in issues.iter().enumerate() {
                let prefix = if idx == issues.len() - 1 { "└──" } else { "├──" };
                writeln!(
                    writer,
                    "{}  {} {}",
                    prefix.dimmed(),
                    one_line(&issue.statement),
                    format!("({})", kind_label(issue.kind)).dimmed()
                )?;
            }
            writeln!(writer)?;
        }
    }

    if !summary.failures.is_empty() {
        writeln!(writer, "{} {} files failed\n", "✗".red().bold(), summary.failures.len())?;
        for failure in &summary.failures {
            writeln!(
                writer,
                "{}  {}: {}",
                "──".dimmed(),
                display_path(root, &failure.file).blue(),
                failure.error
            )?;
        }
        writeln!(writer)?;
    }

    print_summary(writer, summary)?;
    writer.flush()?;
    Ok(())
}

fn print_summary<W: Write>(writer: &mut W, summary: &RunSummary) -> io::Result<()> {
    writeln!(writer, "{}", "─".repeat(60).dimmed())?;
    if summary.dry_run {
        writeln!(writer, "{} {}", "Summary".bold(), "(dry run, nothing written)".dimmed())?;
    } else {
        writeln!(writer, "{}", "Summary".bold())?;
    }
    writeln!(
        writer,
        "  Files: {} processed, {} rewritten, {} failed",
        summary.files_processed.to_string().cyan(),
        summary.files_rewritten.to_string().green().bold(),
        summary.failures.len().to_string().red()
    )?;
    writeln!(
        writer,
        "  Statements rewritten: {}",
        summary.statements_rewritten.to_string().green().bold()
    )?;
    writeln!(
        writer,
        "  Barrels: {} touched, {} deleted",
        summary.barrels.len().to_string().cyan(),
        summary.barrels_deleted.to_string().cyan()
    )?;
    if !summary.issues.is_empty() {
        writeln!(writer, "  Issues: {}", summary.issues.len().to_string().yellow().bold())?;
    }
    Ok(())
}

pub fn print_json<W: Write>(writer: &mut W, summary: &RunSummary) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, summary)?;
    writeln!(writer)?;
    writer.flush()
}
