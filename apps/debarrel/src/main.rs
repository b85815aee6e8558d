use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use debarrel_rewrite::Config;
use log::{debug, info};
use std::io::{BufWriter, Write};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "debarrel")]
#[command(about = "Rewrite TypeScript imports away from barrel files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Point relative imports at the declaring files and delete the barrels
    Fix(Config),
}

fn main() -> Result<()> {
    env_logger::init();

    // stdio is blocked by LineWriter, use a BufWriter to reduce syscalls.
    // See https://github.com/rust-lang/rust/issues/60673
    let mut stdout = BufWriter::new(std::io::stdout());

    let cli = Cli::parse();
    debug!("Parsed CLI arguments: {:?}", cli.command);

    let start = Instant::now();

    match cli.command {
        Commands::Fix(mut cfg) => {
            let num_threads = rayon::current_num_threads();
            info!("Rewriting barrel imports (using {} threads)", num_threads);
            debug!("Config: root={:?}, glob={:?}", cfg.root, cfg.glob);

            cfg.initialize()?;
            let summary = debarrel_rewrite::run_fix_imports(cfg.clone())?;
            debug!("Found {} issues, {} failures", summary.issues.len(), summary.failures.len());

            let elapsed_ms = start.elapsed().as_millis();

            if cfg.json {
                debarrel_rewrite::print_json(&mut stdout, &summary)?;
            } else {
                debarrel_rewrite::print_report(&mut stdout, &summary, cfg.root.as_deref())?;
                writeln!(
                    stdout,
                    "\n{} Finished in {}ms on {} files (using {} threads).",
                    "●".bright_blue(),
                    elapsed_ms.to_string().cyan(),
                    summary.files_processed.to_string().cyan(),
                    num_threads.to_string().cyan()
                )?;
            }
            stdout.flush()?;

            if !summary.failures.is_empty() {
                // Non-zero exit so scripts notice files that were not rewritten
                std::process::exit(1);
            }

            Ok(())
        }
    }
}
