//! tresor-ik - translation key checker for the Trésors front end
//!
//! Exit codes: 0 pass, 1 findings, 2 usage or I/O error.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tresor_ik::{run_check, CheckOptions, Format};

/// Command-line arguments for tresor-ik
#[derive(Parser, Debug)]
#[command(name = "tresor-ik")]
#[command(about = "Check translation keys against locale files and source code")]
#[command(version)]
struct Args {
    /// Directory holding one <lang>.json per language
    #[arg(short, long)]
    locales: PathBuf,

    /// Source directory to scan (repeatable)
    #[arg(short, long = "src", required = true, num_args = 1..)]
    src: Vec<PathBuf>,

    /// Reference language
    #[arg(short, long, default_value = "fr")]
    base: String,

    /// Treat unused keys as failures
    #[arg(long)]
    strict: bool,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Logs go to stderr; stdout carries the report
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tresor_ik=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run(args: &Args) -> Result<u8> {
    info!("tresor-ik v{}", env!("CARGO_PKG_VERSION"));

    let options = CheckOptions {
        locales_dir: args.locales.clone(),
        source_dirs: args.src.clone(),
        base: args.base.clone(),
    };
    let report = run_check(&options)?;

    print!("{}", report.render(args.format)?);
    Ok(report.exit_code(args.strict))
}
