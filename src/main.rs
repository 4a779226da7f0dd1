//! `numguard` command line: sets the diagnostic modes and exercises the facility
//! under the fail-fast policy.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use numguard::{
    debug_msg, matrix_safe_free, validate_K, warning_msg, DenseBackend, DiagnosticOptions,
    Diagnostics, Failure, Matrix,
};

#[derive(Parser, Debug)]
#[command(name = "numguard")]
#[command(author, version, about = "Diagnostics and safe allocation for numerical code", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file with diagnostic options; flags below override it
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,

    /// Skip optional validation checks
    #[arg(long, global = true)]
    no_check: bool,

    /// Turn warnings into failures
    #[arg(long, global = true)]
    strict: bool,

    /// Suppress warnings
    #[arg(long, global = true)]
    silence: bool,

    /// Enable assertions for a specific issue number
    #[arg(long, value_name = "N", global = true)]
    issue: Option<u32>,

    /// Legacy behaviour
    #[arg(long, global = true)]
    legacy: bool,

    /// Verbose trace logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Allocate a matrix, copy it into a second one and free both
    Alloc {
        /// Number of rows
        #[arg(long)]
        rows: usize,
        /// Number of columns
        #[arg(long)]
        cols: usize,
        /// Refuse allocations larger than this many elements
        #[arg(long, value_name = "ELEMENTS")]
        limit: Option<usize>,
    },
    /// Validate a kernel matrix stored as a JSON array of rows
    ValidateK {
        /// Matrix file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Print the effective diagnostic options as JSON
    Options,
}

impl Cli {
    fn options(&self) -> Result<DiagnosticOptions> {
        let mut options = match &self.config {
            Some(path) => DiagnosticOptions::from_json_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => DiagnosticOptions::default(),
        };
        if self.debug {
            options.set_debug_mode(true);
        }
        if self.no_check {
            options.set_no_check_mode(true);
        }
        if self.strict {
            options.set_strict_mode(true);
        }
        if self.silence {
            options.set_quiet_mode(true);
        }
        if let Some(issue) = self.issue {
            options.set_issue(issue);
        }
        if self.legacy {
            options.set_legacy_mode(true);
        }
        Ok(options)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "tracing")]
    {
        let level = if cli.verbose {
            tracing::Level::TRACE
        } else {
            tracing::Level::WARN
        };
        let subscriber = tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(false)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }

    let mut diag = Diagnostics::new(cli.options()?);

    match cli.command {
        Commands::Alloc { rows, cols, limit } => {
            if let Some(limit) = limit {
                diag = diag.with_backend(Arc::new(DenseBackend::with_element_limit(limit)));
            }
            let result = alloc_copy_free(&diag, rows, cols);
            diag.exit_on_failure(result);
        }
        Commands::ValidateK { file } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let rows: Vec<Vec<f64>> = serde_json::from_str(&text)
                .with_context(|| format!("parsing {}", file.display()))?;
            let row_refs: Vec<&[f64]> = rows.iter().map(Vec::as_slice).collect();
            let result = Matrix::from_rows(&row_refs)
                .map_err(|status| numguard::fail_msg(format!("{}: {status}", file.display())))
                .and_then(|k| validate_K!(diag, &k));
            diag.exit_on_failure(result);
            println!("K is valid");
        }
        Commands::Options => {
            println!("{}", serde_json::to_string_pretty(diag.options())?);
        }
    }

    Ok(())
}

fn alloc_copy_free(diag: &Diagnostics, rows: usize, cols: usize) -> Result<(), Failure> {
    let mut src = diag.matrix_safe_alloc(rows, cols)?;
    src.fill(1.0);
    let mut dest = diag.matrix_safe_alloc(rows, cols)?;
    diag.matrix_safe_memcpy(&mut dest, &src)?;
    debug_msg!(diag, "copied {rows}x{cols} matrix");
    if dest.as_slice() != src.as_slice() {
        warning_msg!(diag, "copy does not match its source");
    }
    matrix_safe_free!(diag, Some(src))?;
    matrix_safe_free!(diag, Some(dest))?;
    println!("allocated, copied and freed two {rows}x{cols} matrices");
    Ok(())
}
