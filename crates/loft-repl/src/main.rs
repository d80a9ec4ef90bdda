//! loft CLI entry point.
//!
//! Usage:
//!   loft                     # Interactive shell, in-memory workspace
//!   loft --mount <dir>       # Write-through to a real directory
//!   loft -c <command>        # Execute one command and exit
//!   loft <script>            # Run a script of shell lines

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use loft_repl::Repl;

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let args: Vec<String> = env::args().collect();

    let mut mount: Option<PathBuf> = None;
    let mut command: Option<String> = None;
    let mut script: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(ExitCode::SUCCESS);
            }
            "--version" | "-V" => {
                println!("loft {}", env!("CARGO_PKG_VERSION"));
                return Ok(ExitCode::SUCCESS);
            }
            "--mount" => {
                let dir = args.get(i + 1).context("--mount requires a directory")?;
                mount = Some(PathBuf::from(dir));
                i += 1;
            }
            "-c" => {
                let cmd = args.get(i + 1).context("-c requires a command argument")?;
                command = Some(cmd.clone());
                i += 1;
            }
            arg if !arg.starts_with('-') && script.is_none() => {
                script = Some(PathBuf::from(arg));
            }
            unknown => {
                eprintln!("Unknown option: {unknown}");
                eprintln!("Run 'loft --help' for usage.");
                return Ok(ExitCode::FAILURE);
            }
        }
        i += 1;
    }

    let mut repl = match &mount {
        Some(dir) => Repl::with_mount(dir)?,
        None => Repl::new()?,
    };

    if let Some(cmd) = command {
        return run_lines(&mut repl, std::iter::once(cmd.as_str()));
    }
    if let Some(path) = script {
        let source = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read script: {}", path.display()))?;
        return run_lines(&mut repl, source.lines());
    }

    loft_repl::run(repl)?;
    Ok(ExitCode::SUCCESS)
}

/// Execute lines non-interactively, printing as we go. Comment lines and
/// blanks are skipped.
fn run_lines<'a>(repl: &mut Repl, lines: impl Iterator<Item = &'a str>) -> Result<ExitCode> {
    for line in lines {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(output) = repl.process_line(line)? {
            println!("{}", output);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn print_help() {
    println!(
        r#"loft v{}

Usage:
  loft                     Interactive shell (in-memory workspace)
  loft --mount <dir>       Mirror a real directory (write-through + resync)
  loft -c <command>        Execute one command and exit
  loft <script>            Run a file of shell lines

Options:
  -h, --help               Show this help
  -V, --version            Show version
"#,
        env!("CARGO_PKG_VERSION")
    );
}
