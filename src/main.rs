//! Runlet - CLI

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use runlet::repl::{demo, prompt_output_dir, validate_output_dir, LineREPL};
use runlet::session::{RunOutcome, Session, SessionError};
use runlet::util::config::{load_user_config, RunletConfig};
use runlet::util::logger;
use runlet::{NAME, VERSION};

/// Accumulate Rust statements, build them with rustc, load and run the result
#[derive(Parser, Debug)]
#[command(name = "runlet")]
#[command(version = VERSION)]
#[command(about = NAME, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Directory for the generated source, the compiled unit and error.log
    #[arg(short, long, global = true, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Compiler to use instead of the configured one
    #[arg(long, global = true, value_name = "PATH")]
    rustc: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive mode: enter statements, then `run`
    Repl,

    /// Run a fixed set of demo statements
    Demo,

    /// Add the given imports and statements, then run them once
    Exec {
        /// Import declaration (repeatable)
        #[arg(short, long = "import", value_name = "TEXT")]
        imports: Vec<String>,

        /// Statements, added in order
        #[arg(value_name = "STATEMENT", required = true)]
        statements: Vec<String>,
    },

    /// Print version information
    Version,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    logger::init_cli(args.verbose);

    let mut config = load_user_config().context("Failed to load configuration")?;
    config.apply_env();
    if let Some(rustc) = args.rustc.clone() {
        config.toolchain.rustc = Some(rustc);
    }

    match args.command {
        Commands::Repl => {
            let out_dir = output_dir(args.out_dir.as_deref(), &config, true)?;
            let session = Session::new(out_dir, config.toolchain.clone());
            let mut repl = LineREPL::new(session, config.repl.clone())
                .context("Failed to start the line editor")?;
            repl.run()?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Demo => {
            let out_dir = output_dir(args.out_dir.as_deref(), &config, true)?;
            let mut session = Session::new(out_dir, config.toolchain.clone());
            if demo::run(&mut session).context("Demo failed")? {
                Ok(ExitCode::SUCCESS)
            } else {
                report_compile_failure(&session);
                Ok(ExitCode::from(1))
            }
        }
        Commands::Exec {
            imports,
            statements,
        } => {
            let out_dir = output_dir(args.out_dir.as_deref(), &config, false)?;
            let mut session = Session::new(out_dir, config.toolchain.clone());
            exec(&mut session, imports, statements)
        }
        Commands::Version => {
            println!("{} {}", NAME, VERSION);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn exec(
    session: &mut Session,
    imports: Vec<String>,
    statements: Vec<String>,
) -> Result<ExitCode> {
    for import in imports {
        session.add_import(import);
    }
    for statement in statements {
        match session.add(statement) {
            Ok(()) => {}
            Err(e @ SessionError::InvalidStatement(_)) => {
                eprintln!("{}", e);
                return Ok(ExitCode::from(2));
            }
            Err(e) => return Err(e.into()),
        }
    }

    match session.run_outcome().context("Failed to run statements")? {
        RunOutcome::Executed(_) => Ok(ExitCode::SUCCESS),
        RunOutcome::CompileFailed { .. } => {
            report_compile_failure(session);
            Ok(ExitCode::from(1))
        }
    }
}

fn report_compile_failure(session: &Session) {
    match session.last_diagnostic() {
        Some(summary) => eprintln!("{}", summary),
        None => eprintln!(
            "Compilation failed; see {}",
            session.diagnostic_log_path().display()
        ),
    }
}

/// `--out-dir`, then the configured directory, then (interactive commands
/// only) a prompt
fn output_dir(
    cli: Option<&Path>,
    config: &RunletConfig,
    interactive: bool,
) -> Result<PathBuf> {
    if let Some(dir) = cli.or(config.session.output_dir.as_deref()) {
        return Ok(validate_output_dir(dir)?);
    }
    if interactive {
        return prompt_output_dir();
    }
    bail!("No output directory: pass --out-dir or set session.output_dir in the config file")
}
