//! RISC-V C Compiler Driver
//!
//! `rvcc -S <source> -o <output>` parses a C source file, writes its
//! pretty-printed form to `<output>.printed` and its RISC-V assembly to
//! `<output>`.

use clap::{Parser, ValueEnum};
use log::{info, warn};
use rvcc_codegen::{generate_assembly, CodegenError, CodegenOptions, Target};
use rvcc_common::CompilerError;
use rvcc_frontend::Frontend;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(name = "rvcc")]
#[command(about = "C subset compiler targeting RISC-V assembly")]
#[command(version)]
struct Cli {
    /// Input C source file
    #[arg(short = 'S', value_name = "SOURCE")]
    source: PathBuf,

    /// Output assembly file
    #[arg(short, value_name = "OUTPUT")]
    output: PathBuf,

    /// Target base ISA
    #[arg(long, value_enum, default_value_t = TargetArg::Rv32)]
    target: TargetArg,

    /// Print the parsed AST as JSON to stdout
    #[arg(long)]
    dump_ast: bool,

    /// Verbose output (-v for stages, -vv for code generation detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum TargetArg {
    Rv32,
    Rv64,
}

impl From<TargetArg> for Target {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::Rv32 => Target::Rv32,
            TargetArg::Rv64 => Target::Rv64,
        }
    }
}

#[derive(Error, Debug)]
enum DriverError {
    #[error(transparent)]
    Frontend(#[from] CompilerError),

    #[error(transparent)]
    Codegen(#[from] CodegenError),

    #[error("Failed to serialize AST: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl DriverError {
    fn exit_code(&self) -> u8 {
        match self {
            DriverError::Frontend(err) if err.is_input_error() => 3,
            _ => 1,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: &Cli) -> Result<(), DriverError> {
    let result = compile(cli);
    if result.is_err() {
        remove_stale_output(&cli.output);
    }
    result
}

fn compile(cli: &Cli) -> Result<(), DriverError> {
    info!("Parsing {}", cli.source.display());
    let root = Frontend::parse_file(&cli.source)?;

    if cli.dump_ast {
        println!("{}", serde_json::to_string_pretty(&root)?);
    }

    let printed = printed_path(&cli.output);
    fs::write(&printed, root.to_string())?;
    info!("Printed parsed AST to {}", printed.display());

    let options = CodegenOptions {
        target: cli.target.into(),
    };
    let asm = generate_assembly(&root, &options)?;
    fs::write(&cli.output, asm)?;
    info!("Compiled to {}", cli.output.display());
    Ok(())
}

/// `<output>.printed`, keeping the output's own extension
fn printed_path(output: &Path) -> PathBuf {
    let mut name = OsString::from(output.as_os_str());
    name.push(".printed");
    PathBuf::from(name)
}

/// A failed compilation must not leave an older assembly file behind
fn remove_stale_output(output: &Path) {
    match fs::remove_file(output) {
        Ok(()) => warn!("Removed stale {}", output.display()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => warn!("Could not remove {}: {}", output.display(), err),
    }
}
