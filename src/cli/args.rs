//! CLI argument definitions using clap.
//!
//! `xgettext-soy [OPTIONS] <INPUTPATH>...`
//!
//! Options given here override the config file, which overrides defaults.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{CommandFactory, Parser};

use crate::config::OutputFormat;

#[derive(Debug, Parser)]
#[command(
    name = "xgettext-soy",
    author,
    version,
    about,
    long_about = None,
    disable_help_flag = true
)]
pub struct Arguments {
    /// Template files or directories to extract messages from
    #[arg(value_name = "INPUTPATH", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Write the catalog to FILE instead of standard output
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (overrides config file)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Template file extension; can be given several times (overrides config file)
    #[arg(long = "extension", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Project-Id-Version header value (overrides config file)
    #[arg(long)]
    pub project: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// True when the command line asks for usage instead of a run: no
/// arguments at all, a first argument ending in `help`, or `-h`/`--help`
/// anywhere before `--`.
///
/// `args` excludes the program name.
pub fn wants_usage(args: &[OsString]) -> bool {
    let Some(first) = args.first() else {
        return true;
    };
    first.to_string_lossy().ends_with("help")
        || args
            .iter()
            .take_while(|arg| *arg != "--")
            .any(|arg| arg == "-h" || arg == "--help")
}

/// Usage text, written to standard error.
pub fn print_usage() {
    eprintln!("{}", Arguments::command().render_help());
}
