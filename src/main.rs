use std::env;
use std::ffi::OsString;
use std::process::ExitCode;

use clap::{Parser, error::ErrorKind};
use colored::Colorize;
use soy_xgettext::cli::{Arguments, ExitStatus, print_usage, wants_usage};

fn main() -> ExitCode {
    let raw: Vec<OsString> = env::args_os().collect();
    if wants_usage(raw.get(1..).unwrap_or_default()) {
        print_usage();
        return ExitStatus::Error.into();
    }

    let args = match Arguments::try_parse_from(&raw) {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayVersion => ExitStatus::Success,
                _ => ExitStatus::Error,
            }
            .into();
        }
    };

    match soy_xgettext::cli::run_cli(args) {
        Ok(status) => status.into(),
        Err(err) => {
            eprintln!("{} {:#}", "error:".bold().red(), err);
            ExitStatus::Error.into()
        }
    }
}
