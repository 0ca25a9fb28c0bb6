use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use colored::Colorize;
use glob::Pattern;
use walkdir::WalkDir;

use crate::errors::{ExtractError, IoFailureError};

/// Options controlling which files are picked up.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Template extensions without the leading dot.
    pub extensions: Vec<String>,
    /// Paths matching any of these are skipped.
    pub ignores: Vec<Pattern>,
    pub verbose: bool,
}

/// Expand input paths into the list of template files to parse.
///
/// Directories are walked recursively in file-name order; explicit files
/// are subject to the same extension and ignore rules. Order follows the
/// inputs, and a file reached twice is listed once.
pub fn scan_inputs(inputs: &[PathBuf], options: &ScanOptions) -> Result<Vec<PathBuf>, ExtractError> {
    let mut files = Vec::new();
    let mut seen: HashSet<PathBuf> = HashSet::new();

    for input in inputs {
        if !input.exists() {
            return Err(IoFailureError::new(
                input.display().to_string(),
                io::Error::new(io::ErrorKind::NotFound, "no such file or directory"),
            )
            .into());
        }

        for entry in WalkDir::new(input).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e
                    .path()
                    .unwrap_or(input.as_path())
                    .display()
                    .to_string();
                IoFailureError::new(path, io::Error::from(e))
            })?;

            let path = entry.path();
            if !entry.file_type().is_file() || !has_extension(path, &options.extensions) {
                continue;
            }
            if options.ignores.iter().any(|p| p.matches_path(path)) {
                if options.verbose {
                    eprintln!("{} skipping ignored file {}", "note:".bold().cyan(), path.display());
                }
                continue;
            }
            if seen.insert(path.to_path_buf()) {
                files.push(path.to_path_buf());
            }
        }
    }

    Ok(files)
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e == ext))
}
