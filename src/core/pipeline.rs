//! End-to-end extraction run.
//!
//! 1. **Discover**: expand input paths into template files
//! 2. **Parse**: read and parse files in parallel
//! 3. **Register**: add parsed files to a fresh registry, one at a time
//! 4. **Annotate**: compute message ids and placeholders
//! 5. **Extract**: build the catalog
//!
//! Each phase completes before the next starts, and the first error ends
//! the run.

use std::fs;
use std::path::{Path, PathBuf};

use colored::Colorize;
use rayon::prelude::*;

use crate::core::annotate::annotate;
use crate::core::ast::SoyFile;
use crate::core::catalog::{Catalog, CatalogHeader};
use crate::core::extract::extract_with_header;
use crate::core::file_scanner::{ScanOptions, scan_inputs};
use crate::core::parsers::parse_file;
use crate::core::registry::Registry;
use crate::errors::{ExtractError, IoFailureError};

/// Settings for one extraction run.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub scan: ScanOptions,
    pub header: CatalogHeader,
}

impl ExtractOptions {
    fn verbose(&self) -> bool {
        self.scan.verbose
    }
}

pub fn run(inputs: &[PathBuf], options: &ExtractOptions) -> Result<Catalog, ExtractError> {
    let files = scan_inputs(inputs, &options.scan)?;
    if options.verbose() {
        eprintln!("{} found {} template file(s)", "note:".bold().cyan(), files.len());
    }

    let parsed = parse_sources(&files)?;
    let mut registry = build_registry(parsed)?;
    if options.verbose() {
        eprintln!("{} registered {} template(s)", "note:".bold().cyan(), registry.len());
    }

    annotate(&mut registry)?;
    let catalog = extract_with_header(&registry, options.header.clone())?;
    if options.verbose() {
        eprintln!("{} extracted {} message(s)", "note:".bold().cyan(), catalog.len());
    }
    Ok(catalog)
}

/// Read and parse every file in parallel.
///
/// Results keep the input order, and when several files fail the error of
/// the earliest one is reported, so failures are reproducible.
pub fn parse_sources(files: &[PathBuf]) -> Result<Vec<SoyFile>, ExtractError> {
    let results: Vec<Result<SoyFile, ExtractError>> =
        files.par_iter().map(|path| read_and_parse(path)).collect();
    results.into_iter().collect()
}

fn read_and_parse(path: &Path) -> Result<SoyFile, ExtractError> {
    let display = path.display().to_string();
    let content =
        fs::read_to_string(path).map_err(|e| IoFailureError::new(display.as_str(), e))?;
    Ok(parse_file(&display, &content)?)
}

/// Register parsed files in order. Registration is sequential so that
/// duplicate detection always sees a consistent registry.
pub fn build_registry(files: Vec<SoyFile>) -> Result<Registry, ExtractError> {
    let mut registry = Registry::new();
    for file in files {
        registry.add(file)?;
    }
    Ok(registry)
}
