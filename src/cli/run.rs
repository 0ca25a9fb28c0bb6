//! Extraction command: config + arguments -> pipeline -> output.

use std::{
    env, fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use colored::Colorize;

use super::args::Arguments;
use crate::config::{Config, ConfigLoadResult, OutputFormat, load_config, normalize_extensions};
use crate::core::catalog::{Catalog, CatalogHeader};
use crate::core::file_scanner::ScanOptions;
use crate::core::pipeline::{self, ExtractOptions};
use crate::errors::{ExtractError, IoFailureError};

/// Effective settings after merging arguments over the config file.
#[derive(Debug)]
struct Settings {
    inputs: Vec<PathBuf>,
    output: Option<PathBuf>,
    format: OutputFormat,
    extract: ExtractOptions,
}

impl Settings {
    fn merge(args: Arguments, config: Config) -> Result<Self> {
        let extensions = if args.extensions.is_empty() {
            config.extensions.clone()
        } else {
            let extensions = normalize_extensions(&args.extensions);
            if extensions.is_empty() {
                bail!("--extension must name at least one file extension");
            }
            extensions
        };

        let header = match args.project.or(config.project.clone()) {
            Some(project) => CatalogHeader { project },
            None => CatalogHeader::default(),
        };

        Ok(Self {
            inputs: args.inputs,
            output: args.output,
            format: args.format.unwrap_or(config.format),
            extract: ExtractOptions {
                scan: ScanOptions {
                    extensions,
                    ignores: config.ignore_patterns()?,
                    verbose: args.verbose,
                },
                header,
            },
        })
    }
}

pub fn run(args: Arguments) -> Result<()> {
    let verbose = args.verbose;
    let cwd = env::current_dir().context("Failed to get current directory")?;
    let ConfigLoadResult { config, path } = load_config(&cwd)?;
    if verbose && let Some(path) = &path {
        eprintln!("{} using config {}", "note:".bold().cyan(), path.display());
    }

    let settings = Settings::merge(args, config)?;
    let catalog = pipeline::run(&settings.inputs, &settings.extract)?;

    // Rendered in full before anything is written.
    let buffer = render(&catalog, settings.format).context("Failed to render catalog")?;
    write_output(settings.output.as_deref(), &buffer)?;

    if verbose && let Some(output) = &settings.output {
        eprintln!(
            "{} wrote {} message(s) to {}",
            "note:".bold().cyan(),
            catalog.len(),
            output.display()
        );
    }
    Ok(())
}

fn render(catalog: &Catalog, format: OutputFormat) -> io::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    match format {
        OutputFormat::Po => catalog.write_to(&mut buffer)?,
        OutputFormat::Json => catalog.write_json(&mut buffer)?,
    }
    Ok(buffer)
}

fn write_output(output: Option<&Path>, buffer: &[u8]) -> Result<()> {
    match output {
        Some(path) => fs::write(path, buffer).map_err(|e| {
            ExtractError::from(IoFailureError::new(path.display().to_string(), e))
        })?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(buffer)
                .and_then(|()| stdout.flush())
                .map_err(|e| ExtractError::from(IoFailureError::new("<stdout>", e)))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> Arguments {
        Arguments::try_parse_from(std::iter::once("xgettext-soy").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_arguments_override_config() {
        let config = Config {
            extensions: vec!["tpl".to_string()],
            ignores: vec!["**/gen/**".to_string()],
            project: Some("from config".to_string()),
            format: OutputFormat::Json,
        };
        let settings = Settings::merge(
            parse(&["--extension", ".soy", "--project", "cli", "--format", "po", "src"]),
            config,
        )
        .unwrap();

        assert_eq!(settings.extract.scan.extensions, vec!["soy"]);
        assert_eq!(settings.extract.scan.ignores.len(), 1);
        assert_eq!(settings.extract.header.project, "cli");
        assert_eq!(settings.format, OutputFormat::Po);
    }

    #[test]
    fn test_config_fills_missing_arguments() {
        let config = Config {
            extensions: vec!["tpl".to_string()],
            project: Some("shop 3".to_string()),
            format: OutputFormat::Json,
            ..Default::default()
        };
        let settings = Settings::merge(parse(&["src"]), config).unwrap();

        assert_eq!(settings.extract.scan.extensions, vec!["tpl"]);
        assert_eq!(settings.extract.header.project, "shop 3");
        assert_eq!(settings.format, OutputFormat::Json);
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::merge(parse(&["src"]), Config::default()).unwrap();
        assert_eq!(settings.extract.header, CatalogHeader::default());
        assert_eq!(settings.format, OutputFormat::Po);
        assert_eq!(settings.output, None);
    }

    #[test]
    fn test_empty_extension_argument_fails() {
        assert!(Settings::merge(parse(&["--extension", ".", "src"]), Config::default()).is_err());
    }
}
