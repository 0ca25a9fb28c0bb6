//! soy-xgettext - gettext catalog extraction for Soy-style templates
//!
//! Parses template files, registers their templates under qualified
//! `namespace.template` names, annotates every `{msg}` with placeholder
//! names and a stable id, and writes the messages as a POT catalog.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: Parser, registry and the annotation/extraction passes
//! - `errors`: Error kinds and their report data
//! - `utils`: Shared utility functions

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod utils;
