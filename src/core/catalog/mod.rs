//! Catalog document produced by extraction.
//!
//! - `po`: gettext POT serialization
//!
//! The document is also `Serialize`, which backs the JSON output format.

pub mod po;

use std::io::{self, Write};

use serde::Serialize;

/// Header metadata written as the catalog's first (empty msgid) entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogHeader {
    /// `Project-Id-Version` value.
    pub project: String,
}

impl Default for CatalogHeader {
    fn default() -> Self {
        Self {
            project: "PACKAGE VERSION".to_string(),
        }
    }
}

/// One translatable message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    /// `msgctxt`, taken from the message meaning.
    pub context: String,
    pub msgid: String,
    /// Empty for messages without plural forms.
    pub msgid_plural: String,
    /// Set for messages built from a `{plural}`; decides the msgstr form.
    pub plural: bool,
    /// Translator comment, taken from the message description.
    pub extracted_comment: String,
    /// `file:line` and `id=<N>[ var=<pluralVar>]`.
    pub references: Vec<String>,
}

impl CatalogEntry {
    pub fn is_plural(&self) -> bool {
        self.plural
    }
}

/// Ordered catalog; entry order is extraction order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Catalog {
    pub header: CatalogHeader,
    pub entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(header: CatalogHeader) -> Self {
        Self {
            header,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: CatalogEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize as a gettext POT file, through `polib`.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        po::write_catalog(self, writer)
    }

    /// Serialize as pretty JSON with a trailing newline.
    pub fn write_json<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut *writer, self)?;
        writeln!(writer)
    }
}
