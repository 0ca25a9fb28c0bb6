use std::io::{self, BufWriter, Write};

use polib::catalog::Catalog as PoCatalog;
use polib::message::{Message, MessageMutView, MessageView};
use polib::metadata::CatalogMetadata;
use polib::po_file;

use crate::core::catalog::{Catalog, CatalogEntry, CatalogHeader};

/// Write the catalog as a POT file: the header entry, then every entry in
/// document order, separated by blank lines.
///
/// Nothing time-dependent is written, so equal catalogs serialize to equal
/// bytes.
pub fn write_catalog<W: Write>(catalog: &Catalog, w: &mut W) -> io::Result<()> {
    let mut writer = BufWriter::new(w);
    po_file::write(&to_po_catalog(catalog), &mut writer)
}

/// Convert to a `polib` catalog with empty translations.
///
/// Entries sharing msgctxt, msgid and msgid_plural are merged into the
/// first one: references are appended, and a differing comment is added
/// as a new line.
pub fn to_po_catalog(catalog: &Catalog) -> PoCatalog {
    let mut po = PoCatalog::new(metadata(&catalog.header));
    for entry in &catalog.entries {
        append_entry(&mut po, entry);
    }
    po
}

fn metadata(header: &CatalogHeader) -> CatalogMetadata {
    let mut metadata = CatalogMetadata::new();
    metadata.project_id_version = header.project.clone();
    metadata.mime_version = "1.0".to_string();
    metadata.content_type = "text/plain; charset=UTF-8".to_string();
    metadata.content_transfer_encoding = "8bit".to_string();
    // Source strings are English: one singular and one plural form.
    metadata.plural_rules.nplurals = 2;
    metadata.plural_rules.expr = "(n != 1)".to_string();
    metadata
}

fn append_entry(po: &mut PoCatalog, entry: &CatalogEntry) {
    let context = (!entry.context.is_empty()).then_some(entry.context.as_str());
    let msgid_plural = entry.is_plural().then_some(entry.msgid_plural.as_str());
    let source = entry.references.join("\n");

    if let Some(mut existing) = po.find_message_mut(context, &entry.msgid, msgid_plural) {
        let comment = entry.extracted_comment.as_str();
        if !comment.is_empty() && !existing.extracted_comments().lines().any(|l| l == comment) {
            let comments = existing.extracted_comments_mut();
            if !comments.is_empty() {
                comments.push('\n');
            }
            comments.push_str(comment);
        }
        let sources = existing.source_mut();
        sources.push('\n');
        sources.push_str(&source);
        return;
    }

    let mut builder = if entry.is_plural() {
        let mut builder = Message::build_plural();
        builder
            .with_msgid_plural(entry.msgid_plural.clone())
            .with_msgstr_plural(vec![String::new(); 2]);
        builder
    } else {
        Message::build_singular()
    };
    let message = builder
        .with_msgctxt(entry.context.clone())
        .with_msgid(entry.msgid.clone())
        .with_extracted_comments(entry.extracted_comment.clone())
        .with_source(source)
        .done();
    po.append_or_update(message);
}
