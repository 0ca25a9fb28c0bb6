//! Core extraction engine.
//!
//! ## Module Structure
//!
//! - `ast`: Template syntax tree
//! - `parsers`: Template lexer and parser
//! - `registry`: Qualified template names mapped to their trees
//! - `msg`: Message algorithms (placeholders, id fingerprint, PO validation)
//! - `annotate`: Message annotation pass
//! - `extract`: Catalog extraction pass
//! - `catalog`: Catalog document and its serializations
//! - `file_scanner`: Input path expansion
//! - `pipeline`: End-to-end driver
//!
//! ## Extraction Pipeline
//!
//! 1. **Registration** (`registry::Registry::add`)
//!    - Parsed files are added one by one under `namespace.template` names
//!    - Malformed files and duplicate names abort the run
//!
//! 2. **Annotation** (`annotate::annotate`)
//!    - Every `{msg}` gets its placeholder map and message id
//!    - Mutates the registry in place; running it twice changes nothing
//!
//! 3. **Extraction** (`extract::extract`)
//!    - Read-only walk in registry order producing one entry per message

pub mod annotate;
pub mod ast;
pub mod catalog;
pub mod extract;
pub mod file_scanner;
pub mod msg;
pub mod parsers;
pub mod pipeline;
pub mod registry;

pub use annotate::annotate;
pub use catalog::{Catalog, CatalogEntry, CatalogHeader};
pub use extract::{extract, extract_with_header};
pub use registry::Registry;
