//! Template source parsing.
//!
//! - `lexer`: splits source text into text runs and `{...}` tags
//! - `soy`: builds the syntax tree (`SoyFile`) from the token stream

pub mod lexer;
pub mod soy;

pub use soy::parse_file;
