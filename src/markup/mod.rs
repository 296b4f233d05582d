//! Inline highlight markup.
//!
//! Three equivalent, non-nesting tag syntaxes mark a word (or short phrase) as highlighted:
//! `[[y]]word[[/y]]`, `<y>word</y>` and `{y}word{/y}`. Delimiters match case-insensitively.

/// Highlight tag parsing and stripping.
pub mod parser;
