//! Natural Language Processing components
//!
//! This module provides tokenization, stopword lists, lemmatization and the
//! shared language resources they draw on.

pub mod lemmatizer;
pub mod resources;
pub mod stopwords;
pub mod tokenizer;
