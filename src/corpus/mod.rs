//! Corpus input

pub mod loader;
