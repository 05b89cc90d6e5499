//! Corpus preparation pipeline
//!
//! Stages are defined as traits in [`traits`], composed and executed by
//! [`runner`], and observed through [`observer`]. A JSON [`spec`] describes a
//! configuration and is checked by [`validation`]. [`session`] ties loading,
//! processing and feature extraction together for a spam/ham corpus.

pub mod errors;
pub mod observer;
pub mod runner;
pub mod session;
pub mod spec;
pub mod traits;
pub mod validation;
