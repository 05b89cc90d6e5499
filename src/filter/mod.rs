//! Token filtering
//!
//! Stopword and rare-word removal over token sequences.

pub mod frequency;

pub use frequency::{
    filter, FrequencyFilter, FrequencyScope, FrequencyTable, TieBreak, UncommonAmount,
};
