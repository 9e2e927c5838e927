//! # Ready-to-use extractive summarization pipelines
//!
//! - `selection`: turns sentence scores into a summary, with optional trigram blocking
//! - `summarization`: end-to-end summarization of raw articles with a fine-tuned checkpoint

pub mod selection;
pub mod summarization;
