pub mod config;
pub(crate) mod dropout;
pub mod error;
pub mod ngrams;
pub mod resources;
pub mod workdir;

pub use config::Config;
