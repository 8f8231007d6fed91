// postprep: Fine-tuning data preparation for LinkedIn post generation
//
// This is the library root. Each module is one stage of the preparation
// pipeline (load -> extract -> format -> write) or shared plumbing.

pub mod config;
pub mod error;
pub mod extractor;
pub mod formatter;
pub mod loader;
pub mod output;
pub mod pipeline;

pub use error::PrepError;
