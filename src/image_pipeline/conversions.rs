//! Pipeline conversions module
//!
//! Orchestrates loading an input of any supported format and writing it out.

mod convert;


pub use convert::ConversionPipeline;
