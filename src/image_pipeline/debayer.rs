//! Debayering module for reconstructing RGB from a Bayer mosaic

pub mod ahd_debayer;
pub mod types;


pub use ahd_debayer::AhdDebayer;
pub use types::{CfaColor, Mosaic, RedOffset};
