//! Codec layer for field values and text.
//!
//! # Submodules
//!
//! - [`field`]: One decoder per dBase type code
//! - [`text`]: Text-encoding normalization and encoding selection
//! - [`codepage`]: Header code page markers

pub mod codepage;
pub mod field;
pub mod text;
