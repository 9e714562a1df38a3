//! Utility modules shared by the pipeline and the importer.
//!
//! - `html`: Entity escaping and element classification
//! - `date`: Spreadsheet serial dates

pub mod date;
pub mod html;
