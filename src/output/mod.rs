//! Report formatting, derived documents and export writers

pub mod formatter;
pub mod report;
pub mod writer;
