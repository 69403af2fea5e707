#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]
/// ASCII bar charts of monthly totals
pub mod chart;
/// Error handling and custom [`Error`](std::error::Error) types
pub mod errors;
/// Weighted grade calculator and its chart data
pub mod grades;
/// Functions for reading purchase data and formatting report text
pub mod io;
/// Filtering purchases and aggregating them by month
pub mod ops;
/// Data types used throughout Tally
pub mod types;
