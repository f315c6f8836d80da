//! Command handlers.
//!
//! Each handler parses its CLI-specific input, drives the library crates and
//! formats the result for the terminal.

pub mod config;
pub mod fields;
pub mod run;
