//! Command-line interface for the `otl` binary.

pub mod commands;
