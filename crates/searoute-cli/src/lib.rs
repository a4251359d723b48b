//! Sea route CLI library.
//!
//! Command handlers, waypoint parsing, terminal styling and output
//! formatting for the `searoute` binary.

pub mod commands;
pub mod location;
pub mod output;
pub mod terminal;
