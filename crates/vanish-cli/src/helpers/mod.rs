//! Helper functions for the CLI.
//!
//! This module provides:
//! - Parsing utilities (datetime, duration, output format)
//! - Content input from flags, stdin or a prompt

mod input;
mod parsing;

pub use input::read_content;
pub use parsing::{parse_output_format, resolve_expiry, OutputFormat};
