//! Output formatting for the CLI.
//!
//! - **json**: serde_json renderings for `--json`
//! - **text**: human-readable notes and comfy-table listings
//! - **mode**: json / plain / pretty routing

pub mod json;
mod mode;
pub mod text;

pub use mode::OutputMode;
