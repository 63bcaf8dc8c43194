//! Application-level utilities for the Vanish CLI.
//!
//! This module provides:
//! - Path and setting resolution
//! - Password handling with retry logic

mod context;
mod password;
mod resolver;

// Re-export public API
pub use context::AppContext;
pub use password::prompt_new_password;
