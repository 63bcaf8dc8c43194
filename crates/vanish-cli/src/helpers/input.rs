//! Note content input.

use std::io::{self, IsTerminal, Read};

use dialoguer::Input;

use crate::errors::CliError;

/// Content from `--content`, piped stdin, or an interactive prompt.
pub fn read_content(content: Option<String>) -> anyhow::Result<String> {
    if let Some(value) = content {
        return Ok(value);
    }

    if !io::stdin().is_terminal() {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
        let trimmed = buffer.trim_end().to_string();
        if trimmed.is_empty() {
            return Err(CliError::invalid_input("No content provided on stdin").into());
        }
        return Ok(trimmed);
    }

    Input::<String>::new()
        .with_prompt("Content")
        .interact_text()
        .map_err(|e| anyhow::anyhow!("Failed to read content: {}", e))
}
