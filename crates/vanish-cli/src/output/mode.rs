//! Output mode routing logic.

use std::io::IsTerminal;

use crate::helpers::OutputFormat;

/// Output mode determines how results are formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Machine-readable JSON output only
    Json,
    /// Plain text, stable for logs and scripts
    #[default]
    Plain,
    /// Human-friendly tables (TTY only, unless requested)
    Pretty,
}

impl OutputMode {
    /// Resolve output mode from flags and environment.
    ///
    /// Routing rules:
    /// 1. `--json` overrides everything
    /// 2. `--format` picks table or plain explicitly
    /// 3. `TERM=dumb` forces plain
    /// 4. Pretty only when stdout is a TTY
    pub fn resolve(
        json_flag: bool,
        format: Option<OutputFormat>,
        is_tty: bool,
        term_is_dumb: bool,
    ) -> Self {
        if json_flag {
            return Self::Json;
        }
        match format {
            Some(OutputFormat::Table) => return Self::Pretty,
            Some(OutputFormat::Plain) => return Self::Plain,
            None => {}
        }
        if term_is_dumb || !is_tty {
            return Self::Plain;
        }
        Self::Pretty
    }

    /// Resolve against the current process environment.
    pub fn from_env(json_flag: bool, format: Option<OutputFormat>) -> Self {
        let is_tty = std::io::stdout().is_terminal();
        let term_is_dumb = std::env::var("TERM").map(|v| v == "dumb").unwrap_or(false);
        Self::resolve(json_flag, format, is_tty, term_is_dumb)
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_flag_wins() {
        assert_eq!(
            OutputMode::resolve(true, Some(OutputFormat::Table), true, false),
            OutputMode::Json
        );
    }

    #[test]
    fn test_explicit_format() {
        assert_eq!(
            OutputMode::resolve(false, Some(OutputFormat::Table), false, true),
            OutputMode::Pretty
        );
        assert_eq!(
            OutputMode::resolve(false, Some(OutputFormat::Plain), true, false),
            OutputMode::Plain
        );
    }

    #[test]
    fn test_tty_detection() {
        assert_eq!(OutputMode::resolve(false, None, true, false), OutputMode::Pretty);
        assert_eq!(OutputMode::resolve(false, None, false, false), OutputMode::Plain);
        assert_eq!(OutputMode::resolve(false, None, true, true), OutputMode::Plain);
    }
}
