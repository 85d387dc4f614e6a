//! Output formatting for CLI responses.

use crate::cli::args::OutputFormat;
use crate::error::Result;
use serde::Serialize;

/// Writes command responses to stdout and diagnostics to stderr.
pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Output { format, quiet }
    }

    /// Print a response in the selected format.
    pub fn print<T: Serialize>(&self, data: &T) -> Result<()> {
        println!("{}", self.render(data)?);
        Ok(())
    }

    fn render<T: Serialize>(&self, data: &T) -> Result<String> {
        let text = match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(data)?,
            OutputFormat::Yaml => serde_yaml::to_string(data)?,
            OutputFormat::Toml => toml::to_string_pretty(data)?,
        };
        Ok(text.trim_end().to_string())
    }

    /// Print text exactly as given, regardless of format.
    pub fn print_raw(&self, text: &str) {
        println!("{}", text);
    }

    /// Informational message, silenced by --quiet.
    pub fn info(&self, message: &str) {
        if !self.quiet {
            eprintln!("{}", message);
        }
    }

    pub fn warn(&self, message: &str) {
        eprintln!("Warning: {}", message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("Error: {}", message);
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Sample {
        name: String,
        count: usize,
    }

    fn sample() -> Sample {
        Sample {
            name: "propkit".to_string(),
            count: 2,
        }
    }

    #[test]
    fn test_render_json() {
        let output = Output::new(OutputFormat::Json, false);
        let text = output.render(&sample()).unwrap();
        assert!(text.starts_with('{'));
        assert!(text.contains("\"count\": 2"));
    }

    #[test]
    fn test_render_yaml() {
        let output = Output::new(OutputFormat::Yaml, false);
        let text = output.render(&sample()).unwrap();
        assert!(text.contains("name: propkit"));
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn test_render_toml() {
        let output = Output::new(OutputFormat::Toml, false);
        let text = output.render(&sample()).unwrap();
        assert!(text.contains("count = 2"));
    }
}
