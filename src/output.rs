//! Build-output sinks
//!
//! Each sink receives the finished [DerivedOutputs] and publishes it as named
//! key/value pairs.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use tracing::debug;

use crate::config::OutputFormat;
use crate::domain::DerivedOutputs;
use crate::error::{GitStampError, Result};

/// Receives the final output bundle
pub trait OutputSink {
    fn emit(&mut self, outputs: &DerivedOutputs) -> Result<()>;
}

/// Format one output the way GitHub Actions expects it in `$GITHUB_OUTPUT`.
///
/// Multi-line values use the `KEY<<DELIMITER` heredoc form.
pub fn github_output_line(key: &str, value: &str, delimiter: &str) -> Result<String> {
    if !value.contains('\n') {
        return Ok(format!("{}={}\n", key, value));
    }
    if key.contains(delimiter) || value.contains(delimiter) {
        return Err(GitStampError::output(format!(
            "value for '{}' contains the delimiter '{}'",
            key, delimiter
        )));
    }
    Ok(format!("{}<<{}\n{}\n{}\n", key, delimiter, value, delimiter))
}

/// Appends outputs to the file named by `GITHUB_OUTPUT`
pub struct GithubOutputSink<W: Write> {
    path: Option<PathBuf>,
    fallback: W,
    delimiter: String,
}

impl GithubOutputSink<io::Stdout> {
    /// Write to `path`, or to stdout when no output file is configured
    pub fn new(path: Option<PathBuf>) -> Self {
        GithubOutputSink::with_fallback(path, io::stdout())
    }
}

impl<W: Write> GithubOutputSink<W> {
    pub fn with_fallback(path: Option<PathBuf>, fallback: W) -> Self {
        GithubOutputSink {
            path,
            fallback,
            delimiter: format!("ghadelimiter_{}", std::process::id()),
        }
    }

    fn render(&self, outputs: &DerivedOutputs) -> Result<String> {
        let mut rendered = String::new();
        for (key, value) in outputs.pairs() {
            rendered.push_str(&github_output_line(key, value, &self.delimiter)?);
        }
        Ok(rendered)
    }
}

impl<W: Write> OutputSink for GithubOutputSink<W> {
    fn emit(&mut self, outputs: &DerivedOutputs) -> Result<()> {
        let rendered = self.render(outputs)?;

        match &self.path {
            Some(path) => {
                debug!(path = %path.display(), "appending outputs");
                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                file.write_all(rendered.as_bytes())?;
            }
            None => {
                self.fallback.write_all(rendered.as_bytes())?;
                self.fallback.flush()?;
            }
        }
        Ok(())
    }
}

/// Plain `KEY=value` lines
pub struct EnvSink<W: Write> {
    writer: W,
}

impl<W: Write> EnvSink<W> {
    pub fn new(writer: W) -> Self {
        EnvSink { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputSink for EnvSink<W> {
    fn emit(&mut self, outputs: &DerivedOutputs) -> Result<()> {
        for (key, value) in outputs.pairs() {
            writeln!(self.writer, "{}={}", key, value)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// A pretty-printed JSON object
pub struct JsonSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        JsonSink { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputSink for JsonSink<W> {
    fn emit(&mut self, outputs: &DerivedOutputs) -> Result<()> {
        let mut map = serde_json::Map::new();
        for (key, value) in outputs.pairs() {
            map.insert(key.to_string(), serde_json::Value::from(value));
        }
        serde_json::to_writer_pretty(&mut self.writer, &map)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Pick the sink for `format`. `github_output` is the value of `GITHUB_OUTPUT`.
pub fn sink_for(format: OutputFormat, github_output: Option<PathBuf>) -> Box<dyn OutputSink> {
    match format {
        OutputFormat::Github => Box::new(GithubOutputSink::new(github_output)),
        OutputFormat::Env => Box::new(EnvSink::new(io::stdout())),
        OutputFormat::Json => Box::new(JsonSink::new(io::stdout())),
    }
}
