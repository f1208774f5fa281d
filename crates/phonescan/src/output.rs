use crate::error::{Error, Result};
use crate::extract::Found;
use crate::scan::ScanStats;
use clap::ValueEnum;
use std::error::Error as _;
use std::io::Write;
use std::time::Duration;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// One number per line
    Text,
    /// One number per row, no header
    Csv,
    /// One JSON object per line with `path` and `number`
    Json,
}

/// Destination for found numbers. Each record is written as soon as it
/// arrives.
pub enum Sink {
    Text(Box<dyn Write>),
    Csv(csv::Writer<Box<dyn Write>>),
    Json(Box<dyn Write>),
}

impl Sink {
    pub fn new(format: Format, writer: Box<dyn Write>) -> Self {
        match format {
            Format::Text => Sink::Text(writer),
            Format::Csv => Sink::Csv(
                csv::WriterBuilder::new()
                    .has_headers(false)
                    .from_writer(writer),
            ),
            Format::Json => Sink::Json(writer),
        }
    }

    pub fn write(&mut self, found: &Found) -> Result<()> {
        match self {
            Sink::Text(out) => writeln!(out, "{}", found.number)?,
            Sink::Csv(out) => out.write_record([found.number.as_str()])?,
            Sink::Json(out) => {
                let record = serde_json::json!({
                    "path": found.path.to_string_lossy(),
                    "number": found.number,
                });
                serde_json::to_writer(&mut *out, &record)?;
                writeln!(out)?;
            }
        }
        Ok(())
    }

    pub fn finish(self) -> Result<()> {
        match self {
            Sink::Text(mut out) | Sink::Json(mut out) => out.flush()?,
            Sink::Csv(mut out) => out.flush()?,
        }
        Ok(())
    }
}

/// Diagnostics on stderr: per-file errors and the closing summary.
pub struct Reporter {
    stderr: StandardStream,
    verbose: bool,
}

impl Reporter {
    pub fn new(color: bool, verbose: bool) -> Self {
        let color_choice = if color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self {
            stderr: StandardStream::stderr(color_choice),
            verbose,
        }
    }

    fn set_color(&mut self, color: Color) {
        let _ = self
            .stderr
            .set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
    }

    fn set_dim(&mut self) {
        let _ = self.stderr.set_color(ColorSpec::new().set_dimmed(true));
    }

    fn reset(&mut self) {
        let _ = self.stderr.reset();
    }

    pub fn error(&mut self, err: &Error) {
        self.set_color(Color::Red);
        let _ = write!(self.stderr, "error");
        self.reset();
        let _ = write!(self.stderr, ": {}", err);
        let mut source = err.source();
        while let Some(cause) = source {
            let _ = write!(self.stderr, ": {}", cause);
            source = cause.source();
        }
        let _ = writeln!(self.stderr);
    }

    pub fn interrupted(&mut self) {
        self.set_color(Color::Yellow);
        let _ = writeln!(self.stderr, "interrupted");
        self.reset();
    }

    pub fn summary(&mut self, stats: &ScanStats, elapsed: Duration) {
        if !self.verbose {
            return;
        }
        let color = if stats.errors == 0 {
            Color::Green
        } else {
            Color::Yellow
        };
        self.set_color(color);
        let _ = write!(
            self.stderr,
            "{} numbers in {} files",
            stats.numbers_found, stats.files_scanned
        );
        self.reset();
        if stats.errors > 0 {
            let _ = write!(self.stderr, ", {} unreadable", stats.errors);
        }
        self.set_dim();
        let _ = writeln!(self.stderr, " ({:.2}s)", elapsed.as_secs_f64());
        self.reset();
    }
}
