use crate::discover::{Extension, DEFAULT_EXTENSION};
use crate::output::Format;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "phonescan",
    about = "Extract Indian phone numbers from text files",
    version
)]
pub struct Cli {
    /// Root directory to scan recursively
    pub root: PathBuf,

    /// Extension of files to scan, e.g. txt, csv, md
    #[arg(short = 'e', long, default_value = DEFAULT_EXTENSION)]
    pub file_extension: String,

    /// Write numbers to FILE instead of stdout (CSV unless --format is given)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format [default: text on stdout, csv for --output]
    #[arg(long, value_enum)]
    pub format: Option<Format>,

    /// Read files in parallel; output keeps walk order
    #[arg(short = 'j', long)]
    pub parallel: bool,

    /// Stop at the first file that cannot be read
    #[arg(long)]
    pub fail_fast: bool,

    /// Print a summary to stderr when done
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    pub fn extension(&self) -> Extension {
        Extension::new(&self.file_extension)
    }

    pub fn format(&self) -> Format {
        match (self.format, &self.output) {
            (Some(format), _) => format,
            (None, Some(_)) => Format::Csv,
            (None, None) => Format::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["phonescan", "data"]);
        assert_eq!(cli.root, PathBuf::from("data"));
        assert_eq!(cli.extension(), Extension::new("txt"));
        assert_eq!(cli.format(), Format::Text);
        assert!(!cli.parallel);
    }

    #[test]
    fn test_output_file_defaults_to_csv() {
        let cli = Cli::parse_from(["phonescan", "data", "-o", "numbers.csv"]);
        assert_eq!(cli.format(), Format::Csv);

        let cli = Cli::parse_from(["phonescan", "data", "-o", "n.jsonl", "--format", "json"]);
        assert_eq!(cli.format(), Format::Json);
    }

    #[test]
    fn test_extension_without_dot() {
        let cli = Cli::parse_from(["phonescan", "data", "--file-extension", "md"]);
        assert_eq!(cli.extension().as_str(), ".md");
    }

    #[test]
    fn test_root_is_required() {
        assert!(Cli::try_parse_from(["phonescan"]).is_err());
    }
}
