//! Command-line argument definitions and `--set` parsing

use crate::form::Overrides;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for commity
#[derive(Parser, Debug, Clone)]
#[command(name = "commity")]
#[command(about = "A CLI tool for writing structured Git commit messages from a configurable form")]
#[command(long_about = None)]
#[command(version)]
pub struct Args {
    /// Directory inside the repository to commit to (defaults to the current directory)
    #[arg(value_name = "DIRECTORY")]
    pub directory: Option<PathBuf>,

    /// Configuration file path, skipping the repository and global lookup
    #[arg(long, value_name = "PATH", env = "COMMITY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Field values in NAME=VALUE format (can be specified multiple times)
    /// These take precedence over remembered values and defaults
    #[arg(long = "set", value_name = "NAME=VALUE")]
    pub set: Vec<String>,

    /// Accept every value without prompting
    #[arg(short, long)]
    pub yes: bool,

    /// Print the rendered message instead of committing
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Parse `--set` arguments into an override map
    pub fn parse_overrides(&self) -> anyhow::Result<Overrides> {
        parse_override_args(&self.set)
    }
}

/// Parse NAME=VALUE arguments; a repeated name keeps the last value
fn parse_override_args(set_args: &[String]) -> anyhow::Result<Overrides> {
    let mut result = Overrides::new();

    for arg in set_args {
        let (name, value) = parse_key_value(arg)?;
        result.insert(name, value);
    }

    Ok(result)
}

/// Parse NAME=VALUE string
fn parse_key_value(arg: &str) -> anyhow::Result<(String, String)> {
    let Some((name, value)) = arg.split_once('=') else {
        return Err(anyhow::anyhow!(
            "Invalid value format '{arg}'. Expected NAME=VALUE"
        ));
    };
    if name.trim().is_empty() {
        return Err(anyhow::anyhow!(
            "Invalid value format '{arg}'. Field name cannot be empty"
        ));
    }
    Ok((name.trim().to_owned(), value.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_overrides() {
        let set = vec!["type=fix".to_string(), "header=a=b".to_string()];
        let result = parse_override_args(&set).unwrap();

        assert_eq!(result.get("type"), Some(&"fix".to_string()));
        assert_eq!(result.get("header"), Some(&"a=b".to_string()));
    }

    #[test]
    fn test_last_value_wins() {
        let set = vec!["type=fix".to_string(), "type=docs".to_string()];
        let result = parse_override_args(&set).unwrap();

        assert_eq!(result.get("type"), Some(&"docs".to_string()));
    }

    #[test]
    fn test_empty_value_is_allowed() {
        let set = vec!["body=".to_string()];
        let result = parse_override_args(&set).unwrap();

        assert_eq!(result.get("body"), Some(&String::new()));
    }

    #[test]
    fn test_invalid_override_format() {
        let set = vec!["invalid".to_string()];
        let result = parse_override_args(&set);

        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Expected NAME=VALUE")
        );
    }

    #[test]
    fn test_empty_name() {
        let set = vec!["=value".to_string()];
        assert!(parse_override_args(&set).is_err());
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = Args::try_parse_from([
            "commity", "/repo", "--set", "type=fix", "--yes", "--dry-run",
        ])
        .unwrap();

        assert_eq!(args.directory, Some(PathBuf::from("/repo")));
        assert!(args.yes);
        assert!(args.dry_run);
        assert_eq!(args.set, vec!["type=fix".to_string()]);
    }
}
