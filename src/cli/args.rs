//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

/// Static file server with live reload
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,

    /// Directory from which to read files
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub dir: Option<PathBuf>,

    /// Regular expression matched against changed file paths
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
    #[arg(short, long)]
    pub interface: Option<std::net::IpAddr>,

    /// Port number to listen on
    #[arg(short = 'P', long)]
    pub port: Option<u16>,

    /// Config file path (ignored when missing)
    #[arg(short = 'C', long, default_value = "hotserve.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["hotserve"]);
        assert!(cli.dir.is_none());
        assert!(cli.pattern.is_none());
        assert!(cli.port.is_none());
        assert_eq!(cli.config, PathBuf::from("hotserve.toml"));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::parse_from([
            "hotserve", "-d", "site", "-p", r"\.txt$", "-P", "3000", "-i", "0.0.0.0", "-v",
        ]);
        assert_eq!(cli.dir, Some(PathBuf::from("site")));
        assert_eq!(cli.pattern.as_deref(), Some(r"\.txt$"));
        assert_eq!(cli.port, Some(3000));
        assert_eq!(cli.interface, Some("0.0.0.0".parse().unwrap()));
        assert!(cli.verbose);
    }

    #[test]
    fn test_command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_version_and_verbose_flags_are_distinct() {
        let err = Cli::try_parse_from(["hotserve", "-V"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);

        let cli = Cli::try_parse_from(["hotserve", "--verbose"]).unwrap();
        assert!(cli.verbose);
    }
}
