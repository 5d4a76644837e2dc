//! Minimal CLI parsing for the companions binary.

use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};

use librarian_companions::services::logging::LogFormat;

pub const USAGE: &str = concat!(
    "usage: companions [--log-format json|pretty] ",
    "<detect <media-file> [--all] | list <directory>>",
);

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    /// Find companions for one media file
    Detect { media_path: PathBuf, show_rejected: bool },
    /// Turn a directory into a playlist
    List { dir: PathBuf },
}

#[derive(Debug, PartialEq, Eq)]
pub struct CliOptions {
    pub command: Command,
    pub log_format: LogFormat,
}

impl CliOptions {
    pub fn from_args() -> Result<Self> {
        Self::parse(env::args().skip(1))
    }

    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut log_format = LogFormat::default();
        let mut show_rejected = false;
        let mut positional = Vec::new();

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--all" => show_rejected = true,
                "--log-format" => {
                    let value = args.next().ok_or_else(|| anyhow!("--log-format needs a value"))?;
                    log_format = value.parse()?;
                }
                _ if arg.starts_with("--log-format=") => {
                    if let Some(value) = arg.split_once('=').map(|(_, v)| v) {
                        log_format = value.parse()?;
                    }
                }
                _ if arg.starts_with("--") => bail!("unknown option {}\n{}", arg, USAGE),
                _ => positional.push(arg),
            }
        }

        let command = match positional.as_slice() {
            [cmd, path] if cmd == "detect" => Command::Detect {
                media_path: PathBuf::from(path),
                show_rejected,
            },
            [cmd, path] if cmd == "list" => Command::List {
                dir: PathBuf::from(path),
            },
            _ => bail!("{}", USAGE),
        };

        Ok(Self {
            command,
            log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliOptions> {
        CliOptions::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_detect() {
        let options = parse(&["detect", "/m/Movie.mkv", "--all"]).unwrap();
        assert_eq!(
            options.command,
            Command::Detect {
                media_path: PathBuf::from("/m/Movie.mkv"),
                show_rejected: true
            }
        );
        assert_eq!(options.log_format, LogFormat::Json);
    }

    #[test]
    fn test_parse_list_with_format() {
        let options = parse(&["--log-format=pretty", "list", "/m"]).unwrap();
        assert_eq!(options.command, Command::List { dir: PathBuf::from("/m") });
        assert_eq!(options.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["detect"]).is_err());
        assert!(parse(&["play", "x"]).is_err());
        assert!(parse(&["--bogus", "list", "/m"]).is_err());
        assert!(parse(&["--log-format"]).is_err());
    }
}
