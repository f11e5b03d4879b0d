//! Headless command scripts.
//!
//! One command per line; blank lines and `#` comments are skipped.
//!
//! ```text
//! preview
//! type txtValue hero.sprite.toml
//! press btnOkay
//! tick 16 60
//! show
//! quit
//! ```

use animbuilder_common::{BuilderError, BuilderResult};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// A host command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start the sprite preview pipeline
    Preview,
    /// Press a button on the topmost window
    Press(String),
    /// Enter text into a field on the topmost window
    Type {
        /// Control name
        control: String,
        /// Entered text, may contain spaces
        text: String,
    },
    /// Run `count` host ticks of `ms` milliseconds
    Tick {
        /// Tick length
        ms: u64,
        /// Number of ticks
        count: u32,
    },
    /// Log the open windows and their controls
    Show,
    /// Stop processing commands
    Quit,
}

/// Malformed command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCommandError {
    /// First word is not a command
    #[error("Unknown command '{0}'")]
    Unknown(String),
    /// A required argument is missing
    #[error("'{command}' expects {expected}")]
    MissingArgument {
        /// Command word
        command: &'static str,
        /// Usage hint
        expected: &'static str,
    },
    /// A numeric argument did not parse
    #[error("Invalid number '{0}'")]
    InvalidNumber(String),
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match word {
            "preview" => Ok(Self::Preview),
            "show" => Ok(Self::Show),
            "quit" | "exit" => Ok(Self::Quit),
            "press" => {
                if rest.is_empty() {
                    return Err(ParseCommandError::MissingArgument {
                        command: "press",
                        expected: "<control>",
                    });
                }
                Ok(Self::Press(rest.to_string()))
            },
            "type" => {
                let (control, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                if control.is_empty() {
                    return Err(ParseCommandError::MissingArgument {
                        command: "type",
                        expected: "<control> <text>",
                    });
                }
                Ok(Self::Type {
                    control: control.to_string(),
                    text: text.trim().to_string(),
                })
            },
            "tick" => {
                let mut args = rest.split_whitespace();
                let ms = args.next().ok_or(ParseCommandError::MissingArgument {
                    command: "tick",
                    expected: "<ms> [count]",
                })?;
                let ms = ms
                    .parse()
                    .map_err(|_| ParseCommandError::InvalidNumber(ms.to_string()))?;
                let count = match args.next() {
                    Some(count) => count
                        .parse()
                        .map_err(|_| ParseCommandError::InvalidNumber(count.to_string()))?,
                    None => 1,
                };
                Ok(Self::Tick { ms, count })
            },
            other => Err(ParseCommandError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Preview => write!(f, "preview"),
            Self::Press(control) => write!(f, "press {control}"),
            Self::Type { control, text } => write!(f, "type {control} {text}"),
            Self::Tick { ms, count } => write!(f, "tick {ms} {count}"),
            Self::Show => write!(f, "show"),
            Self::Quit => write!(f, "quit"),
        }
    }
}

/// Parse a script, skipping blanks and comments.
///
/// Errors carry their 1-based line number.
pub fn parse_script(source: &str) -> Result<Vec<Command>, (usize, ParseCommandError)> {
    source
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(n, line)| line.parse().map_err(|e| (n + 1, e)))
        .collect()
}

/// Read and parse a script file.
pub fn read_script(path: &Path) -> BuilderResult<Vec<Command>> {
    let source = std::fs::read_to_string(path)?;
    parse_script(&source).map_err(|(line, e)| BuilderError::Script {
        line,
        reason: e.to_string(),
    })
}
