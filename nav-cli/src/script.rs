//! Navigation script parsing.
//!
//! One step per line; blank lines and lines starting with `#` are skipped.

use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A script line that could not be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    /// The command word is not recognized.
    #[error("unknown step `{0}`")]
    UnknownStep(String),

    /// A required argument is missing.
    #[error("`{0}` needs a path")]
    MissingPath(&'static str),

    /// An argument could not be parsed.
    #[error("invalid argument `{0}`")]
    InvalidArgument(String),

    /// Wraps another error with its line number.
    #[error("line {line}: {source}")]
    AtLine {
        /// 1-based line number.
        line: usize,
        /// Underlying error.
        source: Box<ScriptError>,
    },
}

/// One script step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// `push <path> [json]`
    Push {
        /// Target path.
        path: String,
        /// Optional state data.
        data: Option<Value>,
    },
    /// `replace <path> [json]`
    Replace {
        /// Target path.
        path: String,
        /// Optional state data.
        data: Option<Value>,
    },
    /// `back [n]`
    Back(i64),
    /// `back-to <path>`
    BackTo(String),
    /// `reload`
    Reload,
    /// `user-back`: the native back button.
    UserBack,
    /// `user-forward`: the native forward button.
    UserForward,
    /// `user-edit <path>`: typing into the address bar.
    UserEdit(String),
    /// `show`
    Show,
}

impl Step {
    /// Whether the step simulates a user gesture handled asynchronously.
    pub fn is_gesture(&self) -> bool {
        matches!(self, Self::UserBack | Self::UserForward | Self::UserEdit(_))
    }
}

fn split_word(s: &str) -> (&str, &str) {
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (s, ""),
    }
}

fn path_and_data(
    command: &'static str,
    args: &str,
) -> Result<(String, Option<Value>), ScriptError> {
    let (path, rest) = split_word(args);
    if path.is_empty() {
        return Err(ScriptError::MissingPath(command));
    }
    let data = if rest.is_empty() {
        None
    } else {
        Some(serde_json::from_str(rest).map_err(|_| ScriptError::InvalidArgument(rest.into()))?)
    };
    Ok((path.to_string(), data))
}

fn required_path(command: &'static str, args: &str) -> Result<String, ScriptError> {
    let (path, _) = split_word(args);
    if path.is_empty() {
        Err(ScriptError::MissingPath(command))
    } else {
        Ok(path.to_string())
    }
}

impl FromStr for Step {
    type Err = ScriptError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (command, args) = split_word(line.trim());
        match command {
            "push" => {
                let (path, data) = path_and_data("push", args)?;
                Ok(Self::Push { path, data })
            }
            "replace" => {
                let (path, data) = path_and_data("replace", args)?;
                Ok(Self::Replace { path, data })
            }
            "back" if args.is_empty() => Ok(Self::Back(1)),
            "back" => args
                .parse()
                .map(Self::Back)
                .map_err(|_| ScriptError::InvalidArgument(args.into())),
            "back-to" => required_path("back-to", args).map(Self::BackTo),
            "reload" => Ok(Self::Reload),
            "user-back" => Ok(Self::UserBack),
            "user-forward" => Ok(Self::UserForward),
            "user-edit" => required_path("user-edit", args).map(Self::UserEdit),
            "show" => Ok(Self::Show),
            other => Err(ScriptError::UnknownStep(other.into())),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Push { path, data: None } => write!(f, "push {path}"),
            Self::Push {
                path,
                data: Some(data),
            } => write!(f, "push {path} {data}"),
            Self::Replace { path, data: None } => write!(f, "replace {path}"),
            Self::Replace {
                path,
                data: Some(data),
            } => write!(f, "replace {path} {data}"),
            Self::Back(n) => write!(f, "back {n}"),
            Self::BackTo(path) => write!(f, "back-to {path}"),
            Self::Reload => f.write_str("reload"),
            Self::UserBack => f.write_str("user-back"),
            Self::UserForward => f.write_str("user-forward"),
            Self::UserEdit(path) => write!(f, "user-edit {path}"),
            Self::Show => f.write_str("show"),
        }
    }
}

/// Parse a whole script into numbered steps.
pub fn parse_script(source: &str) -> Result<Vec<(usize, Step)>, ScriptError> {
    source
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line, text)| {
            text.parse()
                .map(|step| (line, step))
                .map_err(|source| ScriptError::AtLine {
                    line,
                    source: Box::new(source),
                })
        })
        .collect()
}
