//! Command token sequences

use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered sequence of tokens: the program to execute followed by its arguments.
///
/// Serialized as a plain array of strings so hook configurations can carry
/// a command verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Command {
    tokens: Vec<String>,
}

impl Command {
    /// Create a command from a program and its arguments
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tokens = vec![program.into()];
        tokens.extend(args.into_iter().map(Into::into));
        Self { tokens }
    }

    /// The program token, if any
    #[must_use]
    pub fn program(&self) -> Option<&str> {
        self.tokens.first().map(String::as_str)
    }

    /// Everything after the program token
    #[must_use]
    pub fn args(&self) -> &[String] {
        self.tokens.get(1..).unwrap_or_default()
    }

    /// All tokens, program first
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Whether the command has no tokens at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Number of tokens, program included
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Iterate over all tokens
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.tokens.iter()
    }

    /// Consume the command and return its tokens
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.tokens
    }
}

impl From<Vec<String>> for Command {
    fn from(tokens: Vec<String>) -> Self {
        Self { tokens }
    }
}

impl From<Command> for Vec<String> {
    fn from(command: Command) -> Self {
        command.tokens
    }
}

impl<S: Into<String>> FromIterator<S> for Command {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Command {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

impl IntoIterator for Command {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}

impl fmt::Display for Command {
    /// Renders the command as a shell-quoted line
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match shlex::try_join(self.tokens.iter().map(String::as_str)) {
            Ok(line) => f.write_str(&line),
            // NUL bytes cannot be quoted
            Err(_) => f.write_str(&self.tokens.join(" ")),
        }
    }
}
