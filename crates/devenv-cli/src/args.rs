//! Positional and named argument extraction over the raw command tail.
//!
//! Commands pull what they need in whatever order suits them: named flags are
//! removed from the list when read, positionals are consumed through a cursor.
//! Removing a flag never reorders the positionals still to be read.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgError {
    #[error("missing positional arg: {0}")]
    MissingPositional(String),
    #[error("missing value for {0}")]
    MissingValue(String),
    #[error("missing required arg: {0}")]
    MissingNamed(String),
}

#[derive(Debug, Clone, Default)]
pub struct ArgParser {
    args: Vec<String>,
    cursor: usize,
}

impl ArgParser {
    /// `args` excludes the executable name.
    pub fn new(args: Vec<String>) -> Self {
        Self { args, cursor: 0 }
    }

    /// Next unconsumed positional, if any. `_name` only documents the call site.
    pub fn pos(&mut self, _name: &str) -> Option<String> {
        let value = self.args.get(self.cursor).cloned()?;
        self.cursor += 1;
        Some(value)
    }

    pub fn pos_req(&mut self, name: &str) -> Result<String, ArgError> {
        self.pos(name)
            .ok_or_else(|| ArgError::MissingPositional(name.to_owned()))
    }

    /// Take `flag <value>` out of the argument list and return the value.
    pub fn named(&mut self, flag: &str) -> Result<Option<String>, ArgError> {
        let Some(idx) = self.args.iter().position(|a| a == flag) else {
            return Ok(None);
        };
        if idx + 1 >= self.args.len() {
            return Err(ArgError::MissingValue(flag.to_owned()));
        }
        let value = self.args.remove(idx + 1);
        self.args.remove(idx);
        // Keep the cursor on the same positional if tokens before it went away.
        if idx < self.cursor {
            self.cursor = self.cursor.saturating_sub(2).max(idx);
        }
        Ok(Some(value))
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn named_req(&mut self, flag: &str) -> Result<String, ArgError> {
        match self.named(flag)? {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(ArgError::MissingNamed(flag.to_owned())),
        }
    }

    /// Tokens not yet consumed as positionals.
    pub fn remaining(&self) -> &[String] {
        self.args.get(self.cursor..).unwrap_or_default()
    }
}
