//! Result type for resolver operations
//!
//! An operation can succeed, succeed with caveats (a missing directory, no
//! examples), or fail part-way. In every case a value is available, so the
//! caller can still answer with the best data on hand.

use crate::Error;

/// Outcome of one resolver operation.
#[derive(Debug)]
pub enum Outcome<T> {
    /// Complete result.
    Ok(T),

    /// Complete as far as the tree allows; `warnings` say what was missing.
    Warning { value: T, warnings: Vec<String> },

    /// Stopped on `error`; `partial` holds whatever was gathered first.
    Failed { partial: T, error: Error },
}

impl<T> Outcome<T> {
    /// The data, whatever the outcome.
    pub fn value(&self) -> &T {
        match self {
            Self::Ok(value) | Self::Warning { value, .. } => value,
            Self::Failed { partial, .. } => partial,
        }
    }

    /// Discard diagnostics and keep the data.
    pub fn into_value(self) -> T {
        match self {
            Self::Ok(value) | Self::Warning { value, .. } => value,
            Self::Failed { partial, .. } => partial,
        }
    }

    pub fn warnings(&self) -> &[String] {
        match self {
            Self::Warning { warnings, .. } => warnings,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            Self::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Collects warnings and the first error while an operation runs.
#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    warnings: Vec<String>,
    error: Option<Error>,
}

impl Diagnostics {
    pub(crate) fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Record a failure. Only the first is kept as the error; later ones
    /// are demoted to warnings.
    pub(crate) fn fail(&mut self, error: Error) {
        if self.error.is_none() {
            self.error = Some(error);
        } else {
            self.warnings.push(error.to_string());
        }
    }

    pub(crate) fn finish<T>(self, value: T) -> Outcome<T> {
        match (self.error, self.warnings.is_empty()) {
            (Some(error), _) => Outcome::Failed {
                partial: value,
                error,
            },
            (None, true) => Outcome::Ok(value),
            (None, false) => Outcome::Warning {
                value,
                warnings: self.warnings,
            },
        }
    }
}
