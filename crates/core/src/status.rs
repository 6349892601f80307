use std::fmt;

use tracing::warn;

/// Status code returned by every native call.
///
/// Only [`Status::Ok`] means the call fully succeeded. The stepping engine
/// treats every other status as an observability signal: it is logged and the
/// simulation continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Ok,
    Warning,
    Discard,
    Error,
    Fatal,
    Pending,
}

impl Status {
    /// Returns `true` for [`Status::Ok`].
    #[must_use]
    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }

    /// Returns `true` if the model reports that the instance is unusable.
    #[must_use]
    pub fn is_failure(self) -> bool {
        matches!(self, Self::Error | Self::Fatal)
    }

    /// Logs a warning naming `function` if this status is not [`Status::Ok`].
    ///
    /// Returns `self` so the check can be chained onto the native call.
    pub fn warn_if_not_ok(self, function: &str) -> Self {
        if !self.is_ok() {
            warn!(function, status = %self, "native call returned a non-OK status");
        }
        self
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ok => "OK",
            Self::Warning => "Warning",
            Self::Discard => "Discard",
            Self::Error => "Error",
            Self::Fatal => "Fatal",
            Self::Pending => "Pending",
        };
        f.write_str(name)
    }
}
