//! SNS action enum.

use std::fmt;

/// The SNS query actions this client issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnsAction {
    /// Publish a single message.
    Publish,
    /// Publish up to ten messages in one call.
    PublishBatch,
}

impl SnsAction {
    /// Returns the value sent in the `Action` form field.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Publish => "Publish",
            Self::PublishBatch => "PublishBatch",
        }
    }

    /// Parse an action name into an `SnsAction`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Publish" => Some(Self::Publish),
            "PublishBatch" => Some(Self::PublishBatch),
            _ => None,
        }
    }
}

impl fmt::Display for SnsAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
