//! Channel capability tokens.
//!
//! The chat SDK grants the current user a set of string tokens per channel
//! (`own_capabilities`). Only two of them drive behavior here; every other
//! token is carried through untouched as [`Capability::Other`].

use std::{collections::BTreeSet, convert::Infallible, fmt, str::FromStr};

/// A permission the current user holds on a channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    /// `read-events`: the user receives read receipts and unread counts.
    ReadEvents,
    /// `upload-file`: the user may attach files to messages.
    UploadFile,
    /// Any token this crate does not interpret.
    Other(String),
}

impl Capability {
    /// Wire token for this capability.
    pub fn as_str(&self) -> &str {
        match self {
            Self::ReadEvents => "read-events",
            Self::UploadFile => "upload-file",
            Self::Other(token) => token,
        }
    }
}

impl FromStr for Capability {
    type Err = Infallible;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Ok(match token {
            "read-events" => Self::ReadEvents,
            "upload-file" => Self::UploadFile,
            other => Self::Other(other.to_string()),
        })
    }
}

impl From<&str> for Capability {
    fn from(token: &str) -> Self {
        match token.parse() {
            Ok(capability) => capability,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of capabilities held on one channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities(BTreeSet<Capability>);

impl Capabilities {
    /// Empty capability set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether the set grants `capability`.
    pub fn contains(&self, capability: &Capability) -> bool {
        self.0.contains(capability)
    }

    /// Shorthand for `read-events` membership.
    pub fn can_read_events(&self) -> bool {
        self.contains(&Capability::ReadEvents)
    }

    /// Shorthand for `upload-file` membership.
    pub fn can_upload_file(&self) -> bool {
        self.contains(&Capability::UploadFile)
    }

    /// Grant a capability.
    pub fn insert(&mut self, capability: Capability) {
        self.0.insert(capability);
    }

    /// Iterate over the granted capabilities in token order.
    pub fn iter(&self) -> impl Iterator<Item = &Capability> {
        self.0.iter()
    }

    /// Check if no capability is granted.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Capability> for Capabilities {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for Capabilities {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(iter.into_iter().map(Capability::from).collect())
    }
}
