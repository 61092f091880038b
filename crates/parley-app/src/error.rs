//! Runtime errors.

use thiserror::Error;

/// Errors returned by runtime handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// The runtime task stopped, so the command could not be delivered.
    #[error("{component} runtime has shut down")]
    Closed {
        /// Which runtime stopped.
        component: &'static str,
    },
}

impl RuntimeError {
    pub(crate) fn preview_closed() -> Self {
        Self::Closed { component: "preview" }
    }

    pub(crate) fn composer_closed() -> Self {
        Self::Closed { component: "composer" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_component() {
        assert_eq!(RuntimeError::composer_closed().to_string(), "composer runtime has shut down");
    }
}
