use std::fmt;

/// Whether an ensure call created the resource or found it already there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Created,
    Reused,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Reused => write!(f, "reused"),
        }
    }
}

/// A resource handle returned by an ensure call.
#[derive(Debug, Clone, PartialEq)]
pub struct Ensured<T> {
    pub resource: T,
    pub outcome: Outcome,
}

impl<T> Ensured<T> {
    #[must_use]
    pub fn created(resource: T) -> Self {
        Self {
            resource,
            outcome: Outcome::Created,
        }
    }

    #[must_use]
    pub fn reused(resource: T) -> Self {
        Self {
            resource,
            outcome: Outcome::Reused,
        }
    }

    #[must_use]
    pub fn was_created(&self) -> bool {
        self.outcome == Outcome::Created
    }

    #[must_use]
    pub fn into_inner(self) -> T {
        self.resource
    }
}
