//! Result wrapper shared by every tree operation.

/// How a caller treats an operation whose target id matched nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Return the input unchanged.
    #[default]
    Lenient,
    /// Report [`TreeError::NotFound`].
    Strict,
}

/// Error raised by [`Rewrite::strict`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// No element (or, for child operations, no container) has this id.
    #[error("Element not found: {0}")]
    NotFound(String),
}

/// Output of a tree rewrite: the new value and whether the target was hit.
#[derive(Clone, Debug, PartialEq)]
#[must_use]
pub struct Rewrite<T> {
    pub value: T,
    pub matched: bool,
}

impl<T> Rewrite<T> {
    pub(crate) fn new(value: T, matched: bool) -> Self {
        Self { value, matched }
    }

    /// Take the value whether or not anything matched.
    pub fn lenient(self) -> T {
        self.value
    }

    /// Take the value, or fail if nothing matched `id`.
    pub fn strict(self, id: &str) -> Result<T, TreeError> {
        if self.matched {
            Ok(self.value)
        } else {
            Err(TreeError::NotFound(id.to_owned()))
        }
    }

    /// Dispatch on `mode`.
    pub fn resolve(self, mode: Mode, id: &str) -> Result<T, TreeError> {
        match mode {
            Mode::Lenient => Ok(self.lenient()),
            Mode::Strict => self.strict(id),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Rewrite<U> {
        Rewrite::new(f(self.value), self.matched)
    }
}
