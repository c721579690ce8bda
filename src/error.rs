//! Error taxonomy: checked, unchecked and fatal errors

use std::error::Error as StdError;
use std::panic;

use thiserror::Error;

/// A type-erased error as carried by envelopes
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// An unrecoverable error.
///
/// Never enveloped and never handed to a fallback: wherever it shows up it is
/// re-raised as an unwinding panic carrying the `Fatal` value itself.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct Fatal {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl Fatal {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// A fatal error caused by `source`, reusing its message
    pub fn caused_by(source: impl Into<BoxError>) -> Self {
        let source = source.into();
        Self {
            message: source.to_string(),
            source: Some(source),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Marks an error as unchecked: it propagates unchanged instead of being
/// enveloped.
#[derive(Error, Debug)]
#[error(transparent)]
pub struct Unchecked(BoxError);

impl Unchecked {
    pub fn new(error: impl Into<BoxError>) -> Self {
        Self(error.into())
    }

    pub fn get_ref(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.0
    }

    pub fn into_inner(self) -> BoxError {
        self.0
    }
}

/// How an error value is treated when it leaves a wrapped callable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Gets enveloped
    Checked,
    /// Propagates unchanged
    Unchecked,
    /// Propagates unchanged and takes priority over every candidate
    Fatal,
}

impl Category {
    pub fn of(error: &(dyn StdError + 'static)) -> Self {
        if error.is::<Fatal>() {
            Category::Fatal
        } else if error.is::<Unchecked>() {
            Category::Unchecked
        } else {
            Category::Checked
        }
    }

    /// Whether errors of this category bypass envelopes
    pub fn is_unchecked(self) -> bool {
        !matches!(self, Category::Checked)
    }
}

/// Re-raise `error` as an unwinding panic if it is fatal or unchecked,
/// otherwise hand it back.
///
/// The panic payload is the concrete `Fatal` or `Unchecked` value, so callers
/// further up can `downcast` it.
pub(crate) fn raise_unchecked(error: BoxError) -> BoxError {
    match Category::of(&*error) {
        Category::Checked => error,
        Category::Fatal => match error.downcast::<Fatal>() {
            Ok(fatal) => {
                tracing::warn!(error = %fatal, "re-raising fatal error");
                panic::resume_unwind(fatal)
            }
            Err(error) => error,
        },
        Category::Unchecked => match error.downcast::<Unchecked>() {
            Ok(unchecked) => panic::resume_unwind(unchecked),
            Err(error) => error,
        },
    }
}

/// Slot-based variant of [`raise_unchecked`]: leaves checked causes in place
pub(crate) fn raise_unchecked_in(slot: &mut Option<BoxError>) {
    if let Some(cause) = slot.take() {
        *slot = Some(raise_unchecked(cause));
    }
}
