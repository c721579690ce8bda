//! Fluent, `Result`-based inspection of a single envelope
//!
//! Every step either hands the review back or fails with a more specific
//! error, so a chain reads naturally with `?`:
//!
//! ```
//! use std::{io, num::ParseIntError};
//! use disclosure::{Envelope, WrappedError};
//!
//! #[derive(Debug)]
//! enum LoadError {
//!     Io(io::Error),
//!     Parse(ParseIntError),
//!     Other(WrappedError),
//! }
//!
//! impl From<io::Error> for LoadError {
//!     fn from(e: io::Error) -> Self { LoadError::Io(e) }
//! }
//! impl From<ParseIntError> for LoadError {
//!     fn from(e: ParseIntError) -> Self { LoadError::Parse(e) }
//! }
//!
//! fn classify(envelope: WrappedError) -> Result<(), LoadError> {
//!     let envelope = envelope
//!         .review()
//!         .reraise_cause_if::<io::Error>()?
//!         .reraise_cause_if::<ParseIntError>()?
//!         .fallback();
//!     Err(LoadError::Other(envelope))
//! }
//!
//! let parse = "x".parse::<u8>().unwrap_err();
//! assert!(matches!(classify(WrappedError::from_cause(parse)), Err(LoadError::Parse(_))));
//! ```

use std::error::Error as StdError;

use crate::envelope::{take_cause, Envelope};
use crate::error::{raise_unchecked_in, BoxError};

/// A review of one envelope
#[derive(Debug)]
pub struct Review<T> {
    subject: T,
}

impl<T: Envelope> Review<T> {
    pub fn of(subject: T) -> Self {
        Self { subject }
    }

    /// Fail with the cause if it is an `X`
    pub fn reraise_cause_if<X>(mut self) -> Result<Self, X>
    where
        X: StdError + Send + Sync + 'static,
    {
        match take_cause::<X>(self.subject.cause_slot()) {
            Some(cause) => Err(cause),
            None => Ok(self),
        }
    }

    /// Unwind with the cause if it is fatal or unchecked
    pub fn reraise_unchecked(mut self) -> Self {
        raise_unchecked_in(self.subject.cause_slot());
        self
    }

    /// Fail with whatever `mapping` derives from the subject
    pub fn throw_mapped<X>(self, mapping: impl FnOnce(&T) -> Option<X>) -> Result<Self, X> {
        match mapping(&self.subject) {
            Some(error) => Err(error),
            None => Ok(self),
        }
    }

    /// Fail with whatever `mapping` derives from the cause
    pub fn throw_mapped_cause<X>(
        self,
        mapping: impl FnOnce(Option<&(dyn StdError + Send + Sync + 'static)>) -> Option<X>,
    ) -> Result<Self, X> {
        match mapping(self.subject.cause_ref()) {
            Some(error) => Err(error),
            None => Ok(self),
        }
    }

    /// Condition the next step on a predicate over the cause
    pub fn when<P>(self, condition: P) -> Conditional<T, P>
    where
        P: FnOnce(&(dyn StdError + Send + Sync + 'static)) -> bool,
    {
        Conditional {
            review: self,
            condition,
        }
    }

    pub fn subject(&self) -> &T {
        &self.subject
    }

    /// End the review, handing the envelope back
    pub fn fallback(self) -> T {
        self.subject
    }

    /// End the review, mapping the envelope into some other error
    pub fn mapped<X>(self, mapping: impl FnOnce(T) -> X) -> X {
        mapping(self.subject)
    }

    /// End the review, mapping the cause into some other error
    pub fn mapped_cause<X>(self, mapping: impl FnOnce(Option<BoxError>) -> X) -> X {
        let mut subject = self.subject;
        mapping(subject.cause_slot().take())
    }
}

/// A pending step of a [`Review`], applied only if its condition holds
pub struct Conditional<T, P> {
    review: Review<T>,
    condition: P,
}

impl<T, P> Conditional<T, P>
where
    T: Envelope,
    P: FnOnce(&(dyn StdError + Send + Sync + 'static)) -> bool,
{
    /// Move the cause into `method` and fail with its result if the condition
    /// holds; envelopes without cause never satisfy a condition.
    pub fn then_throw<X>(self, method: impl FnOnce(BoxError) -> X) -> Result<Review<T>, X> {
        let Conditional {
            mut review,
            condition,
        } = self;
        let holds = review.subject.cause_ref().is_some_and(condition);
        if !holds {
            return Ok(review);
        }
        match review.subject.cause_slot().take() {
            Some(cause) => Err(method(cause)),
            None => Ok(review),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fatal;
    use crate::WrappedError;
    use std::io;
    use std::num::ParseIntError;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    fn io_envelope() -> WrappedError {
        WrappedError::from_cause(io::Error::new(io::ErrorKind::NotFound, "missing"))
    }

    #[test]
    fn test_reraise_cause_if_matches() {
        let result = io_envelope().review().reraise_cause_if::<io::Error>();
        let err = result.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_reraise_cause_if_falls_through() {
        let envelope = io_envelope()
            .review()
            .reraise_cause_if::<ParseIntError>()
            .unwrap()
            .fallback();
        assert!(envelope.cause_ref().unwrap().is::<io::Error>());
    }

    #[test]
    fn test_first_matching_step_wins() {
        let result = io_envelope()
            .review()
            .reraise_cause_if::<io::Error>()
            .and_then(|review| review.reraise_cause_if::<io::Error>());
        assert!(result.is_err());
    }

    #[test]
    fn test_throw_mapped_uses_subject() {
        let result = io_envelope()
            .review()
            .throw_mapped(|env| Some(env.message().to_uppercase()));
        assert_eq!(result.unwrap_err(), "MISSING");

        let review = io_envelope().review().throw_mapped(|_| None::<String>).unwrap();
        assert_eq!(review.subject().message(), "missing");
    }

    #[test]
    fn test_throw_mapped_cause() {
        let result = io_envelope()
            .review()
            .throw_mapped_cause(|cause| cause.map(|c| format!("cause: {c}")));
        assert_eq!(result.unwrap_err(), "cause: missing");
    }

    #[test]
    fn test_when_then_throw() {
        let result = io_envelope()
            .review()
            .when(|cause| cause.to_string() == "missing")
            .then_throw(|cause| cause.to_string().len());
        assert_eq!(result.unwrap_err(), 7);

        let review = io_envelope()
            .review()
            .when(|_| false)
            .then_throw(|cause| cause)
            .unwrap();
        assert!(review.subject().cause_ref().is_some());
    }

    #[test]
    fn test_when_without_cause_holds_never() {
        let review = WrappedError::without_cause("empty")
            .review()
            .when(|_| true)
            .then_throw(|cause| cause)
            .unwrap();
        assert_eq!(review.mapped(|env| env.to_string()), "empty");
    }

    #[test]
    fn test_mapped_cause() {
        let kind = io_envelope()
            .review()
            .mapped_cause(|cause| cause.and_then(|c| c.downcast::<io::Error>().ok()).map(|e| e.kind()));
        assert_eq!(kind, Some(io::ErrorKind::NotFound));

        let message = WrappedError::without_cause("empty")
            .review()
            .mapped_cause(|cause| cause.map_or_else(|| "no cause".to_string(), |c| c.to_string()));
        assert_eq!(message, "no cause");
    }

    #[test]
    fn test_reraise_unchecked_unwinds_fatal_cause() {
        let envelope = WrappedError::from_cause(Fatal::new("out of memory"));
        let payload = catch_unwind(AssertUnwindSafe(|| {
            envelope.review().reraise_unchecked();
        }))
        .unwrap_err();
        assert!(payload.downcast::<Fatal>().is_ok());
    }

    #[test]
    fn test_reraise_unchecked_keeps_checked_cause() {
        let review = io_envelope().review().reraise_unchecked();
        assert!(review.subject().cause_ref().is_some());
    }
}
