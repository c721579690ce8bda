//! Wrappers that turn fallible callables into infallible ones
//!
//! A [`Wrapper`] adapts a callable returning `Result<_, X>` into one of the
//! same shape returning plain values. Checked errors leave it as an envelope
//! carried by an unwinding panic, which a [`Disclosure`](crate::Disclosure)
//! turns back into the original error. A [`CheckedWrapper`] does the same but
//! keeps the envelope in a `Result`.
//!
//! Panics from inside the callable, [`Fatal`](crate::Fatal) and
//! [`Unchecked`](crate::Unchecked) errors, and errors that already are the
//! wrapper's envelope type all pass through unchanged.
//!
//! The callables a [`Wrapper`] returns must run under
//! [`Disclosure::run`](crate::Disclosure::run) or
//! [`Disclosure::get`](crate::Disclosure::get). The envelope is raised with
//! `resume_unwind`, which skips the panic hook, so a thread that lets it
//! escape ends without printing anything.

use std::fmt;
use std::panic;
use std::sync::Arc;

use crate::envelope::Envelope;
use crate::error::{raise_unchecked, BoxError};

type Wrapping<E> = Arc<dyn Fn(BoxError) -> E + Send + Sync>;

fn from_parts<E>(wrapping: impl Fn(String, BoxError) -> E) -> impl Fn(BoxError) -> E {
    move |cause| wrapping(cause.to_string(), cause)
}

fn from_message<E: Envelope>(wrapping: impl Fn(String) -> E) -> impl Fn(BoxError) -> E {
    move |cause| {
        let mut envelope = wrapping(cause.to_string());
        *envelope.cause_slot() = Some(cause);
        envelope
    }
}

/// Turn a checked error into an envelope, or unwind if it is unchecked.
fn envelop<E: Envelope>(wrapping: &Wrapping<E>, error: BoxError) -> E {
    let error = raise_unchecked(error);
    match error.downcast::<E>() {
        Ok(envelope) => *envelope,
        Err(error) => {
            tracing::trace!(error = %error, "enveloping checked error");
            wrapping(error)
        }
    }
}

/// Converts fallible callables into callables that unwind with an envelope
pub struct Wrapper<E> {
    wrapping: Wrapping<E>,
}

impl<E> Clone for Wrapper<E> {
    fn clone(&self) -> Self {
        Self {
            wrapping: Arc::clone(&self.wrapping),
        }
    }
}

impl<E> fmt::Debug for Wrapper<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wrapper")
            .field("envelope", &std::any::type_name::<E>())
            .finish_non_exhaustive()
    }
}

impl<E: Envelope> Default for Wrapper<E> {
    fn default() -> Self {
        Self::with(E::new)
    }
}

impl<E: Envelope> Wrapper<E> {
    /// A wrapper building its envelopes from the whole cause
    pub fn using(wrapping: impl Fn(BoxError) -> E + Send + Sync + 'static) -> Self {
        Self {
            wrapping: Arc::new(wrapping),
        }
    }

    /// A wrapper building its envelopes from `(message, cause)`
    pub fn with(wrapping: impl Fn(String, BoxError) -> E + Send + Sync + 'static) -> Self {
        Self::using(from_parts(wrapping))
    }

    /// A wrapper building its envelopes from the cause's message; the cause
    /// is attached afterwards
    pub fn with_message(wrapping: impl Fn(String) -> E + Send + Sync + 'static) -> Self {
        Self::using(from_message(wrapping))
    }

    /// Unwrap `result`, unwinding with an envelope around a checked error.
    ///
    /// Only call this under a [`Disclosure`](crate::Disclosure): an envelope
    /// that escapes ends the thread silently.
    pub fn call<T, X: Into<BoxError>>(&self, result: Result<T, X>) -> T {
        match result {
            Ok(value) => value,
            Err(error) => panic::resume_unwind(Box::new(envelop(&self.wrapping, error.into()))),
        }
    }

    pub fn runnable<X, F>(&self, mut f: F) -> impl FnMut()
    where
        X: Into<BoxError>,
        F: FnMut() -> Result<(), X>,
    {
        let this = self.clone();
        move || this.call(f())
    }

    pub fn supplier<R, X, F>(&self, mut f: F) -> impl FnMut() -> R
    where
        X: Into<BoxError>,
        F: FnMut() -> Result<R, X>,
    {
        let this = self.clone();
        move || this.call(f())
    }

    pub fn consumer<T, X, F>(&self, mut f: F) -> impl FnMut(T)
    where
        X: Into<BoxError>,
        F: FnMut(T) -> Result<(), X>,
    {
        let this = self.clone();
        move |t| this.call(f(t))
    }

    pub fn predicate<T: ?Sized, X, F>(&self, mut f: F) -> impl FnMut(&T) -> bool
    where
        X: Into<BoxError>,
        F: FnMut(&T) -> Result<bool, X>,
    {
        let this = self.clone();
        move |t: &T| this.call(f(t))
    }

    pub fn function<T, R, X, F>(&self, mut f: F) -> impl FnMut(T) -> R
    where
        X: Into<BoxError>,
        F: FnMut(T) -> Result<R, X>,
    {
        let this = self.clone();
        move |t| this.call(f(t))
    }

    pub fn bi_consumer<T, U, X, F>(&self, mut f: F) -> impl FnMut(T, U)
    where
        X: Into<BoxError>,
        F: FnMut(T, U) -> Result<(), X>,
    {
        let this = self.clone();
        move |t, u| this.call(f(t, u))
    }

    pub fn bi_predicate<T: ?Sized, U: ?Sized, X, F>(&self, mut f: F) -> impl FnMut(&T, &U) -> bool
    where
        X: Into<BoxError>,
        F: FnMut(&T, &U) -> Result<bool, X>,
    {
        let this = self.clone();
        move |t: &T, u: &U| this.call(f(t, u))
    }

    pub fn bi_function<T, U, R, X, F>(&self, mut f: F) -> impl FnMut(T, U) -> R
    where
        X: Into<BoxError>,
        F: FnMut(T, U) -> Result<R, X>,
    {
        let this = self.clone();
        move |t, u| this.call(f(t, u))
    }
}

/// Converts callables with arbitrary error types into callables failing with
/// one envelope type
pub struct CheckedWrapper<E> {
    wrapping: Wrapping<E>,
}

impl<E> Clone for CheckedWrapper<E> {
    fn clone(&self) -> Self {
        Self {
            wrapping: Arc::clone(&self.wrapping),
        }
    }
}

impl<E> fmt::Debug for CheckedWrapper<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckedWrapper")
            .field("envelope", &std::any::type_name::<E>())
            .finish_non_exhaustive()
    }
}

impl<E: Envelope> Default for CheckedWrapper<E> {
    fn default() -> Self {
        Self::with(E::new)
    }
}

impl<E: Envelope> CheckedWrapper<E> {
    pub fn using(wrapping: impl Fn(BoxError) -> E + Send + Sync + 'static) -> Self {
        Self {
            wrapping: Arc::new(wrapping),
        }
    }

    pub fn with(wrapping: impl Fn(String, BoxError) -> E + Send + Sync + 'static) -> Self {
        Self::using(from_parts(wrapping))
    }

    pub fn with_message(wrapping: impl Fn(String) -> E + Send + Sync + 'static) -> Self {
        Self::using(from_message(wrapping))
    }

    /// Replace a checked error in `result` with an envelope
    pub fn call<T, X: Into<BoxError>>(&self, result: Result<T, X>) -> Result<T, E> {
        result.map_err(|error| envelop(&self.wrapping, error.into()))
    }

    pub fn runnable<X, F>(&self, mut f: F) -> impl FnMut() -> Result<(), E>
    where
        X: Into<BoxError>,
        F: FnMut() -> Result<(), X>,
    {
        let this = self.clone();
        move || this.call(f())
    }

    pub fn supplier<R, X, F>(&self, mut f: F) -> impl FnMut() -> Result<R, E>
    where
        X: Into<BoxError>,
        F: FnMut() -> Result<R, X>,
    {
        let this = self.clone();
        move || this.call(f())
    }

    pub fn consumer<T, X, F>(&self, mut f: F) -> impl FnMut(T) -> Result<(), E>
    where
        X: Into<BoxError>,
        F: FnMut(T) -> Result<(), X>,
    {
        let this = self.clone();
        move |t| this.call(f(t))
    }

    pub fn predicate<T: ?Sized, X, F>(&self, mut f: F) -> impl FnMut(&T) -> Result<bool, E>
    where
        X: Into<BoxError>,
        F: FnMut(&T) -> Result<bool, X>,
    {
        let this = self.clone();
        move |t: &T| this.call(f(t))
    }

    pub fn function<T, R, X, F>(&self, mut f: F) -> impl FnMut(T) -> Result<R, E>
    where
        X: Into<BoxError>,
        F: FnMut(T) -> Result<R, X>,
    {
        let this = self.clone();
        move |t| this.call(f(t))
    }

    pub fn bi_consumer<T, U, X, F>(&self, mut f: F) -> impl FnMut(T, U) -> Result<(), E>
    where
        X: Into<BoxError>,
        F: FnMut(T, U) -> Result<(), X>,
    {
        let this = self.clone();
        move |t, u| this.call(f(t, u))
    }

    pub fn bi_predicate<T: ?Sized, U: ?Sized, X, F>(
        &self,
        mut f: F,
    ) -> impl FnMut(&T, &U) -> Result<bool, E>
    where
        X: Into<BoxError>,
        F: FnMut(&T, &U) -> Result<bool, X>,
    {
        let this = self.clone();
        move |t: &T, u: &U| this.call(f(t, u))
    }

    pub fn bi_function<T, U, R, X, F>(&self, mut f: F) -> impl FnMut(T, U) -> Result<R, E>
    where
        X: Into<BoxError>,
        F: FnMut(T, U) -> Result<R, X>,
    {
        let this = self.clone();
        move |t, u| this.call(f(t, u))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::{CheckedEnvelope, WrappedError};
    use crate::error::{Fatal, Unchecked};
    use std::any::Any;
    use std::cell::Cell;
    use std::io;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    fn disk_full() -> io::Error {
        io::Error::new(io::ErrorKind::Other, "disk full")
    }

    fn unwound<T>(f: impl FnOnce() -> T) -> Box<dyn Any + Send> {
        match catch_unwind(AssertUnwindSafe(f)) {
            Ok(_) => panic!("expected an unwind"),
            Err(payload) => payload,
        }
    }

    crate::envelope! {
        struct CustomFault;
    }

    #[test]
    fn test_ok_values_pass_through() {
        let wrapper = Wrapper::<WrappedError>::default();
        let mut supplier = wrapper.supplier(|| Ok::<_, io::Error>(42));
        assert_eq!(supplier(), 42);

        let mut function = wrapper.function(|s: &str| s.parse::<i32>());
        assert_eq!(function("7"), 7);

        let mut bi_function = wrapper.bi_function(|a: i32, b: i32| Ok::<_, io::Error>(a + b));
        assert_eq!(bi_function(2, 3), 5);
    }

    #[test]
    fn test_checked_error_unwinds_as_envelope() {
        let wrapper = Wrapper::<WrappedError>::default();
        let mut runnable = wrapper.runnable(|| Err(disk_full()));
        let payload = unwound(|| runnable());
        let envelope = payload.downcast::<WrappedError>().unwrap();
        assert_eq!(envelope.to_string(), "disk full");
        assert!(envelope.cause_ref().unwrap().is::<io::Error>());
    }

    #[test]
    fn test_custom_constructor() {
        let wrapper = Wrapper::with(|message, cause| {
            CustomFault::new(format!("custom: {message}"), cause)
        });
        let mut consumer = wrapper.consumer(|_: u8| Err(disk_full()));
        let payload = unwound(|| consumer(1));
        let envelope = payload.downcast::<CustomFault>().unwrap();
        assert_eq!(envelope.to_string(), "custom: disk full");
    }

    #[test]
    fn test_envelope_built_from_whole_cause() {
        let wrapper = Wrapper::using(|cause: BoxError| {
            CustomFault::new(format!("{} (cause kept)", cause), cause)
        });
        let mut runnable = wrapper.runnable(|| Err(disk_full()));
        let payload = unwound(|| runnable());
        let envelope = payload.downcast::<CustomFault>().unwrap();
        assert_eq!(envelope.to_string(), "disk full (cause kept)");
        assert!(envelope.cause_ref().unwrap().is::<io::Error>());
    }

    #[test]
    fn test_envelope_built_from_message_gets_cause_attached() {
        let wrapper = Wrapper::with_message(|message| WrappedError::without_cause(format!("saving: {message}")));
        let mut supplier = wrapper.supplier(|| Err::<u8, _>(disk_full()));
        let payload = unwound(|| supplier());
        let envelope = payload.downcast::<WrappedError>().unwrap();
        assert_eq!(envelope.to_string(), "saving: disk full");
        assert!(envelope.cause_ref().unwrap().is::<io::Error>());
    }

    #[test]
    fn test_checked_wrapper_custom_constructors() {
        let using = CheckedWrapper::using(|cause: BoxError| CheckedEnvelope::new("whole".into(), cause));
        let mut function = using.function(|s: &str| s.parse::<u8>());
        let envelope = function("x").unwrap_err();
        assert_eq!(envelope.to_string(), "whole");
        assert!(envelope.cause_ref().unwrap().is::<std::num::ParseIntError>());

        let with_message = CheckedWrapper::with_message(|message| CheckedEnvelope::without_cause(message));
        let mut runnable = with_message.runnable(|| Err(disk_full()));
        let envelope = runnable().unwrap_err();
        assert_eq!(envelope.message(), "disk full");
        assert!(envelope.cause_ref().unwrap().is::<io::Error>());
    }

    #[test]
    fn test_panics_pass_through_unchanged() {
        let wrapper = Wrapper::<WrappedError>::default();
        let mut supplier = wrapper.supplier(|| -> Result<u8, io::Error> {
            panic::resume_unwind(Box::new("illegal argument"))
        });
        let payload = unwound(|| supplier());
        assert_eq!(*payload.downcast::<&str>().unwrap(), "illegal argument");
    }

    #[test]
    fn test_fatal_and_unchecked_are_not_enveloped() {
        let wrapper = Wrapper::<WrappedError>::default();

        let mut fatal = wrapper.runnable(|| Err(Fatal::new("out of memory")));
        let payload = unwound(|| fatal());
        assert!(payload.downcast::<Fatal>().is_ok());

        let mut unchecked = wrapper.runnable(|| Err(Unchecked::new("illegal argument")));
        let payload = unwound(|| unchecked());
        assert!(payload.downcast::<Unchecked>().is_ok());
    }

    #[test]
    fn test_own_envelope_is_not_rewrapped() {
        let wrapper = Wrapper::<WrappedError>::default();
        let mut runnable = wrapper.runnable(|| Err(WrappedError::without_cause("already wrapped")));
        let payload = unwound(|| runnable());
        let envelope = payload.downcast::<WrappedError>().unwrap();
        assert_eq!(envelope.to_string(), "already wrapped");
        assert!(envelope.cause_ref().is_none());
    }

    #[test]
    fn test_predicates_work_with_iterator_adapters() {
        let wrapper = Wrapper::<WrappedError>::default();
        let even = wrapper.predicate(|n: &i32| Ok::<_, io::Error>(n % 2 == 0));
        let evens: Vec<i32> = (1..=6).filter(even).collect();
        assert_eq!(evens, vec![2, 4, 6]);

        let mut same = wrapper.bi_predicate(|a: &str, b: &str| Ok::<_, io::Error>(a == b));
        assert!(same("x", "x"));
        assert!(!same("x", "y"));
    }

    #[test]
    fn test_inner_callable_invoked_once_per_call() {
        let calls = Cell::new(0);
        let wrapper = Wrapper::<WrappedError>::default();
        let mut bi_consumer = wrapper.bi_consumer(|_: u8, _: u8| {
            calls.set(calls.get() + 1);
            Ok::<_, io::Error>(())
        });
        bi_consumer(1, 2);
        bi_consumer(3, 4);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_checked_wrapper_returns_envelope() {
        let wrapper = CheckedWrapper::<CheckedEnvelope>::default();
        let mut function = wrapper.function(|s: &str| s.parse::<u8>());
        assert_eq!(function("8").unwrap(), 8);

        let envelope = function("eight").unwrap_err();
        assert!(envelope.cause_ref().unwrap().is::<std::num::ParseIntError>());

        let mut predicate = wrapper.predicate(|_: &u8| Err::<bool, _>(disk_full()));
        assert_eq!(predicate(&1).unwrap_err().to_string(), "disk full");
    }

    #[test]
    fn test_checked_wrapper_still_unwinds_fatal() {
        let wrapper = CheckedWrapper::<CheckedEnvelope>::default();
        let mut supplier = wrapper.supplier(|| Err::<u8, _>(Fatal::new("out of memory")));
        let payload = unwound(|| supplier());
        assert!(payload.downcast::<Fatal>().is_ok());
    }
}
