//! Disclosure of the original error behind an envelope
//!
//! A [`Disclosure`] runs code that may unwind with an envelope (typically a
//! callable produced by a [`Wrapper`](crate::Wrapper)) and recovers the
//! envelope's cause as one of up to three candidate types, tested in the
//! order they are listed:
//!
//! ```
//! use std::{io, num::ParseIntError};
//! use disclosure::{wrapping, Disclosed, Disclosing, WrappedError};
//!
//! let disclosure = Disclosing::<WrappedError>::new().disclose::<(io::Error, ParseIntError)>();
//!
//! let parse = wrapping::function(|s: &str| s.parse::<u32>());
//! let lengths: Result<Vec<u32>, _> =
//!     disclosure.get(|| ["1", "x"].into_iter().map(parse).collect());
//!
//! assert!(matches!(lengths, Err(Disclosed::Second(_))));
//! ```

use std::convert::Infallible;
use std::error::Error as StdError;
use std::fmt;
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::envelope::{take_cause, Envelope, WrappedError};
use crate::error::raise_unchecked_in;

/// An ordered list of one to three candidate error types.
///
/// Implemented for `(A,)`, `(A, B)` and `(A, B, C)`; unused slots are
/// [`Infallible`], which never matches.
pub trait Candidates: 'static {
    type First: StdError + Send + Sync + 'static;
    type Second: StdError + Send + Sync + 'static;
    type Third: StdError + Send + Sync + 'static;
}

impl<A> Candidates for (A,)
where
    A: StdError + Send + Sync + 'static,
{
    type First = A;
    type Second = Infallible;
    type Third = Infallible;
}

impl<A, B> Candidates for (A, B)
where
    A: StdError + Send + Sync + 'static,
    B: StdError + Send + Sync + 'static,
{
    type First = A;
    type Second = B;
    type Third = Infallible;
}

impl<A, B, C> Candidates for (A, B, C)
where
    A: StdError + Send + Sync + 'static,
    B: StdError + Send + Sync + 'static,
    C: StdError + Send + Sync + 'static,
{
    type First = A;
    type Second = B;
    type Third = C;
}

/// Outcome of disclosing an envelope of type `R`
#[derive(Debug)]
pub enum Disclosed<R, A, B = Infallible, C = Infallible> {
    /// The cause was an `A`
    First(A),
    /// The cause was a `B`
    Second(B),
    /// The cause was a `C`
    Third(C),
    /// No candidate matched; the envelope itself
    Fallback(R),
}

/// The [`Disclosed`] type produced by a `Disclosure<R, L>`
pub type DisclosedBy<R, L> = Disclosed<
    R,
    <L as Candidates>::First,
    <L as Candidates>::Second,
    <L as Candidates>::Third,
>;

impl<R, A, B, C> Disclosed<R, A, B, C> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Disclosed::Fallback(_))
    }

    pub fn fallback(&self) -> Option<&R> {
        match self {
            Disclosed::Fallback(envelope) => Some(envelope),
            _ => None,
        }
    }

    pub fn into_fallback(self) -> Option<R> {
        match self {
            Disclosed::Fallback(envelope) => Some(envelope),
            _ => None,
        }
    }
}

impl<R, A, B, C> fmt::Display for Disclosed<R, A, B, C>
where
    R: fmt::Display,
    A: fmt::Display,
    B: fmt::Display,
    C: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Disclosed::First(error) => error.fmt(f),
            Disclosed::Second(error) => error.fmt(f),
            Disclosed::Third(error) => error.fmt(f),
            Disclosed::Fallback(envelope) => envelope.fmt(f),
        }
    }
}

impl<R, A, B, C> StdError for Disclosed<R, A, B, C>
where
    R: StdError + 'static,
    A: StdError + 'static,
    B: StdError + 'static,
    C: StdError + 'static,
{
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Disclosed::First(error) => error.source(),
            Disclosed::Second(error) => error.source(),
            Disclosed::Third(error) => error.source(),
            Disclosed::Fallback(envelope) => envelope.source(),
        }
    }
}

/// First step of building a [`Disclosure`]: fixes the envelope type
pub struct Disclosing<R> {
    envelope: PhantomData<fn() -> R>,
}

impl<R> fmt::Debug for Disclosing<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disclosing")
            .field("envelope", &std::any::type_name::<R>())
            .finish()
    }
}

impl<R: Envelope> Default for Disclosing<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Envelope> Disclosing<R> {
    pub fn new() -> Self {
        Self {
            envelope: PhantomData,
        }
    }

    /// Disclose the candidates `L`, in order, with a no-op fallback
    pub fn disclose<L: Candidates>(&self) -> Disclosure<R, L> {
        Disclosure {
            on_fallback: Arc::new(|_: &R| {}),
            candidates: PhantomData,
        }
    }
}

/// Shortcut for `Disclosing::<WrappedError>::new().disclose::<L>()`
pub fn disclose<L: Candidates>() -> Disclosure<WrappedError, L> {
    Disclosing::<WrappedError>::new().disclose()
}

/// A reusable disclosure of envelopes of type `R` against candidates `L`.
///
/// Immutable once built; share it freely between threads.
pub struct Disclosure<R, L> {
    on_fallback: Arc<dyn Fn(&R) + Send + Sync>,
    candidates: PhantomData<fn() -> L>,
}

impl<R, L> Clone for Disclosure<R, L> {
    fn clone(&self) -> Self {
        Self {
            on_fallback: Arc::clone(&self.on_fallback),
            candidates: PhantomData,
        }
    }
}

impl<R, L> fmt::Debug for Disclosure<R, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disclosure")
            .field("envelope", &std::any::type_name::<R>())
            .field("candidates", &std::any::type_name::<L>())
            .finish_non_exhaustive()
    }
}

impl<R: Envelope, L: Candidates> Disclosure<R, L> {
    /// Invoke `on_fallback` with every envelope no candidate matches
    pub fn on_fallback(self, on_fallback: impl Fn(&R) + Send + Sync + 'static) -> Self {
        Self {
            on_fallback: Arc::new(on_fallback),
            candidates: self.candidates,
        }
    }

    pub fn run(&self, f: impl FnOnce()) -> Result<(), DisclosedBy<R, L>> {
        self.get(f)
    }

    /// Run `f`, disclosing an envelope of type `R` it unwinds with.
    ///
    /// Any other unwind payload is resumed unchanged.
    pub fn get<T>(&self, f: impl FnOnce() -> T) -> Result<T, DisclosedBy<R, L>> {
        match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(value) => Ok(value),
            Err(payload) => match payload.downcast::<R>() {
                Ok(envelope) => Err(self.inspect(*envelope)),
                Err(payload) => panic::resume_unwind(payload),
            },
        }
    }

    /// Disclose the envelope in `result`, if any
    pub fn resolve<T>(&self, result: Result<T, R>) -> Result<T, DisclosedBy<R, L>> {
        result.map_err(|envelope| self.inspect(envelope))
    }

    /// Disclose a single envelope.
    ///
    /// A fatal or unchecked cause unwinds unchanged before any candidate is
    /// tested. Otherwise the first candidate the cause downcasts to wins; if
    /// none does, the fallback sees the envelope and it is handed back.
    pub fn inspect(&self, mut envelope: R) -> DisclosedBy<R, L> {
        let slot = envelope.cause_slot();
        raise_unchecked_in(slot);
        if let Some(cause) = take_cause::<L::First>(slot) {
            tracing::trace!(candidate = std::any::type_name::<L::First>(), "disclosed cause");
            return Disclosed::First(cause);
        }
        if let Some(cause) = take_cause::<L::Second>(slot) {
            tracing::trace!(candidate = std::any::type_name::<L::Second>(), "disclosed cause");
            return Disclosed::Second(cause);
        }
        if let Some(cause) = take_cause::<L::Third>(slot) {
            tracing::trace!(candidate = std::any::type_name::<L::Third>(), "disclosed cause");
            return Disclosed::Third(cause);
        }
        tracing::debug!(envelope = %envelope, "no candidate matched, falling back");
        (self.on_fallback)(&envelope);
        Disclosed::Fallback(envelope)
    }
}
