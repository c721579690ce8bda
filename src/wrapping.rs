//! Free-standing wrappers using the default envelopes
//!
//! The unchecked shapes unwind with a [`WrappedError`]; the `checked_*`
//! shapes fail with a [`CheckedEnvelope`].

use crate::envelope::{CheckedEnvelope, WrappedError};
use crate::error::BoxError;
use crate::wrapper::{CheckedWrapper, Wrapper};

fn unchecked() -> Wrapper<WrappedError> {
    Wrapper::default()
}

fn checked() -> CheckedWrapper<CheckedEnvelope> {
    CheckedWrapper::default()
}

pub fn runnable<X, F>(f: F) -> impl FnMut()
where
    X: Into<BoxError>,
    F: FnMut() -> Result<(), X>,
{
    unchecked().runnable(f)
}

pub fn supplier<R, X, F>(f: F) -> impl FnMut() -> R
where
    X: Into<BoxError>,
    F: FnMut() -> Result<R, X>,
{
    unchecked().supplier(f)
}

pub fn consumer<T, X, F>(f: F) -> impl FnMut(T)
where
    X: Into<BoxError>,
    F: FnMut(T) -> Result<(), X>,
{
    unchecked().consumer(f)
}

pub fn predicate<T: ?Sized, X, F>(f: F) -> impl FnMut(&T) -> bool
where
    X: Into<BoxError>,
    F: FnMut(&T) -> Result<bool, X>,
{
    unchecked().predicate(f)
}

pub fn function<T, R, X, F>(f: F) -> impl FnMut(T) -> R
where
    X: Into<BoxError>,
    F: FnMut(T) -> Result<R, X>,
{
    unchecked().function(f)
}

pub fn bi_consumer<T, U, X, F>(f: F) -> impl FnMut(T, U)
where
    X: Into<BoxError>,
    F: FnMut(T, U) -> Result<(), X>,
{
    unchecked().bi_consumer(f)
}

pub fn bi_predicate<T: ?Sized, U: ?Sized, X, F>(f: F) -> impl FnMut(&T, &U) -> bool
where
    X: Into<BoxError>,
    F: FnMut(&T, &U) -> Result<bool, X>,
{
    unchecked().bi_predicate(f)
}

pub fn bi_function<T, U, R, X, F>(f: F) -> impl FnMut(T, U) -> R
where
    X: Into<BoxError>,
    F: FnMut(T, U) -> Result<R, X>,
{
    unchecked().bi_function(f)
}

pub fn checked_runnable<X, F>(f: F) -> impl FnMut() -> Result<(), CheckedEnvelope>
where
    X: Into<BoxError>,
    F: FnMut() -> Result<(), X>,
{
    checked().runnable(f)
}

pub fn checked_supplier<R, X, F>(f: F) -> impl FnMut() -> Result<R, CheckedEnvelope>
where
    X: Into<BoxError>,
    F: FnMut() -> Result<R, X>,
{
    checked().supplier(f)
}

pub fn checked_consumer<T, X, F>(f: F) -> impl FnMut(T) -> Result<(), CheckedEnvelope>
where
    X: Into<BoxError>,
    F: FnMut(T) -> Result<(), X>,
{
    checked().consumer(f)
}

pub fn checked_predicate<T: ?Sized, X, F>(f: F) -> impl FnMut(&T) -> Result<bool, CheckedEnvelope>
where
    X: Into<BoxError>,
    F: FnMut(&T) -> Result<bool, X>,
{
    checked().predicate(f)
}

pub fn checked_function<T, R, X, F>(f: F) -> impl FnMut(T) -> Result<R, CheckedEnvelope>
where
    X: Into<BoxError>,
    F: FnMut(T) -> Result<R, X>,
{
    checked().function(f)
}

pub fn checked_bi_consumer<T, U, X, F>(f: F) -> impl FnMut(T, U) -> Result<(), CheckedEnvelope>
where
    X: Into<BoxError>,
    F: FnMut(T, U) -> Result<(), X>,
{
    checked().bi_consumer(f)
}

pub fn checked_bi_predicate<T: ?Sized, U: ?Sized, X, F>(
    f: F,
) -> impl FnMut(&T, &U) -> Result<bool, CheckedEnvelope>
where
    X: Into<BoxError>,
    F: FnMut(&T, &U) -> Result<bool, X>,
{
    checked().bi_predicate(f)
}

pub fn checked_bi_function<T, U, R, X, F>(f: F) -> impl FnMut(T, U) -> Result<R, CheckedEnvelope>
where
    X: Into<BoxError>,
    F: FnMut(T, U) -> Result<R, X>,
{
    checked().bi_function(f)
}
