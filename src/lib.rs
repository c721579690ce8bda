//! Disclosure: carry errors through callbacks that cannot return them
//!
//! Plenty of APIs take callbacks with no room for an error: iterator adapters,
//! `sort_by`, visitor traits and so on. This crate lets fallible code run
//! inside them anyway:
//!
//! - a [`Wrapper`] turns a callable returning `Result<_, X>` into one of the
//!   same shape that returns plain values and unwinds with an [`Envelope`]
//!   around the error instead,
//! - a [`Disclosure`] runs such code, catches the envelope and recovers the
//!   original error as one of an ordered list of candidate types, or hands the
//!   envelope back as [`Disclosed::Fallback`].
//!
//! Panics, [`Fatal`] and [`Unchecked`] errors are never enveloped and always
//! propagate unchanged. The unwinding path requires `panic = "unwind"`.
//!
//! [`CheckedWrapper`] and [`Review`] offer the same conversions on plain
//! `Result`s.

pub mod disclosure;
pub mod envelope;
pub mod error;
pub mod review;
pub mod wrapper;
pub mod wrapping;

pub use crate::disclosure::{disclose, Candidates, Disclosed, DisclosedBy, Disclosing, Disclosure};
pub use crate::envelope::{CheckedEnvelope, Envelope, WrappedError};
pub use crate::error::{BoxError, Category, Fatal, Unchecked};
pub use crate::review::{Conditional, Review};
pub use crate::wrapper::{CheckedWrapper, Wrapper};
