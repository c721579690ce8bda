//! Envelope errors and the envelope trait

use std::error::Error as StdError;

use thiserror::Error;

use crate::error::BoxError;
use crate::review::Review;

/// An error that stands in for exactly one original cause.
///
/// Implementors hold the cause in an `Option` so it can be moved out when it
/// is disclosed and moved back in when it is not.
pub trait Envelope: StdError + Send + Sync + Sized + 'static {
    /// Build an envelope from a message and its cause
    fn new(message: String, cause: BoxError) -> Self;

    /// Mutable access to the cause slot
    fn cause_slot(&mut self) -> &mut Option<BoxError>;

    /// Build an envelope whose message is the cause's own message
    fn from_cause(cause: impl Into<BoxError>) -> Self {
        let cause = cause.into();
        Self::new(cause.to_string(), cause)
    }

    /// The wrapped cause, if any
    fn cause_ref(&self) -> Option<&(dyn StdError + Send + Sync + 'static)>;

    /// Start a fluent review of this envelope
    fn review(self) -> Review<Self> {
        Review::of(self)
    }
}

/// Move the cause out of `slot` if it is an `X`; otherwise leave it in place.
pub(crate) fn take_cause<X>(slot: &mut Option<BoxError>) -> Option<X>
where
    X: StdError + Send + Sync + 'static,
{
    match slot.take()?.downcast::<X>() {
        Ok(cause) => Some(*cause),
        Err(cause) => {
            *slot = Some(cause);
            None
        }
    }
}

/// The default unchecked envelope
#[derive(Error, Debug)]
#[error("{message}")]
pub struct WrappedError {
    message: String,
    #[source]
    cause: Option<BoxError>,
}

/// The default envelope of [`CheckedWrapper`](crate::CheckedWrapper)
#[derive(Error, Debug)]
#[error("{message}")]
pub struct CheckedEnvelope {
    message: String,
    #[source]
    cause: Option<BoxError>,
}

macro_rules! impl_envelope {
    ($name:ident) => {
        impl $name {
            pub fn message(&self) -> &str {
                &self.message
            }

            /// An envelope without cause; disclosure always falls back on it
            pub fn without_cause(message: impl Into<String>) -> Self {
                Self {
                    message: message.into(),
                    cause: None,
                }
            }
        }

        impl Envelope for $name {
            fn new(message: String, cause: BoxError) -> Self {
                Self {
                    message,
                    cause: Some(cause),
                }
            }

            fn cause_slot(&mut self) -> &mut Option<BoxError> {
                &mut self.cause
            }

            fn cause_ref(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
                self.cause.as_deref()
            }
        }
    };
}

impl_envelope!(WrappedError);
impl_envelope!(CheckedEnvelope);

/// Declare an envelope type of your own.
///
/// Distinct envelope types let each call site disclose only the envelopes it
/// produced itself:
///
/// ```
/// use disclosure::{envelope, Envelope};
///
/// envelope! {
///     /// Raised by the report parser
///     pub struct ParseFault;
/// }
///
/// let fault = ParseFault::from_cause(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
/// assert_eq!(fault.to_string(), "disk full");
/// ```
#[macro_export]
macro_rules! envelope {
    ($(#[$meta:meta])* $vis:vis struct $name:ident;) => {
        $(#[$meta])*
        #[derive(Debug)]
        $vis struct $name {
            message: ::std::string::String,
            cause: ::std::option::Option<$crate::BoxError>,
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(&self.message)
            }
        }

        impl ::std::error::Error for $name {
            fn source(&self) -> ::std::option::Option<&(dyn ::std::error::Error + 'static)> {
                match &self.cause {
                    ::std::option::Option::Some(cause) => ::std::option::Option::Some(&**cause),
                    ::std::option::Option::None => ::std::option::Option::None,
                }
            }
        }

        impl $crate::Envelope for $name {
            fn new(message: ::std::string::String, cause: $crate::BoxError) -> Self {
                Self {
                    message,
                    cause: ::std::option::Option::Some(cause),
                }
            }

            fn cause_slot(&mut self) -> &mut ::std::option::Option<$crate::BoxError> {
                &mut self.cause
            }

            fn cause_ref(
                &self,
            ) -> ::std::option::Option<&(dyn ::std::error::Error + ::std::marker::Send + ::std::marker::Sync + 'static)> {
                self.cause.as_deref()
            }
        }
    };
}
