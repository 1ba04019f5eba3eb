//! # Excluded Payload Fields
//!
//! Marker newtypes for model fields that hold large, runtime-only payloads
//! (tensors, raw arrays, per-frame tables). A field of one of these types
//! is assignable and mutable on an instance like any other field, but is
//! never part of the model's schema or of its serialized output.
//!
//! ## The Declaration-Time Contract
//!
//! The markers implement neither `Serialize` nor `Deserialize`, on
//! purpose. Declaring a marker field on a model that derives both traits
//! fails to compile until the field is annotated `#[serde(skip)]`:
//!
//! ```text
//! #[derive(Serialize, Deserialize)]
//! #[serde(deny_unknown_fields)]
//! struct TiltSeries {
//!     run_id: String,
//!     #[serde(skip)]
//!     projections: ExcludedTensor<Vec<f32>>,
//! }
//! ```
//!
//! With `#[serde(skip)]` in place, the compiler guarantees the field is
//! absent from every dump and is rebuilt as empty (via `Default`) on every
//! load. There is no runtime branch to get wrong, and the payload type
//! needs no serde support of its own.
//!
//! A payload is therefore process-local: saving and reloading a model
//! yields an empty marker, and the caller re-attaches the payload.

use std::fmt;

/// Declares one excluded-payload marker newtype.
///
/// All three markers share identical semantics; they differ only in the
/// kind of payload they document. `Debug` is implemented by hand so that
/// payload types need not implement it (and multi-gigabyte payloads are
/// never dumped into logs by accident).
macro_rules! excluded_payload {
    ($(#[$docs:meta])* $name:ident) => {
        $(#[$docs])*
        #[derive(Clone, PartialEq)]
        pub struct $name<T>(Option<T>);

        impl<T> $name<T> {
            /// Create a marker holding a payload.
            pub fn new(payload: T) -> Self {
                Self(Some(payload))
            }

            /// Create an empty marker.
            pub fn empty() -> Self {
                Self(None)
            }

            /// Borrow the payload, if present.
            pub fn get(&self) -> Option<&T> {
                self.0.as_ref()
            }

            /// Mutably borrow the payload, if present.
            pub fn get_mut(&mut self) -> Option<&mut T> {
                self.0.as_mut()
            }

            /// Attach a payload, dropping any previous one.
            pub fn set(&mut self, payload: T) {
                self.0 = Some(payload);
            }

            /// Remove and return the payload, leaving the marker empty.
            pub fn take(&mut self) -> Option<T> {
                self.0.take()
            }

            /// Attach a payload and return the previous one, if any.
            pub fn replace(&mut self, payload: T) -> Option<T> {
                self.0.replace(payload)
            }

            /// Returns true if no payload is attached.
            pub fn is_empty(&self) -> bool {
                self.0.is_none()
            }

            /// Consume the marker and return the payload, if present.
            pub fn into_inner(self) -> Option<T> {
                self.0
            }
        }

        impl<T> Default for $name<T> {
            fn default() -> Self {
                Self::empty()
            }
        }

        impl<T> From<T> for $name<T> {
            fn from(payload: T) -> Self {
                Self::new(payload)
            }
        }

        impl<T> From<Option<T>> for $name<T> {
            fn from(payload: Option<T>) -> Self {
                Self(payload)
            }
        }

        impl<T> fmt::Debug for $name<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.0.is_some() {
                    write!(f, concat!(stringify!($name), "(set)"))
                } else {
                    write!(f, concat!(stringify!($name), "(empty)"))
                }
            }
        }
    };
}

excluded_payload! {
    /// A tensor-like payload (dense n-dimensional numeric data) held on a
    /// model instance but excluded from schema and serialized output.
    ExcludedTensor
}

excluded_payload! {
    /// An array-like payload (flat or nested numeric arrays) held on a
    /// model instance but excluded from schema and serialized output.
    ExcludedArray
}

excluded_payload! {
    /// A table-like payload (record or column-oriented tables) held on a
    /// model instance but excluded from schema and serialized output.
    ExcludedFrame
}
