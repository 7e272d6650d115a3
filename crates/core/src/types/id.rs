//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. Backend identifiers
//! are opaque strings (document IDs), so the wrappers hold a `String`.

/// Errors that can occur when parsing an ID.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The input string is empty or only whitespace.
    #[error("id cannot be empty")]
    Empty,
}

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` as a plain string; deserializing goes through
///   `parse()`, so blank IDs are rejected there too
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `parse()`, `as_str()`
/// - `Display`, `FromStr`, `TryFrom<String>`, `Into<String>` and `AsRef<str>`
///   implementations
///
/// # Example
///
/// ```rust
/// # use nexus_market_core::define_id;
/// define_id!(VendorId);
/// define_id!(OrderId);
///
/// let vendor_id = VendorId::parse("65a1").unwrap();
/// let order_id = OrderId::parse("65a1").unwrap();
///
/// // These are different types, so this won't compile:
/// // let _: VendorId = order_id;
/// # let _ = (vendor_id, order_id);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Parse an ID from a string, rejecting blank input.
            ///
            /// # Errors
            ///
            /// Returns `IdError::Empty` if the input is empty or whitespace.
            pub fn parse(id: &str) -> ::core::result::Result<Self, $crate::IdError> {
                Self::try_from(id.to_owned())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::IdError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl ::core::convert::TryFrom<String> for $name {
            type Error = $crate::IdError;

            fn try_from(id: String) -> ::core::result::Result<Self, Self::Error> {
                if id.trim().is_empty() {
                    return Err($crate::IdError::Empty);
                }
                Ok(Self(id))
            }
        }

        impl ::core::convert::From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId);
