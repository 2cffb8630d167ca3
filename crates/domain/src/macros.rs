//! Macro for implementing Display and FromStr for status enums
//!
//! Provider payloads carry statuses as free-form strings ("confirmed",
//! "CANCELLED", ...). This macro gives a status enum one canonical lowercase
//! spelling and a case-insensitive parser.
//!
//! # Example
//!
//! ```rust
//! use slotwise_domain::impl_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum RsvpStatus {
//!     Accepted,
//!     Declined,
//! }
//!
//! impl_status_conversions!(RsvpStatus {
//!     Accepted => "accepted",
//!     Declined => "declined",
//! });
//!
//! assert_eq!("ACCEPTED".parse::<RsvpStatus>(), Ok(RsvpStatus::Accepted));
//! ```

/// Implements Display and FromStr traits for status enums
///
/// - Display writes the lowercase representation given in the mapping
/// - FromStr parses case-insensitively and names the enum in its error
#[macro_export]
macro_rules! impl_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
