//! Macro for implementing Display and FromStr for small wire-name enums
//!
//! Query vocabulary (field kinds, operators) is written in lowercase
//! snake_case on the wire and in error messages. This macro provides both
//! directions of the conversion from a single table.
//!
//! # Example
//!
//! ```rust
//! use ctgforge_domain::impl_domain_enum_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Combinator {
//!     And,
//!     Or,
//! }
//!
//! impl_domain_enum_conversions!(Combinator {
//!     And => "and",
//!     Or => "or",
//! });
//!
//! assert_eq!(Combinator::Or.to_string(), "or");
//! assert_eq!("AND".parse::<Combinator>(), Ok(Combinator::And));
//! ```

/// Implements Display and FromStr traits for wire-name enums
///
/// - Display writes the mapped string (honouring width/alignment flags)
/// - FromStr parses case-insensitively and reports the enum name on failure
///
/// Mapped strings must be lowercase for parsing to round-trip.
#[macro_export]
macro_rules! impl_domain_enum_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.pad($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
