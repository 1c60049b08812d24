//! Macro for implementing Display and FromStr for wire-named enums
//!
//! Configuration enums travel as strings in environment variables and config
//! files. This macro provides both conversions from one mapping table.
//!
//! # Example
//!
//! ```rust
//! use giniapi_domain::impl_wire_name_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Channel {
//!     Stable,
//!     Incubator,
//! }
//!
//! impl_wire_name_conversions!(Channel {
//!     Stable => "stable",
//!     Incubator => "incubator",
//! });
//!
//! assert_eq!("INCUBATOR".parse::<Channel>(), Ok(Channel::Incubator));
//! assert_eq!(Channel::Stable.to_string(), "stable");
//! ```

/// Implements Display and FromStr traits for enums with a fixed wire name
///
/// - Display writes the wire name exactly as given
/// - FromStr matches the wire name ignoring ASCII case
#[macro_export]
macro_rules! impl_wire_name_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($str) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }
    };
}
