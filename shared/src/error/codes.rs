//! Numeric error codes
//!
//! Codes travel as bare numbers on the wire (`"code": 7001`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declares the code enum together with its messages and the reverse lookup,
/// so a code cannot be added without both.
macro_rules! error_codes {
    ($($(#[$doc:meta])* $name:ident = $value:literal => $message:literal,)+) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(into = "u16", try_from = "u16")]
        #[repr(u16)]
        pub enum ErrorCode {
            $($(#[$doc])* $name = $value,)+
        }

        impl ErrorCode {
            /// Default message, used when no specific one is given
            pub const fn message(&self) -> &'static str {
                match self {
                    $(Self::$name => $message,)+
                }
            }
        }

        impl TryFrom<u16> for ErrorCode {
            type Error = InvalidErrorCode;

            fn try_from(value: u16) -> Result<Self, Self::Error> {
                match value {
                    $($value => Ok(Self::$name),)+
                    _ => Err(InvalidErrorCode(value)),
                }
            }
        }
    };
}

error_codes! {
    // 0xxx general
    ValidationFailed = 2 => "Validation failed",

    // 7xxx tables / layouts
    TableNotFound = 7001 => "Table not found",
    /// Inspector action without a selected table
    NoTableSelected = 7002 => "No table is selected",
    /// Add form without a positive table number
    TableNumberRequired = 7003 => "Table number is required",
    LayoutSaveFailed = 7201 => "Failed to save floor layout",
    LayoutLoadFailed = 7202 => "Failed to load floor layout",

    // 9xxx system
    /// Stored record exists but cannot be decoded
    StorageCorrupted = 9403 => "Storage is corrupted",
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A number that is not a known [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid error code: {0}")]
pub struct InvalidErrorCode(pub u16);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_matches_values() {
        for code in [
            ErrorCode::ValidationFailed,
            ErrorCode::TableNotFound,
            ErrorCode::TableNumberRequired,
            ErrorCode::LayoutLoadFailed,
            ErrorCode::StorageCorrupted,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
        assert_eq!(ErrorCode::try_from(4001), Err(InvalidErrorCode(4001)));
    }

    #[test]
    fn test_wire_form_is_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::TableNotFound).unwrap(), "7001");
        let code: ErrorCode = serde_json::from_str("7202").unwrap();
        assert_eq!(code, ErrorCode::LayoutLoadFailed);
        assert!(serde_json::from_str::<ErrorCode>("1234").is_err());
    }
}
