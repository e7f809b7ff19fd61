//! Unified error system
//!
//! - [`ErrorCode`]: numeric codes (0xxx general, 7xxx tables and layouts, 9xxx system)
//! - [`ErrorCategory`]: code range, decides how loudly an error is logged
//! - [`AppError`]: code + message + details, converts into an HTTP response
//! - [`ErrorBody`]: JSON body of an error response
//!
//! ```
//! use shared::error::{AppError, ErrorBody, ErrorCode};
//!
//! let err = AppError::validation("capacity must be between 1 and 50")
//!     .with_detail("field", "capacity");
//!
//! let body = ErrorBody::from(&err);
//! assert_eq!(body.code, ErrorCode::ValidationFailed);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult, ErrorBody};
