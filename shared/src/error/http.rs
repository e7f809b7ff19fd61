//! HTTP status per error code

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::ValidationFailed | Self::TableNumberRequired => StatusCode::BAD_REQUEST,
            Self::TableNotFound => StatusCode::NOT_FOUND,
            // Inspector acted on nothing
            Self::NoTableSelected => StatusCode::CONFLICT,
            // Store unavailable, client may retry; in-memory layout is kept
            Self::LayoutSaveFailed | Self::LayoutLoadFailed => StatusCode::SERVICE_UNAVAILABLE,
            Self::StorageCorrupted => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
