//! Code ranges

use super::codes::ErrorCode;

/// Which range a code falls in. System errors are logged at `error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// 0xxx
    General,
    /// 7xxx
    Table,
    /// 9xxx
    System,
}

impl ErrorCategory {
    pub fn from_code(code: u16) -> Self {
        match code {
            7000..8000 => Self::Table,
            9000.. => Self::System,
            _ => Self::General,
        }
    }
}

impl ErrorCode {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges() {
        assert_eq!(ErrorCategory::from_code(2), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(7999), ErrorCategory::Table);
        assert_eq!(ErrorCategory::from_code(8000), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(12000), ErrorCategory::System);
    }

    #[test]
    fn test_codes_land_in_their_range() {
        assert_eq!(ErrorCode::ValidationFailed.category(), ErrorCategory::General);
        assert_eq!(ErrorCode::LayoutSaveFailed.category(), ErrorCategory::Table);
        assert_eq!(ErrorCode::StorageCorrupted.category(), ErrorCategory::System);
    }
}
