//! 类型转换模块
//!
//! 将楼面领域错误转换为统一的 [`AppError`]

use serde_json::Value;
use shared::error::{AppError, ErrorCode};

use crate::floor::validation::join_errors;
use crate::floor::{EditorError, InspectorError, ValidationError};
use crate::storage::{LoadError, PersistError};

/// 字段级校验错误 → details.errors
fn validation_error(errors: &[ValidationError]) -> AppError {
    let message = join_errors(errors);
    let fields: Vec<Value> = errors
        .iter()
        .map(|e| {
            serde_json::json!({
                "field": e.field(),
                "message": e.to_string(),
            })
        })
        .collect();
    AppError::validation(message).with_detail("errors", fields)
}

impl From<EditorError> for AppError {
    fn from(err: EditorError) -> Self {
        match err {
            EditorError::MissingTableNumber => AppError::new(ErrorCode::TableNumberRequired)
                .with_detail("field", "tableNumber"),
        }
    }
}

impl From<InspectorError> for AppError {
    fn from(err: InspectorError) -> Self {
        match err {
            InspectorError::Invalid(errors) => validation_error(&errors),
            InspectorError::NoSelection => AppError::no_selection(),
        }
    }
}

impl From<PersistError> for AppError {
    fn from(err: PersistError) -> Self {
        AppError::with_message(ErrorCode::LayoutSaveFailed, err.to_string())
            .with_detail("floor_id", err.floor_id)
    }
}

impl From<LoadError> for AppError {
    fn from(err: LoadError) -> Self {
        let floor_id = err.floor_id().to_string();
        let code = match err {
            LoadError::Backend { .. } => ErrorCode::LayoutLoadFailed,
            LoadError::Corrupted { .. } | LoadError::InvalidTable { .. } => {
                ErrorCode::StorageCorrupted
            }
        };
        AppError::with_message(code, err.to_string()).with_detail("floor_id", floor_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageError;

    #[test]
    fn test_missing_number_maps_to_code() {
        let err: AppError = EditorError::MissingTableNumber.into();
        assert_eq!(err.code, ErrorCode::TableNumberRequired);
        assert_eq!(err.code.http_status(), http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_edit_without_selection_maps_to_conflict() {
        let err: AppError = InspectorError::NoSelection.into();
        assert_eq!(err.code, ErrorCode::NoTableSelected);
        assert_eq!(err.code.http_status(), http::StatusCode::CONFLICT);
    }

    #[test]
    fn test_validation_details_list_fields() {
        let err: AppError = InspectorError::Invalid(vec![
            ValidationError::TableNumber,
            ValidationError::PartySize,
        ])
        .into();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let details = err.details.unwrap();
        let errors = details["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0]["field"], "tableNumber");
        assert_eq!(errors[1]["field"], "partySize");
    }

    #[test]
    fn test_storage_failures() {
        let bad_json = || serde_json::from_str::<()>("x").unwrap_err();

        let err: AppError = PersistError {
            floor_id: "main".into(),
            source: StorageError::Serialization(bad_json()),
        }
        .into();
        assert_eq!(err.code, ErrorCode::LayoutSaveFailed);
        assert_eq!(err.details.unwrap()["floor_id"], "main");

        let err: AppError = LoadError::Corrupted {
            floor_id: "main".into(),
            source: bad_json(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::StorageCorrupted);

        let err: AppError = LoadError::InvalidTable {
            floor_id: "main".into(),
            table_id: "a".into(),
            reason: "capacity must be between 1 and 50".into(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::StorageCorrupted);

        let err: AppError = LoadError::Backend {
            floor_id: "main".into(),
            source: StorageError::Serialization(bad_json()),
        }
        .into();
        assert_eq!(err.code, ErrorCode::LayoutLoadFailed);
    }
}
