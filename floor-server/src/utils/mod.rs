//! 工具模块 - 日志与错误类型
//!
//! - [`AppError`] / [`AppResult`] - 统一错误 (from shared::error)
//! - [`logger`] - 日志初始化

pub mod logger;

pub use shared::error::{AppError, AppResult, ErrorBody, ErrorCode};
