//! API 路由模块
//!
//! - [`health`] - 健康检查
//! - [`floors`] - 楼面布局编辑接口

pub mod convert;

pub mod floors;
pub mod health;
