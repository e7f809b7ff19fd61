//! 服务模块 - HTTP 路由装配

pub mod http;

pub use self::http::{build_app, build_router};
