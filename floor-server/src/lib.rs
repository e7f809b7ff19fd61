//! Floor Server - 餐厅楼面布局编辑服务
//!
//! # 架构概述
//!
//! - **楼面** (`floor`): 桌台画布、选中、检查器、统计、会话
//! - **存储** (`storage`): 布局持久化 (redb / 内存)
//! - **HTTP API** (`api`): 宿主页面调用的 RESTful 接口
//!
//! # 模块结构
//!
//! ```text
//! floor-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── floor/         # FloorEditor、检查器、校验、会话
//! ├── storage/       # LayoutStore 及其实现
//! ├── services/      # 路由装配与中间件
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 日志、错误类型
//! ```

pub mod api;
pub mod core;
pub mod floor;
pub mod services;
pub mod storage;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerState};
pub use floor::{FloorEditor, FloorSessions, LayoutChange};
pub use storage::{LayoutStore, MemoryLayoutStore, RedbLayoutStore};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
    ________
   / ____/ /___  ____  _____
  / /_  / / __ \/ __ \/ ___/
 / __/ / / /_/ / /_/ / /
/_/   /_/\____/\____/_/
    "#
    );
}
