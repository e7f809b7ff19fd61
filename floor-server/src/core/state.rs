use std::sync::Arc;
use std::time::Duration;

use crate::core::config::StorageMode;
use crate::core::{Config, Result};
use crate::floor::{FloorSessions, Grid};
use crate::storage::{LayoutStore, MemoryLayoutStore, RedbLayoutStore};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，克隆成本极低。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | store | Arc<dyn LayoutStore> | 布局存储 |
/// | sessions | Arc<FloorSessions> | 各楼面的编辑会话 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub store: Arc<dyn LayoutStore>,
    pub sessions: Arc<FloorSessions>,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .field("sessions", &self.sessions)
            .finish()
    }
}

impl ServerState {
    /// 按配置初始化存储与会话
    ///
    /// redb 模式下会创建 `{work_dir}/data` 目录
    pub fn initialize(config: &Config) -> Result<Self> {
        let store: Arc<dyn LayoutStore> = match config.storage_mode {
            StorageMode::Redb => {
                std::fs::create_dir_all(config.data_dir())?;
                let path = config.layouts_db_path();
                let store = RedbLayoutStore::open(&path)?;
                tracing::info!(path = %path.display(), "Layout store opened");
                Arc::new(store)
            }
            StorageMode::Memory => {
                tracing::warn!("Using in-memory layout store, layouts are lost on restart");
                Arc::new(MemoryLayoutStore::new())
            }
        };
        Ok(Self::with_store(config.clone(), store))
    }

    /// 使用现有存储构建状态 (测试用)
    pub fn with_store(config: Config, store: Arc<dyn LayoutStore>) -> Self {
        let sessions = Arc::new(FloorSessions::new(
            store.clone(),
            Grid::new(config.grid_size),
        ));
        Self {
            config,
            store,
            sessions,
        }
    }

    /// 后台任务: 布局变更日志 + 空闲会话回收
    pub fn start_background_tasks(&self) {
        let sessions = self.sessions.clone();
        let period = Duration::from_secs(self.config.session_sweep_secs.max(1));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let closed = sessions.evict_idle();
                if closed > 0 {
                    tracing::debug!(
                        closed,
                        open = sessions.open_count(),
                        "Idle floor sessions closed"
                    );
                }
            }
        });

        let mut rx = self.sessions.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(change) => tracing::debug!(
                        floor_id = %change.floor_id,
                        kind = ?change.kind,
                        table_id = ?change.table_id,
                        revision = change.revision,
                        "Layout changed"
                    ),
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(skipped = n, "Layout change listener lagged");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }
}
