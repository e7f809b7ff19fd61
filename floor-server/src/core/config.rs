use std::path::PathBuf;
use std::str::FromStr;

/// 布局存储后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageMode {
    /// 嵌入式 redb 文件 (默认)
    #[default]
    Redb,
    /// 进程内存储，重启即丢失
    Memory,
}

impl FromStr for StorageMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redb" => Ok(Self::Redb),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown storage mode: {other}")),
        }
    }
}

/// 服务器配置 - 楼面编辑服务的所有配置项
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./work_dir | 工作目录 (数据 + 日志) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | 控制台 JSON 日志 |
/// | GRID_SIZE | 10 | 拖拽吸附网格 |
/// | STORAGE_MODE | redb | redb / memory |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | 优雅关闭超时(毫秒) |
/// | SESSION_SWEEP_SECS | 60 | 空闲楼面会话回收间隔(秒) |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/floor HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储布局数据库和日志
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_json: bool,
    /// 桌台拖拽吸附单位
    pub grid_size: f64,
    pub storage_mode: StorageMode,
    /// 关闭超时时间 (毫秒)
    pub shutdown_timeout_ms: u64,
    /// 空闲会话回收间隔 (秒)
    pub session_sweep_secs: u64,
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./work_dir".into()),
            http_port: env_or("HTTP_PORT", 3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: env_or("LOG_JSON", false),
            grid_size: env_or("GRID_SIZE", 10.0),
            storage_mode: env_or("STORAGE_MODE", StorageMode::Redb),
            shutdown_timeout_ms: env_or("SHUTDOWN_TIMEOUT_MS", 10000),
            session_sweep_secs: env_or("SESSION_SWEEP_SECS", 60),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 数据目录: {work_dir}/data
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("data")
    }

    /// 日志目录: {work_dir}/logs
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 布局数据库文件
    pub fn layouts_db_path(&self) -> PathBuf {
        self.data_dir().join("floor_layouts.redb")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_mode_parse() {
        assert_eq!("redb".parse::<StorageMode>(), Ok(StorageMode::Redb));
        assert_eq!(" Memory ".parse::<StorageMode>(), Ok(StorageMode::Memory));
        assert!("sqlite".parse::<StorageMode>().is_err());
    }

    #[test]
    fn test_overrides_and_paths() {
        let config = Config::with_overrides("/tmp/floor", 4100);
        assert_eq!(config.http_port, 4100);
        assert_eq!(config.log_dir(), PathBuf::from("/tmp/floor/logs"));
        assert_eq!(
            config.layouts_db_path(),
            PathBuf::from("/tmp/floor/data/floor_layouts.redb")
        );
    }
}
