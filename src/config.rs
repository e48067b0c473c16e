//! Agent 配置

use std::path::PathBuf;

/// 默认监听地址（回环 + 系统分配端口）
pub const DEFAULT_ADDR: &str = "127.0.0.1:0";

/// Agent 启动配置
#[derive(Debug, Clone, Default)]
pub struct AgentOptions {
    /// 监听地址，形如 "host:port"（默认 "127.0.0.1:0"）
    pub addr: Option<String>,

    /// 发现注册目录（默认 ~/.proc-vitals）
    ///
    /// Agent 启动后在该目录下写入 `<pid>` 文件，内容为监听端口，
    /// 供外部巡检工具发现本进程。
    pub registry_dir: Option<PathBuf>,
}

impl AgentOptions {
    /// 实际使用的监听地址
    pub fn addr(&self) -> &str {
        self.addr.as_deref().unwrap_or(DEFAULT_ADDR)
    }

    /// 实际使用的注册目录
    pub fn registry_dir(&self) -> PathBuf {
        self.registry_dir
            .clone()
            .unwrap_or_else(default_registry_dir)
    }
}

/// 默认注册目录: ~/.proc-vitals
pub fn default_registry_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".proc-vitals")
}
