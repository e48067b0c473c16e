//! proc-vitals - 进程内诊断 Agent
//!
//! 链接进被监控程序，打开一个本地 TCP 端点，向外部巡检工具
//! 回答进程运行状况查询（静态元信息 + 实时运行指标）。
//!
//! # 核心能力
//!
//! - **单例生命周期**: 每个进程至多一个 Agent，`start` / `close` 两个入口
//! - **信号协议**: 单字节请求，JSON + 分隔符响应，一条连接多次往返
//! - **发现注册**: 注册目录下的 `<pid>` 文件记录监听端口
//! - **优雅退出**: 中断信号触发与 `close` 相同的清理后结束进程
//!
//! # 使用
//!
//! ```no_run
//! #[tokio::main]
//! async fn main() -> proc_vitals::Result<()> {
//!     let addr = proc_vitals::start(proc_vitals::AgentOptions::default())?;
//!     tracing::info!("诊断端点: {}", addr);
//!     // ... 业务逻辑 ...
//!     proc_vitals::close();
//!     Ok(())
//! }
//! ```
//!
//! 注意：通道不做认证，任何能访问该端口的本地进程都可以查询。

pub mod agent;
pub mod client;
pub mod collector;
pub mod config;
pub mod error;
pub mod protocol;

// Re-exports
pub use agent::{close, listening_addr, start};
pub use client::AgentClient;
pub use collector::{Meta, Stats};
pub use config::{default_registry_dir, AgentOptions};
pub use error::{Error, Result};
pub use protocol::{Signal, DELIMITER, SIGNAL_META, SIGNAL_STATS};
