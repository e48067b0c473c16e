//! vitals-agent - 独立运行的诊断 Agent 示例
//!
//! 把 Agent 以独立进程方式跑起来，方便用巡检工具手工验证协议。
//! 实际使用中 Agent 应当链接进被监控的程序。

use anyhow::Result;
use proc_vitals::AgentOptions;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("proc_vitals=debug".parse()?))
        .init();

    let addr = proc_vitals::start(AgentOptions::default())?;
    tracing::info!("🚀 vitals-agent v{} 监听: {}", env!("CARGO_PKG_VERSION"), addr);

    // 中断处理会负责清理并退出进程
    std::future::pending::<()>().await;
    Ok(())
}
