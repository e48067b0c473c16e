//! 错误类型定义

use std::net::SocketAddr;

use thiserror::Error;

/// 库错误类型
#[derive(Error, Debug)]
pub enum Error {
    /// Agent 冲突（本进程已有 Agent 在监听）
    #[error("Agent 已在监听: {0}")]
    AlreadyListening(SocketAddr),

    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 序列化错误
    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 协议错误（非法信号字节）
    #[error("未知信号: {0:#04x}")]
    UnknownSignal(u8),

    /// 采集错误
    #[error("采集失败: {0}")]
    Collect(String),

    /// 其他错误
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, Error>;
