//! Agent Client
//!
//! 巡检工具侧的最小客户端：按地址或注册目录发现 Agent，
//! 发送信号字节并解析分隔符帧回的 JSON 快照。

use std::net::SocketAddr;
use std::path::Path;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use crate::agent::registry;
use crate::collector::{Meta, Stats};
use crate::error::{Error, Result};
use crate::protocol::{Signal, DELIMITER};

/// Agent 客户端，一条持久连接可发起任意多次请求
pub struct AgentClient {
    stream: BufReader<TcpStream>,
}

impl AgentClient {
    /// 连接指定地址的 Agent
    pub async fn connect(addr: SocketAddr) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self {
            stream: BufReader::new(stream),
        })
    }

    /// 通过注册目录发现并连接某个进程的 Agent
    pub async fn discover(registry_dir: &Path, pid: u32) -> Result<Self> {
        let port = registry::lookup_port(registry_dir, pid)?;
        let addr = SocketAddr::from(([127, 0, 0, 1], port));
        Self::connect(addr).await
    }

    /// 请求进程元信息
    pub async fn meta(&mut self) -> Result<Meta> {
        let frame = self.request(Signal::Meta).await?;
        Ok(serde_json::from_slice(&frame)?)
    }

    /// 请求实时运行指标
    pub async fn stats(&mut self) -> Result<Stats> {
        let frame = self.request(Signal::Stats).await?;
        Ok(serde_json::from_slice(&frame)?)
    }

    /// 发送信号并读取一帧响应（已去掉结尾分隔符）
    pub async fn request(&mut self, signal: Signal) -> Result<Vec<u8>> {
        self.stream
            .get_mut()
            .write_all(&[signal.as_byte()])
            .await?;

        let mut frame = Vec::new();
        let n = self.stream.read_until(DELIMITER, &mut frame).await?;
        if n == 0 {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "Agent 关闭了连接",
            )));
        }
        if frame.last() == Some(&DELIMITER) {
            frame.pop();
        }
        Ok(frame)
    }
}
