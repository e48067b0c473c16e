//! 连接处理 - 单字节信号协议
//!
//! 每条连接一个独立任务：循环读取 1 字节信号，采集对应快照，
//! 写回 JSON + 分隔符，直到空闲超时、对端断开或出错。

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::collector::{Meta, Stats};
use crate::error::{Error, Result};
use crate::protocol::{Signal, DELIMITER};

/// 空闲读超时：超过这个时间没有新请求就关闭连接
pub(crate) const READ_TIMEOUT: Duration = Duration::from_secs(5);

/// 处理一条连接，返回时连接随 stream 释放
pub(crate) async fn serve(mut stream: TcpStream) -> Result<()> {
    loop {
        let mut signal = [0u8; 1];
        match timeout(READ_TIMEOUT, stream.read_exact(&mut signal)).await {
            // 空闲超时，正常关闭
            Err(_) => {
                tracing::debug!("连接空闲超时，关闭");
                return Ok(());
            }
            // 对端关闭
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                return Ok(());
            }
            Ok(Err(e)) => return Err(e.into()),
            Ok(Ok(_)) => {}
        }

        // 非法信号：不回应，直接断开这条连接
        let signal = Signal::from_byte(signal[0]).ok_or(Error::UnknownSignal(signal[0]))?;

        let mut response = match signal {
            Signal::Meta => encode(collect_blocking(Meta::collect).await?)?,
            Signal::Stats => encode(collect_blocking(Stats::collect).await?)?,
        };
        response.push(DELIMITER);

        stream.write_all(&response).await?;
    }
}

/// 在阻塞线程池上执行采集函数（Stats 采样会阻塞约 200ms）
async fn collect_blocking<T, F>(collect: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(collect)
        .await
        .map_err(|e| Error::Collect(e.to_string()))?
}

fn encode<T: serde::Serialize>(snapshot: T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(&snapshot)?)
}
