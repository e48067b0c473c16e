//! Agent 模块
//!
//! 进程内诊断 Agent：单例生命周期、接受循环、
//! 单字节信号协议处理、发现注册。

mod handler;
pub mod registry;
mod server;

pub use server::{close, listening_addr, start};
