//! 快照采集 - 进程元信息与实时运行指标
//!
//! Agent 核心只负责分发信号，真正的数据由这里的两个纯函数产出。
//! 两者都在请求时采集，返回可直接 JSON 序列化的结构。

use serde::{Deserialize, Serialize};
use sysinfo::{ProcessesToUpdate, System};

use crate::error::{Error, Result};

/// 静态进程元信息快照
///
/// 进程存活期间不变，按需采集。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    /// 进程 ID
    pub pid: u32,
    /// 可执行文件路径
    pub exe: Option<String>,
    /// 本库版本
    pub agent_version: String,
    /// 主机名
    pub hostname: Option<String>,
    /// 操作系统（如 "linux"、"macos"）
    pub os: String,
    /// CPU 架构（如 "x86_64"、"aarch64"）
    pub arch: String,
    /// 逻辑 CPU 数
    pub cpu_count: usize,
}

impl Meta {
    /// 采集当前进程的元信息
    pub fn collect() -> Result<Self> {
        let exe = std::env::current_exe()
            .ok()
            .map(|p| p.display().to_string());
        let cpu_count = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        Ok(Self {
            pid: std::process::id(),
            exe,
            agent_version: env!("CARGO_PKG_VERSION").to_string(),
            hostname: System::host_name(),
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            cpu_count,
        })
    }
}

/// 实时运行指标快照
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stats {
    /// 进程 ID
    pub pid: u32,
    /// 进程 CPU 占用（百分比，多核可超过 100）
    pub cpu_percent: f32,
    /// 常驻内存（字节）
    pub memory_bytes: u64,
    /// 虚拟内存（字节）
    pub virtual_memory_bytes: u64,
    /// 进程运行时长（秒）
    pub run_time_secs: u64,
    /// 系统总内存（字节）
    pub total_memory_bytes: u64,
    /// 系统已用内存（字节）
    pub used_memory_bytes: u64,
    /// 采集时间（Unix 毫秒）
    pub captured_at: i64,
}

impl Stats {
    /// 采集当前进程的实时指标
    ///
    /// CPU 占用需要两次采样，中间会阻塞 `MINIMUM_CPU_UPDATE_INTERVAL`，
    /// 调用方应放在 `spawn_blocking` 中执行。
    pub fn collect() -> Result<Self> {
        let pid = sysinfo::get_current_pid().map_err(|e| Error::Collect(e.to_string()))?;

        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);

        // 第二次采样，得到区间内的 CPU 占用
        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        sys.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        sys.refresh_memory();

        let process = sys
            .process(pid)
            .ok_or_else(|| Error::Collect(format!("进程不存在: {}", pid)))?;

        Ok(Self {
            pid: pid.as_u32(),
            cpu_percent: process.cpu_usage(),
            memory_bytes: process.memory(),
            virtual_memory_bytes: process.virtual_memory(),
            run_time_secs: process.run_time(),
            total_memory_bytes: sys.total_memory(),
            used_memory_bytes: sys.used_memory(),
            captured_at: chrono::Utc::now().timestamp_millis(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::DELIMITER;

    #[test]
    fn test_meta_collect() {
        let meta = Meta::collect().unwrap();
        assert_eq!(meta.pid, std::process::id());
        assert!(!meta.agent_version.is_empty());
        assert!(meta.cpu_count >= 1);
    }

    #[test]
    fn test_stats_collect() {
        let stats = Stats::collect().unwrap();
        assert_eq!(stats.pid, std::process::id());
        assert!(stats.memory_bytes > 0);
        assert!(stats.total_memory_bytes >= stats.used_memory_bytes);
    }

    #[test]
    fn test_snapshots_encode_without_delimiter() {
        // 线上帧依赖响应 JSON 中不出现分隔符
        let meta = serde_json::to_vec(&Meta::collect().unwrap()).unwrap();
        let stats = serde_json::to_vec(&Stats::collect().unwrap()).unwrap();
        assert!(!meta.contains(&DELIMITER));
        assert!(!stats.contains(&DELIMITER));
    }
}
