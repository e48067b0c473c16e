//! 诊断协议定义
//!
//! 通信方式：TCP + 单字节信号请求，响应为一行紧凑 JSON + '\n'。
//! 一条连接可以承载任意多个请求/响应周期（严格半双工）。

/// 请求 Meta 快照的信号字节
pub const SIGNAL_META: u8 = 0x1;

/// 请求 Stats 快照的信号字节
pub const SIGNAL_STATS: u8 = 0x2;

/// 响应结束分隔符
///
/// 紧凑模式的 `serde_json` 输出不会包含裸换行（字符串内的换行会被
/// 转义为 `\n` 两个字符），因此 '\n' 可以安全地用作帧边界。
pub const DELIMITER: u8 = b'\n';

/// 请求信号（Client → Agent）
///
/// 两端必须使用相同的字节值，这是稳定的协议契约。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Signal {
    /// 请求静态进程元信息
    Meta = SIGNAL_META,
    /// 请求实时运行指标
    Stats = SIGNAL_STATS,
}

impl Signal {
    /// 从线上字节解析信号，非法字节返回 None
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            SIGNAL_META => Some(Signal::Meta),
            SIGNAL_STATS => Some(Signal::Stats),
            _ => None,
        }
    }

    /// 信号对应的线上字节
    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_round_trip() {
        assert_eq!(Signal::from_byte(SIGNAL_META), Some(Signal::Meta));
        assert_eq!(Signal::from_byte(SIGNAL_STATS), Some(Signal::Stats));
        assert_eq!(Signal::Meta.as_byte(), 0x1);
        assert_eq!(Signal::Stats.as_byte(), 0x2);
    }

    #[test]
    fn test_invalid_bytes_rejected() {
        assert_eq!(Signal::from_byte(0x0), None);
        assert_eq!(Signal::from_byte(0x3), None);
        assert_eq!(Signal::from_byte(0xFF), None);
    }

    #[test]
    fn test_delimiter_never_inside_compact_json() {
        // 字符串里的换行会被转义，不会和分隔符冲突
        let value = serde_json::json!({ "text": "line1\nline2" });
        let encoded = serde_json::to_vec(&value).unwrap();
        assert!(!encoded.contains(&DELIMITER));
    }
}
