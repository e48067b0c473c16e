//! 发现注册 - pid 到端口的映射文件
//!
//! 外部巡检工具通过扫描注册目录发现可连接的进程：
//! 文件名是进程 PID，内容是监听端口的十进制文本。

use std::fs;
use std::path::{Path, PathBuf};

/// 确保注册目录存在
///
/// 目录需要对其他用户可读（巡检工具可能以不同用户运行），
/// 仅属主可写。
pub fn ensure_dir(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(dir, fs::Permissions::from_mode(0o755))?;
    }

    Ok(())
}

/// 写入注册条目，返回条目路径
pub fn write_entry(dir: &Path, pid: u32, port: u16) -> std::io::Result<PathBuf> {
    let path = dir.join(pid.to_string());
    fs::write(&path, port.to_string())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644))?;
    }

    tracing::debug!("📝 写入注册条目: {} (port={})", path.display(), port);
    Ok(path)
}

/// 删除注册条目（尽力而为，忽略错误）
pub fn remove_entry(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!("删除注册条目失败 {}: {}", path.display(), e);
        }
    }
}

/// 读取某个进程的注册端口（供客户端发现使用）
pub fn lookup_port(dir: &Path, pid: u32) -> std::io::Result<u16> {
    let path = dir.join(pid.to_string());
    let content = fs::read_to_string(&path)?;
    content.trim().parse().map_err(|_| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("注册条目内容非法: {}", path.display()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_and_lookup() {
        let dir = tempdir().unwrap();
        ensure_dir(dir.path()).unwrap();

        let path = write_entry(dir.path(), 4242, 50100).unwrap();
        assert_eq!(path, dir.path().join("4242"));
        assert_eq!(lookup_port(dir.path(), 4242).unwrap(), 50100);
    }

    #[test]
    fn test_remove_is_best_effort() {
        let dir = tempdir().unwrap();
        ensure_dir(dir.path()).unwrap();

        let path = write_entry(dir.path(), 1, 80).unwrap();
        remove_entry(&path);
        assert!(!path.exists());

        // 重复删除不会 panic
        remove_entry(&path);
    }

    #[test]
    fn test_ensure_dir_is_idempotent() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("registry");
        ensure_dir(&nested).unwrap();
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
