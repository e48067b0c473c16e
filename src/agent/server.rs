//! Agent 生命周期管理
//!
//! 进程级单例：绑定 TCP 监听、写入发现注册、安装中断处理、
//! 启动接受循环。所有状态变更都经过 `start` / `close` 两个入口，
//! 由同一把互斥锁串行化。

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Once;

use parking_lot::Mutex;
use tokio::net::TcpListener;
use tokio::sync::watch;

use super::{handler, registry};
use crate::config::AgentOptions;
use crate::error::{Error, Result};

/// 单例状态，锁只在 start/close 的同步转换期间持有，从不跨 await
static AGENT: Mutex<Option<AgentState>> = Mutex::new(None);

/// 中断处理每个进程只安装一次
static INTERRUPT_HOOK: Once = Once::new();

struct AgentState {
    local_addr: SocketAddr,
    registry_path: PathBuf,
    shutdown: watch::Sender<()>,
}

/// 启动 Agent
///
/// 绑定监听地址（默认回环 + 随机端口），在注册目录写入
/// `<pid>` 文件（内容为端口号），然后在后台任务中接受连接。
/// 返回时监听已就绪、注册条目已落盘，不等待接受循环。
///
/// 本进程已有 Agent 在监听时返回 [`Error::AlreadyListening`]。
/// 必须在 tokio 运行时上下文中调用。
pub fn start(opts: AgentOptions) -> Result<SocketAddr> {
    let mut slot = AGENT.lock();
    if let Some(state) = slot.as_ref() {
        return Err(Error::AlreadyListening(state.local_addr));
    }

    let dir = opts.registry_dir();
    registry::ensure_dir(&dir)?;

    // 同步绑定后交给 tokio，使 start 本身无需 await
    let std_listener = std::net::TcpListener::bind(opts.addr())?;
    std_listener.set_nonblocking(true)?;
    let listener = TcpListener::from_std(std_listener)?;
    let local_addr = listener.local_addr()?;

    // 注册失败时 listener 随作用域释放，不留下任何状态
    let registry_path = registry::write_entry(&dir, std::process::id(), local_addr.port())?;

    install_interrupt_hook();

    let (shutdown_tx, shutdown_rx) = watch::channel(());
    tokio::spawn(accept_loop(listener, shutdown_rx));

    tracing::info!("🚀 Agent 监听: {}", local_addr);
    *slot = Some(AgentState {
        local_addr,
        registry_path,
        shutdown: shutdown_tx,
    });
    Ok(local_addr)
}

/// 关闭 Agent
///
/// 幂等：未启动时什么都不做。删除注册条目（尽力而为），
/// 通知接受循环退出（监听随之释放）。可以与 `start` 并发调用，
/// 也可以在中断处理任务中调用。
pub fn close() {
    let mut slot = AGENT.lock();
    if let Some(state) = slot.take() {
        registry::remove_entry(&state.registry_path);
        let _ = state.shutdown.send(());
        tracing::info!("🧹 Agent 已关闭: {}", state.local_addr);
    }
}

/// 当前监听地址（未启动时为 None）
pub fn listening_addr() -> Option<SocketAddr> {
    AGENT.lock().as_ref().map(|state| state.local_addr)
}

/// 接受循环：每条连接派发一个独立任务
async fn accept_loop(listener: TcpListener, mut shutdown: watch::Receiver<()>) {
    loop {
        tokio::select! {
            // close() 发出通知或 sender 被丢弃都视为终止
            _ = shutdown.changed() => break,
            result = listener.accept() => match result {
                Ok((stream, peer)) => {
                    tracing::debug!("📥 接受连接: {}", peer);
                    tokio::spawn(async move {
                        if let Err(e) = handler::serve(stream).await {
                            tracing::warn!("连接处理失败 ({}): {}", peer, e);
                        }
                    });
                }
                Err(e) => {
                    // 瞬时错误（如句柄耗尽），记录后继续接受
                    tracing::warn!("接受连接失败: {}", e);
                }
            }
        }
    }
    // listener 在此释放，端口不再接受新连接
}

/// 安装进程级中断处理：收到中断/终止信号时执行与 close()
/// 相同的清理，然后结束进程。SIGTERM 退出码 0，其余为 1。
fn install_interrupt_hook() {
    INTERRUPT_HOOK.call_once(|| {
        tokio::spawn(async {
            match wait_for_interrupt().await {
                Ok(code) => {
                    close();
                    std::process::exit(code);
                }
                Err(e) => {
                    tracing::error!("安装信号监听失败: {}", e);
                }
            }
        });
    });
}

#[cfg(unix)]
async fn wait_for_interrupt() -> std::io::Result<i32> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let mut quit = signal(SignalKind::quit())?;

    let code = tokio::select! {
        _ = interrupt.recv() => 1,
        _ = terminate.recv() => 0,
        _ = quit.recv() => 1,
    };
    Ok(code)
}

#[cfg(not(unix))]
async fn wait_for_interrupt() -> std::io::Result<i32> {
    tokio::signal::ctrl_c().await?;
    Ok(1)
}
