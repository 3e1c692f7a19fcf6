use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Ctrl-C 時設定旗標，由各元件在迴圈中檢查
#[must_use]
pub fn setup_shutdown_signal() -> Arc<AtomicBool> {
    let shutdown_signal = Arc::new(AtomicBool::new(false));
    let signal_clone = Arc::clone(&shutdown_signal);

    if let Err(e) = ctrlc::set_handler(move || {
        signal_clone.store(true, Ordering::SeqCst);
        eprintln!("\n收到中斷信號，正在停止...");
    }) {
        log::warn!("無法設定 Ctrl-C 處理器: {e}");
    }

    shutdown_signal
}

/// 元件開始前清除上一次的中斷旗標
pub fn reset_shutdown_signal(shutdown_signal: &AtomicBool) {
    shutdown_signal.store(false, Ordering::SeqCst);
}
