//! 外部工具程序的啟動、輸出擷取與終止
//!
//! 兩種呼叫模式：
//! - fire-and-wait：不擷取輸出，只看結束狀態
//! - capture-output：標準輸出導入管線，由呼叫端讀取
//!
//! 診斷輸出（stderr）一律丟棄。長時間執行的程序以 [`ChildProcess`] 持有，
//! 離開作用域時保證完成終止流程，不留下殭屍程序。

use crate::config::PlaybackSettings;
use crate::error::{MediaError, MediaResult};
use log::{debug, warn};
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;

/// 單一指令允許的參數數量上限
pub const MAX_TOOL_ARGS: usize = 32;

/// capture-output 模式的輸出緩衝區大小，超出部分直接截斷
pub const CAPTURE_CAPACITY: usize = 512;

/// 外部工具指令：程式名稱加上參數列
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<OsString>,
}

impl ToolCommand {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    #[must_use]
    pub fn arg_list(&self) -> &[OsString] {
        &self.args
    }

    /// 參數數量檢查，必須在啟動程序之前完成
    pub fn validate(&self) -> MediaResult<()> {
        if self.args.len() > MAX_TOOL_ARGS {
            return Err(MediaError::TooManyArguments {
                count: self.args.len(),
                max: MAX_TOOL_ARGS,
            });
        }
        Ok(())
    }

    fn build_command(&self, stdout: Stdio) -> MediaResult<Command> {
        self.validate()?;

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(Stdio::null());
        Ok(cmd)
    }

    fn spawn(&self, stdout: Stdio) -> MediaResult<Child> {
        let mut cmd = self.build_command(stdout)?;
        debug!("執行: {self}");

        cmd.spawn().map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                // 找不到工具與其他工具失敗一視同仁
                MediaError::tool_failure(format!("找不到 {}", self.program.display()))
            } else {
                MediaError::resource(format!("無法啟動 {}", self.program.display()), e)
            }
        })
    }

    fn check_status(&self, status: ExitStatus) -> MediaResult<()> {
        if status.success() {
            Ok(())
        } else {
            Err(MediaError::tool_failure(format!(
                "{} 結束狀態: {status}",
                self.program.display()
            )))
        }
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// fire-and-wait：等待程序結束，正常結束且狀態碼為零才算成功
pub fn run_and_wait(cmd: &ToolCommand) -> MediaResult<()> {
    let mut child = cmd.spawn(Stdio::null())?;
    let status = child
        .wait()
        .map_err(|e| MediaError::resource("等待程序結束失敗", e))?;
    cmd.check_status(status)
}

/// capture-output：讀取標準輸出直到緩衝區滿或 EOF，再等待程序結束
///
/// 成功需要狀態碼為零且至少擷取到一個位元組。
pub fn run_and_capture(cmd: &ToolCommand) -> MediaResult<String> {
    let mut child = cmd.spawn(Stdio::piped())?;
    let Some(mut stdout) = child.stdout.take() else {
        let _ = child.kill();
        let _ = child.wait();
        return Err(MediaError::tool_failure("無法取得標準輸出管線"));
    };

    let mut buffer = [0u8; CAPTURE_CAPACITY];
    let mut filled = 0;
    while filled < buffer.len() {
        match stdout.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => {
                debug!("讀取 {} 輸出中斷: {e}", cmd.program().display());
                break;
            }
        }
    }
    drop(stdout);

    let status = child
        .wait()
        .map_err(|e| MediaError::resource("等待程序結束失敗", e))?;
    cmd.check_status(status)?;

    if filled == 0 {
        return Err(MediaError::tool_failure(format!(
            "{} 沒有任何輸出",
            cmd.program().display()
        )));
    }

    Ok(String::from_utf8_lossy(&buffer[..filled]).into_owned())
}

/// 啟動後立即返回，不建立管線
pub fn spawn_detached(cmd: &ToolCommand, policy: StopPolicy) -> MediaResult<ChildProcess> {
    let child = cmd.spawn(Stdio::null())?;
    Ok(ChildProcess::new(child, policy))
}

/// 啟動並回傳標準輸出管線的讀取端
pub fn spawn_piped(
    cmd: &ToolCommand,
    policy: StopPolicy,
) -> MediaResult<(ChildProcess, ChildStdout)> {
    let mut child = cmd.spawn(Stdio::piped())?;
    match child.stdout.take() {
        Some(stdout) => Ok((ChildProcess::new(child, policy), stdout)),
        None => {
            drop(ChildProcess::new(child, policy));
            Err(MediaError::tool_failure("無法取得標準輸出管線"))
        }
    }
}

/// 兩階段終止的等待設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopPolicy {
    pub poll_interval: Duration,
    pub max_attempts: u32,
}

impl Default for StopPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(20),
            max_attempts: 25,
        }
    }
}

impl From<&PlaybackSettings> for StopPolicy {
    fn from(settings: &PlaybackSettings) -> Self {
        Self {
            poll_interval: Duration::from_millis(settings.stop_poll_interval_ms),
            max_attempts: settings.stop_poll_attempts,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Running,
    Exited { success: bool },
    Killed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// 程序早已結束，沒有送出任何信號
    AlreadyExited,
    /// 收到終止信號後在時限內結束
    Graceful,
    /// 逾時後強制終止
    Killed,
}

/// 擁有所有權的子程序
pub struct ChildProcess {
    child: Child,
    policy: StopPolicy,
    state: ProcessState,
    stopped: bool,
}

impl ChildProcess {
    fn new(child: Child, policy: StopPolicy) -> Self {
        Self {
            child,
            policy,
            state: ProcessState::Running,
            stopped: false,
        }
    }

    #[must_use]
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    #[must_use]
    pub const fn state(&self) -> ProcessState {
        self.state
    }

    /// 不阻塞地檢查程序是否已結束
    pub fn has_exited(&mut self) -> bool {
        self.poll();
        self.state != ProcessState::Running
    }

    fn poll(&mut self) {
        if self.state != ProcessState::Running {
            return;
        }
        match self.child.try_wait() {
            Ok(Some(status)) => self.record_exit(status),
            Ok(None) => {}
            Err(e) => warn!("無法檢查程序狀態 [{}]: {e}", self.child.id()),
        }
    }

    fn record_exit(&mut self, status: ExitStatus) {
        self.state = ProcessState::Exited {
            success: status.success(),
        };
    }

    /// 終止程序：先送終止信號並輪詢，逾時後強制結束並阻塞等待
    ///
    /// 已結束的程序不會收到任何信號。總等待時間受 [`StopPolicy`] 限制。
    pub fn stop(mut self) -> StopOutcome {
        self.terminate()
    }

    fn terminate(&mut self) -> StopOutcome {
        self.stopped = true;
        let pid = self.child.id();

        if self.has_exited() {
            debug!("程序 [{pid}] 已結束");
            return StopOutcome::AlreadyExited;
        }

        if send_terminate(&self.child) {
            for _ in 0..self.policy.max_attempts {
                if self.has_exited() {
                    debug!("程序 [{pid}] 已正常終止");
                    return StopOutcome::Graceful;
                }
                thread::sleep(self.policy.poll_interval);
            }
        }

        warn!("程序 [{pid}] 未在時限內結束，強制終止");
        if let Err(e) = self.child.kill() {
            warn!("無法終止程序 [{pid}]: {e}");
        }
        match self.child.wait() {
            Ok(status) => debug!("程序 [{pid}] 強制終止: {status}"),
            Err(e) => warn!("等待程序 [{pid}] 失敗: {e}"),
        }
        self.state = ProcessState::Killed;
        StopOutcome::Killed
    }
}

impl fmt::Debug for ChildProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildProcess")
            .field("pid", &self.child.id())
            .field("state", &self.state)
            .finish()
    }
}

impl Drop for ChildProcess {
    fn drop(&mut self) {
        if !self.stopped {
            self.terminate();
        }
    }
}

#[cfg(unix)]
fn send_terminate(child: &Child) -> bool {
    let Ok(pid) = libc::pid_t::try_from(child.id()) else {
        return false;
    };
    // SAFETY: pid 屬於尚未回收的子程序，kill 不涉及任何記憶體存取
    unsafe { libc::kill(pid, libc::SIGTERM) == 0 }
}

#[cfg(not(unix))]
fn send_terminate(_child: &Child) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_command_builder() {
        let cmd = ToolCommand::new("ffprobe")
            .args(["-v", "quiet"])
            .arg("/videos/a b.mp4");

        assert_eq!(cmd.program(), Path::new("ffprobe"));
        assert_eq!(cmd.arg_list().len(), 3);
        assert_eq!(cmd.to_string(), "ffprobe -v quiet /videos/a b.mp4");
    }

    #[test]
    fn test_argument_bound() {
        let at_limit = ToolCommand::new("x").args(vec!["a"; MAX_TOOL_ARGS]);
        assert!(at_limit.validate().is_ok());

        let over = at_limit.arg("b");
        assert!(matches!(
            over.validate(),
            Err(MediaError::TooManyArguments { count: 33, max: 32 })
        ));
    }

    #[test]
    fn test_too_many_arguments_never_spawns() {
        let cmd = ToolCommand::new("/nonexistent/tool").args(vec!["a"; MAX_TOOL_ARGS + 1]);
        assert!(matches!(
            run_and_wait(&cmd),
            Err(MediaError::TooManyArguments { .. })
        ));
        assert!(matches!(
            run_and_capture(&cmd),
            Err(MediaError::TooManyArguments { .. })
        ));
    }

    #[test]
    fn test_missing_program_is_tool_failure() {
        let cmd = ToolCommand::new("/nonexistent/clip_preview_tool");
        assert!(matches!(
            run_and_wait(&cmd),
            Err(MediaError::ExternalToolFailure(_))
        ));
    }

    #[test]
    fn test_stop_policy_from_settings() {
        let settings = PlaybackSettings {
            stop_poll_interval_ms: 10,
            stop_poll_attempts: 3,
            ..PlaybackSettings::default()
        };
        let policy = StopPolicy::from(&settings);
        assert_eq!(policy.poll_interval, Duration::from_millis(10));
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(StopPolicy::default().max_attempts, 25);
    }

    #[cfg(unix)]
    #[test]
    fn test_capture_output() {
        let cmd = ToolCommand::new("/bin/sh").args(["-c", "echo 1920,1080"]);
        assert_eq!(run_and_capture(&cmd).unwrap(), "1920,1080\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_capture_requires_output_and_zero_status() {
        let silent = ToolCommand::new("/bin/sh").args(["-c", "exit 0"]);
        assert!(run_and_capture(&silent).is_err());

        let failing = ToolCommand::new("/bin/sh").args(["-c", "echo partial; exit 3"]);
        assert!(matches!(
            run_and_capture(&failing),
            Err(MediaError::ExternalToolFailure(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_capture_truncates_at_capacity() {
        let cmd = ToolCommand::new("/bin/sh").args(["-c", "printf '%0300d%0300d' 0 0"]);
        let output = run_and_capture(&cmd).unwrap();
        assert_eq!(output.len(), CAPTURE_CAPACITY);
    }

    #[cfg(unix)]
    #[test]
    fn test_run_and_wait_status() {
        assert!(run_and_wait(&ToolCommand::new("/bin/sh").args(["-c", "exit 0"])).is_ok());
        assert!(run_and_wait(&ToolCommand::new("/bin/sh").args(["-c", "exit 1"])).is_err());
    }
}
