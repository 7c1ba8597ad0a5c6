//! 启动流程：日志初始化与启动失败报告

use std::fmt;

use chrono::{DateTime, Local};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// 安装全局日志订阅者，`RUST_LOG` 优先于配置中的级别
///
/// 已经安装过时返回 false。
pub fn init_logging(level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}

/// 启动失败时给用户看的诊断信息
#[derive(Debug, Clone, PartialEq)]
pub struct CrashReport {
    /// 最外层错误
    pub message: String,
    /// 完整的错误链，从外到内
    pub causes: Vec<String>,
    pub occurred_at: DateTime<Local>,
}

impl CrashReport {
    pub fn from_error(error: &anyhow::Error) -> Self {
        let mut chain = error.chain().map(|cause| cause.to_string());
        let message = chain.next().unwrap_or_default();
        Self {
            message,
            causes: chain.collect(),
            occurred_at: Local::now(),
        }
    }

    /// 复制到剪贴板的文本
    pub fn to_clipboard_text(&self) -> String {
        format!(
            "{} v{}\n{}\n\n{}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            self.occurred_at.format("%Y-%m-%d %H:%M:%S"),
            self
        )
    }
}

impl fmt::Display for CrashReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        for cause in &self.causes {
            write!(f, "\n  原因: {}", cause)?;
        }
        Ok(())
    }
}

/// 记录启动失败，并在 Windows 上询问用户是否复制诊断信息
pub fn report_startup_failure(error: &anyhow::Error) -> CrashReport {
    let report = CrashReport::from_error(error);
    error!("启动失败: {}", report);

    if ask_copy_report(&report) {
        match copy_to_clipboard(&report.to_clipboard_text()) {
            Ok(()) => info!("诊断信息已复制到剪贴板"),
            Err(e) => error!("复制诊断信息失败: {:#}", e),
        }
    }

    report
}

#[cfg(windows)]
fn ask_copy_report(report: &CrashReport) -> bool {
    use windows::Win32::UI::WindowsAndMessaging::{IDYES, MB_ICONERROR, MB_YESNO, MessageBoxW};
    use windows::core::HSTRING;

    let text = HSTRING::from(format!(
        "程序启动失败:\n\n{}\n\n是否将诊断信息复制到剪贴板？",
        report
    ));
    let caption = HSTRING::from("任务栏搜索");
    let choice = unsafe { MessageBoxW(None, &text, &caption, MB_YESNO | MB_ICONERROR) };
    choice == IDYES
}

#[cfg(not(windows))]
fn ask_copy_report(_report: &CrashReport) -> bool {
    false
}

/// 以 Unicode 文本写入系统剪贴板
#[cfg(windows)]
pub fn copy_to_clipboard(text: &str) -> anyhow::Result<()> {
    use anyhow::{Context, bail};
    use windows::Win32::Foundation::HANDLE;
    use windows::Win32::System::DataExchange::{
        CloseClipboard, EmptyClipboard, OpenClipboard, SetClipboardData,
    };
    use windows::Win32::System::Memory::{GMEM_MOVEABLE, GlobalAlloc, GlobalFree, GlobalLock, GlobalUnlock};
    use windows::Win32::System::Ole::CF_UNICODETEXT;

    let wide: Vec<u16> = text.encode_utf16().chain(std::iter::once(0)).collect();
    let bytes = wide.len() * std::mem::size_of::<u16>();

    unsafe {
        OpenClipboard(None).context("打开剪贴板失败")?;

        let result: anyhow::Result<()> = (|| {
            EmptyClipboard().context("清空剪贴板失败")?;

            let memory = GlobalAlloc(GMEM_MOVEABLE, bytes).context("分配剪贴板内存失败")?;
            let target = GlobalLock(memory) as *mut u16;
            if target.is_null() {
                let _ = GlobalFree(Some(memory));
                bail!("锁定剪贴板内存失败");
            }
            std::ptr::copy_nonoverlapping(wide.as_ptr(), target, wide.len());
            let _ = GlobalUnlock(memory);

            // 成功后内存归剪贴板所有
            if let Err(e) = SetClipboardData(CF_UNICODETEXT.0 as u32, Some(HANDLE(memory.0))) {
                let _ = GlobalFree(Some(memory));
                return Err(e).context("写入剪贴板失败");
            }
            Ok(())
        })();

        let _ = CloseClipboard();
        result
    }
}

#[cfg(not(windows))]
pub fn copy_to_clipboard(_text: &str) -> anyhow::Result<()> {
    anyhow::bail!("当前平台不支持剪贴板")
}
