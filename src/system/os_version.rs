use std::fmt;

/// 操作系统版本，按 (major, minor, build) 顺序比较
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OsVersion {
    pub major: u32,
    pub minor: u32,
    pub build: u32,
}

impl OsVersion {
    /// Windows 11 首个正式版本
    pub const WINDOWS_11: OsVersion = OsVersion::new(10, 0, 22000);
    /// Windows 10 首个正式版本
    pub const WINDOWS_10: OsVersion = OsVersion::new(10, 0, 10240);

    pub const fn new(major: u32, minor: u32, build: u32) -> Self {
        Self { major, minor, build }
    }

    /// 窗口合成器是否支持平滑的窗口位置动画
    pub fn supports_position_animation(self) -> bool {
        self >= Self::WINDOWS_11
    }
}

impl fmt::Display for OsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.build)
    }
}

/// 操作系统版本探测（只读）
pub trait OsVersionProbe {
    fn version(&self) -> OsVersion;
}

/// 固定版本，用于测试或强制指定动画策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticVersion(pub OsVersion);

impl OsVersionProbe for StaticVersion {
    fn version(&self) -> OsVersion {
        self.0
    }
}

/// 读取当前系统版本
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemVersionProbe;

impl OsVersionProbe for SystemVersionProbe {
    fn version(&self) -> OsVersion {
        current_os_version()
    }
}

/// 通过 RtlGetVersion 获取真实版本号（不受兼容性清单影响）
#[cfg(windows)]
pub fn current_os_version() -> OsVersion {
    use windows::Wdk::System::SystemServices::RtlGetVersion;
    use windows::Win32::System::SystemInformation::OSVERSIONINFOW;

    let mut info = OSVERSIONINFOW {
        dwOSVersionInfoSize: std::mem::size_of::<OSVERSIONINFOW>() as u32,
        ..Default::default()
    };

    let status = unsafe { RtlGetVersion(&mut info) };
    if status.is_err() {
        tracing::warn!("RtlGetVersion 调用失败: {:?}，按 Windows 10 处理", status);
        return OsVersion::WINDOWS_10;
    }

    OsVersion::new(info.dwMajorVersion, info.dwMinorVersion, info.dwBuildNumber)
}

/// 非 Windows 平台的合成器都支持窗口位置动画
#[cfg(not(windows))]
pub fn current_os_version() -> OsVersion {
    OsVersion::WINDOWS_11
}
