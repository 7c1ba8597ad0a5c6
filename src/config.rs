use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::animation::AnimationTiming;
use crate::errors::{PopupError, PopupResult};

/// 弹出窗口的激活方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationMode {
    /// 工具栏模式：显示时不抢占焦点
    #[default]
    Deskband,
    /// 图标模式：显示时激活窗口并聚焦搜索框
    Icon,
}

/// 弹出窗口配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupConfig {
    /// 请求的弹出窗口宽度
    pub popup_width: f64,
    /// 请求的弹出窗口高度
    pub popup_height: f64,
    /// 禁用所有动画（时长归零，顺序不变）
    pub animations_disabled: bool,
    pub activation_mode: ActivationMode,
    /// 允许在动画进行中反向
    pub interrupt_transitions: bool,
    /// 任务栏轮询间隔（毫秒）
    pub taskbar_poll_interval_ms: u64,
    /// 动画帧间隔（毫秒）
    pub frame_interval_ms: u64,
    /// 搜索历史容量
    pub history_limit: usize,
    pub log_level: String,
    /// 启动后立即显示一次
    pub show_on_startup: bool,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            popup_width: 700.0,
            popup_height: 600.0,
            animations_disabled: false,
            activation_mode: ActivationMode::Deskband,
            interrupt_transitions: false,
            taskbar_poll_interval_ms: 500,
            frame_interval_ms: 16,
            history_limit: 100,
            log_level: "info".to_string(),
            show_on_startup: true,
        }
    }
}

impl PopupConfig {
    /// 从 JSON 文件加载配置，缺失的字段取默认值
    pub fn load(path: impl AsRef<Path>) -> PopupResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config: PopupConfig = serde_json::from_str(&content)?;
        config.validate()?;
        debug!("已加载配置: {:?}", path);
        Ok(config)
    }

    /// 从默认位置加载配置，文件不存在时使用默认值
    pub fn load_or_default() -> PopupResult<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(path),
            _ => {
                info!("未找到配置文件，使用默认配置");
                Ok(Self::default())
            }
        }
    }

    /// 默认配置文件路径
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("taskbar_popup");
            path.push("config.json");
            path
        })
    }

    /// 校验配置
    pub fn validate(&self) -> PopupResult<()> {
        for (name, value) in [("popup_width", self.popup_width), ("popup_height", self.popup_height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(PopupError::Config(format!("{} 必须为正数，当前为 {}", name, value)));
            }
        }
        if self.frame_interval_ms == 0 {
            return Err(PopupError::Config("frame_interval_ms 不能为 0".to_string()));
        }
        if self.taskbar_poll_interval_ms == 0 {
            return Err(PopupError::Config("taskbar_poll_interval_ms 不能为 0".to_string()));
        }
        Ok(())
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.popup_width = width;
        self.popup_height = height;
        self
    }

    pub fn with_animations_disabled(mut self, disabled: bool) -> Self {
        self.animations_disabled = disabled;
        self
    }

    pub fn with_activation_mode(mut self, mode: ActivationMode) -> Self {
        self.activation_mode = mode;
        self
    }

    pub fn with_interrupt_transitions(mut self, interrupt: bool) -> Self {
        self.interrupt_transitions = interrupt;
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn timing(&self) -> AnimationTiming {
        AnimationTiming::new(!self.animations_disabled)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn taskbar_poll_interval(&self) -> Duration {
        Duration::from_millis(self.taskbar_poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = PopupConfig::default();
        assert_eq!(config.popup_width, 700.0);
        assert_eq!(config.popup_height, 600.0);
        assert_eq!(config.activation_mode, ActivationMode::Deskband);
        assert!(!config.interrupt_transitions);
        assert!(config.timing().enabled);
        assert_eq!(config.frame_interval(), Duration::from_millis(16));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "popup_width": 480, "activation_mode": "icon", "animations_disabled": true }}"#
        )
        .unwrap();

        let config = PopupConfig::load(file.path()).unwrap();
        assert_eq!(config.popup_width, 480.0);
        assert_eq!(config.popup_height, 600.0);
        assert_eq!(config.activation_mode, ActivationMode::Icon);
        assert!(!config.timing().enabled);
        assert_eq!(config.history_limit, 100);
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ popup_width: ").unwrap();

        let err = PopupConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, PopupError::ConfigParse(_)));
        assert!(err.is_config_error());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = PopupConfig::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, PopupError::ConfigIo(_)));
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "popup_height": -1 }}"#).unwrap();
        assert!(matches!(PopupConfig::load(file.path()), Err(PopupError::Config(_))));
    }

    #[test]
    fn test_validate() {
        assert!(PopupConfig::default().with_size(0.0, 600.0).validate().is_err());
        assert!(PopupConfig::default().with_size(f64::NAN, 600.0).validate().is_err());
        assert!(PopupConfig::default().with_size(200.0, 200.0).validate().is_ok());

        let config = PopupConfig {
            frame_interval_ms: 0,
            ..PopupConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
