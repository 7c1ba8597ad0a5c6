use thiserror::Error;

/// 弹出窗口错误类型
///
/// 生命周期控制器本身的状态转换不会失败，这里只覆盖构造阶段和宿主层的错误。
#[derive(Error, Debug)]
pub enum PopupError {
    #[error("配置无效: {0}")]
    Config(String),

    #[error("读取配置文件失败: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("配置文件解析失败: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("窗口操作失败: {0}")]
    Window(String),

    #[error("渲染失败: {0}")]
    Render(String),

    #[error("搜索历史写入失败: {0}")]
    History(String),
}

impl PopupError {
    /// 检查错误是否发生在配置阶段（可回退到默认配置）
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            PopupError::Config(_) | PopupError::ConfigIo(_) | PopupError::ConfigParse(_)
        )
    }
}

/// 弹出窗口结果类型
pub type PopupResult<T> = Result<T, PopupError>;
