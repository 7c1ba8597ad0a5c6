mod creation;
mod positioning;

pub use creation::*;
pub use positioning::*;

use crate::*;
use crate::errors::{PopupError, PopupResult};
use crate::geometry::{PopupGeometry, ScreenSize};

/// 窗口管理器，负责弹出窗口的创建、定位和显示
pub struct WindowManager {
    window: Option<Rc<Window>>,
}

impl WindowManager {
    pub fn new() -> Self {
        Self { window: None }
    }

    /// 创建窗口
    pub fn create_window(
        &mut self,
        event_loop: &ActiveEventLoop,
        width: u32,
        height: u32,
    ) -> PopupResult<()> {
        let window = create_popup_window(event_loop, width, height)?;
        self.window = Some(window);
        Ok(())
    }

    /// 获取窗口引用
    pub fn get_window(&self) -> Option<&Rc<Window>> {
        self.window.as_ref()
    }

    /// 窗口所在显示器的尺寸
    pub fn screen_size(&self) -> Option<ScreenSize> {
        let monitor = self.window.as_ref()?.current_monitor()?;
        let size = monitor.size();
        Some(ScreenSize::new(size.width as f64, size.height as f64))
    }

    pub fn set_geometry(&self, geometry: &PopupGeometry) -> PopupResult<()> {
        let window = self.require_window()?;
        set_window_position(window, geometry);
        Ok(())
    }

    pub fn set_topmost(&self, topmost: bool) {
        if let Some(window) = &self.window {
            set_window_topmost(window, topmost);
        }
    }

    pub fn show(&self, activate: bool) {
        if let Some(window) = &self.window {
            show_window(window, activate);
        }
    }

    pub fn hide(&self) {
        if let Some(window) = &self.window {
            hide_window(window);
        }
    }

    pub fn focus(&self) {
        if let Some(window) = &self.window {
            window.focus_window();
        }
    }

    pub fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn require_window(&self) -> PopupResult<&Rc<Window>> {
        self.window
            .as_ref()
            .ok_or_else(|| PopupError::Window("窗口未创建".to_string()))
    }
}

impl Default for WindowManager {
    fn default() -> Self {
        Self::new()
    }
}
