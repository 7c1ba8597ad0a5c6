use crate::*;
use crate::animation::Frame;
use crate::config::PopupConfig;
use crate::errors::PopupResult;
use crate::geometry::{PopupGeometry, ScreenSize};
use crate::graphics::Renderer;
use crate::lifecycle::PopupSurface;
use crate::window::{WindowManager, pixel_rect};

use tracing::{debug, warn};

/// 没有显示器信息时使用的屏幕尺寸
const FALLBACK_SCREEN: ScreenSize = ScreenSize::new(1920.0, 1080.0);

/// 弹出搜索窗口，作为生命周期控制器的渲染表面
pub struct PopupWidget {
    pub window_manager: WindowManager,
    pub renderer: Renderer,
    screen: ScreenSize,
    last_frame: Option<Frame>,
    last_geometry: Option<(i32, i32, u32, u32)>,
    focused: bool,
    search_focused: bool,
    search_term: String,
    content_changed: bool,
}

impl PopupWidget {
    pub fn new() -> Self {
        Self {
            window_manager: WindowManager::new(),
            renderer: Renderer::new(),
            screen: FALLBACK_SCREEN,
            last_frame: None,
            last_geometry: None,
            focused: false,
            search_focused: false,
            search_term: String::new(),
            content_changed: false,
        }
    }

    /// 创建隐藏的窗口并初始化渲染器
    pub fn initialize(&mut self, event_loop: &ActiveEventLoop, config: &PopupConfig) -> PopupResult<()> {
        self.window_manager.create_window(
            event_loop,
            config.popup_width.round() as u32,
            config.popup_height.round() as u32,
        )?;

        if let Some(window) = self.window_manager.get_window() {
            self.renderer.initialize(window)?;
        }

        self.refresh_screen_size();
        Ok(())
    }

    /// 重新读取显示器尺寸
    pub fn refresh_screen_size(&mut self) {
        match self.window_manager.screen_size() {
            Some(screen) => self.screen = screen,
            None => warn!("无法获取显示器尺寸，使用 {:?}", self.screen),
        }
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if !focused && self.search_focused {
            self.search_focused = false;
            self.mark_content_changed();
        }
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// 向搜索框输入文本，返回是否有变化
    pub fn type_text(&mut self, text: &str) -> bool {
        let before = self.search_term.len();
        self.search_term
            .extend(text.chars().filter(|c| !c.is_control()));
        let changed = self.search_term.len() != before;
        if changed {
            self.mark_content_changed();
        }
        changed
    }

    /// 删除最后一个字符
    pub fn backspace(&mut self) -> bool {
        let changed = self.search_term.pop().is_some();
        if changed {
            self.mark_content_changed();
        }
        changed
    }

    /// 当前窗口几何信息（最近一帧）
    pub fn geometry(&self) -> Option<PopupGeometry> {
        self.last_frame.map(|frame| frame.geometry)
    }

    /// 标记内容已变化，已有待处理的重绘请求时不再重复请求
    pub fn mark_content_changed(&mut self) {
        if !self.content_changed {
            self.content_changed = true;
            self.window_manager.request_redraw();
        }
    }

    /// 绘制最近一帧
    pub fn draw_content(&mut self) -> PopupResult<()> {
        if !self.renderer.is_initialized() {
            return Ok(());
        }
        let Some(frame) = self.last_frame else {
            return Ok(());
        };

        let (_, _, width, height) = pixel_rect(&frame.geometry);
        self.content_changed = false;
        self.renderer
            .draw_frame(&frame, &self.search_term, self.search_focused, width, height)
    }
}

impl PopupSurface for PopupWidget {
    fn screen_size(&self) -> ScreenSize {
        self.screen
    }

    fn apply_frame(&mut self, frame: &Frame) {
        let rect = pixel_rect(&frame.geometry);
        // 旧版动画只改变内容，窗口位置不动
        if self.last_geometry != Some(rect) {
            if let Err(e) = self.window_manager.set_geometry(&frame.geometry) {
                warn!("移动窗口失败: {}", e);
            }
            self.last_geometry = Some(rect);
        }
        self.last_frame = Some(*frame);
        self.mark_content_changed();
    }

    fn show(&mut self, activate: bool) {
        debug!("显示窗口 (activate = {})", activate);
        self.window_manager.show(activate);
        self.focused = activate;
    }

    fn hide(&mut self) {
        debug!("隐藏窗口");
        self.window_manager.hide();
        self.focused = false;
        self.search_focused = false;
    }

    fn set_topmost(&mut self, topmost: bool) {
        self.window_manager.set_topmost(topmost);
    }

    fn is_active(&self) -> bool {
        self.focused
    }

    fn focus_search_box(&mut self) {
        self.window_manager.focus();
        self.search_focused = true;
        self.mark_content_changed();
    }
}

impl Default for PopupWidget {
    fn default() -> Self {
        Self::new()
    }
}
