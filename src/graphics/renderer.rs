use crate::*;
use crate::animation::Frame;
use crate::errors::{PopupError, PopupResult};

/// 窗口底色
const BACKGROUND: u32 = 0x00202020;
/// 内容面板
const PANEL: u32 = 0x002B2B2B;
/// 搜索框
const SEARCH_BOX: u32 = 0x003A3A3A;
/// 聚焦时搜索框的边框
const ACCENT: u32 = 0x000078D4;
/// 搜索文本占位块
const TEXT: u32 = 0x00E0E0E0;

const SEARCH_BOX_MARGIN: i32 = 16;
const SEARCH_BOX_HEIGHT: i32 = 36;
const GLYPH_WIDTH: i32 = 8;
const GLYPH_HEIGHT: i32 = 14;
const GLYPH_SPACING: i32 = 2;

/// 像素矩形，右下为开区间
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl PixelRect {
    pub fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    /// 裁剪到缓冲区范围
    pub fn clip(self, width: u32, height: u32) -> PixelRect {
        PixelRect {
            x0: self.x0.clamp(0, width as i32),
            y0: self.y0.clamp(0, height as i32),
            x1: self.x1.clamp(0, width as i32),
            y1: self.y1.clamp(0, height as i32),
        }
    }

    /// 向内收缩
    pub fn shrink(self, amount: i32) -> PixelRect {
        PixelRect {
            x0: self.x0 + amount,
            y0: self.y0 + amount,
            x1: self.x1 - amount,
            y1: self.y1 - amount,
        }
    }
}

/// 内容面板在窗口内的矩形：先按方向性边距偏移，再叠加平移
pub fn content_rect(frame: &Frame, width: u32, height: u32) -> PixelRect {
    let inset = frame.content_inset();
    let (tx, ty) = frame.translation_xy();
    PixelRect {
        x0: (inset.left + tx).round() as i32,
        y0: (inset.top + ty).round() as i32,
        x1: (width as f64 - inset.right + tx).round() as i32,
        y1: (height as f64 - inset.bottom + ty).round() as i32,
    }
}

/// 按不透明度把前景色混合到背景色上（0RGB）
pub fn blend(background: u32, foreground: u32, opacity: f64) -> u32 {
    let alpha = opacity.clamp(0.0, 1.0);
    let channel = |shift: u32| {
        let bg = ((background >> shift) & 0xFF) as f64;
        let fg = ((foreground >> shift) & 0xFF) as f64;
        ((bg + (fg - bg) * alpha).round() as u32) << shift
    };
    channel(16) | channel(8) | channel(0)
}

/// 图形渲染器，负责把动画帧画到窗口上
pub struct Renderer {
    surface: Option<Surface<Rc<Window>, Rc<Window>>>,
    context: Option<Context<Rc<Window>>>,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            surface: None,
            context: None,
        }
    }

    /// 初始化渲染器
    pub fn initialize(&mut self, window: &Rc<Window>) -> PopupResult<()> {
        let context = Context::new(window.clone())
            .map_err(|e| PopupError::Render(format!("创建渲染上下文失败: {}", e)))?;

        let surface = Surface::new(&context, window.clone())
            .map_err(|e| PopupError::Render(format!("创建渲染表面失败: {}", e)))?;

        self.context = Some(context);
        self.surface = Some(surface);

        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.surface.is_some()
    }

    /// 绘制一帧
    pub fn draw_frame(
        &mut self,
        frame: &Frame,
        search_term: &str,
        search_focused: bool,
        window_width: u32,
        window_height: u32,
    ) -> PopupResult<()> {
        let surface = self
            .surface
            .as_mut()
            .ok_or_else(|| PopupError::Render("渲染表面未初始化".to_string()))?;

        let (Some(width), Some(height)) = (NonZeroU32::new(window_width), NonZeroU32::new(window_height))
        else {
            return Ok(());
        };

        surface
            .resize(width, height)
            .map_err(|e| PopupError::Render(format!("调整缓冲区失败: {}", e)))?;

        let mut buffer = surface
            .buffer_mut()
            .map_err(|e| PopupError::Render(format!("获取缓冲区失败: {}", e)))?;

        Self::paint(
            &mut buffer,
            frame,
            search_term,
            search_focused,
            window_width,
            window_height,
        );

        buffer
            .present()
            .map_err(|e| PopupError::Render(format!("呈现缓冲区失败: {}", e)))?;

        Ok(())
    }

    /// 把整帧画进缓冲区
    pub fn paint(
        buffer: &mut [u32],
        frame: &Frame,
        search_term: &str,
        search_focused: bool,
        window_width: u32,
        window_height: u32,
    ) {
        buffer.fill(BACKGROUND);

        let opacity = frame.opacity;
        let panel = content_rect(frame, window_width, window_height);
        Self::fill_rect(buffer, panel, blend(BACKGROUND, PANEL, opacity), window_width, window_height);

        let search_box = PixelRect {
            x0: panel.x0 + SEARCH_BOX_MARGIN,
            y0: panel.y0 + SEARCH_BOX_MARGIN,
            x1: panel.x1 - SEARCH_BOX_MARGIN,
            y1: panel.y0 + SEARCH_BOX_MARGIN + SEARCH_BOX_HEIGHT,
        };
        if search_focused {
            Self::fill_rect(buffer, search_box, blend(BACKGROUND, ACCENT, opacity), window_width, window_height);
            Self::fill_rect(
                buffer,
                search_box.shrink(2),
                blend(BACKGROUND, SEARCH_BOX, opacity),
                window_width,
                window_height,
            );
        } else {
            Self::fill_rect(buffer, search_box, blend(BACKGROUND, SEARCH_BOX, opacity), window_width, window_height);
        }

        // 不渲染字形，每个字符画一个占位块
        let glyph_top = search_box.y0 + (SEARCH_BOX_HEIGHT - GLYPH_HEIGHT) / 2;
        let mut glyph_left = search_box.x0 + SEARCH_BOX_MARGIN / 2;
        let text_color = blend(BACKGROUND, TEXT, opacity);
        for _ in search_term.chars() {
            if glyph_left + GLYPH_WIDTH > search_box.x1 - SEARCH_BOX_MARGIN / 2 {
                break;
            }
            let glyph = PixelRect {
                x0: glyph_left,
                y0: glyph_top,
                x1: glyph_left + GLYPH_WIDTH,
                y1: glyph_top + GLYPH_HEIGHT,
            };
            Self::fill_rect(buffer, glyph, text_color, window_width, window_height);
            glyph_left += GLYPH_WIDTH + GLYPH_SPACING;
        }
    }

    fn fill_rect(buffer: &mut [u32], rect: PixelRect, color: u32, window_width: u32, window_height: u32) {
        let rect = rect.clip(window_width, window_height);
        if rect.is_empty() {
            return;
        }
        for y in rect.y0..rect.y1 {
            let row = (y as u32 * window_width) as usize;
            let start = row + rect.x0 as usize;
            let end = row + rect.x1 as usize;
            if end <= buffer.len() {
                buffer[start..end].fill(color);
            }
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PopupGeometry;
    use crate::system::TaskbarEdge;

    fn frame(edge: TaskbarEdge) -> Frame {
        Frame::settled(edge, PopupGeometry::new(0.0, 0.0, 200.0, 100.0))
    }

    #[test]
    fn test_settled_content_fills_window() {
        let rect = content_rect(&frame(TaskbarEdge::Bottom), 200, 100);
        assert_eq!(rect, PixelRect { x0: 0, y0: 0, x1: 200, y1: 100 });
    }

    #[test]
    fn test_content_shifts_toward_taskbar() {
        let mut bottom = frame(TaskbarEdge::Bottom);
        bottom.inset = 50.0;
        assert_eq!(content_rect(&bottom, 200, 100), PixelRect { x0: 0, y0: 50, x1: 200, y1: 150 });

        let mut left = frame(TaskbarEdge::Left);
        left.translation = -30.0;
        assert_eq!(content_rect(&left, 200, 100), PixelRect { x0: -30, y0: 0, x1: 170, y1: 100 });
    }

    #[test]
    fn test_blend() {
        assert_eq!(blend(0x000000, 0xFFFFFF, 0.0), 0x000000);
        assert_eq!(blend(0x000000, 0xFFFFFF, 1.0), 0xFFFFFF);
        assert_eq!(blend(0x000000, 0x0000FF, 0.5), 0x000080);
        assert_eq!(blend(0x202020, 0x202020, 0.3), 0x202020);
    }

    #[test]
    fn test_clip() {
        let rect = PixelRect { x0: -10, y0: 90, x1: 50, y1: 140 }.clip(200, 100);
        assert_eq!(rect, PixelRect { x0: 0, y0: 90, x1: 50, y1: 100 });
        assert!(PixelRect { x0: 250, y0: 0, x1: 300, y1: 10 }.clip(200, 100).is_empty());
    }

    #[test]
    fn test_paint_transparent_frame_shows_background_only() {
        let mut settled = frame(TaskbarEdge::Bottom);
        settled.opacity = 0.0;
        let mut buffer = vec![0u32; 200 * 100];
        Renderer::paint(&mut buffer, &settled, "abc", true, 200, 100);
        assert!(buffer.iter().all(|&pixel| pixel == BACKGROUND));
    }

    #[test]
    fn test_paint_draws_panel_and_search_text() {
        let mut buffer = vec![0u32; 200 * 100];
        Renderer::paint(&mut buffer, &frame(TaskbarEdge::Bottom), "ab", false, 200, 100);

        let pixel = |x: usize, y: usize| buffer[y * 200 + x];
        assert_eq!(pixel(2, 2), PANEL);
        assert_eq!(pixel(20, 18), SEARCH_BOX);
        // 第一个字符块位于搜索框内部
        assert_eq!(pixel(26, 30), TEXT);
    }
}
