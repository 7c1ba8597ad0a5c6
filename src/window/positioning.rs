use crate::*;
use crate::geometry::PopupGeometry;

#[cfg(windows)]
use super::get_window_hwnd;

/// 四舍五入到整数像素：(x, y, width, height)
pub fn pixel_rect(geometry: &PopupGeometry) -> (i32, i32, u32, u32) {
    (
        geometry.left.round() as i32,
        geometry.top.round() as i32,
        geometry.width.round().max(1.0) as u32,
        geometry.height.round().max(1.0) as u32,
    )
}

/// 设置窗口位置和尺寸，不改变 Z 序
pub fn set_window_position(window: &Window, geometry: &PopupGeometry) {
    let (x, y, width, height) = pixel_rect(geometry);

    // 一次 SetWindowPos 同步完成移动和缩放
    #[cfg(windows)]
    if let Some(hwnd) = get_window_hwnd(window) {
        use windows::Win32::UI::WindowsAndMessaging::{
            SWP_NOACTIVATE, SWP_NOZORDER, SetWindowPos,
        };

        unsafe {
            let _ = SetWindowPos(
                hwnd,
                None,
                x,
                y,
                width as i32,
                height as i32,
                SWP_NOZORDER | SWP_NOACTIVATE,
            );
        }
        return;
    }

    window.set_outer_position(PhysicalPosition::new(x, y));
    let _ = window.request_inner_size(PhysicalSize::new(width, height));
}

/// 置顶或取消置顶
pub fn set_window_topmost(window: &Window, topmost: bool) {
    #[cfg(windows)]
    if let Some(hwnd) = get_window_hwnd(window) {
        use windows::Win32::UI::WindowsAndMessaging::{
            HWND_NOTOPMOST, HWND_TOPMOST, SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOSIZE, SetWindowPos,
        };

        let insert_after = if topmost { HWND_TOPMOST } else { HWND_NOTOPMOST };
        unsafe {
            let _ = SetWindowPos(
                hwnd,
                Some(insert_after),
                0,
                0,
                0,
                0,
                SWP_NOMOVE | SWP_NOSIZE | SWP_NOACTIVATE,
            );
        }
        return;
    }

    let level = if topmost { WindowLevel::AlwaysOnTop } else { WindowLevel::Normal };
    window.set_window_level(level);
}

/// 显示窗口，activate 为 false 时不抢占焦点
pub fn show_window(window: &Window, activate: bool) {
    #[cfg(windows)]
    if let Some(hwnd) = get_window_hwnd(window) {
        use windows::Win32::UI::WindowsAndMessaging::{SW_SHOW, SW_SHOWNOACTIVATE, ShowWindow};

        let command = if activate { SW_SHOW } else { SW_SHOWNOACTIVATE };
        unsafe {
            let _ = ShowWindow(hwnd, command);
        }
        return;
    }

    window.set_visible(true);
    if activate {
        window.focus_window();
    }
}

pub fn hide_window(window: &Window) {
    window.set_visible(false);
}
