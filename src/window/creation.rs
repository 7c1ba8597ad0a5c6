use crate::*;
use crate::errors::{PopupError, PopupResult};

/// 创建弹出窗口，创建时保持隐藏
pub fn create_popup_window(
    event_loop: &ActiveEventLoop,
    width: u32,
    height: u32,
) -> PopupResult<Rc<Window>> {
    let window_attributes = Window::default_attributes()
        .with_title("Taskbar Search")
        .with_inner_size(PhysicalSize::new(width, height))
        .with_decorations(false)
        .with_transparent(true)
        .with_window_level(WindowLevel::Normal)
        .with_resizable(true)
        .with_visible(false);

    let window = event_loop
        .create_window(window_attributes)
        .map_err(|e| PopupError::Window(format!("创建窗口失败: {}", e)))?;

    hide_from_taskbar(&window);

    Ok(Rc::new(window))
}

/// 获取窗口的 Windows 句柄
#[cfg(windows)]
pub fn get_window_hwnd(window: &Window) -> Option<windows::Win32::Foundation::HWND> {
    use windows::Win32::Foundation::HWND;

    if let Ok(handle) = window.window_handle() {
        if let RawWindowHandle::Win32(win32_handle) = handle.as_raw() {
            return Some(HWND(win32_handle.hwnd.get() as *mut _));
        }
    }
    None
}

/// 不在任务栏上显示窗口按钮
#[cfg(windows)]
pub fn hide_from_taskbar(window: &Window) {
    use windows::Win32::UI::WindowsAndMessaging::{
        GWL_EXSTYLE, GetWindowLongW, SetWindowLongW, WS_EX_TOOLWINDOW,
    };

    if let Some(hwnd) = get_window_hwnd(window) {
        unsafe {
            let ex_style = GetWindowLongW(hwnd, GWL_EXSTYLE) as u32 | WS_EX_TOOLWINDOW.0;
            // 窗口此时尚未显示，样式会在第一次显示时生效
            SetWindowLongW(hwnd, GWL_EXSTYLE, ex_style as i32);
        }
    }
}

#[cfg(not(windows))]
pub fn hide_from_taskbar(_window: &Window) {}
