pub mod animation;
pub mod app;
pub mod bootstrap;
pub mod config;
pub mod errors;
pub mod geometry;
pub mod graphics;
pub mod lifecycle;
pub mod system;
pub mod widget;
pub mod window;

// 导出主要的公共类型
pub use app::App;
pub use config::{ActivationMode, PopupConfig};
pub use errors::{PopupError, PopupResult};
pub use lifecycle::{FrameClock, LifecycleBuilder, LifecycleController, PopupSurface, VisibilityState};
pub use widget::PopupWidget;

// 重新导出 winit 相关类型
pub use winit::{
    application::ApplicationHandler,
    dpi::{PhysicalPosition, PhysicalSize},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    raw_window_handle::{HasWindowHandle, RawWindowHandle},
    window::{Window, WindowId, WindowLevel},
};

// 重新导出其他常用类型
pub use softbuffer::{Context, Surface};
pub use std::{num::NonZeroU32, rc::Rc, time::{Duration, Instant}};
