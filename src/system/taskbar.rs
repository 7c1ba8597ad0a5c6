use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info};

use crate::geometry::ScreenSize;
use crate::system::{EventDispatcher, PopupEvent};

/// 任务栏停靠的屏幕边
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TaskbarEdge {
    Top,
    #[default]
    Bottom,
    Left,
    Right,
}

impl TaskbarEdge {
    /// 左右两侧的任务栏是竖直的
    pub fn is_vertical(self) -> bool {
        matches!(self, TaskbarEdge::Left | TaskbarEdge::Right)
    }

    /// 动画位移方向：朝右/下为正，朝左/上为负
    pub fn sign(self) -> f64 {
        match self {
            TaskbarEdge::Right | TaskbarEdge::Bottom => 1.0,
            TaskbarEdge::Left | TaskbarEdge::Top => -1.0,
        }
    }
}

/// 任务栏当前占用的屏幕空间
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TaskbarGeometry {
    pub edge: TaskbarEdge,
    /// 垂直于停靠边方向上的厚度
    pub thickness: f64,
}

impl TaskbarGeometry {
    pub fn new(edge: TaskbarEdge, thickness: f64) -> Self {
        Self {
            edge,
            thickness: thickness.max(0.0),
        }
    }

    /// 任务栏在水平方向上占用的宽度（仅左右任务栏）
    pub fn reserved_width(&self) -> f64 {
        if self.edge.is_vertical() { self.thickness } else { 0.0 }
    }

    /// 任务栏在竖直方向上占用的高度（仅上下任务栏）
    pub fn reserved_height(&self) -> f64 {
        if self.edge.is_vertical() { 0.0 } else { self.thickness }
    }

    /// 根据任务栏窗口矩形推导停靠边和厚度
    pub fn from_rect(left: f64, top: f64, right: f64, bottom: f64, screen: ScreenSize) -> Self {
        let width = right - left;
        let height = bottom - top;

        if width >= height {
            let edge = if top <= 0.0 && bottom < screen.height {
                TaskbarEdge::Top
            } else {
                TaskbarEdge::Bottom
            };
            Self::new(edge, height)
        } else {
            let edge = if left <= 0.0 && right < screen.width {
                TaskbarEdge::Left
            } else {
                TaskbarEdge::Right
            };
            Self::new(edge, width)
        }
    }
}

/// 任务栏监视器
///
/// 唯一的写入方。最新的几何信息通过 watch 通道以快照形式交给读取方，
/// 因此可以放在后台线程里运行。
#[derive(Debug)]
pub struct TaskbarMonitor {
    sender: watch::Sender<TaskbarGeometry>,
    dispatcher: EventDispatcher,
}

impl TaskbarMonitor {
    /// 创建监视器，初始几何信息为底部、厚度 0
    pub fn new(dispatcher: EventDispatcher) -> (Self, watch::Receiver<TaskbarGeometry>) {
        Self::with_initial(TaskbarGeometry::default(), dispatcher)
    }

    pub fn with_initial(
        initial: TaskbarGeometry,
        dispatcher: EventDispatcher,
    ) -> (Self, watch::Receiver<TaskbarGeometry>) {
        let (sender, receiver) = watch::channel(initial);
        (Self { sender, dispatcher }, receiver)
    }

    /// 当前任务栏几何信息
    pub fn current(&self) -> TaskbarGeometry {
        *self.sender.borrow()
    }

    /// 宿主报告停靠边变化
    ///
    /// 同时重新发布尺寸变化事件，让依赖方基于新的停靠边重新计算布局。
    pub fn on_edge_changed(&self, edge: TaskbarEdge) {
        self.sender.send_modify(|geometry| geometry.edge = edge);
        info!("任务栏停靠边变化: {:?}", edge);
        self.dispatcher.publish(PopupEvent::TaskbarEdgeChanged(edge));
        self.dispatcher.publish(PopupEvent::TaskbarSizeChanged(self.current()));
    }

    /// 宿主报告厚度变化
    pub fn on_size_changed(&self, thickness: f64) {
        self.sender.send_modify(|geometry| geometry.thickness = thickness.max(0.0));
        debug!("任务栏厚度变化: {}", thickness);
        self.dispatcher.publish(PopupEvent::TaskbarSizeChanged(self.current()));
    }

    /// 一次性更新停靠边和厚度，只有真正变化时才发布事件
    pub fn update(&self, geometry: TaskbarGeometry) -> bool {
        let previous = self.current();
        let changed = self.sender.send_if_modified(|current| {
            if *current == geometry {
                false
            } else {
                *current = geometry;
                true
            }
        });

        if changed {
            info!("任务栏几何信息变化: {:?} -> {:?}", previous, geometry);
            if previous.edge != geometry.edge {
                self.dispatcher.publish(PopupEvent::TaskbarEdgeChanged(geometry.edge));
            }
            self.dispatcher.publish(PopupEvent::TaskbarSizeChanged(geometry));
        }

        changed
    }

    /// 通过探测函数读取一次任务栏信息
    pub fn poll<F>(&self, probe: F) -> bool
    where
        F: FnOnce() -> Option<TaskbarGeometry>,
    {
        match probe() {
            Some(geometry) => self.update(geometry),
            None => false,
        }
    }
}

/// 后台轮询任务栏位置（在 tokio 运行时中执行，直到任务被取消）
pub async fn watch_taskbar<F>(monitor: Arc<TaskbarMonitor>, interval: Duration, probe: F)
where
    F: Fn() -> Option<TaskbarGeometry>,
{
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        monitor.poll(&probe);
    }
}

/// 查找任务栏窗口并推导其几何信息
#[cfg(windows)]
pub fn probe_taskbar() -> Option<TaskbarGeometry> {
    use windows::Win32::Foundation::RECT;
    use windows::Win32::UI::WindowsAndMessaging::{
        FindWindowW, GetSystemMetrics, GetWindowRect, SM_CXSCREEN, SM_CYSCREEN,
    };
    use windows::core::w;

    // Windows 10/11 主任务栏
    let hwnd = unsafe { FindWindowW(w!("Shell_TrayWnd"), None) }.ok()?;
    if hwnd.0.is_null() {
        return None;
    }

    let mut rect = RECT::default();
    unsafe { GetWindowRect(hwnd, &mut rect) }.ok()?;

    let screen = unsafe {
        ScreenSize::new(
            GetSystemMetrics(SM_CXSCREEN) as f64,
            GetSystemMetrics(SM_CYSCREEN) as f64,
        )
    };

    Some(TaskbarGeometry::from_rect(
        rect.left as f64,
        rect.top as f64,
        rect.right as f64,
        rect.bottom as f64,
        screen,
    ))
}

/// 非 Windows 平台没有可探测的任务栏
#[cfg(not(windows))]
pub fn probe_taskbar() -> Option<TaskbarGeometry> {
    None
}
