use crate::system::{TaskbarEdge, TaskbarGeometry};

/// 弹出窗口在任一方向上的最小可用尺寸
pub const MIN_POPUP_DIMENSION: f64 = 300.0;

/// 屏幕尺寸（逻辑单位）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenSize {
    pub width: f64,
    pub height: f64,
}

impl ScreenSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// 沿任务栏方向的屏幕长度
    pub fn extent_along(&self, edge: TaskbarEdge) -> f64 {
        if edge.is_vertical() { self.height } else { self.width }
    }
}

/// 弹出窗口几何信息
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PopupGeometry {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PopupGeometry {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// 垂直于任务栏方向上的坐标（左右任务栏取 left，上下任务栏取 top）
    pub fn axis_position(&self, edge: TaskbarEdge) -> f64 {
        if edge.is_vertical() { self.left } else { self.top }
    }

    /// 垂直于任务栏方向上的尺寸
    pub fn axis_extent(&self, edge: TaskbarEdge) -> f64 {
        if edge.is_vertical() { self.width } else { self.height }
    }

    /// 替换垂直于任务栏方向上的坐标
    pub fn with_axis_position(mut self, edge: TaskbarEdge, position: f64) -> Self {
        if edge.is_vertical() {
            self.left = position;
        } else {
            self.top = position;
        }
        self
    }

    /// 两个矩形是否有面积重叠（仅接触边界不算重叠）
    pub fn intersects(&self, other: &PopupGeometry) -> bool {
        self.left < other.right()
            && other.left < self.right()
            && self.top < other.bottom()
            && other.top < self.bottom()
    }
}

/// 任务栏在屏幕上占用的矩形区域
pub fn taskbar_band(screen: ScreenSize, taskbar: TaskbarGeometry) -> PopupGeometry {
    let t = taskbar.thickness;
    match taskbar.edge {
        TaskbarEdge::Top => PopupGeometry::new(0.0, 0.0, screen.width, t),
        TaskbarEdge::Bottom => PopupGeometry::new(0.0, screen.height - t, screen.width, t),
        TaskbarEdge::Left => PopupGeometry::new(0.0, 0.0, t, screen.height),
        TaskbarEdge::Right => PopupGeometry::new(screen.width - t, 0.0, t, screen.height),
    }
}

/// 扣除任务栏后弹出窗口可用的宽高
pub fn available_size(screen: ScreenSize, taskbar: TaskbarGeometry) -> (f64, f64) {
    (
        screen.width - taskbar.reserved_width(),
        screen.height - taskbar.reserved_height(),
    )
}

/// 将请求尺寸限制在 [300, available] 之内
///
/// 可用空间不足 300 时以最小尺寸为准。
pub fn clamp_dimension(requested: f64, available: f64) -> f64 {
    requested.min(available).max(MIN_POPUP_DIMENSION)
}

/// 计算弹出窗口几何信息，沿任务栏方向贴靠在屏幕末端（右侧或底部）
pub fn compute(
    screen_width: f64,
    screen_height: f64,
    taskbar: TaskbarGeometry,
    requested_width: f64,
    requested_height: f64,
) -> PopupGeometry {
    let screen = ScreenSize::new(screen_width, screen_height);
    let leading = screen.extent_along(taskbar.edge);
    compute_at(screen, taskbar, requested_width, requested_height, leading)
}

/// 计算弹出窗口几何信息
///
/// `leading` 是弹出窗口沿任务栏方向的起始坐标（通常取工具栏按钮位置），
/// 会被限制在屏幕范围内。垂直于任务栏的一侧始终紧贴任务栏内边缘。
pub fn compute_at(
    screen: ScreenSize,
    taskbar: TaskbarGeometry,
    requested_width: f64,
    requested_height: f64,
    leading: f64,
) -> PopupGeometry {
    let (available_width, available_height) = available_size(screen, taskbar);
    let width = clamp_dimension(requested_width, available_width);
    let height = clamp_dimension(requested_height, available_height);
    let t = taskbar.thickness;

    let along_limit = |extent: f64, size: f64| leading.min(extent - size).max(0.0);

    let (left, top) = match taskbar.edge {
        TaskbarEdge::Bottom => (along_limit(screen.width, width), screen.height - t - height),
        TaskbarEdge::Top => (along_limit(screen.width, width), t),
        TaskbarEdge::Left => (t, along_limit(screen.height, height)),
        TaskbarEdge::Right => (screen.width - t - width, along_limit(screen.height, height)),
    };

    PopupGeometry::new(left, top, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EDGES: [TaskbarEdge; 4] = [
        TaskbarEdge::Top,
        TaskbarEdge::Bottom,
        TaskbarEdge::Left,
        TaskbarEdge::Right,
    ];

    #[test]
    fn test_bottom_taskbar_scenario() {
        let taskbar = TaskbarGeometry::new(TaskbarEdge::Bottom, 48.0);
        let geometry = compute(1920.0, 1080.0, taskbar, 400.0, 500.0);

        assert_eq!(geometry.width, 400.0);
        assert_eq!(geometry.height, 500.0);
        assert_eq!(geometry.bottom(), 1032.0);
        assert_eq!(geometry.right(), 1920.0);
    }

    #[test]
    fn test_left_taskbar_clamps_width() {
        let taskbar = TaskbarGeometry::new(TaskbarEdge::Left, 40.0);
        let geometry = compute(800.0, 600.0, taskbar, 1000.0, 500.0);

        assert_eq!(geometry.width, 760.0);
        assert_eq!(geometry.left, 40.0);
        assert_eq!(geometry.height, 500.0);
    }

    #[test]
    fn test_minimum_dimension() {
        let taskbar = TaskbarGeometry::new(TaskbarEdge::Top, 30.0);
        let geometry = compute(1280.0, 720.0, taskbar, 10.0, 50.0);

        assert_eq!(geometry.width, MIN_POPUP_DIMENSION);
        assert_eq!(geometry.height, MIN_POPUP_DIMENSION);
        assert_eq!(geometry.top, 30.0);
    }

    #[test]
    fn test_clamping_invariant_holds_for_every_edge() {
        let screens = [(300.0, 300.0), (800.0, 600.0), (1920.0, 1080.0), (1080.0, 1920.0)];
        let requests = [(0.0, 0.0), (300.0, 450.0), (640.0, 2000.0), (5000.0, 5000.0)];

        for &(sw, sh) in &screens {
            for edge in EDGES {
                let axis = if edge.is_vertical() { sw } else { sh };
                let max_thickness = axis - MIN_POPUP_DIMENSION;
                for thickness in [0.0, 24.0, 48.0, max_thickness] {
                    if thickness > max_thickness {
                        continue;
                    }
                    let taskbar = TaskbarGeometry::new(edge, thickness);
                    let band = taskbar_band(ScreenSize::new(sw, sh), taskbar);
                    for &(rw, rh) in &requests {
                        let g = compute(sw, sh, taskbar, rw, rh);
                        assert!(g.width >= MIN_POPUP_DIMENSION && g.width <= sw);
                        assert!(g.height >= MIN_POPUP_DIMENSION && g.height <= sh);
                        assert!(g.left >= 0.0 && g.right() <= sw, "{edge:?} {g:?}");
                        assert!(g.top >= 0.0 && g.bottom() <= sh, "{edge:?} {g:?}");
                        assert!(!g.intersects(&band), "{edge:?} {g:?} overlaps {band:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_popup_is_flush_with_taskbar() {
        let screen = ScreenSize::new(1920.0, 1080.0);
        for edge in EDGES {
            let taskbar = TaskbarGeometry::new(edge, 48.0);
            let g = compute(screen.width, screen.height, taskbar, 500.0, 500.0);
            let band = taskbar_band(screen, taskbar);
            let touching = match edge {
                TaskbarEdge::Top => g.top == band.bottom(),
                TaskbarEdge::Bottom => g.bottom() == band.top,
                TaskbarEdge::Left => g.left == band.right(),
                TaskbarEdge::Right => g.right() == band.left,
            };
            assert!(touching, "{edge:?}: {g:?}");
        }
    }

    #[test]
    fn test_compute_at_keeps_leading_inside_screen() {
        let screen = ScreenSize::new(1920.0, 1080.0);
        let taskbar = TaskbarGeometry::new(TaskbarEdge::Bottom, 40.0);

        let g = compute_at(screen, taskbar, 600.0, 400.0, 200.0);
        assert_eq!(g.left, 200.0);

        let g = compute_at(screen, taskbar, 600.0, 400.0, 1800.0);
        assert_eq!(g.right(), 1920.0);

        let g = compute_at(screen, taskbar, 600.0, 400.0, -50.0);
        assert_eq!(g.left, 0.0);
    }

    #[test]
    fn test_compute_is_deterministic() {
        let taskbar = TaskbarGeometry::new(TaskbarEdge::Right, 62.0);
        let a = compute(2560.0, 1440.0, taskbar, 720.0, 900.0);
        let b = compute(2560.0, 1440.0, taskbar, 720.0, 900.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_axis_helpers() {
        let g = PopupGeometry::new(10.0, 20.0, 300.0, 400.0);
        assert_eq!(g.axis_position(TaskbarEdge::Left), 10.0);
        assert_eq!(g.axis_position(TaskbarEdge::Bottom), 20.0);
        assert_eq!(g.axis_extent(TaskbarEdge::Right), 300.0);
        assert_eq!(g.axis_extent(TaskbarEdge::Top), 400.0);
        assert_eq!(g.with_axis_position(TaskbarEdge::Right, 99.0).left, 99.0);
        assert_eq!(g.with_axis_position(TaskbarEdge::Top, 99.0).top, 99.0);
    }
}
