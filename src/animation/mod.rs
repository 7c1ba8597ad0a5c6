mod easing;
mod legacy;
mod modern;
mod tween;

pub use easing::*;
pub use legacy::LegacyAnimation;
pub use modern::ModernAnimation;
pub use tween::Tween;

use std::fmt;
use std::time::Duration;

use crate::geometry::PopupGeometry;
use crate::system::{OsVersion, TaskbarEdge};

/// 内容区域朝任务栏方向偏移的幅度
pub const CONTENT_INSET: f64 = 50.0;

/// 动画方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Enter,
    Exit,
}

/// 内容区域的方向性边距（可以为负）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContentInset {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl ContentInset {
    pub const ZERO: ContentInset = ContentInset {
        left: 0.0,
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
    };

    /// 把内容整体朝任务栏方向推移 magnitude
    pub fn toward(edge: TaskbarEdge, magnitude: f64) -> Self {
        let m = magnitude;
        match edge {
            TaskbarEdge::Top => Self { left: 0.0, top: -m, right: 0.0, bottom: m },
            TaskbarEdge::Right => Self { left: m, top: 0.0, right: -m, bottom: 0.0 },
            TaskbarEdge::Bottom => Self { left: 0.0, top: m, right: 0.0, bottom: -m },
            TaskbarEdge::Left => Self { left: -m, top: 0.0, right: m, bottom: 0.0 },
        }
    }
}

/// 某一时刻需要交给渲染表面的完整状态
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub edge: TaskbarEdge,
    /// 窗口绝对位置和尺寸
    pub geometry: PopupGeometry,
    /// 内容沿垂直于任务栏方向的平移
    pub translation: f64,
    /// 内容边距幅度，见 [`ContentInset::toward`]
    pub inset: f64,
    pub opacity: f64,
}

impl Frame {
    /// 静止状态：无平移、无边距、完全不透明
    pub fn settled(edge: TaskbarEdge, geometry: PopupGeometry) -> Self {
        Self {
            edge,
            geometry,
            translation: 0.0,
            inset: 0.0,
            opacity: 1.0,
        }
    }

    /// 平移量拆分到 x/y 方向
    pub fn translation_xy(&self) -> (f64, f64) {
        if self.edge.is_vertical() {
            (self.translation, 0.0)
        } else {
            (0.0, self.translation)
        }
    }

    pub fn content_inset(&self) -> ContentInset {
        ContentInset::toward(self.edge, self.inset)
    }
}

/// 动画时长换算，禁用动画时所有时长都为零但顺序不变
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationTiming {
    pub enabled: bool,
}

impl AnimationTiming {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn seconds(&self, secs: f64) -> Duration {
        if self.enabled {
            Duration::from_secs_f64(secs)
        } else {
            Duration::ZERO
        }
    }
}

impl Default for AnimationTiming {
    fn default() -> Self {
        Self::new(true)
    }
}

/// 一次进入或退出动画
///
/// 窗口位置、内容平移、内容边距和不透明度各自独立插值；
/// `completes_after` 到达时整个转换完成，之后剩余的插值不再有意义。
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationRun {
    direction: Direction,
    edge: TaskbarEdge,
    base: PopupGeometry,
    easing: Easing,
    position: Tween,
    translation: Tween,
    opacity: Tween,
    inset: Tween,
    completes_after: Duration,
    topmost_at_start: Option<bool>,
    topmost_on_complete: Option<bool>,
    elapsed: Duration,
}

impl AnimationRun {
    /// 以窗口位置插值为主轴创建动画；其余通道默认静止
    pub fn new(direction: Direction, edge: TaskbarEdge, base: PopupGeometry, position: Tween) -> Self {
        Self {
            direction,
            edge,
            base,
            easing: position.easing,
            position,
            translation: Tween::constant(0.0),
            opacity: Tween::constant(1.0),
            inset: Tween::constant(0.0),
            completes_after: position.duration,
            topmost_at_start: None,
            topmost_on_complete: None,
            elapsed: Duration::ZERO,
        }
    }

    pub fn with_translation(mut self, translation: Tween) -> Self {
        self.translation = translation;
        self
    }

    pub fn with_opacity(mut self, opacity: Tween) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_inset(mut self, inset: Tween) -> Self {
        self.inset = inset;
        self
    }

    /// 主缓动曲线（用于描述这次动画）
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn completes_after(mut self, duration: Duration) -> Self {
        self.completes_after = duration;
        self
    }

    /// 所有通道都结束后才算完成
    pub fn completes_when_settled(mut self) -> Self {
        self.completes_after = [
            self.position.duration,
            self.translation.duration,
            self.opacity.duration,
            self.inset.duration,
        ]
        .into_iter()
        .max()
        .unwrap_or(Duration::ZERO);
        self
    }

    pub fn topmost_at_start(mut self, topmost: bool) -> Self {
        self.topmost_at_start = Some(topmost);
        self
    }

    pub fn topmost_on_complete(mut self, topmost: bool) -> Self {
        self.topmost_on_complete = Some(topmost);
        self
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn edge(&self) -> TaskbarEdge {
        self.edge
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// 转换完成所需时间
    pub fn duration(&self) -> Duration {
        self.completes_after
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn start_geometry(&self) -> PopupGeometry {
        self.base.with_axis_position(self.edge, self.position.from)
    }

    pub fn target_geometry(&self) -> PopupGeometry {
        self.base.with_axis_position(self.edge, self.position.to)
    }

    pub fn translation(&self) -> &Tween {
        &self.translation
    }

    pub fn opacity(&self) -> &Tween {
        &self.opacity
    }

    pub fn inset(&self) -> &Tween {
        &self.inset
    }

    pub fn position(&self) -> &Tween {
        &self.position
    }

    pub fn start_topmost(&self) -> Option<bool> {
        self.topmost_at_start
    }

    pub fn complete_topmost(&self) -> Option<bool> {
        self.topmost_on_complete
    }

    /// 指定时刻的帧
    pub fn frame_at(&self, elapsed: Duration) -> Frame {
        Frame {
            edge: self.edge,
            geometry: self
                .base
                .with_axis_position(self.edge, self.position.sample(elapsed)),
            translation: self.translation.sample(elapsed),
            inset: self.inset.sample(elapsed),
            opacity: self.opacity.sample(elapsed),
        }
    }

    /// 当前帧
    pub fn frame(&self) -> Frame {
        self.frame_at(self.elapsed)
    }

    /// 推进一帧并返回新的帧
    pub fn advance(&mut self, delta: Duration) -> Frame {
        self.elapsed = self.elapsed.saturating_add(delta);
        self.frame()
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.completes_after
    }

    /// 从另一个动画的中间帧继续，用于中途反向
    pub fn rebase(&mut self, frame: &Frame) {
        self.position = self
            .position
            .continue_from(frame.geometry.axis_position(self.edge));
        self.translation = self.translation.continue_from(frame.translation);
        self.opacity = self.opacity.continue_from(frame.opacity);
        self.inset = self.inset.continue_from(frame.inset);
        self.elapsed = Duration::ZERO;
    }
}

/// 进入/退出动画策略，按系统能力二选一
pub trait AnimationStrategy: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// 进入动画，target 为最终停靠位置
    fn entrance(&self, target: PopupGeometry, edge: TaskbarEdge, timing: AnimationTiming) -> AnimationRun;

    /// 退出动画，current 为当前停靠位置
    fn exit(&self, current: PopupGeometry, edge: TaskbarEdge, timing: AnimationTiming) -> AnimationRun;
}

/// 根据系统版本选择动画策略
pub fn select_strategy(version: OsVersion) -> Box<dyn AnimationStrategy> {
    if version.supports_position_animation() {
        Box::new(ModernAnimation)
    } else {
        Box::new(LegacyAnimation)
    }
}
