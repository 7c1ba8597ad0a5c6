use crate::geometry::PopupGeometry;
use crate::system::TaskbarEdge;

use super::{
    AnimationRun, AnimationStrategy, AnimationTiming, CONTENT_INSET, Direction, Easing, Tween,
};

/// 窗口位置动画时长（秒）
const POSITION_SECS: f64 = 0.2;
/// 进入时内容边距动画时长（秒）
const ENTER_CONTENT_SECS: f64 = 0.4;
/// 退出时内容边距动画时长（秒）
const EXIT_CONTENT_SECS: f64 = 0.5;

/// 新版合成器的动画：直接移动窗口，从任务栏后面滑入滑出
#[derive(Debug, Clone, Copy, Default)]
pub struct ModernAnimation;

impl ModernAnimation {
    /// 完全藏到任务栏后面时的坐标
    fn hidden_position(geometry: PopupGeometry, edge: TaskbarEdge) -> f64 {
        geometry.axis_position(edge) + edge.sign() * geometry.axis_extent(edge)
    }
}

impl AnimationStrategy for ModernAnimation {
    fn name(&self) -> &'static str {
        "modern"
    }

    fn entrance(&self, target: PopupGeometry, edge: TaskbarEdge, timing: AnimationTiming) -> AnimationRun {
        let position = Tween::new(
            Self::hidden_position(target, edge),
            target.axis_position(edge),
            timing.seconds(POSITION_SECS),
            Easing::QuadraticOut,
        );

        AnimationRun::new(Direction::Enter, edge, target, position)
            .with_inset(Tween::new(
                CONTENT_INSET,
                0.0,
                timing.seconds(ENTER_CONTENT_SECS),
                Easing::QuinticOut,
            ))
            .completes_when_settled()
            // 保持在任务栏之上，直到退出动画把它移走
            .topmost_on_complete(true)
    }

    fn exit(&self, current: PopupGeometry, edge: TaskbarEdge, timing: AnimationTiming) -> AnimationRun {
        let position = Tween::new(
            current.axis_position(edge),
            Self::hidden_position(current, edge),
            timing.seconds(POSITION_SECS),
            Easing::QuadraticIn,
        );

        // 位置动画结束即真正隐藏，内容动画的剩余部分不可见
        AnimationRun::new(Direction::Exit, edge, current, position)
            .with_inset(Tween::new(
                0.0,
                CONTENT_INSET,
                timing.seconds(EXIT_CONTENT_SECS),
                Easing::QuinticIn,
            ))
            // 退出时滑到任务栏后面
            .topmost_at_start(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const EDGES: [TaskbarEdge; 4] = [
        TaskbarEdge::Top,
        TaskbarEdge::Bottom,
        TaskbarEdge::Left,
        TaskbarEdge::Right,
    ];

    fn geometry() -> PopupGeometry {
        PopupGeometry::new(1220.0, 432.0, 700.0, 600.0)
    }

    #[test]
    fn test_right_edge_slides_by_width() {
        let timing = AnimationTiming::default();
        let target = geometry();

        let entrance = ModernAnimation.entrance(target, TaskbarEdge::Right, timing);
        assert_eq!(entrance.start_geometry().left - target.left, 700.0);
        assert_eq!(entrance.target_geometry(), target);

        let exit = ModernAnimation.exit(target, TaskbarEdge::Right, timing);
        assert_eq!(exit.start_geometry(), target);
        assert_eq!(exit.target_geometry().left - target.left, 700.0);
    }

    #[test]
    fn test_entrance_and_exit_mirror_for_every_edge() {
        let timing = AnimationTiming::default();
        let target = geometry();
        for edge in EDGES {
            let entrance = ModernAnimation.entrance(target, edge, timing);
            let exit = ModernAnimation.exit(target, edge, timing);

            let enter_offset = entrance.start_geometry().axis_position(edge) - target.axis_position(edge);
            let exit_offset = exit.target_geometry().axis_position(edge) - target.axis_position(edge);

            assert_eq!(enter_offset, exit_offset, "{edge:?}");
            assert_eq!(enter_offset.signum(), edge.sign(), "{edge:?}");
            assert_eq!(enter_offset.abs(), target.axis_extent(edge), "{edge:?}");
        }
    }

    #[test]
    fn test_topmost_cues() {
        let timing = AnimationTiming::default();
        let entrance = ModernAnimation.entrance(geometry(), TaskbarEdge::Bottom, timing);
        assert_eq!(entrance.start_topmost(), None);
        assert_eq!(entrance.complete_topmost(), Some(true));

        let exit = ModernAnimation.exit(geometry(), TaskbarEdge::Bottom, timing);
        assert_eq!(exit.start_topmost(), Some(false));
        assert_eq!(exit.complete_topmost(), None);
    }

    #[test]
    fn test_durations_and_easing() {
        let timing = AnimationTiming::default();
        let entrance = ModernAnimation.entrance(geometry(), TaskbarEdge::Bottom, timing);
        assert_eq!(entrance.position().duration, Duration::from_millis(200));
        assert_eq!(entrance.easing(), Easing::QuadraticOut);
        assert_eq!(entrance.duration(), Duration::from_millis(400));

        let exit = ModernAnimation.exit(geometry(), TaskbarEdge::Bottom, timing);
        assert_eq!(exit.easing(), Easing::QuadraticIn);
        // 真正隐藏发生在位置动画结束时
        assert_eq!(exit.duration(), Duration::from_millis(200));
        assert_eq!(exit.inset().duration, Duration::from_millis(500));
    }

    #[test]
    fn test_opacity_stays_opaque() {
        let run = ModernAnimation.entrance(geometry(), TaskbarEdge::Left, AnimationTiming::default());
        assert_eq!(run.frame_at(Duration::ZERO).opacity, 1.0);
        assert_eq!(run.frame_at(Duration::ZERO).translation, 0.0);
    }
}
