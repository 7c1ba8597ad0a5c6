use crate::geometry::PopupGeometry;
use crate::system::TaskbarEdge;

use super::{
    AnimationRun, AnimationStrategy, AnimationTiming, CONTENT_INSET, Direction, Easing, Tween,
};

/// 内容平移幅度
const TRANSLATE_OFFSET: f64 = 150.0;
/// 平移和淡入淡出时长（秒）
const FADE_SECS: f64 = 0.4;
/// 内容边距收拢时长（秒）
const INSET_SECS: f64 = 0.8;

/// 旧版合成器的动画：窗口本身不动，只对内容做平移、边距和透明度动画
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyAnimation;

impl AnimationStrategy for LegacyAnimation {
    fn name(&self) -> &'static str {
        "legacy"
    }

    fn entrance(&self, target: PopupGeometry, edge: TaskbarEdge, timing: AnimationTiming) -> AnimationRun {
        let fade = timing.seconds(FADE_SECS);
        let easing = Easing::QuinticOut;

        AnimationRun::new(
            Direction::Enter,
            edge,
            target,
            Tween::constant(target.axis_position(edge)),
        )
        .with_translation(Tween::new(edge.sign() * TRANSLATE_OFFSET, 0.0, fade, easing))
        .with_opacity(Tween::new(0.0, 1.0, fade, easing))
        .with_inset(Tween::new(CONTENT_INSET, 0.0, timing.seconds(INSET_SECS), easing))
        .with_easing(easing)
        .completes_when_settled()
    }

    fn exit(&self, current: PopupGeometry, edge: TaskbarEdge, timing: AnimationTiming) -> AnimationRun {
        let fade = timing.seconds(FADE_SECS);
        let easing = Easing::QuinticIn;

        AnimationRun::new(
            Direction::Exit,
            edge,
            current,
            Tween::constant(current.axis_position(edge)),
        )
        .with_translation(Tween::new(0.0, edge.sign() * TRANSLATE_OFFSET, fade, easing))
        .with_opacity(Tween::new(1.0, 0.0, fade, easing))
        .with_inset(Tween::new(0.0, CONTENT_INSET, timing.seconds(INSET_SECS), easing))
        .with_easing(easing)
        // 完全透明后即可真正隐藏窗口
        .completes_after(fade)
    }
}
