use std::time::Duration;

use super::easing::{Easing, lerp};

/// 单个数值的定时插值
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: f64,
    pub to: f64,
    pub duration: Duration,
    pub easing: Easing,
}

impl Tween {
    pub fn new(from: f64, to: f64, duration: Duration, easing: Easing) -> Self {
        Self { from, to, duration, easing }
    }

    /// 不随时间变化的值
    pub fn constant(value: f64) -> Self {
        Self::new(value, value, Duration::ZERO, Easing::Linear)
    }

    /// 经过 elapsed 之后的值，结束后精确返回终值
    pub fn sample(&self, elapsed: Duration) -> f64 {
        if elapsed >= self.duration {
            return self.to;
        }
        let progress = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        lerp(self.from, self.to, self.easing.apply(progress))
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }

    /// 从给定的当前值继续插值到原终值
    pub fn continue_from(self, value: f64) -> Self {
        Self { from: value, ..self }
    }
}
