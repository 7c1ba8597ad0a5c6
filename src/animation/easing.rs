//! 缓动曲线

/// 线性插值
#[inline]
pub fn lerp(start: f64, end: f64, t: f64) -> f64 {
    start + (end - start) * t
}

/// 动画使用的缓动曲线
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    QuadraticIn,
    QuadraticOut,
    QuinticIn,
    QuinticOut,
}

impl Easing {
    /// 计算进度 t（0..=1）对应的缓动值
    #[inline]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadraticIn => t.powi(2),
            Easing::QuadraticOut => 1.0 - (1.0 - t).powi(2),
            Easing::QuinticIn => t.powi(5),
            Easing::QuinticOut => 1.0 - (1.0 - t).powi(5),
        }
    }

    /// 与之镜像的曲线（ease-out <-> ease-in）
    pub fn mirrored(self) -> Easing {
        match self {
            Easing::Linear => Easing::Linear,
            Easing::QuadraticIn => Easing::QuadraticOut,
            Easing::QuadraticOut => Easing::QuadraticIn,
            Easing::QuinticIn => Easing::QuinticOut,
            Easing::QuinticOut => Easing::QuinticIn,
        }
    }
}
