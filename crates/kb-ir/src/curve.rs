//! Segment shapes for envelope generators.

use core::f32::consts::FRAC_PI_2;

/// How a segment travels from its start value to its end value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CurveKind {
    /// Hold the start value for the whole segment.
    Step,
    /// Straight line.
    Linear,
    /// Sine quarter-wave: fast start, gentle landing.
    SineQuarter,
    /// Exponential curve. 0.0 = linear, >0 = starts slow, <0 = starts fast.
    Exponential(f32),
}

impl CurveKind {
    /// Map segment progress `t` (0.0..=1.0) onto the curve's 0.0..=1.0 factor.
    pub fn factor(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            CurveKind::Step => 0.0,
            CurveKind::Linear => t,
            CurveKind::SineQuarter => libm::sinf(t * FRAC_PI_2),
            CurveKind::Exponential(k) => {
                if libm::fabsf(k) < 1e-6 {
                    t
                } else {
                    (libm::expf(k * t) - 1.0) / (libm::expf(k) - 1.0)
                }
            }
        }
    }
}

/// Interpolate between two values using the given curve at position `t` (0.0..1.0).
pub fn interpolate(curve: CurveKind, from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * curve.factor(t)
}
