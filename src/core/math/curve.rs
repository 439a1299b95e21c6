//=========================================================================
// Curves
//=========================================================================
//
// Keyframed values sampled over time (milliseconds).
//
// Architecture:
//   Curve1D           sorted (time, value) keys, Hermite segments
//   Curve3D           three Curve1D sharing a loop type
//   Transform3DCurve  translation / look / up as Curve3D
//
// Tangents are smooth: each key's slope is taken from its neighbours
// and split in proportion to the adjacent segment lengths. Outside the
// key range the loop type decides the value.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec3;

//=== Internal Dependencies ===============================================

use super::{round_f32, round_vec3};

//=== CurveLoopType =======================================================

/// Behaviour before the first and after the last key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurveLoopType {
    /// Hold the end values.
    #[default]
    Constant,
    /// Repeat the curve.
    Cycle,
    /// Repeat, shifting each cycle by the end-to-end difference.
    CycleOffset,
    /// Repeat, reversing direction every cycle.
    Oscillate,
    /// Continue along the end tangents.
    Linear,
}

//=== Curve1D =============================================================

#[derive(Debug, Clone, Copy)]
struct Key {
    time: f32,
    value: f32,
    tangent_in: f32,
    tangent_out: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Curve1D {
    loop_type: CurveLoopType,
    keys: Vec<Key>,
}

impl Curve1D {
    pub fn new(loop_type: CurveLoopType) -> Self {
        Self { loop_type, keys: Vec::new() }
    }

    pub fn loop_type(&self) -> CurveLoopType {
        self.loop_type
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Inserts a key; a key at an existing time replaces its value.
    pub fn add(&mut self, value: f32, time_ms: u32) {
        let time = time_ms as f32;
        match self.keys.binary_search_by(|k| k.time.total_cmp(&time)) {
            Ok(i) => self.keys[i].value = value,
            Err(i) => self.keys.insert(i, Key { time, value, tangent_in: 0.0, tangent_out: 0.0 }),
        }
        self.compute_tangents();
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Samples the curve at `time_ms`, rounded to `precision` decimals.
    pub fn evaluate(&self, time_ms: f64, precision: u32) -> f32 {
        round_f32(self.sample(time_ms as f32), precision)
    }

    //--- Internal Helpers -------------------------------------------------

    fn compute_tangents(&mut self) {
        let n = self.keys.len();
        for i in 0..n {
            let prev = self.keys[i.saturating_sub(1)];
            let next = self.keys[(i + 1).min(n - 1)];
            let key = self.keys[i];

            let span = next.time - prev.time;
            if span <= 0.0 {
                self.keys[i].tangent_in = 0.0;
                self.keys[i].tangent_out = 0.0;
                continue;
            }

            let rise = next.value - prev.value;
            self.keys[i].tangent_in = rise * (key.time - prev.time) / span;
            self.keys[i].tangent_out = rise * (next.time - key.time) / span;
        }
    }

    fn sample(&self, time: f32) -> f32 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(f), Some(l)) => (*f, *l),
            _ => return 0.0,
        };
        if self.keys.len() == 1 {
            return first.value;
        }

        let period = last.time - first.time;
        if (first.time..=last.time).contains(&time) {
            return self.interpolate(time);
        }

        match self.loop_type {
            CurveLoopType::Constant => {
                if time < first.time {
                    first.value
                } else {
                    last.value
                }
            }
            CurveLoopType::Linear => {
                if time < first.time {
                    let slope = self.end_slope(0);
                    first.value - slope * (first.time - time)
                } else {
                    let slope = self.end_slope(self.keys.len() - 2);
                    last.value + slope * (time - last.time)
                }
            }
            CurveLoopType::Cycle => self.interpolate(first.time + (time - first.time).rem_euclid(period)),
            CurveLoopType::CycleOffset => {
                let cycles = ((time - first.time) / period).floor();
                let local = first.time + (time - first.time).rem_euclid(period);
                self.interpolate(local) + cycles * (last.value - first.value)
            }
            CurveLoopType::Oscillate => {
                let cycles = ((time - first.time) / period).floor() as i64;
                let offset = (time - first.time).rem_euclid(period);
                let local = if cycles % 2 == 0 { first.time + offset } else { last.time - offset };
                self.interpolate(local)
            }
        }
    }

    fn end_slope(&self, segment: usize) -> f32 {
        let a = self.keys[segment];
        let b = self.keys[segment + 1];
        (b.value - a.value) / (b.time - a.time)
    }

    fn interpolate(&self, time: f32) -> f32 {
        let upper = self.keys.partition_point(|k| k.time <= time);
        if upper == 0 {
            return self.keys[0].value;
        }
        if upper >= self.keys.len() {
            return self.keys[self.keys.len() - 1].value;
        }

        let k0 = self.keys[upper - 1];
        let k1 = self.keys[upper];
        let t = (time - k0.time) / (k1.time - k0.time);
        hermite(k0.value, k0.tangent_out, k1.value, k1.tangent_in, t)
    }
}

fn hermite(v0: f32, t0: f32, v1: f32, t1: f32, s: f32) -> f32 {
    let s2 = s * s;
    let s3 = s2 * s;
    (2.0 * s3 - 3.0 * s2 + 1.0) * v0 + (s3 - 2.0 * s2 + s) * t0 + (-2.0 * s3 + 3.0 * s2) * v1 + (s3 - s2) * t1
}

//=== Curve3D =============================================================

#[derive(Debug, Clone, Default)]
pub struct Curve3D {
    x: Curve1D,
    y: Curve1D,
    z: Curve1D,
}

impl Curve3D {
    pub fn new(loop_type: CurveLoopType) -> Self {
        Self { x: Curve1D::new(loop_type), y: Curve1D::new(loop_type), z: Curve1D::new(loop_type) }
    }

    pub fn add(&mut self, value: Vec3, time_ms: u32) {
        self.x.add(value.x, time_ms);
        self.y.add(value.y, time_ms);
        self.z.add(value.z, time_ms);
    }

    pub fn clear(&mut self) {
        self.x.clear();
        self.y.clear();
        self.z.clear();
    }

    pub fn evaluate(&self, time_ms: f64, precision: u32) -> Vec3 {
        let sampled = Vec3::new(
            self.x.sample(time_ms as f32),
            self.y.sample(time_ms as f32),
            self.z.sample(time_ms as f32),
        );
        round_vec3(sampled, precision)
    }
}

//=== Transform3DCurve ====================================================

/// A camera path: translation, look and up keyed on the same times.
#[derive(Debug, Clone, Default)]
pub struct Transform3DCurve {
    translation: Curve3D,
    look: Curve3D,
    up: Curve3D,
}

impl Transform3DCurve {
    pub fn new(loop_type: CurveLoopType) -> Self {
        Self { translation: Curve3D::new(loop_type), look: Curve3D::new(loop_type), up: Curve3D::new(loop_type) }
    }

    pub fn add(&mut self, translation: Vec3, look: Vec3, up: Vec3, time_ms: u32) {
        self.translation.add(translation, time_ms);
        self.look.add(look, time_ms);
        self.up.add(up, time_ms);
    }

    pub fn clear(&mut self) {
        self.translation.clear();
        self.look.clear();
        self.up.clear();
    }

    /// Returns `(translation, look, up)` at `time_ms`.
    pub fn evaluate(&self, time_ms: f64, precision: u32) -> (Vec3, Vec3, Vec3) {
        (
            self.translation.evaluate(time_ms, precision),
            self.look.evaluate(time_ms, precision),
            self.up.evaluate(time_ms, precision),
        )
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp(loop_type: CurveLoopType) -> Curve1D {
        let mut c = Curve1D::new(loop_type);
        c.add(0.0, 0);
        c.add(10.0, 1000);
        c
    }

    //--- Interpolation ----------------------------------------------------

    #[test]
    fn passes_through_keys() {
        let mut c = ramp(CurveLoopType::Constant);
        c.add(4.0, 500);
        assert_relative_eq!(c.evaluate(0.0, 3), 0.0);
        assert_relative_eq!(c.evaluate(500.0, 3), 4.0);
        assert_relative_eq!(c.evaluate(1000.0, 3), 10.0);
    }

    #[test]
    fn keys_kept_sorted() {
        let mut c = Curve1D::new(CurveLoopType::Constant);
        c.add(10.0, 1000);
        c.add(0.0, 0);
        assert_relative_eq!(c.evaluate(0.0, 3), 0.0);
        assert_relative_eq!(c.evaluate(2000.0, 3), 10.0);
    }

    #[test]
    fn smooth_between_keys() {
        let c = ramp(CurveLoopType::Constant);
        let mid = c.evaluate(500.0, 3);
        assert!(mid > 0.0 && mid < 10.0, "got {}", mid);
    }

    #[test]
    fn rounds_to_precision() {
        let c = ramp(CurveLoopType::Constant);
        let v = c.evaluate(333.0, 1);
        assert_relative_eq!(v, (v * 10.0).round() / 10.0);
    }

    //--- Loop Types -------------------------------------------------------

    #[test]
    fn constant_holds_end_values() {
        let c = ramp(CurveLoopType::Constant);
        assert_relative_eq!(c.evaluate(-500.0, 3), 0.0);
        assert_relative_eq!(c.evaluate(5000.0, 3), 10.0);
    }

    #[test]
    fn cycle_repeats() {
        let c = ramp(CurveLoopType::Cycle);
        assert_relative_eq!(c.evaluate(1250.0, 3), c.evaluate(250.0, 3));
    }

    #[test]
    fn cycle_offset_accumulates() {
        let c = ramp(CurveLoopType::CycleOffset);
        assert_relative_eq!(c.evaluate(1250.0, 3), c.evaluate(250.0, 3) + 10.0, epsilon = 1e-3);
    }

    #[test]
    fn oscillate_reverses() {
        let c = ramp(CurveLoopType::Oscillate);
        assert_relative_eq!(c.evaluate(1250.0, 3), c.evaluate(750.0, 3));
    }

    #[test]
    fn linear_extrapolates() {
        let c = ramp(CurveLoopType::Linear);
        assert_relative_eq!(c.evaluate(2000.0, 3), 20.0, epsilon = 1e-3);
        assert_relative_eq!(c.evaluate(-1000.0, 3), -10.0, epsilon = 1e-3);
    }

    //--- Composite Curves -------------------------------------------------

    #[test]
    fn transform_curve_evaluates_all_channels() {
        let mut curve = Transform3DCurve::new(CurveLoopType::Constant);
        curve.add(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y, 0);
        curve.add(Vec3::new(10.0, 0.0, 0.0), Vec3::NEG_X, Vec3::Y, 1000);

        let (t, look, up) = curve.evaluate(1000.0, 3);
        assert_eq!(t, Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(look, Vec3::NEG_X);
        assert_eq!(up, Vec3::Y);
    }

    #[test]
    fn empty_curve_is_zero() {
        assert_eq!(Curve1D::new(CurveLoopType::Cycle).evaluate(10.0, 3), 0.0);
    }
}
