// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scalar interpolation kernels used by curve evaluation.

/// Interpolation utilities
pub struct Interpolation;

impl Interpolation {
    /// Linear interpolation between two floats
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Cubic Hermite ease (`t² · (3 − 2t)`)
    pub fn smoothstep(t: f32) -> f32 {
        t * t * (3.0 - 2.0 * t)
    }

    /// Cubic Hermite spline between `p0` and `p1` with tangents `t0` and `t1`
    pub fn hermite(p0: f32, p1: f32, t0: f32, t1: f32, s: f32) -> f32 {
        let s2 = s * s;
        let s3 = s2 * s;

        let h0 = 2.0 * s3 - 3.0 * s2 + 1.0;
        let h1 = -2.0 * s3 + 3.0 * s2;
        let h2 = s3 - 2.0 * s2 + s;
        let h3 = s3 - s2;

        p0 * h0 + p1 * h1 + t0 * h2 + t1 * h3
    }

    /// Cardinal spline through `p1..p2`, with `p0` and `p3` shaping the tangents
    pub fn cardinal(p0: f32, p1: f32, p2: f32, p3: f32, s: f32, tension: f32) -> f32 {
        let t0 = tension * (p2 - p0);
        let t1 = tension * (p3 - p1);
        Self::hermite(p1, p2, t0, t1, s)
    }

    /// Catmull-Rom spline (cardinal with tension 0.5)
    pub fn catmull_rom(p0: f32, p1: f32, p2: f32, p3: f32, s: f32) -> f32 {
        Self::cardinal(p0, p1, p2, p3, s, 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_hermite_endpoints() {
        assert!(approx(Interpolation::hermite(2.0, 5.0, 1.0, -1.0, 0.0), 2.0));
        assert!(approx(Interpolation::hermite(2.0, 5.0, 1.0, -1.0, 1.0), 5.0));
    }

    #[test]
    fn test_smoothstep_midpoint() {
        assert!(approx(Interpolation::smoothstep(0.5), 0.5));
        assert!(approx(Interpolation::smoothstep(0.25), 0.15625));
    }

    #[test]
    fn test_catmull_rom_on_a_line_is_linear() {
        // Evenly spaced collinear points keep the spline on the line.
        for s in [0.1, 0.25, 0.5, 0.9] {
            let v = Interpolation::catmull_rom(-1.0, 0.0, 1.0, 2.0, s);
            assert!(approx(v, s), "s={s} v={v}");
        }
    }

    #[test]
    fn test_cardinal_zero_tension_is_ease() {
        let v = Interpolation::cardinal(-1.0, 0.0, 1.0, 2.0, 0.25, 0.0);
        assert!(approx(v, Interpolation::smoothstep(0.25)));
    }
}
