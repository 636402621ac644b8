// SPDX-License-Identifier: MIT OR Apache-2.0
//! RGBA color with components clamped to `[0, 1]`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// An RGBA color. Every assignment clamps into `[0, 1]`; NaN becomes `0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    r: f32,
    g: f32,
    b: f32,
    a: f32,
}

impl Color {
    /// Opaque white
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    /// Create a color, clamping every component
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: clamp_unit(r),
            g: clamp_unit(g),
            b: clamp_unit(b),
            a: clamp_unit(a),
        }
    }

    /// Create an opaque color
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Build from up to four components; missing trailing components are `1.0`
    pub fn from_array(values: &[f32]) -> Self {
        let at = |i: usize| values.get(i).copied().unwrap_or(1.0);
        Self::new(at(0), at(1), at(2), at(3))
    }

    /// Components as `[r, g, b, a]`
    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Red
    pub fn r(&self) -> f32 {
        self.r
    }

    /// Green
    pub fn g(&self) -> f32 {
        self.g
    }

    /// Blue
    pub fn b(&self) -> f32 {
        self.b
    }

    /// Alpha
    pub fn a(&self) -> f32 {
        self.a
    }

    /// Set red
    pub fn set_r(&mut self, value: f32) {
        self.r = clamp_unit(value);
    }

    /// Set green
    pub fn set_g(&mut self, value: f32) {
        self.g = clamp_unit(value);
    }

    /// Set blue
    pub fn set_b(&mut self, value: f32) {
        self.b = clamp_unit(value);
    }

    /// Set alpha
    pub fn set_a(&mut self, value: f32) {
        self.a = clamp_unit(value);
    }

    /// Alpha as an 8-bit channel value
    pub fn alpha_byte(&self) -> u8 {
        (self.a * 255.0).round() as u8
    }

    /// Set alpha from an 8-bit channel value
    pub fn set_alpha_byte(&mut self, value: u8) {
        self.a = f32::from(value) / 255.0;
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<[f32; 4]> for Color {
    fn from(values: [f32; 4]) -> Self {
        Self::from_array(&values)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_array().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = Vec::<f32>::deserialize(deserializer)?;
        Ok(Self::from_array(&values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_short_array_defaults_and_clamps() {
        let color = Color::from_array(&[0.5, 2.0, -1.0]);
        assert_eq!(color.r(), 0.5);
        assert_eq!(color.g(), 1.0);
        assert_eq!(color.b(), 0.0);
        assert_eq!(color.a(), 1.0);
    }

    #[test]
    fn test_setters_clamp() {
        let mut color = Color::default();
        color.set_r(-3.0);
        color.set_g(0.25);
        color.set_b(7.0);
        color.set_a(f32::NAN);
        assert_eq!(color.to_array(), [0.0, 0.25, 1.0, 0.0]);
    }

    #[test]
    fn test_four_components_are_lossless() {
        let color = Color::from_array(&[0.1, 0.2, 0.3, 0.4]);
        assert_eq!(color.to_array(), [0.1, 0.2, 0.3, 0.4]);
        assert_eq!(Color::from_array(&[]), Color::WHITE);
    }

    #[test]
    fn test_alpha_byte() {
        let mut color = Color::rgb(0.0, 0.0, 0.0);
        assert_eq!(color.alpha_byte(), 255);
        color.set_alpha_byte(51);
        assert!((color.a() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_json_is_an_array() {
        let color = Color::new(0.0, 0.5, 1.0, 0.25);
        assert_eq!(serde_json::to_value(color).unwrap(), serde_json::json!([0.0, 0.5, 1.0, 0.25]));

        let back: Color = serde_json::from_value(serde_json::json!([2, 0.5])).unwrap();
        assert_eq!(back.to_array(), [1.0, 0.5, 1.0, 1.0]);
    }
}
