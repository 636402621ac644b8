// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe curves.
//!
//! A [`Curve`] maps time to value through a set of keyframes. Keys are kept
//! in insertion order and sorted only when the curve is evaluated or encoded.

use crate::interpolation::Interpolation;
use serde::de::{Deserializer, Error as _};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// Tension a freshly created curve carries
pub const DEFAULT_TENSION: f32 = 0.5;

/// Interpolation algorithm between keyframes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CurveType {
    /// Straight segments
    Linear,
    /// Cubic Hermite ease between neighbouring keys
    #[default]
    SmoothStep,
    /// Catmull-Rom spline
    Catmull,
    /// Cardinal spline driven by the curve tension
    Cardinal,
}

impl CurveType {
    /// Get the encoded name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "Linear",
            Self::SmoothStep => "SmoothStep",
            Self::Catmull => "Catmull",
            Self::Cardinal => "Cardinal",
        }
    }

    /// Get all curve types, in index order
    pub fn all() -> &'static [CurveType] {
        &[
            CurveType::Linear,
            CurveType::SmoothStep,
            CurveType::Catmull,
            CurveType::Cardinal,
        ]
    }

    /// Parse an encoded name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(name))
    }

    /// Look up a type by its numeric index
    pub fn from_index(index: u64) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::all().get(i).copied())
    }
}

impl Serialize for CurveType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for CurveType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Name(String),
            Index(u64),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Name(name) => Self::from_name(&name)
                .ok_or_else(|| D::Error::custom(format!("unknown curve type `{name}`"))),
            Repr::Index(index) => Self::from_index(index)
                .ok_or_else(|| D::Error::custom(format!("curve type index {index} out of range"))),
        }
    }
}

/// A set of `(time, value)` keyframes with an interpolation type
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    keys: Vec<(f32, f32)>,
    curve_type: CurveType,
    tension: f32,
}

impl Default for Curve {
    fn default() -> Self {
        Self::with_type(CurveType::default())
    }
}

impl Curve {
    /// Create a curve from a flat `[t0, v0, t1, v1, ...]` array.
    ///
    /// An odd-length array yields an empty curve.
    pub fn new(keys: &[f32], curve_type: CurveType) -> Self {
        let mut curve = Self::with_type(curve_type);
        if keys.len() % 2 == 0 {
            for pair in keys.chunks_exact(2) {
                curve.insert_key(pair[0], pair[1]);
            }
        }
        curve
    }

    /// Create an empty curve
    pub fn with_type(curve_type: CurveType) -> Self {
        Self {
            keys: Vec::new(),
            curve_type,
            tension: DEFAULT_TENSION,
        }
    }

    /// Create a curve from `(time, value)` pairs
    pub fn from_keys(keys: impl IntoIterator<Item = (f32, f32)>, curve_type: CurveType) -> Self {
        let mut curve = Self::with_type(curve_type);
        for (time, value) in keys {
            curve.insert_key(time, value);
        }
        curve
    }

    /// Get the interpolation type
    pub fn curve_type(&self) -> CurveType {
        self.curve_type
    }

    /// Set the interpolation type
    pub fn set_curve_type(&mut self, curve_type: CurveType) {
        self.curve_type = curve_type;
    }

    /// Get the tension (only used by [`CurveType::Cardinal`])
    pub fn tension(&self) -> f32 {
        self.tension
    }

    /// Set the tension
    pub fn set_tension(&mut self, tension: f32) {
        self.tension = tension;
    }

    /// Insert or replace a keyframe, returning the value it replaced.
    ///
    /// NaN times are ignored.
    pub fn insert_key(&mut self, time: f32, value: f32) -> Option<f32> {
        if time.is_nan() {
            return None;
        }
        match self.keys.iter_mut().find(|(t, _)| *t == time) {
            Some(entry) => Some(std::mem::replace(&mut entry.1, value)),
            None => {
                self.keys.push((time, value));
                None
            }
        }
    }

    /// Remove the keyframe at exactly `time`
    pub fn remove_key(&mut self, time: f32) -> Option<f32> {
        let index = self.keys.iter().position(|(t, _)| *t == time)?;
        Some(self.keys.remove(index).1)
    }

    /// Get the value stored at exactly `time`
    pub fn key(&self, time: f32) -> Option<f32> {
        self.keys.iter().find(|(t, _)| *t == time).map(|(_, v)| *v)
    }

    /// Number of keyframes
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the curve has no keyframes
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Remove every keyframe
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Keyframes in storage order
    pub fn keys(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.keys.iter().copied()
    }

    /// Keyframes sorted ascending by time
    pub fn keys_sorted(&self) -> Vec<(f32, f32)> {
        let mut keys = self.keys.clone();
        keys.sort_by(|a, b| a.0.total_cmp(&b.0));
        keys
    }

    /// Drop keyframes whose time lies outside `[min, max]`, returning how many were removed
    pub fn retain_keys_in(&mut self, min: f32, max: f32) -> usize {
        let before = self.keys.len();
        self.keys.retain(|(t, _)| *t >= min && *t <= max);
        before - self.keys.len()
    }

    /// Flatten to `[t0, v0, t1, v1, ...]` in ascending time order
    pub fn to_flat_keys(&self) -> Vec<f32> {
        self.keys_sorted()
            .into_iter()
            .flat_map(|(t, v)| [t, v])
            .collect()
    }

    /// Evaluate the curve at `time`
    pub fn value(&self, time: f32) -> f32 {
        let keys = self.keys_sorted();
        let (Some(&(first_time, first_value)), Some(&(last_time, last_value))) =
            (keys.first(), keys.last())
        else {
            return 0.0;
        };

        if time <= first_time {
            return first_value;
        }
        if time >= last_time {
            return last_value;
        }
        if let Some(&(_, value)) = keys.iter().find(|(t, _)| *t == time) {
            return value;
        }

        let Some(right) = keys.iter().position(|&(t, _)| time < t) else {
            return last_value;
        };
        let Some(left) = right.checked_sub(1) else {
            return first_value;
        };

        let (left_time, left_value) = keys[left];
        let (right_time, right_value) = keys[right];
        let span = right_time - left_time;
        let mut s = if span == 0.0 { 0.0 } else { (time - left_time) / span };

        match self.curve_type {
            CurveType::Linear => {}
            CurveType::SmoothStep => s = Interpolation::smoothstep(s),
            CurveType::Catmull => return Self::spline(&keys, left, s, 0.5),
            CurveType::Cardinal => return Self::spline(&keys, left, s, self.tension),
        }

        Interpolation::lerp(left_value, right_value, s.clamp(0.0, 1.0))
    }

    /// Evaluate `count` evenly spaced samples over `[0, 1]`
    pub fn sample(&self, count: usize) -> Vec<f32> {
        match count {
            0 => Vec::new(),
            1 => vec![self.value(0.0)],
            _ => {
                let last = (count - 1) as f32;
                (0..count).map(|i| self.value(i as f32 / last)).collect()
            }
        }
    }

    /// Cardinal spline over the segment starting at `left`.
    ///
    /// Missing neighbours are mirrored from the segment itself; real neighbours
    /// have their tangent contribution rescaled by the ratio of time spans.
    fn spline(keys: &[(f32, f32)], left: usize, s: f32, tension: f32) -> f32 {
        let (t1, p1) = keys[left];
        let (t2, p2) = keys[left + 1];
        let dt1 = t2 - t1;

        let (p0, dt0) = match left.checked_sub(1) {
            Some(i) => (keys[i].1, t1 - keys[i].0),
            None => (p1 + (p1 - p2), dt1),
        };
        let (p3, dt2) = match keys.get(left + 2) {
            Some(&(t3, v3)) => (v3, t3 - t2),
            None => (p2 + (p2 - p1), dt1),
        };

        let p0 = p1 + (p0 - p1) * dt1 / dt0;
        let p3 = p2 + (p3 - p2) * dt1 / dt2;

        Interpolation::cardinal(p0, p1, p2, p3, s, tension)
    }
}

impl Serialize for Curve {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("type", &self.curve_type)?;
        map.serialize_entry("tension", &self.tension)?;
        map.serialize_entry("keys", &self.to_flat_keys())?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Curve {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Keys(Vec<f32>),
            Object {
                #[serde(rename = "type", default)]
                curve_type: Option<CurveType>,
                #[serde(default)]
                tension: Option<f32>,
                #[serde(default)]
                keys: Option<Vec<f32>>,
            },
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Keys(keys) => Curve::new(&keys, CurveType::default()),
            Repr::Object {
                curve_type,
                tension,
                keys,
            } => {
                let mut curve = Curve::new(&keys.unwrap_or_default(), curve_type.unwrap_or_default());
                if let Some(tension) = tension {
                    curve.tension = tension;
                }
                curve
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    fn sample_keys() -> Vec<f32> {
        vec![0.0, 0.0, 0.3, 2.0, 0.5, -1.0, 1.0, 4.0]
    }

    #[test]
    fn test_empty_curve_is_zero() {
        let curve = Curve::default();
        assert_eq!(curve.value(0.5), 0.0);
        assert_eq!(curve.value(-3.0), 0.0);
    }

    #[test]
    fn test_odd_key_array_is_empty() {
        let curve = Curve::new(&[0.0, 1.0, 0.5], CurveType::Linear);
        assert!(curve.is_empty());
    }

    #[test]
    fn test_exact_keys_for_every_type() {
        for curve_type in CurveType::all() {
            let curve = Curve::new(&sample_keys(), *curve_type);
            for pair in sample_keys().chunks_exact(2) {
                assert_eq!(curve.value(pair[0]), pair[1], "{curve_type:?} at {}", pair[0]);
            }
        }
    }

    #[test]
    fn test_flat_extrapolation() {
        for curve_type in CurveType::all() {
            let curve = Curve::new(&sample_keys(), *curve_type);
            assert_eq!(curve.value(-0.5), 0.0);
            assert_eq!(curve.value(7.0), 4.0);
        }
    }

    #[test]
    fn test_unsorted_insertion_is_sorted_on_read() {
        let curve = Curve::from_keys([(1.0, 10.0), (0.0, 0.0)], CurveType::Linear);
        assert!(approx(curve.value(0.25), 2.5));
        assert_eq!(curve.to_flat_keys(), vec![0.0, 0.0, 1.0, 10.0]);
    }

    #[test]
    fn test_linear_is_monotonic_between_monotonic_keys() {
        let curve = Curve::new(&[0.0, 1.0, 1.0, 3.0], CurveType::Linear);
        let samples = curve.sample(33);
        assert!(samples.windows(2).all(|w| w[0] <= w[1]));
        assert!(approx(curve.value(0.5), 2.0));
        assert_eq!(curve.value(0.37), curve.value(0.37));
    }

    #[test]
    fn test_smoothstep_scenario() {
        let curve = Curve::new(&[0.0, 0.0, 1.0, 1.0], CurveType::SmoothStep);
        assert!(approx(curve.value(0.5), 0.5));
        assert!(approx(curve.value(0.25), 0.15625));
    }

    #[test]
    fn test_catmull_two_keys_is_linear() {
        let curve = Curve::new(&[0.0, 0.0, 1.0, 1.0], CurveType::Catmull);
        for t in [0.1, 0.25, 0.5, 0.8] {
            assert!(approx(curve.value(t), t), "t={t}");
        }
    }

    #[test]
    fn test_cardinal_uses_tension() {
        let mut curve = Curve::new(&[0.0, 0.0, 1.0, 1.0], CurveType::Cardinal);
        curve.set_tension(0.0);
        assert!(approx(curve.value(0.25), 0.15625));
        curve.set_tension(0.5);
        assert!(approx(curve.value(0.25), 0.25));
    }

    #[test]
    fn test_catmull_three_keys_matches_reference() {
        // keys (0,0) (1,1) (2,0), evaluate the first segment at s = 0.5
        let curve = Curve::new(&[0.0, 0.0, 1.0, 1.0, 2.0, 0.0], CurveType::Catmull);
        // p0 mirrored = -1, p3 = 0; tangents 0.5*(1-(-1)) = 1 and 0.5*(0-0) = 0
        let expected = Interpolation::hermite(0.0, 1.0, 1.0, 0.0, 0.5);
        assert!(approx(curve.value(0.5), expected));
    }

    #[test]
    fn test_catmull_rescales_uneven_spacing() {
        // keys (0,0) (0.5,1) (1,1) (3,0): last segment neighbour is 2 units away
        let curve = Curve::new(&[0.0, 0.0, 0.5, 1.0, 1.0, 1.0, 3.0, 0.0], CurveType::Catmull);
        // segment (0.5,1)-(1,1): p0 = 0 at dt0 = 0.5, p3 = 0 at dt2 = 2, dt1 = 0.5
        let p0 = 1.0 + (0.0 - 1.0) * 0.5 / 0.5;
        let p3 = 1.0 + (0.0 - 1.0) * 0.5 / 2.0;
        let expected = Interpolation::catmull_rom(p0, 1.0, 1.0, p3, 0.5);
        assert!(approx(curve.value(0.75), expected));
    }

    #[test]
    fn test_key_editing() {
        let mut curve = Curve::with_type(CurveType::Linear);
        assert_eq!(curve.insert_key(0.5, 1.0), None);
        assert_eq!(curve.insert_key(0.5, 2.0), Some(1.0));
        assert_eq!(curve.len(), 1);
        assert_eq!(curve.insert_key(f32::NAN, 3.0), None);
        assert_eq!(curve.len(), 1);
        curve.insert_key(1.5, 0.0);
        curve.insert_key(-0.5, 0.0);
        assert_eq!(curve.retain_keys_in(0.0, 1.0), 2);
        assert_eq!(curve.remove_key(0.5), Some(2.0));
        assert!(curve.is_empty());
    }

    #[test]
    fn test_json_shape() {
        let curve = Curve::from_keys([(1.0, 0.0), (0.0, 1.0)], CurveType::Cardinal);
        let json = serde_json::to_value(&curve).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "Cardinal", "tension": 0.5, "keys": [0.0, 1.0, 1.0, 0.0]})
        );
        let back: Curve = serde_json::from_value(json).unwrap();
        assert_eq!(back, curve);
    }

    #[test]
    fn test_json_lenient_forms() {
        let curve: Curve = serde_json::from_value(serde_json::json!({"type": 0, "keys": [0, 1]})).unwrap();
        assert_eq!(curve.curve_type(), CurveType::Linear);
        assert_eq!(curve.tension(), DEFAULT_TENSION);
        assert_eq!(curve.key(0.0), Some(1.0));

        let flat: Curve = serde_json::from_value(serde_json::json!([0.0, 0.0])).unwrap();
        assert_eq!(flat.curve_type(), CurveType::SmoothStep);
        assert_eq!(flat.len(), 1);

        let bad = serde_json::from_value::<Curve>(serde_json::json!({"type": "Bezier"}));
        assert!(bad.is_err());
    }
}
