// SPDX-License-Identifier: MIT OR Apache-2.0
//! Ordered groups of curves sharing one interpolation type.

use crate::curve::{Curve, CurveType};
use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// An ordered list of curves evaluated together (e.g. one per color channel)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CurveSet {
    curves: Vec<Curve>,
    curve_type: CurveType,
}

impl CurveSet {
    /// Create a curve set, applying `curve_type` to every curve
    pub fn new(curves: Vec<Curve>, curve_type: CurveType) -> Self {
        let mut set = Self {
            curves,
            curve_type,
        };
        set.set_curve_type(curve_type);
        set
    }

    /// Create a curve set from flat key arrays, skipping odd-length arrays
    pub fn from_key_arrays(curves: &[Vec<f32>], curve_type: CurveType) -> Self {
        let curves = curves
            .iter()
            .filter(|keys| keys.len() % 2 == 0)
            .map(|keys| Curve::new(keys, curve_type))
            .collect();
        Self::new(curves, curve_type)
    }

    /// Get the shared interpolation type
    pub fn curve_type(&self) -> CurveType {
        self.curve_type
    }

    /// Set the interpolation type on the set and every member curve
    pub fn set_curve_type(&mut self, curve_type: CurveType) {
        self.curve_type = curve_type;
        for curve in &mut self.curves {
            curve.set_curve_type(curve_type);
        }
    }

    /// Member curves
    pub fn curves(&self) -> &[Curve] {
        &self.curves
    }

    /// Mutable access to member curves
    pub fn curves_mut(&mut self) -> &mut [Curve] {
        &mut self.curves
    }

    /// Get a curve by index
    pub fn curve(&self, index: usize) -> Option<&Curve> {
        self.curves.get(index)
    }

    /// Get a mutable curve by index
    pub fn curve_mut(&mut self, index: usize) -> Option<&mut Curve> {
        self.curves.get_mut(index)
    }

    /// Append a curve; it takes on the set's interpolation type
    pub fn push(&mut self, mut curve: Curve) {
        curve.set_curve_type(self.curve_type);
        self.curves.push(curve);
    }

    /// Append `[0, 0]` curves until the set holds at least `count` curves
    pub fn pad_to(&mut self, count: usize) {
        while self.curves.len() < count {
            self.push(Curve::new(&[0.0, 0.0], self.curve_type));
        }
    }

    /// Number of curves
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    /// Whether the set holds no curves
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Evaluate every curve at `time`
    pub fn value(&self, time: f32) -> Vec<f32> {
        let mut result = Vec::with_capacity(self.curves.len());
        self.value_into(time, &mut result);
        result
    }

    /// Evaluate every curve at `time` into a reusable buffer
    pub fn value_into(&self, time: f32, result: &mut Vec<f32>) {
        result.clear();
        result.extend(self.curves.iter().map(|c| c.value(time)));
    }

    /// Evaluate `count` evenly spaced samples over `[0, 1]` for each curve
    pub fn sample(&self, count: usize) -> Vec<Vec<f32>> {
        self.curves.iter().map(|c| c.sample(count)).collect()
    }
}

impl Serialize for CurveSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("type", &self.curve_type)?;
        map.serialize_entry("curves", &self.curves)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for CurveSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            KeyArrays(Vec<Vec<f32>>),
            Object {
                #[serde(rename = "type", default)]
                curve_type: Option<CurveType>,
                #[serde(default)]
                curves: Vec<Curve>,
            },
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::KeyArrays(arrays) => CurveSet::from_key_arrays(&arrays, CurveType::default()),
            Repr::Object { curve_type, curves } => {
                CurveSet::new(curves, curve_type.unwrap_or_default())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_propagates_to_members() {
        let mut set = CurveSet::from_key_arrays(&[vec![0.0, 1.0], vec![0.0, 0.5]], CurveType::Linear);
        assert!(set.curves().iter().all(|c| c.curve_type() == CurveType::Linear));

        set.set_curve_type(CurveType::Catmull);
        assert!(set.curves().iter().all(|c| c.curve_type() == CurveType::Catmull));

        set.push(Curve::with_type(CurveType::Linear));
        assert_eq!(set.curve(2).map(Curve::curve_type), Some(CurveType::Catmull));
    }

    #[test]
    fn test_odd_arrays_are_skipped() {
        let set = CurveSet::from_key_arrays(&[vec![0.0, 1.0], vec![0.0], vec![]], CurveType::Linear);
        assert_eq!(set.len(), 2);
        assert!(set.curve(1).is_some_and(Curve::is_empty));
    }

    #[test]
    fn test_value_per_curve() {
        let set = CurveSet::from_key_arrays(
            &[vec![0.0, 0.0, 1.0, 1.0], vec![0.0, 0.5, 1.0, 0.5]],
            CurveType::Linear,
        );
        assert_eq!(set.value(0.5), vec![0.5, 0.5]);

        let mut buffer = vec![9.0; 5];
        set.value_into(1.0, &mut buffer);
        assert_eq!(buffer, vec![1.0, 0.5]);
    }

    #[test]
    fn test_pad_to() {
        let mut set = CurveSet::default();
        set.pad_to(3);
        assert_eq!(set.len(), 3);
        assert!(set.curves().iter().all(|c| c.key(0.0) == Some(0.0)));
        set.pad_to(2);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_json_round_trip_keeps_type() {
        let set = CurveSet::from_key_arrays(&[vec![0.0, 1.0, 1.0, 0.0]], CurveType::Cardinal);
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json["type"], "Cardinal");
        assert_eq!(json["curves"][0]["keys"], serde_json::json!([0.0, 1.0, 1.0, 0.0]));

        let back: CurveSet = serde_json::from_value(json).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn test_json_key_arrays() {
        let set: CurveSet =
            serde_json::from_value(serde_json::json!([[0.0, 1.0], [0.0, 1.0], [0.0, 1.0]])).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.curve_type(), CurveType::SmoothStep);
    }

    #[test]
    fn test_json_type_applies_to_decoded_curves() {
        let set: CurveSet = serde_json::from_value(serde_json::json!({
            "type": "Linear",
            "curves": [{"type": "Catmull", "keys": [0, 0]}]
        }))
        .unwrap();
        assert_eq!(set.curve(0).map(Curve::curve_type), Some(CurveType::Linear));
    }
}
