// SPDX-License-Identifier: MIT OR Apache-2.0
//! Three component vector.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A 3D vector with unclamped components
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vector {
    /// All zeros
    pub const ZERO: Vector = Vector::new(0.0, 0.0, 0.0);

    /// Create a vector
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Build from up to three components; missing trailing components are `1.0`
    pub fn from_array(values: &[f32]) -> Self {
        let at = |i: usize| values.get(i).copied().unwrap_or(1.0);
        Self::new(at(0), at(1), at(2))
    }

    /// Components as `[x, y, z]`
    pub fn to_array(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Component by index (0..3)
    pub fn get(&self, index: usize) -> Option<f32> {
        self.to_array().get(index).copied()
    }

    /// Set a component by index; out of range indices are ignored
    pub fn set(&mut self, index: usize, value: f32) {
        match index {
            0 => self.x = value,
            1 => self.y = value,
            2 => self.z = value,
            _ => {}
        }
    }
}

impl Default for Vector {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

impl From<[f32; 3]> for Vector {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl Serialize for Vector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_array().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Vector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = Vec::<f32>::deserialize(deserializer)?;
        Ok(Self::from_array(&values))
    }
}
