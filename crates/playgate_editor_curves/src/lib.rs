// SPDX-License-Identifier: MIT OR Apache-2.0
//! Curves and numeric value types for the `PlayGate` editor.
//!
//! This crate provides the value payloads edited through property editors:
//! - Keyframe curves with linear, smoothstep, Catmull-Rom and cardinal evaluation
//! - Curve sets sharing one interpolation type
//! - Clamped RGBA colors
//! - Three component vectors
//!
//! ## Encoding
//!
//! Every type carries a canonical JSON shape through its serde impls:
//! colors and vectors are plain arrays, curves are
//! `{"type", "tension", "keys"}` objects and curve sets are `{"type", "curves"}`.

pub mod color;
pub mod curve;
pub mod curve_set;
pub mod interpolation;
pub mod vector;

pub use color::Color;
pub use curve::{Curve, CurveType, DEFAULT_TENSION};
pub use curve_set::CurveSet;
pub use interpolation::Interpolation;
pub use vector::Vector;
