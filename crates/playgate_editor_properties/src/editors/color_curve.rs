// SPDX-License-Identifier: MIT OR Apache-2.0
//! Color channel curves: a curve editor with channel-named curves.

use super::curve::{CurveEditor, CurveInfo, CurveSession};
use crate::editor::{DrawResult, EditorBase, EditorInput, EditorView, PropertyEditor};
use crate::error::RegistryError;
use crate::property::Property;
use crate::registry::EditorType;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::any::Any;
use std::rc::Rc;

/// Channels edited by a color curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorCurveKind {
    /// Red only
    #[serde(alias = "R")]
    R,
    /// Green only
    #[serde(alias = "G")]
    G,
    /// Blue only
    #[serde(alias = "B")]
    B,
    /// Red, green and blue
    #[serde(alias = "RGB")]
    Rgb,
    /// Red, green, blue and alpha
    #[default]
    #[serde(alias = "RGBA")]
    Rgba,
}

impl ColorCurveKind {
    /// Curve names shown for this kind
    pub fn channel_names(&self) -> &'static [&'static str] {
        match self {
            ColorCurveKind::R => &["Red"],
            ColorCurveKind::G => &["Green"],
            ColorCurveKind::B => &["Blue"],
            ColorCurveKind::Rgb => &["Red", "Green", "Blue"],
            ColorCurveKind::Rgba => &["Red", "Green", "Blue", "Alpha"],
        }
    }
}

/// Editor data of `colorcurve` properties
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorCurveInfo {
    /// Edited channels
    #[serde(rename = "type", default)]
    pub kind: ColorCurveKind,
}

impl ColorCurveInfo {
    /// Curve settings derived from the channel kind
    pub fn curve_info(&self) -> CurveInfo {
        CurveInfo {
            curves: Some(
                self.kind
                    .channel_names()
                    .iter()
                    .map(|name| (*name).to_string())
                    .collect(),
            ),
            ..Default::default()
        }
    }
}

/// Editor for `colorcurve` properties
#[derive(Debug)]
pub struct ColorCurveEditor {
    inner: CurveEditor,
    info: ColorCurveInfo,
}

impl ColorCurveEditor {
    /// Channel settings
    pub fn info(&self) -> ColorCurveInfo {
        self.info
    }

    /// Start editing a copy of the current curves
    pub fn open_session(&self) -> CurveSession {
        self.inner.open_session()
    }
}

impl EditorType for ColorCurveEditor {
    fn create(name: &str, property: Rc<Property>) -> Result<Self, RegistryError> {
        let info = property.editor_additional_data::<ColorCurveInfo>();
        Ok(Self {
            inner: CurveEditor::with_info(name, property, info.curve_info()),
            info,
        })
    }

    fn default_value() -> Option<Value> {
        Some(json!([[0.0, 1.0], [0.0, 1.0], [0.0, 1.0], [0.0, 1.0]]))
    }
}

impl PropertyEditor for ColorCurveEditor {
    fn base(&self) -> &EditorBase {
        self.inner.base()
    }

    fn view(&self) -> EditorView {
        self.inner.view()
    }

    fn apply(&mut self, input: EditorInput) -> DrawResult {
        self.inner.apply(input)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
