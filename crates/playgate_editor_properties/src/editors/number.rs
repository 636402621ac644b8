// SPDX-License-Identifier: MIT OR Apache-2.0
//! Numeric text field with optional clamping.

use crate::editor::{
    format_number, parse_number, DrawResult, EditorBase, EditorInput, EditorView, PropertyEditor,
    TextDraft, Widget,
};
use crate::error::RegistryError;
use crate::property::Property;
use crate::registry::EditorType;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use std::rc::Rc;

/// Most digits shown after the decimal point
pub const MAX_PRECISION: usize = 17;

/// Editor data of `number` properties
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumberInfo {
    /// Lower bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Upper bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Nudge increment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    /// Digits shown after the decimal point
    #[serde(rename = "decimalPrecision", default, skip_serializing_if = "Option::is_none")]
    pub decimal_precision: Option<f64>,
}

impl NumberInfo {
    /// Clamp to `max`, then to `min`
    pub fn clamp(&self, value: f64) -> f64 {
        let value = self.max.map_or(value, |max| value.min(max));
        self.min.map_or(value, |min| value.max(min))
    }

    /// Nudge increment; non-positive steps fall back to 1
    pub fn step(&self) -> f64 {
        self.step.filter(|step| *step > 0.0).unwrap_or(1.0)
    }

    /// Display precision, at most [`MAX_PRECISION`]
    pub fn precision(&self) -> Option<usize> {
        self.decimal_precision
            .filter(|digits| digits.is_finite() && *digits >= 0.0)
            .map(|digits| (digits as usize).min(MAX_PRECISION))
    }
}

/// Editor for `number` properties
#[derive(Debug)]
pub struct NumberEditor {
    base: EditorBase,
    info: NumberInfo,
    draft: TextDraft,
}

impl NumberEditor {
    /// Clamping and display settings
    pub fn info(&self) -> &NumberInfo {
        &self.info
    }

    /// Current value; 0 when absent or not a number
    pub fn value(&self) -> f64 {
        self.base.property().data::<f64>()
    }

    /// Store a clamped value. Non-finite results are refused since JSON
    /// would encode them as null.
    fn write(&self, value: f64) -> bool {
        let value = self.info.clamp(value);
        if !value.is_finite() {
            tracing::warn!("Ignored non-finite value for {}", self.base.property().name());
            return false;
        }
        self.base.property().set_value(Some(Value::from(value)));
        true
    }
}

impl EditorType for NumberEditor {
    fn create(name: &str, property: Rc<Property>) -> Result<Self, RegistryError> {
        let info = property.editor_additional_data::<NumberInfo>();
        Ok(Self {
            base: EditorBase::new(name, property),
            info,
            draft: TextDraft::default(),
        })
    }

    fn default_value() -> Option<Value> {
        Some(Value::from(0))
    }
}

impl PropertyEditor for NumberEditor {
    fn base(&self) -> &EditorBase {
        &self.base
    }

    fn view(&self) -> EditorView {
        let widget = match self.draft.get(self.base.revision()) {
            Some(text) => Widget::Text {
                text: text.to_string(),
                valid: parse_number(text).is_some(),
            },
            None => Widget::Text {
                text: format_number(self.value(), self.info.precision()),
                valid: true,
            },
        };
        self.base.view(widget)
    }

    fn apply(&mut self, input: EditorInput) -> DrawResult {
        let revision = self.base.revision();
        match input {
            EditorInput::Text(text) => {
                self.draft.set(revision, text);
                DrawResult::EditStarted
            }
            EditorInput::Commit => match self.draft.take(revision).as_deref().and_then(parse_number) {
                Some(value) if self.write(value) => DrawResult::EditEnded,
                _ => DrawResult::Unchanged,
            },
            EditorInput::Nudge(steps) => {
                self.draft.clear();
                if self.write(self.value() + f64::from(steps) * self.info.step()) {
                    DrawResult::Changed
                } else {
                    DrawResult::Unchanged
                }
            }
            _ => DrawResult::Unchanged,
        }
    }

    fn update_editor(&mut self) {
        self.draft.clear();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
