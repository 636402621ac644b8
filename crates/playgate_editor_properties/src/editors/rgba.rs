// SPDX-License-Identifier: MIT OR Apache-2.0
//! Color swatch with an alpha field in `0..=255`.

use super::write_data;
use crate::editor::{
    parse_number, DrawResult, EditorBase, EditorInput, EditorView, PropertyEditor, TextDraft,
    Widget,
};
use crate::error::RegistryError;
use crate::property::Property;
use crate::registry::EditorType;
use playgate_editor_curves::Color;
use serde_json::{json, Value};
use std::any::Any;
use std::rc::Rc;

/// Editor for `rgba` properties
#[derive(Debug)]
pub struct RgbaEditor {
    base: EditorBase,
    alpha_draft: TextDraft,
}

impl RgbaEditor {
    /// Current color; white when absent
    pub fn color(&self) -> Color {
        self.base.property().data::<Color>()
    }

    fn write_alpha(&mut self, alpha: f32) -> DrawResult {
        self.alpha_draft.clear();
        let mut color = self.color();
        color.set_a(alpha);
        write_data(self.base.property(), &color)
    }
}

impl EditorType for RgbaEditor {
    fn create(name: &str, property: Rc<Property>) -> Result<Self, RegistryError> {
        Ok(Self {
            base: EditorBase::new(name, property),
            alpha_draft: TextDraft::default(),
        })
    }

    fn default_value() -> Option<Value> {
        Some(json!([1.0, 1.0, 1.0, 1.0]))
    }
}

impl PropertyEditor for RgbaEditor {
    fn base(&self) -> &EditorBase {
        &self.base
    }

    fn view(&self) -> EditorView {
        let color = self.color();
        let (alpha_text, valid) = match self.alpha_draft.get(self.base.revision()) {
            Some(text) => (text.to_string(), parse_number(text).is_some()),
            None => (color.alpha_byte().to_string(), true),
        };
        self.base.view(Widget::Color {
            color,
            alpha_text: Some(alpha_text),
            valid,
        })
    }

    fn apply(&mut self, input: EditorInput) -> DrawResult {
        match input {
            EditorInput::Color(picked) => {
                self.alpha_draft.clear();
                let alpha = self.color().a();
                let color = Color::new(picked.r(), picked.g(), picked.b(), alpha);
                write_data(self.base.property(), &color)
            }
            EditorInput::Alpha(byte) => self.write_alpha(f32::from(byte) / 255.0),
            EditorInput::Text(text) => match parse_number(&text) {
                Some(value) => self.write_alpha((value / 255.0) as f32),
                None => {
                    self.alpha_draft.set(self.base.revision(), text);
                    DrawResult::Unchanged
                }
            },
            EditorInput::Commit => {
                self.alpha_draft.clear();
                DrawResult::Unchanged
            }
            _ => DrawResult::Unchanged,
        }
    }

    fn update_editor(&mut self) {
        self.alpha_draft.clear();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
