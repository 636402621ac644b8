// SPDX-License-Identifier: MIT OR Apache-2.0
//! Color swatch without alpha.

use super::write_data;
use crate::editor::{DrawResult, EditorBase, EditorInput, EditorView, PropertyEditor, Widget};
use crate::error::RegistryError;
use crate::property::Property;
use crate::registry::EditorType;
use playgate_editor_curves::Color;
use serde_json::{json, Value};
use std::any::Any;
use std::rc::Rc;

/// Editor for `rgb` properties. Alpha is never edited and is kept as stored.
#[derive(Debug)]
pub struct RgbEditor {
    base: EditorBase,
}

impl RgbEditor {
    /// Current color; white when absent
    pub fn color(&self) -> Color {
        self.base.property().data::<Color>()
    }
}

impl EditorType for RgbEditor {
    fn create(name: &str, property: Rc<Property>) -> Result<Self, RegistryError> {
        Ok(Self {
            base: EditorBase::new(name, property),
        })
    }

    fn default_value() -> Option<Value> {
        Some(json!([1.0, 1.0, 1.0]))
    }
}

impl PropertyEditor for RgbEditor {
    fn base(&self) -> &EditorBase {
        &self.base
    }

    fn view(&self) -> EditorView {
        self.base.view(Widget::Color {
            color: self.color(),
            alpha_text: None,
            valid: true,
        })
    }

    fn apply(&mut self, input: EditorInput) -> DrawResult {
        match input {
            EditorInput::Color(picked) => {
                let alpha = self.color().a();
                let color = Color::new(picked.r(), picked.g(), picked.b(), alpha);
                write_data(self.base.property(), &color)
            }
            _ => DrawResult::Unchanged,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_keeps_stored_alpha() {
        let property = Rc::new(Property::create("tint", "rgb", &json!([1.0, 0.5, 0.0, 0.25])).unwrap());
        let mut editor = RgbEditor::create("", Rc::clone(&property)).unwrap();

        let result = editor.apply(EditorInput::Color(Color::new(0.0, 0.0, 1.0, 1.0)));
        assert_eq!(result, DrawResult::Changed);
        assert_eq!(property.data::<Color>(), Color::new(0.0, 0.0, 1.0, 0.25));
    }

    #[test]
    fn test_three_component_value_reads_opaque() {
        let property = Rc::new(Property::create("tint", "rgb", &json!([1.0, 0.5, 0.0])).unwrap());
        let editor = RgbEditor::create("", property).unwrap();
        assert_eq!(editor.color(), Color::new(1.0, 0.5, 0.0, 1.0));
        assert!(matches!(
            editor.view().widget,
            Widget::Color { alpha_text: None, .. }
        ));
    }
}
