// SPDX-License-Identifier: MIT OR Apache-2.0
//! Drop-down over a label to integer map.

use crate::editor::{DrawResult, EditorBase, EditorInput, EditorView, PropertyEditor, Widget};
use crate::error::RegistryError;
use crate::property::Property;
use crate::registry::EditorType;
use indexmap::IndexMap;
use serde_json::Value;
use std::any::Any;
use std::rc::Rc;

/// Editor data of `enumeration` properties: option label to stored value
pub type EnumerationInfo = IndexMap<String, i64>;

/// Editor for `enumeration` properties
#[derive(Debug)]
pub struct EnumerationEditor {
    base: EditorBase,
    info: EnumerationInfo,
}

impl EnumerationEditor {
    /// Options in display order
    pub fn info(&self) -> &EnumerationInfo {
        &self.info
    }

    /// Stored value; 0 when absent
    pub fn value(&self) -> i64 {
        self.base.property().data::<i64>()
    }

    /// Index of the first option whose value matches the stored value
    pub fn selected(&self) -> Option<usize> {
        let value = self.value();
        self.info.values().position(|option| *option == value)
    }
}

impl EditorType for EnumerationEditor {
    fn create(name: &str, property: Rc<Property>) -> Result<Self, RegistryError> {
        let info = property.editor_additional_data::<EnumerationInfo>();
        Ok(Self {
            base: EditorBase::new(name, property),
            info,
        })
    }

    fn default_value() -> Option<Value> {
        Some(Value::from(0))
    }
}

impl PropertyEditor for EnumerationEditor {
    fn base(&self) -> &EditorBase {
        &self.base
    }

    fn view(&self) -> EditorView {
        self.base.view(Widget::Choice {
            options: self.info.keys().cloned().collect(),
            selected: self.selected(),
        })
    }

    fn apply(&mut self, input: EditorInput) -> DrawResult {
        let EditorInput::Select(label) = input else {
            return DrawResult::Unchanged;
        };
        let Some(&value) = self.info.get(&label) else {
            tracing::debug!("Unknown enumeration option: {}", label);
            return DrawResult::Unchanged;
        };
        if value == self.value() && self.base.property().has_value() {
            return DrawResult::Unchanged;
        }
        self.base.property().set_value(Some(Value::from(value)));
        DrawResult::Changed
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
