// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editors for custom types described by a [`TypeDescriptor`].
//!
//! The value is a JSON object. Each descriptor property gets a nested
//! property and child editor; child edits are written into the parent object.

use super::{build_child, ChildRow};
use crate::descriptor::TypeDescriptor;
use crate::editor::{DrawResult, EditorBase, EditorInput, EditorView, PropertyEditor, Widget};
use crate::property::Property;
use crate::registry::EditorRegistry;
use serde_json::{Map, Value};
use std::any::Any;
use std::rc::{Rc, Weak};

/// Action offered while the value is absent
pub const MAKE_DEFAULT_ACTION: &str = "Make default value";
/// Action offered while the value is present
pub const DELETE_VALUE_ACTION: &str = "Delete value";

/// Editor for descriptor-defined custom types
pub struct CustomEditor {
    base: EditorBase,
    descriptor: Rc<TypeDescriptor>,
    registry: Rc<EditorRegistry>,
    rows: Vec<ChildRow>,
    children: Vec<Rc<Property>>,
}

impl CustomEditor {
    /// Bind to a property and build child editors for a present value
    pub fn new(
        descriptor: Rc<TypeDescriptor>,
        registry: Rc<EditorRegistry>,
        name: &str,
        property: Rc<Property>,
    ) -> Self {
        let mut editor = Self {
            base: EditorBase::new(name, property),
            descriptor,
            registry,
            rows: Vec::new(),
            children: Vec::new(),
        };
        editor.rebuild();
        editor
    }

    /// Type descriptor
    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    /// Child rows, ordered by key
    pub fn rows(&self) -> &[ChildRow] {
        &self.rows
    }

    /// Child editor for a nested key
    pub fn child_mut(&mut self, key: &str) -> Option<&mut (dyn PropertyEditor + 'static)> {
        self.rows
            .iter_mut()
            .find(|row| row.key() == key)
            .and_then(ChildRow::editor_mut)
    }

    /// Value a reset starts from: the descriptor default when it is an
    /// object, otherwise an object with every key set to null
    pub fn default_object(&self) -> Value {
        match &self.descriptor.default_value {
            Some(Value::Object(map)) => Value::Object(map.clone()),
            _ => Value::Object(
                self.descriptor
                    .properties
                    .keys()
                    .map(|key| (key.clone(), Value::Null))
                    .collect(),
            ),
        }
    }

    fn rebuild(&mut self) {
        self.rows.clear();
        self.children.clear();
        let Some(value) = self.base.property().value() else {
            return;
        };
        let parent = Rc::downgrade(self.base.property());

        for key in self.descriptor.sorted_keys() {
            let Some(entry) = self.descriptor.properties.get(key) else {
                continue;
            };
            let child_value = value.get(key).cloned();

            let (row, property) = if let Some(editor_id) = entry.editor_id() {
                build_child(
                    &self.registry,
                    editor_id,
                    key,
                    child_value,
                    entry.editor_data.clone(),
                )
            } else if let Some(inline) = &entry.type_descriptor {
                let editor_id = format!("{}.{}", self.base.property().editor(), key);
                match Property::with_value(key, editor_id, child_value, entry.editor_data.clone()) {
                    Ok(property) => {
                        let property = Rc::new(property);
                        let editor = self.registry.create_custom(
                            Rc::new(inline.as_ref().clone()),
                            key,
                            Rc::clone(&property),
                        );
                        let row = ChildRow::Editor {
                            key: key.to_string(),
                            editor,
                        };
                        (row, Some(property))
                    }
                    Err(err) => {
                        let row = ChildRow::Error {
                            key: key.to_string(),
                            message: err.to_string(),
                        };
                        (row, None)
                    }
                }
            } else {
                continue;
            };

            if let Some(property) = property {
                property.subscribe(write_back(parent.clone(), key.to_string()));
                self.children.push(property);
            }
            self.rows.push(row);
        }
    }
}

/// Handler copying a child value into the parent object
fn write_back(parent: Weak<Property>, key: String) -> impl Fn(&Property) + 'static {
    move |child: &Property| {
        let Some(parent) = parent.upgrade() else {
            return;
        };
        let value = child.value().unwrap_or(Value::Null);
        let mut object = match parent.value() {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };
        if object.get(&key) == Some(&value) {
            return;
        }
        object.insert(key.clone(), value);
        parent.set_value(Some(Value::Object(object)));
    }
}

impl PropertyEditor for CustomEditor {
    fn base(&self) -> &EditorBase {
        &self.base
    }

    fn view(&self) -> EditorView {
        let property = self.base.property();
        let widget = if !property.has_value() {
            let actions = if self.descriptor.properties.is_empty() {
                Vec::new()
            } else {
                vec![MAKE_DEFAULT_ACTION.to_string()]
            };
            Widget::Group {
                children: Vec::new(),
                actions,
            }
        } else {
            Widget::Group {
                children: self.rows.iter().map(ChildRow::view).collect(),
                actions: vec![DELETE_VALUE_ACTION.to_string()],
            }
        };
        self.base.view(widget)
    }

    fn apply(&mut self, input: EditorInput) -> DrawResult {
        match input {
            EditorInput::MakeDefault
                if !self.base.property().has_value() && !self.descriptor.properties.is_empty() =>
            {
                let value = self.default_object();
                self.base.property().set_value(Some(value));
                self.rebuild();
                self.base.raise_layout_changed();
                DrawResult::Changed
            }
            EditorInput::DeleteValue if self.base.property().has_value() => {
                self.base.property().set_value(None);
                self.rebuild();
                self.base.raise_layout_changed();
                DrawResult::Changed
            }
            EditorInput::Child { key, input } => self
                .rows
                .iter_mut()
                .find(|row| row.key() == key)
                .map_or(DrawResult::Unchanged, |row| row.apply(*input)),
            _ => DrawResult::Unchanged,
        }
    }

    fn update_editor(&mut self) {
        let property = Rc::clone(self.base.property());
        let Some(value) = property.value() else {
            if !self.rows.is_empty() {
                self.rebuild();
                self.base.raise_layout_changed();
            }
            return;
        };
        if self.rows.is_empty() && !self.descriptor.properties.is_empty() {
            self.rebuild();
            self.base.raise_layout_changed();
            return;
        }

        for child in &self.children {
            let expected = value.get(child.name()).cloned().filter(|v| !v.is_null());
            if child.value() != expected {
                child.set_value(expected);
            }
        }
        for row in &mut self.rows {
            if let Some(editor) = row.editor_mut() {
                editor.update_editor();
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl std::fmt::Debug for CustomEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomEditor")
            .field("base", &self.base)
            .field("descriptor", &self.descriptor)
            .field("rows", &self.rows)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::PropertyDescriptor;
    use crate::editors::{register_builtin, NumberEditor};
    use serde_json::json;
    use std::cell::Cell;

    fn date() -> TypeDescriptor {
        TypeDescriptor::new()
            .with_property("day", PropertyDescriptor::new("number").with_editor_data(json!({"min": 1, "max": 31})))
            .with_property("month", PropertyDescriptor::new("number"))
            .with_property("label", PropertyDescriptor::new("string"))
    }

    fn setup(value: Option<Value>) -> (Rc<Property>, Box<dyn PropertyEditor>) {
        let registry = EditorRegistry::shared();
        register_builtin(&registry);
        registry.register_descriptor("Date", date());
        let property = Rc::new(Property::with_value("date", "Date", value, None).unwrap());
        let editor = registry.create_control("Date", "", Rc::clone(&property)).unwrap();
        (property, editor)
    }

    fn child(key: &str, input: EditorInput) -> EditorInput {
        EditorInput::Child {
            key: key.to_string(),
            input: Box::new(input),
        }
    }

    #[test]
    fn test_absent_value_offers_make_default() {
        let (property, mut editor) = setup(None);
        assert_eq!(
            editor.view().widget,
            Widget::Group {
                children: Vec::new(),
                actions: vec![MAKE_DEFAULT_ACTION.to_string()]
            }
        );

        let layouts = Rc::new(Cell::new(0));
        let counter = Rc::clone(&layouts);
        editor.layout_changed().subscribe(move |_| counter.set(counter.get() + 1));

        assert_eq!(editor.apply(EditorInput::MakeDefault), DrawResult::Changed);
        assert_eq!(property.value(), Some(json!({"day": null, "month": null, "label": null})));
        assert_eq!(layouts.get(), 1);

        let custom = editor.downcast_ref::<CustomEditor>().unwrap();
        let keys: Vec<_> = custom.rows().iter().map(|r| r.key().to_string()).collect();
        assert_eq!(keys, ["day", "label", "month"]);
    }

    #[test]
    fn test_descriptor_default_is_used() {
        let registry = EditorRegistry::shared();
        register_builtin(&registry);
        let descriptor = date().with_default(json!({"day": 1, "month": 1, "label": "new year"}));
        let property = Rc::new(Property::new("date", "Date").unwrap());
        let mut editor = CustomEditor::new(Rc::new(descriptor), registry, "", Rc::clone(&property));

        editor.apply(EditorInput::MakeDefault);
        assert_eq!(property.value(), Some(json!({"day": 1, "month": 1, "label": "new year"})));
    }

    #[test]
    fn test_child_edit_writes_parent_field() {
        let (property, mut editor) = setup(Some(json!({"day": 5, "month": 2, "label": "x"})));
        let writes = Rc::new(Cell::new(0));
        let counter = Rc::clone(&writes);
        property.subscribe(move |_| counter.set(counter.get() + 1));

        editor.apply(child("day", EditorInput::Text("40".into())));
        let result = editor.apply(child("day", EditorInput::Commit));
        assert_eq!(result, DrawResult::EditEnded);
        assert_eq!(property.value().map(|v| v["day"].clone()), Some(json!(31.0)));
        assert_eq!(property.value().map(|v| v["label"].clone()), Some(json!("x")));
        assert_eq!(writes.get(), 1);
    }

    #[test]
    fn test_child_editor_gets_descriptor_editor_data() {
        let (_, mut editor) = setup(Some(json!({"day": 5})));
        let custom = editor.downcast_mut::<CustomEditor>().unwrap();
        let day = custom.child_mut("day").unwrap();
        let number = day.downcast_ref::<NumberEditor>().unwrap();
        assert_eq!(number.info().max, Some(31.0));
    }

    #[test]
    fn test_delete_value_clears_rows() {
        let (property, mut editor) = setup(Some(json!({"day": 5})));
        assert_eq!(editor.apply(EditorInput::DeleteValue), DrawResult::Changed);
        assert_eq!(property.value(), None);
        assert!(editor.downcast_ref::<CustomEditor>().unwrap().rows().is_empty());
        assert_eq!(editor.apply(EditorInput::DeleteValue), DrawResult::Unchanged);
    }

    #[test]
    fn test_update_editor_pulls_external_changes() {
        let (property, mut editor) = setup(Some(json!({"day": 5, "month": 2})));
        property.set_value(Some(json!({"day": 9, "month": 2})));
        editor.update_editor();

        let custom = editor.downcast_mut::<CustomEditor>().unwrap();
        let day = custom.child_mut("day").unwrap();
        assert_eq!(day.property().value(), Some(json!(9)));
        // Syncing a child does not write the parent back
        assert_eq!(property.value(), Some(json!({"day": 9, "month": 2})));
    }

    #[test]
    fn test_inline_type_descriptor() {
        let registry = EditorRegistry::shared();
        register_builtin(&registry);
        let inner = TypeDescriptor::new().with_property("on", PropertyDescriptor::new("boolean"));
        let outer = TypeDescriptor::new().with_property("flags", PropertyDescriptor::inline(inner));
        registry.register_descriptor("Settings", outer);

        let property = Rc::new(
            Property::with_value("settings", "Settings", Some(json!({"flags": {"on": false}})), None).unwrap(),
        );
        let mut editor = registry.create_control("Settings", "", Rc::clone(&property)).unwrap();

        let custom = editor.downcast_mut::<CustomEditor>().unwrap();
        let flags = custom.child_mut("flags").unwrap();
        assert_eq!(flags.property().editor(), "Settings.flags");

        editor.apply(child("flags", child("on", EditorInput::Toggle(true))));
        assert_eq!(property.value(), Some(json!({"flags": {"on": true}})));
    }

    #[test]
    fn test_unresolved_child_becomes_error_row() {
        let registry = EditorRegistry::shared();
        let descriptor = TypeDescriptor::new().with_property("x", PropertyDescriptor::new("missing"));
        let property = Rc::new(Property::with_value("p", "P", Some(json!({})), None).unwrap());
        let editor = CustomEditor::new(Rc::new(descriptor), registry, "", property);

        match editor.view().widget {
            Widget::Group { children, .. } => {
                assert!(matches!(children[0].widget, Widget::Error { .. }));
            }
            other => panic!("unexpected widget {other:?}"),
        }
    }
}
