// SPDX-License-Identifier: MIT OR Apache-2.0
//! `{T}` editors: string-keyed maps whose values are edited by the `T` editor.

use super::{build_child, ChildRow};
use crate::editor::{DrawResult, EditorBase, EditorInput, EditorView, PropertyEditor, Widget};
use crate::error::RegistryError;
use crate::property::Property;
use crate::registry::EditorRegistry;
use serde_json::{Map, Value};
use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

/// Editor for `{T}` properties
pub struct ObjectEditor {
    base: EditorBase,
    element_id: String,
    registry: Rc<EditorRegistry>,
}

impl ObjectEditor {
    /// Bind an object editor whose values use `element_id`
    pub fn new(
        element_id: &str,
        registry: Rc<EditorRegistry>,
        name: &str,
        property: Rc<Property>,
    ) -> Self {
        Self {
            base: EditorBase::new(name, property),
            element_id: element_id.to_string(),
            registry,
        }
    }

    /// Editor id of the values
    pub fn element_id(&self) -> &str {
        &self.element_id
    }

    /// Number of entries in the stored value
    pub fn len(&self) -> usize {
        match self.base.property().value() {
            Some(Value::Object(map)) => map.len(),
            _ => 0,
        }
    }

    /// Whether the stored value has no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Open the object explorer on a copy of the value
    pub fn explore(&self) -> Result<ObjectSession, RegistryError> {
        ObjectSession::open(
            &self.element_id,
            Rc::clone(&self.registry),
            Rc::clone(self.base.property()),
        )
    }
}

impl PropertyEditor for ObjectEditor {
    fn base(&self) -> &EditorBase {
        &self.base
    }

    fn view(&self) -> EditorView {
        self.base.view(Widget::Button {
            caption: "Explore object".to_string(),
            summary: format!("{} entries", self.len()),
        })
    }

    fn apply(&mut self, _input: EditorInput) -> DrawResult {
        DrawResult::Unchanged
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl std::fmt::Debug for ObjectEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectEditor")
            .field("base", &self.base)
            .field("element_id", &self.element_id)
            .finish()
    }
}

/// The object explorer. Rows are ordered by key.
pub struct ObjectSession {
    element_id: String,
    registry: Rc<EditorRegistry>,
    target: Rc<Property>,
    entries: Rc<RefCell<Map<String, Value>>>,
    rows: Vec<ChildRow>,
    generation: u64,
}

impl ObjectSession {
    fn open(
        element_id: &str,
        registry: Rc<EditorRegistry>,
        target: Rc<Property>,
    ) -> Result<Self, RegistryError> {
        if !registry.can_resolve(element_id) {
            return Err(RegistryError::UnknownEditor(element_id.to_string()));
        }
        let entries = match target.value() {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };

        let mut session = Self {
            element_id: element_id.to_string(),
            registry,
            target,
            entries: Rc::new(RefCell::new(entries)),
            rows: Vec::new(),
            generation: 0,
        };
        session.rebuild();
        tracing::debug!(
            "Opened object explorer: {} ({} entries)",
            session.target.name(),
            session.len()
        );
        Ok(session)
    }

    /// Recreate every child editor from the working copy
    pub fn rebuild(&mut self) {
        self.rows.clear();
        let mut entries: Vec<(String, Value)> = self
            .entries
            .borrow()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        for (key, value) in entries {
            let (row, property) =
                build_child(&self.registry, &self.element_id, &key, Some(value), None);
            if let Some(property) = property {
                let entries = Rc::downgrade(&self.entries);
                let slot_key = key.clone();
                property.subscribe(move |changed| {
                    if let Some(entries) = entries.upgrade() {
                        if let Some(slot) = entries.borrow_mut().get_mut(&slot_key) {
                            *slot = changed.value().unwrap_or(Value::Null);
                        }
                    }
                });
            }
            self.rows.push(row);
        }
        self.generation += 1;
    }

    /// Editor id of the values
    pub fn element_id(&self) -> &str {
        &self.element_id
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether the working copy is empty
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Whether the working copy has `key`
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }

    /// Working copy of the object
    pub fn value(&self) -> Map<String, Value> {
        self.entries.borrow().clone()
    }

    /// Incremented on every rebuild
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// One row per entry, ordered by key
    pub fn rows(&self) -> &[ChildRow] {
        &self.rows
    }

    /// Mutable rows
    pub fn rows_mut(&mut self) -> &mut [ChildRow] {
        &mut self.rows
    }

    /// Views of every row
    pub fn views(&self) -> Vec<EditorView> {
        self.rows.iter().map(ChildRow::view).collect()
    }

    /// Forward an input to the editor of one entry
    pub fn apply(&mut self, key: &str, input: EditorInput) -> DrawResult {
        self.rows
            .iter_mut()
            .find(|row| row.key() == key)
            .map_or(DrawResult::Unchanged, |row| row.apply(input))
    }

    /// Add a null entry; empty and existing keys are refused
    pub fn add(&mut self, key: &str) -> bool {
        {
            let mut entries = self.entries.borrow_mut();
            if key.is_empty() || entries.contains_key(key) {
                return false;
            }
            entries.insert(key.to_string(), Value::Null);
        }
        self.rebuild();
        true
    }

    /// Move an entry to a new key in the same position; refused when the old
    /// key is missing or the new key is empty or taken
    pub fn rename(&mut self, from: &str, to: &str) -> bool {
        {
            let mut entries = self.entries.borrow_mut();
            if to.is_empty() || entries.contains_key(to) || !entries.contains_key(from) {
                return false;
            }
            *entries = std::mem::take(&mut *entries)
                .into_iter()
                .map(|(key, value)| if key == from { (to.to_string(), value) } else { (key, value) })
                .collect();
        }
        self.rebuild();
        true
    }

    /// Remove an entry. A missing key changes nothing, rows included.
    pub fn delete(&mut self, key: &str) -> bool {
        if self.entries.borrow_mut().shift_remove(key).is_none() {
            return false;
        }
        self.rebuild();
        true
    }

    /// Write the working copy to the target property
    pub fn commit(self) {
        let entries = self.value();
        tracing::info!(
            "Committed object explorer: {} ({} entries)",
            self.target.name(),
            entries.len()
        );
        self.target.set_value(Some(Value::Object(entries)));
    }

    /// Close without writing
    pub fn cancel(self) {
        tracing::debug!("Cancelled object explorer: {}", self.target.name());
    }
}

impl std::fmt::Debug for ObjectSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectSession")
            .field("element_id", &self.element_id)
            .field("target", &self.target.name())
            .field("entries", &self.entries.borrow())
            .field("rows", &self.rows)
            .field("generation", &self.generation)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editors::register_builtin;
    use serde_json::json;

    fn setup(value: Value) -> (Rc<Property>, ObjectEditor) {
        let registry = EditorRegistry::shared();
        register_builtin(&registry);
        let property = Rc::new(Property::with_value("weights", "{number}", Some(value), None).unwrap());
        let editor = ObjectEditor::new("number", registry, "", Rc::clone(&property));
        (property, editor)
    }

    fn keys(session: &ObjectSession) -> Vec<String> {
        session.rows().iter().map(|r| r.key().to_string()).collect()
    }

    #[test]
    fn test_rows_are_sorted_by_key() {
        let (_, editor) = setup(json!({"b": 2, "a": 1, "c": 3}));
        let session = editor.explore().unwrap();
        assert_eq!(keys(&session), ["a", "b", "c"]);
    }

    #[test]
    fn test_deleting_missing_key_is_a_noop() {
        let (_, editor) = setup(json!({"a": 1}));
        let mut session = editor.explore().unwrap();
        let generation = session.generation();

        assert!(!session.delete("zzz"));
        assert_eq!(session.generation(), generation);
        assert_eq!(session.value(), json!({"a": 1}).as_object().cloned().unwrap());

        assert!(session.delete("a"));
        assert!(session.is_empty());
        assert_eq!(session.generation(), generation + 1);
    }

    #[test]
    fn test_add_and_rename_refuse_bad_keys() {
        let (_, editor) = setup(json!({"a": 1}));
        let mut session = editor.explore().unwrap();

        assert!(!session.add(""));
        assert!(!session.add("a"));
        assert!(session.add("b"));
        assert_eq!(session.value().get("b"), Some(&Value::Null));

        assert!(!session.rename("a", "b"));
        assert!(!session.rename("a", ""));
        assert!(!session.rename("missing", "c"));
        assert!(session.rename("a", "z"));
        assert_eq!(keys(&session), ["b", "z"]);
        assert_eq!(session.value().get("z"), Some(&json!(1)));
    }

    #[test]
    fn test_delete_and_rename_keep_stored_order() {
        let (property, editor) = setup(json!({"c": 3, "a": 1, "d": 4, "b": 2}));
        let mut session = editor.explore().unwrap();

        assert!(session.delete("c"));
        assert!(session.rename("a", "z"));
        session.commit();

        let value = property.value().unwrap();
        let stored: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(stored, ["z", "d", "b"]);
    }

    #[test]
    fn test_child_edits_commit_together() {
        let (property, editor) = setup(json!({"a": 1, "b": 2}));
        let mut session = editor.explore().unwrap();

        session.apply("b", EditorInput::Text("5".into()));
        assert_eq!(session.apply("b", EditorInput::Commit), DrawResult::EditEnded);
        assert_eq!(property.value(), Some(json!({"a": 1, "b": 2})));

        session.commit();
        assert_eq!(property.value(), Some(json!({"a": 1, "b": 5.0})));
    }
}
