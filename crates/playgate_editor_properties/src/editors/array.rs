// SPDX-License-Identifier: MIT OR Apache-2.0
//! `[T]` editors: arrays whose elements are edited by the `T` editor.

use super::{build_child, ChildRow};
use crate::editor::{DrawResult, EditorBase, EditorInput, EditorView, PropertyEditor, Widget};
use crate::error::RegistryError;
use crate::property::Property;
use crate::registry::EditorRegistry;
use serde_json::Value;
use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

/// Editor for `[T]` properties
pub struct ArrayEditor {
    base: EditorBase,
    element_id: String,
    registry: Rc<EditorRegistry>,
}

impl ArrayEditor {
    /// Bind an array editor whose elements use `element_id`
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

    /// Editor id of the elements
    pub fn element_id(&self) -> &str {
        &self.element_id
    }

    /// Number of elements in the stored value
    pub fn len(&self) -> usize {
        match self.base.property().value() {
            Some(Value::Array(items)) => items.len(),
            _ => 0,
        }
    }

    /// Whether the stored value has no elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Open the array explorer on a copy of the value
    pub fn explore(&self) -> Result<ArraySession, RegistryError> {
        ArraySession::open(
            &self.element_id,
            Rc::clone(&self.registry),
            Rc::clone(self.base.property()),
        )
    }
}

impl PropertyEditor for ArrayEditor {
    fn base(&self) -> &EditorBase {
        &self.base
    }

    fn view(&self) -> EditorView {
        self.base.view(Widget::Button {
            caption: "Explore array".to_string(),
            summary: format!("{} items", self.len()),
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

impl std::fmt::Debug for ArrayEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArrayEditor")
            .field("base", &self.base)
            .field("element_id", &self.element_id)
            .finish()
    }
}

/// The array explorer.
///
/// Works on a copy of the array. Child editors write into the copy; the
/// target property is written once, on commit.
pub struct ArraySession {
    element_id: String,
    registry: Rc<EditorRegistry>,
    target: Rc<Property>,
    items: Rc<RefCell<Vec<Value>>>,
    rows: Vec<ChildRow>,
    generation: u64,
}

impl ArraySession {
    fn open(
        element_id: &str,
        registry: Rc<EditorRegistry>,
        target: Rc<Property>,
    ) -> Result<Self, RegistryError> {
        if !registry.can_resolve(element_id) {
            return Err(RegistryError::UnknownEditor(element_id.to_string()));
        }
        let items = match target.value() {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        };

        let mut session = Self {
            element_id: element_id.to_string(),
            registry,
            target,
            items: Rc::new(RefCell::new(items)),
            rows: Vec::new(),
            generation: 0,
        };
        session.rebuild();
        tracing::debug!(
            "Opened array explorer: {} ({} items)",
            session.target.name(),
            session.len()
        );
        Ok(session)
    }

    /// Recreate every child editor from the working copy
    pub fn rebuild(&mut self) {
        self.rows.clear();
        let items = self.items.borrow().clone();
        for (index, value) in items.into_iter().enumerate() {
            let (row, property) = build_child(
                &self.registry,
                &self.element_id,
                &index.to_string(),
                Some(value),
                None,
            );
            if let Some(property) = property {
                let items = Rc::downgrade(&self.items);
                property.subscribe(move |changed| {
                    if let Some(items) = items.upgrade() {
                        if let Some(slot) = items.borrow_mut().get_mut(index) {
                            *slot = changed.value().unwrap_or(Value::Null);
                        }
                    }
                });
            }
            self.rows.push(row);
        }
        self.generation += 1;
    }

    /// Editor id of the elements
    pub fn element_id(&self) -> &str {
        &self.element_id
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    /// Whether the working copy is empty
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// Working copy of the array
    pub fn value(&self) -> Vec<Value> {
        self.items.borrow().clone()
    }

    /// Incremented on every rebuild
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// One row per element
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

    /// Forward an input to the editor of one element
    pub fn apply(&mut self, index: usize, input: EditorInput) -> DrawResult {
        self.rows
            .get_mut(index)
            .map_or(DrawResult::Unchanged, |row| row.apply(input))
    }

    /// Insert a null element before `index`
    pub fn insert(&mut self, index: usize) -> bool {
        {
            let mut items = self.items.borrow_mut();
            if index >= items.len() {
                return false;
            }
            items.insert(index, Value::Null);
        }
        self.rebuild();
        true
    }

    /// Append a null element
    pub fn append(&mut self) {
        self.items.borrow_mut().push(Value::Null);
        self.rebuild();
    }

    /// Remove the element at `index`
    pub fn delete(&mut self, index: usize) -> bool {
        {
            let mut items = self.items.borrow_mut();
            if index >= items.len() {
                return false;
            }
            items.remove(index);
        }
        self.rebuild();
        true
    }

    /// Write the working copy to the target property
    pub fn commit(self) {
        let items = self.value();
        tracing::info!(
            "Committed array explorer: {} ({} items)",
            self.target.name(),
            items.len()
        );
        self.target.set_value(Some(Value::Array(items)));
    }

    /// Close without writing
    pub fn cancel(self) {
        tracing::debug!("Cancelled array explorer: {}", self.target.name());
    }
}

impl std::fmt::Debug for ArraySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArraySession")
            .field("element_id", &self.element_id)
            .field("target", &self.target.name())
            .field("items", &self.items.borrow())
            .field("rows", &self.rows)
            .field("generation", &self.generation)
            .finish()
    }
}
