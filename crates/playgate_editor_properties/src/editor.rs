// SPDX-License-Identifier: MIT OR Apache-2.0
//! Property editor trait and the headless view/input protocol.
//!
//! Editors do not draw. [`PropertyEditor::view`] describes what a front end
//! should show and [`PropertyEditor::apply`] accepts what it sends back.

use crate::event::{Observers, SubscriptionId};
use crate::property::Property;
use playgate_editor_curves::{Color, CurveSet};
use std::any::Any;
use std::cell::Cell;
use std::rc::Rc;

/// Result of applying an input - indicates whether the value was changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawResult {
    /// Value was not modified
    Unchanged,
    /// Value was modified
    Changed,
    /// Value editing started (a draft exists, nothing written yet)
    EditStarted,
    /// Value editing ended and the draft was written
    EditEnded,
}

impl DrawResult {
    /// Whether the property value was written
    pub fn is_changed(&self) -> bool {
        matches!(self, DrawResult::Changed | DrawResult::EditEnded)
    }
}

/// What a front end should render for one editor
#[derive(Debug, Clone, PartialEq)]
pub struct EditorView {
    /// Display label
    pub label: String,
    /// Editor id of the bound property
    pub editor: String,
    /// Widget content
    pub widget: Widget,
}

/// Widget content of an [`EditorView`]
#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    /// Single line text field
    Text {
        /// Displayed text
        text: String,
        /// False while the text does not parse
        valid: bool,
    },
    /// On/off toggle
    Toggle {
        /// Toggle state
        checked: bool,
    },
    /// Drop-down list
    Choice {
        /// Option labels in display order
        options: Vec<String>,
        /// Selected option
        selected: Option<usize>,
    },
    /// Color swatch, optionally with an alpha field in `0..=255`
    Color {
        /// Current color
        color: Color,
        /// Alpha text, for editors exposing alpha
        alpha_text: Option<String>,
        /// False while the alpha text does not parse
        valid: bool,
    },
    /// Three component text fields
    Vector {
        /// X, Y and Z texts
        fields: [String; 3],
        /// Per component validity
        valid: [bool; 3],
    },
    /// Curve preview
    Curve {
        /// Curves to preview
        curves: CurveSet,
        /// Curve names; empty for a single curve
        names: Vec<String>,
    },
    /// A button opening a dialog session
    Button {
        /// Button caption
        caption: String,
        /// Short description of the current value
        summary: String,
    },
    /// Nested editors with actions
    Group {
        /// Child views in display order
        children: Vec<EditorView>,
        /// Available actions
        actions: Vec<String>,
    },
    /// An editor that could not be created
    Error {
        /// Error message
        message: String,
    },
}

/// Input sent by a front end to an editor
#[derive(Debug, Clone, PartialEq)]
pub enum EditorInput {
    /// Text typed into the main text field
    Text(String),
    /// Text typed into one component field
    Component {
        /// Component index
        index: usize,
        /// Typed text
        text: String,
    },
    /// Focus left the text fields
    Commit,
    /// Step a number up or down by its configured step
    Nudge(i32),
    /// Toggle state changed
    Toggle(bool),
    /// An option label was selected
    Select(String),
    /// A color was picked; alpha is kept from the current value
    Color(Color),
    /// Alpha slider moved
    Alpha(u8),
    /// Replace an absent value with the type default
    MakeDefault,
    /// Clear the value
    DeleteValue,
    /// Forward an input to a nested editor
    Child {
        /// Nested property key
        key: String,
        /// Forwarded input
        input: Box<EditorInput>,
    },
}

/// An editor bound to one property
pub trait PropertyEditor: Any {
    /// Shared editor state
    fn base(&self) -> &EditorBase;

    /// Describe the editor
    fn view(&self) -> EditorView;

    /// Apply a front end input
    fn apply(&mut self, input: EditorInput) -> DrawResult;

    /// Re-synchronise editor state with the property
    fn update_editor(&mut self) {}

    /// Upcast for downcasting to the concrete editor
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the concrete editor
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Display label
    fn label(&self) -> &str {
        self.base().label()
    }

    /// Bound property
    fn property(&self) -> &Rc<Property> {
        self.base().property()
    }

    /// Raised when the editor's layout changes (rows added or removed)
    fn layout_changed(&self) -> &Observers<str> {
        self.base().layout_changed()
    }
}

impl dyn PropertyEditor {
    /// Downcast to a concrete editor
    pub fn downcast_ref<T: PropertyEditor>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    /// Mutably downcast to a concrete editor
    pub fn downcast_mut<T: PropertyEditor>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut()
    }
}

/// State shared by every editor: label, property subscription, layout observers.
///
/// The base counts value changes of the property so editors can discard text
/// drafts made against an older value.
pub struct EditorBase {
    label: String,
    property: Rc<Property>,
    revision: Rc<Cell<u64>>,
    subscription: SubscriptionId,
    layout_changed: Observers<str>,
}

impl EditorBase {
    /// Bind to a property; an empty `name` falls back to the property name
    pub fn new(name: &str, property: Rc<Property>) -> Self {
        let revision = Rc::new(Cell::new(0));
        let counter = Rc::clone(&revision);
        let subscription = property.subscribe(move |_| counter.set(counter.get() + 1));
        let label = if name.is_empty() {
            property.name().to_string()
        } else {
            name.to_string()
        };

        Self {
            label,
            property,
            revision,
            subscription,
            layout_changed: Observers::new(),
        }
    }

    /// Display label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Bound property
    pub fn property(&self) -> &Rc<Property> {
        &self.property
    }

    /// Number of value changes seen since binding
    pub fn revision(&self) -> u64 {
        self.revision.get()
    }

    /// Layout change observers
    pub fn layout_changed(&self) -> &Observers<str> {
        &self.layout_changed
    }

    /// Notify layout observers
    pub fn raise_layout_changed(&self) {
        self.layout_changed.notify(&self.label);
    }

    /// Build a view for this editor
    pub fn view(&self, widget: Widget) -> EditorView {
        EditorView {
            label: self.label.clone(),
            editor: self.property.editor().to_string(),
            widget,
        }
    }
}

impl Drop for EditorBase {
    fn drop(&mut self) {
        self.property.unsubscribe(self.subscription);
    }
}

impl std::fmt::Debug for EditorBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBase")
            .field("label", &self.label)
            .field("property", &self.property.name())
            .field("revision", &self.revision.get())
            .finish()
    }
}

/// Text typed by the user, valid only against the value it was typed over.
#[derive(Debug, Clone, Default)]
pub(crate) struct TextDraft {
    revision: u64,
    text: Option<String>,
}

impl TextDraft {
    pub(crate) fn set(&mut self, revision: u64, text: String) {
        self.revision = revision;
        self.text = Some(text);
    }

    pub(crate) fn get(&self, revision: u64) -> Option<&str> {
        self.text.as_deref().filter(|_| self.revision == revision)
    }

    pub(crate) fn take(&mut self, revision: u64) -> Option<String> {
        let text = self.text.take();
        text.filter(|_| self.revision == revision)
    }

    pub(crate) fn clear(&mut self) {
        self.text = None;
    }
}

/// Parse user text as a finite number
pub(crate) fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Format a number for a text field
pub(crate) fn format_number(value: f64, precision: Option<usize>) -> String {
    match precision {
        Some(digits) => format!("{value:.digits$}"),
        None => value.to_string(),
    }
}
