// SPDX-License-Identifier: MIT OR Apache-2.0
//! Property editing framework for the `PlayGate` editor.
//!
//! This crate provides the data side of the inspector:
//! - A reactive [`Property`] cell holding JSON values with change notification
//! - [`PropertiesModel`], the ordered list of properties shown by an inspector
//! - [`EditorRegistry`], resolving editor ids (`id`, `[id]`, `{id}`) to editors
//! - Built-in editors for numbers, strings, colors, vectors, enumerations and curves
//! - Composite editors for arrays, objects and descriptor-defined custom types
//! - Template-file editors driven through a [`template::TemplateHost`]
//!
//! ## Architecture
//!
//! Everything runs on one thread. Properties are shared as `Rc<Property>` and
//! editors observe them through subscription handles; composite editors hold
//! an `Rc<EditorRegistry>` so element editors resolve recursively.

pub mod descriptor;
pub mod editor;
pub mod editors;
pub mod error;
pub mod event;
pub mod inspector;
pub mod property;
pub mod registry;
pub mod template;

pub use descriptor::{PropertyDescriptor, TypeDescriptor};
pub use editor::{DrawResult, EditorBase, EditorInput, EditorView, PropertyEditor, Widget};
pub use error::{DescriptorError, PropertyError, RegistryError, TemplateError};
pub use event::{Observers, SubscriptionId};
pub use inspector::{InspectorRow, PropertiesInspector};
pub use property::{PropertiesModel, Property};
pub use registry::{EditorFactory, EditorId, EditorRegistry, EditorType};
pub use template::{TemplateEditor, TemplateHost, TemplateSession, TemplateSignal, WindowSize};
