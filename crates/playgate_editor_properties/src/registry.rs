// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor registry: resolves editor ids to property editors.
//!
//! Three stores are keyed by editor id: concrete editor factories, declarative
//! type descriptors and template files. An id lives in at most one store.
//! Ids wrapped in `[..]` or `{..}` resolve to array-of and object-of editors
//! whose element id is resolved again through the same registry.

use crate::descriptor::TypeDescriptor;
use crate::editor::PropertyEditor;
use crate::editors::{ArrayEditor, CustomEditor, ObjectEditor};
use crate::error::RegistryError;
use crate::property::Property;
use crate::template::TemplateEditor;
use indexmap::IndexMap;
use serde_json::Value;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Builds an editor for `(name, property)`
pub type EditorFactory =
    Rc<dyn Fn(&str, Rc<Property>) -> Result<Box<dyn PropertyEditor>, RegistryError>>;

/// Provides the value a fresh property of an editor type starts with
pub type DefaultValueFn = Rc<dyn Fn() -> Option<Value>>;

/// A concrete editor type that can be registered with [`EditorRegistry::register`]
pub trait EditorType: PropertyEditor + Sized {
    /// Build the editor
    fn create(name: &str, property: Rc<Property>) -> Result<Self, RegistryError>;

    /// Default value of the edited type; `None` means the type provides none
    fn default_value() -> Option<Value> {
        None
    }
}

/// An editor id split into its composite form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorId<'a> {
    /// `[T]`: array of `T`
    Array(&'a str),
    /// `{T}`: object of `T`
    Object(&'a str),
    /// Anything else
    Plain(&'a str),
}

impl<'a> EditorId<'a> {
    /// Strip one level of `[..]` or `{..}`
    pub fn parse(id: &'a str) -> Self {
        if let Some(inner) = id.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            EditorId::Array(inner)
        } else if let Some(inner) = id.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            EditorId::Object(inner)
        } else {
            EditorId::Plain(id)
        }
    }
}

struct ControlEntry {
    factory: EditorFactory,
    default_value: Option<DefaultValueFn>,
}

#[derive(Default)]
struct Stores {
    types: IndexMap<String, ControlEntry>,
    descriptors: IndexMap<String, Rc<TypeDescriptor>>,
    templates: IndexMap<String, PathBuf>,
}

impl Stores {
    fn contains(&self, id: &str) -> bool {
        self.types.contains_key(id)
            || self.descriptors.contains_key(id)
            || self.templates.contains_key(id)
    }
}

enum Resolved {
    Factory(EditorFactory),
    Descriptor(Rc<TypeDescriptor>),
    Template(PathBuf),
}

/// Registry of property editors.
///
/// The registry is shared as `Rc<EditorRegistry>`; composite editors keep a
/// handle to it so registrations made later are visible to them.
#[derive(Default)]
pub struct EditorRegistry {
    stores: RefCell<Stores>,
}

impl EditorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty shared registry
    pub fn shared() -> Rc<Self> {
        Rc::new(Self::new())
    }

    /// Register a concrete editor type
    pub fn register<T: EditorType>(&self, id: &str) -> bool {
        let factory: EditorFactory = Rc::new(|name: &str, property: Rc<Property>| {
            T::create(name, property).map(|editor| Box::new(editor) as Box<dyn PropertyEditor>)
        });
        self.register_factory(id, factory, Some(Rc::new(T::default_value)))
    }

    /// Register an editor factory with an optional default value provider
    pub fn register_factory(
        &self,
        id: &str,
        factory: EditorFactory,
        default_value: Option<DefaultValueFn>,
    ) -> bool {
        let mut stores = self.stores.borrow_mut();
        if id.is_empty() || stores.contains(id) {
            tracing::warn!("Editor id already registered or empty: {:?}", id);
            return false;
        }
        stores.types.insert(
            id.to_string(),
            ControlEntry {
                factory,
                default_value,
            },
        );
        tracing::debug!("Registered editor type: {}", id);
        true
    }

    /// Register a declarative custom type
    pub fn register_descriptor(&self, id: &str, descriptor: TypeDescriptor) -> bool {
        let mut stores = self.stores.borrow_mut();
        if id.is_empty() || stores.contains(id) {
            tracing::warn!("Editor id already registered or empty: {:?}", id);
            return false;
        }
        stores.descriptors.insert(id.to_string(), Rc::new(descriptor));
        tracing::info!("Registered custom editor: {}", id);
        true
    }

    /// Register a template-file editor; the file must exist
    pub fn register_template(&self, id: &str, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        if !path.is_file() {
            tracing::warn!("Template editor file not found: {}", path.display());
            return false;
        }
        let mut stores = self.stores.borrow_mut();
        if id.is_empty() || stores.contains(id) {
            tracing::warn!("Editor id already registered or empty: {:?}", id);
            return false;
        }
        tracing::info!("Registered template editor: {} ({})", id, path.display());
        stores.templates.insert(id.to_string(), path);
        true
    }

    /// Remove an entry by editor id, or a template entry by its file path
    pub fn unregister(&self, id_or_path: &str) -> bool {
        let mut stores = self.stores.borrow_mut();
        let removed = stores.types.shift_remove(id_or_path).is_some()
            || stores.descriptors.shift_remove(id_or_path).is_some()
            || stores.templates.shift_remove(id_or_path).is_some();
        if removed {
            tracing::debug!("Unregistered editor: {}", id_or_path);
            return true;
        }

        let path = Path::new(id_or_path);
        let key = stores
            .templates
            .iter()
            .find(|(_, template)| template.as_path() == path)
            .map(|(id, _)| id.clone());
        match key {
            Some(id) => {
                stores.templates.shift_remove(&id);
                tracing::debug!("Unregistered template editor: {}", id);
                true
            }
            None => false,
        }
    }

    /// Remove the first descriptor equal to `descriptor`
    pub fn unregister_descriptor(&self, descriptor: &TypeDescriptor) -> bool {
        let mut stores = self.stores.borrow_mut();
        let key = stores
            .descriptors
            .iter()
            .find(|(_, registered)| registered.as_ref() == descriptor)
            .map(|(id, _)| id.clone());
        match key {
            Some(id) => {
                stores.descriptors.shift_remove(&id);
                tracing::debug!("Unregistered custom editor: {}", id);
                true
            }
            None => false,
        }
    }

    /// Remove every registration
    pub fn unregister_all(&self) {
        let mut stores = self.stores.borrow_mut();
        stores.types.clear();
        stores.descriptors.clear();
        stores.templates.clear();
        tracing::debug!("Cleared editor registry");
    }

    /// Whether an id is registered in any store (composite ids are not parsed)
    pub fn control_exists(&self, id: &str) -> bool {
        self.stores.borrow().contains(id)
    }

    /// Whether an id, including composite ids, resolves to an editor
    pub fn can_resolve(&self, id: &str) -> bool {
        match EditorId::parse(id) {
            EditorId::Array(inner) | EditorId::Object(inner) => {
                !inner.is_empty() && self.can_resolve(inner)
            }
            EditorId::Plain(id) => self.control_exists(id),
        }
    }

    /// All registered ids: editor types, then descriptors, then templates
    pub fn registered_ids(&self) -> Vec<String> {
        let stores = self.stores.borrow();
        stores
            .types
            .keys()
            .chain(stores.descriptors.keys())
            .chain(stores.templates.keys())
            .cloned()
            .collect()
    }

    /// Registered descriptor for an id
    pub fn descriptor(&self, id: &str) -> Option<Rc<TypeDescriptor>> {
        self.stores.borrow().descriptors.get(id).cloned()
    }

    /// Registered template file for an id
    pub fn template_path(&self, id: &str) -> Option<PathBuf> {
        self.stores.borrow().templates.get(id).cloned()
    }

    /// Create the editor for `id`, or `None` when nothing resolves
    pub fn create_control(
        self: &Rc<Self>,
        id: &str,
        name: &str,
        property: Rc<Property>,
    ) -> Option<Box<dyn PropertyEditor>> {
        match self.try_create_control(id, name, property) {
            Ok(editor) => Some(editor),
            Err(err) => {
                tracing::warn!("{}", err);
                None
            }
        }
    }

    /// Create the editor for `id`, reporting why resolution failed
    pub fn try_create_control(
        self: &Rc<Self>,
        id: &str,
        name: &str,
        property: Rc<Property>,
    ) -> Result<Box<dyn PropertyEditor>, RegistryError> {
        let unresolved = || RegistryError::Unresolved {
            name: property.name().to_string(),
            id: id.to_string(),
        };

        match EditorId::parse(id) {
            EditorId::Array("") | EditorId::Object("") => Err(unresolved()),
            EditorId::Array(inner) => Ok(Box::new(ArrayEditor::new(
                inner,
                Rc::clone(self),
                name,
                property,
            ))),
            EditorId::Object(inner) => Ok(Box::new(ObjectEditor::new(
                inner,
                Rc::clone(self),
                name,
                property,
            ))),
            EditorId::Plain(plain) => {
                // The store borrow must end before factories run; they may recurse.
                let resolved = self.resolve(plain);
                match resolved {
                    Some(Resolved::Factory(factory)) => factory(name, property),
                    Some(Resolved::Descriptor(descriptor)) => {
                        Ok(self.create_custom(descriptor, name, property))
                    }
                    Some(Resolved::Template(path)) => {
                        Ok(Box::new(TemplateEditor::new(path, name, property)))
                    }
                    None => Err(unresolved()),
                }
            }
        }
    }

    /// Create a descriptor-driven editor directly
    pub fn create_custom(
        self: &Rc<Self>,
        descriptor: Rc<TypeDescriptor>,
        name: &str,
        property: Rc<Property>,
    ) -> Box<dyn PropertyEditor> {
        Box::new(CustomEditor::new(descriptor, Rc::clone(self), name, property))
    }

    /// Default value of an editor id.
    ///
    /// Returns `Ok(None)` for template editors and unknown ids. A registered
    /// editor type without a default value provider, or a descriptor without a
    /// default value, is a configuration error.
    pub fn get_control_default_value(&self, id: &str) -> Result<Option<Value>, RegistryError> {
        match EditorId::parse(id) {
            EditorId::Array(_) => return Ok(Some(Value::Array(Vec::new()))),
            EditorId::Object(_) => return Ok(Some(Value::Object(serde_json::Map::new()))),
            EditorId::Plain(_) => {}
        }

        let stores = self.stores.borrow();
        if let Some(entry) = stores.types.get(id) {
            let provider = entry
                .default_value
                .clone()
                .ok_or_else(|| RegistryError::MissingDefault(id.to_string()))?;
            drop(stores);
            return match provider() {
                None => Err(RegistryError::MissingDefault(id.to_string())),
                Some(Value::Null) => Err(RegistryError::InvalidDefault(id.to_string())),
                Some(value) => Ok(Some(value)),
            };
        }
        if let Some(descriptor) = stores.descriptors.get(id) {
            return match &descriptor.default_value {
                None | Some(Value::Null) => Err(RegistryError::InvalidDefault(id.to_string())),
                Some(value) => Ok(Some(value.clone())),
            };
        }
        Ok(None)
    }

    fn resolve(&self, id: &str) -> Option<Resolved> {
        let stores = self.stores.borrow();
        if let Some(entry) = stores.types.get(id) {
            return Some(Resolved::Factory(Rc::clone(&entry.factory)));
        }
        if let Some(descriptor) = stores.descriptors.get(id) {
            return Some(Resolved::Descriptor(Rc::clone(descriptor)));
        }
        stores
            .templates
            .get(id)
            .map(|path| Resolved::Template(path.clone()))
    }
}

impl std::fmt::Debug for EditorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stores = self.stores.borrow();
        f.debug_struct("EditorRegistry")
            .field("types", &stores.types.keys().collect::<Vec<_>>())
            .field("descriptors", &stores.descriptors.keys().collect::<Vec<_>>())
            .field("templates", &stores.templates)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::PropertyDescriptor;
    use crate::editors::{register_builtin, NumberEditor, StringEditor};
    use serde_json::json;

    fn registry() -> Rc<EditorRegistry> {
        let registry = EditorRegistry::shared();
        register_builtin(&registry);
        registry
    }

    fn property(name: &str, editor: &str) -> Rc<Property> {
        Rc::new(Property::new(name, editor).unwrap())
    }

    #[test]
    fn test_parse_editor_ids() {
        assert_eq!(EditorId::parse("[number]"), EditorId::Array("number"));
        assert_eq!(EditorId::parse("{CustomType}"), EditorId::Object("CustomType"));
        assert_eq!(EditorId::parse("[{number}]"), EditorId::Array("{number}"));
        assert_eq!(EditorId::parse("[]"), EditorId::Array(""));
        assert_eq!(EditorId::parse("["), EditorId::Plain("["));
        assert_eq!(EditorId::parse("[number}"), EditorId::Plain("[number}"));
    }

    #[test]
    fn test_duplicate_registration_keeps_first() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("number.editor.html");
        std::fs::write(&template, "<html></html>").unwrap();

        let registry = registry();
        assert!(!registry.register::<StringEditor>("number"));
        assert!(!registry.register_descriptor("number", TypeDescriptor::new()));
        assert!(!registry.register_template("number", &template));

        let editor = registry
            .create_control("number", "n", property("n", "number"))
            .unwrap();
        assert!(editor.downcast_ref::<NumberEditor>().is_some());

        assert!(registry.register_descriptor("Date", TypeDescriptor::new()));
        assert!(!registry.register_descriptor("Date", TypeDescriptor::new()));
        assert!(!registry.register::<NumberEditor>("Date"));
        assert!(registry.register_template("Page", &template));
        assert!(!registry.register_descriptor("Page", TypeDescriptor::new()));
        assert_eq!(registry.template_path("Page"), Some(template));
    }

    #[test]
    fn test_template_file_must_exist() {
        let registry = EditorRegistry::new();
        assert!(!registry.register_template("Page", "/nonexistent/page.editor.html"));
        assert!(!registry.control_exists("Page"));
    }

    #[test]
    fn test_array_of_number_uses_number_editor() {
        let registry = registry();
        let target = Rc::new(Property::with_value("list", "[number]", Some(json!([1, 2])), None).unwrap());

        let mut editor = registry.create_control("[number]", "list", Rc::clone(&target)).unwrap();
        let array = editor.downcast_mut::<ArrayEditor>().unwrap();
        assert_eq!(array.element_id(), "number");

        let mut session = array.explore().unwrap();
        assert_eq!(session.len(), 2);
        for row in session.rows_mut() {
            let element = row.editor_mut().unwrap();
            assert!(element.downcast_ref::<NumberEditor>().is_some());
        }
    }

    #[test]
    fn test_unknown_ids_resolve_to_none() {
        let registry = registry();
        assert!(registry.create_control("nope", "x", property("x", "nope")).is_none());
        assert!(registry.create_control("[]", "x", property("x", "[]")).is_none());

        let err = registry
            .try_create_control("nope", "x", property("x", "nope"))
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "couldn't create x property editor of type: nope");
    }

    #[test]
    fn test_can_resolve_nested_composites() {
        let registry = registry();
        registry.register_descriptor("CustomType", TypeDescriptor::new());

        assert!(registry.can_resolve("[{CustomType}]"));
        assert!(registry.can_resolve("{[number]}"));
        assert!(!registry.can_resolve("[missing]"));
        assert!(!registry.can_resolve("[]"));
        assert!(!registry.control_exists("[number]"));
    }

    #[test]
    fn test_default_values() {
        let registry = registry();
        assert_eq!(registry.get_control_default_value("number").unwrap(), Some(json!(0)));
        assert_eq!(registry.get_control_default_value("rgb").unwrap(), Some(json!([1.0, 1.0, 1.0])));
        assert_eq!(registry.get_control_default_value("[Whatever]").unwrap(), Some(json!([])));
        assert_eq!(registry.get_control_default_value("{number}").unwrap(), Some(json!({})));
        assert_eq!(registry.get_control_default_value("unknown").unwrap(), None);

        registry.register_descriptor("Point", TypeDescriptor::new().with_default(json!({"x": 0})));
        assert_eq!(registry.get_control_default_value("Point").unwrap(), Some(json!({"x": 0})));

        registry.register_descriptor("Bare", TypeDescriptor::new());
        assert!(matches!(
            registry.get_control_default_value("Bare"),
            Err(RegistryError::InvalidDefault(_))
        ));
    }

    #[test]
    fn test_missing_default_provider_is_an_error() {
        let registry = EditorRegistry::new();
        let factory: EditorFactory = Rc::new(|name: &str, property: Rc<Property>| {
            StringEditor::create(name, property).map(|e| Box::new(e) as Box<dyn PropertyEditor>)
        });
        registry.register_factory("plain", factory.clone(), None);
        registry.register_factory("nulled", factory, Some(Rc::new(|| Some(Value::Null))));

        assert!(matches!(
            registry.get_control_default_value("plain"),
            Err(RegistryError::MissingDefault(id)) if id == "plain"
        ));
        assert!(matches!(
            registry.get_control_default_value("nulled"),
            Err(RegistryError::InvalidDefault(_))
        ));
    }

    #[test]
    fn test_factory_errors_surface() {
        let registry = EditorRegistry::shared();
        let factory: EditorFactory = Rc::new(|_: &str, property: Rc<Property>| {
            Err(RegistryError::Construction {
                id: property.editor().to_string(),
                message: "no value".to_string(),
            })
        });
        registry.register_factory("broken", factory, None);

        assert!(registry.create_control("broken", "b", property("b", "broken")).is_none());
        let err = registry
            .try_create_control("broken", "b", property("b", "broken"))
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "failed to create editor `broken`: no value");
    }

    #[test]
    fn test_unregister() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("Page.editor.html");
        std::fs::write(&template, "<html></html>").unwrap();

        let registry = registry();
        let descriptor = TypeDescriptor::new().with_property("on", PropertyDescriptor::new("boolean"));
        registry.register_descriptor("Switch", descriptor.clone());
        registry.register_template("Page", &template);

        assert!(registry.unregister("number"));
        assert!(!registry.unregister("number"));
        assert!(registry.unregister(template.to_str().unwrap()));
        assert!(!registry.control_exists("Page"));
        assert!(registry.unregister_descriptor(&descriptor));
        assert!(!registry.control_exists("Switch"));

        registry.unregister_all();
        assert!(registry.registered_ids().is_empty());
    }

    #[test]
    fn test_registered_ids_order() {
        let registry = EditorRegistry::shared();
        registry.register::<NumberEditor>("number");
        registry.register_descriptor("Date", TypeDescriptor::new());
        registry.register::<StringEditor>("string");
        assert_eq!(registry.registered_ids(), ["number", "string", "Date"]);
    }
}
