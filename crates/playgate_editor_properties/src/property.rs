// SPDX-License-Identifier: MIT OR Apache-2.0
//! Reactive property cells and the ordered model shown by an inspector.

use crate::error::PropertyError;
use crate::event::{Observers, SubscriptionId};
use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;

fn normalize(value: Option<Value>) -> Option<Value> {
    value.filter(|v| !v.is_null())
}

fn decode<T: DeserializeOwned>(value: Option<&Value>) -> Option<T> {
    T::deserialize(value.unwrap_or(&Value::Null)).ok()
}

/// A named value cell edited by the editor registered under `editor`.
///
/// `name` and `editor` are fixed at construction. Every value assignment
/// notifies all subscribers before returning, even when the value is equal
/// to the previous one. Editor data is auxiliary configuration and never
/// notifies.
pub struct Property {
    name: String,
    editor: String,
    value: RefCell<Option<Value>>,
    editor_data: RefCell<Option<Value>>,
    value_changed: Observers<Property>,
}

impl Property {
    /// Create a property without a value
    pub fn new(name: impl Into<String>, editor: impl Into<String>) -> Result<Self, PropertyError> {
        Self::with_value(name, editor, None, None)
    }

    /// Create a property with an initial value and editor data
    pub fn with_value(
        name: impl Into<String>,
        editor: impl Into<String>,
        value: Option<Value>,
        editor_data: Option<Value>,
    ) -> Result<Self, PropertyError> {
        let name = name.into();
        let editor = editor.into();
        if name.is_empty() {
            return Err(PropertyError::EmptyName);
        }
        if editor.is_empty() {
            return Err(PropertyError::EmptyEditor(name));
        }

        Ok(Self {
            name,
            editor,
            value: RefCell::new(normalize(value)),
            editor_data: RefCell::new(normalize(editor_data)),
            value_changed: Observers::new(),
        })
    }

    /// Create a property from a typed value
    pub fn create<T: Serialize>(
        name: impl Into<String>,
        editor: impl Into<String>,
        value: &T,
    ) -> Result<Self, PropertyError> {
        let property = Self::new(name, editor)?;
        let value = property.encode(value)?;
        *property.value.borrow_mut() = normalize(Some(value));
        Ok(property)
    }

    /// Create a property from a typed value and typed editor data
    pub fn create_with_data<T: Serialize, D: Serialize>(
        name: impl Into<String>,
        editor: impl Into<String>,
        value: &T,
        editor_data: &D,
    ) -> Result<Self, PropertyError> {
        let property = Self::create(name, editor, value)?;
        let data = property.encode(editor_data)?;
        *property.editor_data.borrow_mut() = normalize(Some(data));
        Ok(property)
    }

    /// Property name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Editor id
    pub fn editor(&self) -> &str {
        &self.editor
    }

    /// Current value; `None` when absent
    pub fn value(&self) -> Option<Value> {
        self.value.borrow().clone()
    }

    /// Whether a value is present
    pub fn has_value(&self) -> bool {
        self.value.borrow().is_some()
    }

    /// Assign the value and notify subscribers. `Null` is stored as absent.
    pub fn set_value(&self, value: Option<Value>) {
        *self.value.borrow_mut() = normalize(value);
        self.value_changed.notify(self);
    }

    /// Decode the value, falling back to `T::default()` on any mismatch
    pub fn data<T: DeserializeOwned + Default>(&self) -> T {
        self.try_data().unwrap_or_default()
    }

    /// Decode the value, returning `None` on any mismatch
    pub fn try_data<T: DeserializeOwned>(&self) -> Option<T> {
        decode(self.value.borrow().as_ref())
    }

    /// Encode a typed value and assign it
    pub fn set_data<T: Serialize>(&self, value: &T) -> Result<(), PropertyError> {
        let value = self.encode(value)?;
        self.set_value(Some(value));
        Ok(())
    }

    /// Current editor data
    pub fn editor_data(&self) -> Option<Value> {
        self.editor_data.borrow().clone()
    }

    /// Assign editor data without notifying subscribers
    pub fn set_editor_data(&self, data: Option<Value>) {
        *self.editor_data.borrow_mut() = normalize(data);
    }

    /// Decode editor data, falling back to `T::default()`
    pub fn editor_additional_data<T: DeserializeOwned + Default>(&self) -> T {
        self.try_editor_data().unwrap_or_default()
    }

    /// Decode editor data, returning `None` on any mismatch
    pub fn try_editor_data<T: DeserializeOwned>(&self) -> Option<T> {
        decode(self.editor_data.borrow().as_ref())
    }

    /// Encode typed editor data and assign it
    pub fn set_editor_additional_data<T: Serialize>(&self, data: &T) -> Result<(), PropertyError> {
        let data = self.encode(data)?;
        self.set_editor_data(Some(data));
        Ok(())
    }

    /// Subscribe to value changes
    pub fn subscribe(&self, handler: impl Fn(&Property) + 'static) -> SubscriptionId {
        self.value_changed.subscribe(handler)
    }

    /// Remove a value change subscription
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.value_changed.unsubscribe(id)
    }

    /// Number of value change subscribers
    pub fn subscriber_count(&self) -> usize {
        self.value_changed.len()
    }

    fn encode<T: Serialize>(&self, value: &T) -> Result<Value, PropertyError> {
        serde_json::to_value(value).map_err(|source| PropertyError::Encode {
            name: self.name.clone(),
            source,
        })
    }
}

impl Clone for Property {
    /// Copies name, editor, value and editor data; subscribers stay behind.
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            editor: self.editor.clone(),
            value: RefCell::new(self.value()),
            editor_data: RefCell::new(self.editor_data()),
            value_changed: Observers::new(),
        }
    }
}

impl PartialEq for Property {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.editor == other.editor
            && *self.value.borrow() == *other.value.borrow()
            && *self.editor_data.borrow() == *other.editor_data.borrow()
    }
}

impl std::fmt::Debug for Property {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("editor", &self.editor)
            .field("value", &self.value.borrow())
            .field("editor_data", &self.editor_data.borrow())
            .field("subscribers", &self.value_changed.len())
            .finish()
    }
}

impl Serialize for Property {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry("editor", &self.editor)?;
        map.serialize_entry("value", &*self.value.borrow())?;
        map.serialize_entry("editorData", &*self.editor_data.borrow())?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Property {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Repr {
            name: String,
            editor: String,
            #[serde(default)]
            value: Option<Value>,
            #[serde(rename = "editorData", default)]
            editor_data: Option<Value>,
        }

        let repr = Repr::deserialize(deserializer)?;
        Property::with_value(repr.name, repr.editor, repr.value, repr.editor_data)
            .map_err(D::Error::custom)
    }
}

/// Ordered list of shared properties.
///
/// Enumeration order is display order and is preserved through JSON.
#[derive(Debug, Default)]
pub struct PropertiesModel {
    properties: Vec<Rc<Property>>,
}

impl PropertiesModel {
    /// Create an empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a model from owned properties
    pub fn from_properties(properties: impl IntoIterator<Item = Property>) -> Self {
        Self {
            properties: properties.into_iter().map(Rc::new).collect(),
        }
    }

    /// Append a property and return its shared handle
    pub fn push(&mut self, property: Property) -> Rc<Property> {
        let property = Rc::new(property);
        self.properties.push(Rc::clone(&property));
        property
    }

    /// First property with the given name
    pub fn get(&self, name: &str) -> Option<&Rc<Property>> {
        self.properties.iter().find(|p| p.name() == name)
    }

    /// Iterate in display order
    pub fn iter(&self) -> impl Iterator<Item = &Rc<Property>> {
        self.properties.iter()
    }

    /// Number of properties
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether the model is empty
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Parse a model from JSON text
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Encode the model as pretty JSON text
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Clone for PropertiesModel {
    /// Deep copy: every property becomes a new independent cell.
    fn clone(&self) -> Self {
        Self {
            properties: self
                .properties
                .iter()
                .map(|p| Rc::new(Property::clone(p)))
                .collect(),
        }
    }
}

struct PropertyList<'a>(&'a [Rc<Property>]);

impl Serialize for PropertyList<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for property in self.0 {
            seq.serialize_element(property.as_ref())?;
        }
        seq.end()
    }
}

impl Serialize for PropertiesModel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("properties", &PropertyList(&self.properties))?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for PropertiesModel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Repr {
            #[serde(alias = "Properties", default)]
            properties: Vec<Property>,
        }

        let repr = Repr::deserialize(deserializer)?;
        Ok(Self::from_properties(repr.properties))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playgate_editor_curves::{Color, Curve, CurveType};
    use serde_json::json;
    use std::cell::Cell;

    #[test]
    fn test_empty_name_or_editor_fails() {
        assert!(matches!(Property::new("", "number"), Err(PropertyError::EmptyName)));
        assert!(matches!(Property::new("x", ""), Err(PropertyError::EmptyEditor(_))));
    }

    #[test]
    fn test_set_value_notifies_each_subscriber_once() {
        let property = Property::new("speed", "number").unwrap();
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));

        let a = Rc::clone(&first);
        property.subscribe(move |_| a.set(a.get() + 1));
        let b = Rc::clone(&second);
        property.subscribe(move |p| {
            assert_eq!(p.value(), Some(json!(2.5)));
            b.set(b.get() + 1);
        });

        property.set_value(Some(json!(2.5)));
        assert_eq!((first.get(), second.get()), (1, 1));

        // Same value still notifies
        property.set_value(Some(json!(2.5)));
        assert_eq!((first.get(), second.get()), (2, 2));
    }

    #[test]
    fn test_editor_data_does_not_notify() {
        let property = Property::new("speed", "number").unwrap();
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        property.subscribe(move |_| counter.set(counter.get() + 1));

        property.set_editor_data(Some(json!({"min": 0})));
        assert_eq!(hits.get(), 0);
        assert_eq!(property.editor_data(), Some(json!({"min": 0})));
    }

    #[test]
    fn test_null_is_absent() {
        let property = Property::with_value("x", "number", Some(Value::Null), None).unwrap();
        assert!(!property.has_value());
        property.set_value(Some(json!(1)));
        property.set_value(Some(Value::Null));
        assert_eq!(property.value(), None);
    }

    #[test]
    fn test_typed_round_trip_is_structural() {
        let color = Color::new(1.0, 0.5, 0.0, 1.0);
        let property = Property::create("tint", "rgb", &color).unwrap();
        assert_eq!(property.value(), Some(json!([1.0, 0.5, 0.0, 1.0])));
        assert_eq!(property.data::<Color>(), color);

        let curve = Curve::new(&[0.0, 0.0, 1.0, 1.0], CurveType::Linear);
        property.set_data(&curve).unwrap();
        assert_eq!(property.data::<Curve>(), curve);
    }

    #[test]
    fn test_decode_fails_closed() {
        let property = Property::with_value("x", "number", Some(json!("not a number")), None).unwrap();
        assert_eq!(property.data::<f64>(), 0.0);
        assert_eq!(property.try_data::<f64>(), None);
        assert_eq!(property.editor_additional_data::<Vec<String>>(), Vec::<String>::new());

        let empty = Property::new("y", "rgb").unwrap();
        assert_eq!(empty.data::<Color>(), Color::default());
    }

    #[test]
    fn test_clone_drops_subscribers() {
        let property = Property::create_with_data("n", "number", &1.0, &json!({"max": 2})).unwrap();
        property.subscribe(|_| {});

        let copy = property.clone();
        assert_eq!(copy, property);
        assert_eq!(copy.subscriber_count(), 0);
        assert_eq!(property.subscriber_count(), 1);

        copy.set_value(Some(json!(5)));
        assert_eq!(property.value(), Some(json!(1.0)));
    }

    #[test]
    fn test_property_json_shape() {
        let property = Property::create("label", "string", &"hi").unwrap();
        assert_eq!(
            serde_json::to_value(&property).unwrap(),
            json!({"name": "label", "editor": "string", "value": "hi", "editorData": null})
        );

        let missing: Result<Property, _> = serde_json::from_value(json!({"name": "x"}));
        assert!(missing.is_err());
        let empty: Result<Property, _> = serde_json::from_value(json!({"name": "", "editor": "string"}));
        assert!(empty.is_err());
    }

    #[test]
    fn test_model_json_preserves_order() {
        let json = r#"{"Properties": [
            {"name": "b", "editor": "number", "value": 2},
            {"name": "a", "editor": "string"}
        ]}"#;
        let model = PropertiesModel::from_json(json).unwrap();
        let names: Vec<_> = model.iter().map(|p| p.name().to_string()).collect();
        assert_eq!(names, ["b", "a"]);

        let encoded = serde_json::to_value(&model).unwrap();
        assert_eq!(encoded["properties"][0]["value"], json!(2));
        assert_eq!(encoded["properties"][1]["value"], Value::Null);
    }

    #[test]
    fn test_model_clone_is_deep() {
        let mut model = PropertiesModel::new();
        let original = model.push(Property::create("n", "number", &1).unwrap());

        let copy = model.clone();
        copy.get("n").unwrap().set_value(Some(json!(9)));
        assert_eq!(original.value(), Some(json!(1)));
        assert_eq!(copy.len(), 1);
    }
}
