// SPDX-License-Identifier: MIT OR Apache-2.0
//! Demonstration model covering every built-in editor.

use playgate_editor_curves::{Color, Curve, CurveSet, CurveType, Vector};
use playgate_editor_properties::editors::{
    ColorCurveInfo, ColorCurveKind, CurveInfo, EnumerationInfo, NumberInfo,
};
use playgate_editor_properties::{
    EditorRegistry, PropertiesModel, Property, PropertyDescriptor, PropertyError, TypeDescriptor,
};

/// Register the custom types the demo model refers to, unless the project
/// already provides them. Returns how many were registered.
pub fn register_demo_types(registry: &EditorRegistry) -> usize {
    let custom = TypeDescriptor::new()
        .with_property("value", PropertyDescriptor::new("number"))
        .with_property("text", PropertyDescriptor::new("string"))
        .with_property("on", PropertyDescriptor::new("boolean"));
    let date = TypeDescriptor::new()
        .with_property("day", PropertyDescriptor::new("number"))
        .with_property("month", PropertyDescriptor::new("number"))
        .with_property("year", PropertyDescriptor::new("number"));

    [("CustomType", custom), ("Date", date)]
        .into_iter()
        .filter(|(id, _)| !registry.control_exists(id))
        .filter(|(id, descriptor)| registry.register_descriptor(id, descriptor.clone()))
        .count()
}

/// Build the demonstration model
pub fn demo_model() -> Result<PropertiesModel, PropertyError> {
    let number_info = NumberInfo {
        min: Some(0.5),
        max: Some(1.5),
        ..NumberInfo::default()
    };
    let mut animals = EnumerationInfo::new();
    animals.insert("Cat".to_string(), 0);
    animals.insert("Dog".to_string(), 1);

    let curve_set_info = CurveInfo {
        curves: Some(vec!["x".into(), "y".into(), "z".into()]),
        ..CurveInfo::default()
    };
    let curve_set = CurveSet::from_key_arrays(
        &[vec![0.0, 1.0, 1.0, 0.0], vec![0.0, 0.5, 1.0, 0.5]],
        CurveType::default(),
    );
    let color_curve_info = ColorCurveInfo {
        kind: ColorCurveKind::Rgb,
    };

    Ok(PropertiesModel::from_properties([
        Property::create_with_data("number", "number", &1.0f32, &number_info)?,
        Property::create("string", "string", &"text")?,
        Property::create("boolean", "boolean", &true)?,
        Property::create("rgb", "rgb", &Color::rgb(1.0, 0.5, 0.0))?,
        Property::create("rgba", "rgba", &Color::new(0.0, 0.5, 1.0, 0.5))?,
        Property::create("vector", "vector", &Vector::new(0.0, 1.0, 0.0))?,
        Property::create_with_data("enumeration", "enumeration", &0, &animals)?,
        Property::create(
            "curve",
            "curve",
            &Curve::new(&[0.0, 1.0, 1.0, 0.0], CurveType::default()),
        )?,
        Property::create_with_data("curveSet", "curve", &curve_set, &curve_set_info)?,
        Property::create_with_data(
            "colorCurve",
            "colorcurve",
            &CurveSet::default(),
            &color_curve_info,
        )?,
        Property::new("CustomType", "CustomType")?,
        Property::new("Date", "Date")?,
        Property::new("Array", "[string]")?,
        Property::new("Object", "{CustomType}")?,
    ]))
}
