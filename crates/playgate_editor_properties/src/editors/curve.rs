// SPDX-License-Identifier: MIT OR Apache-2.0
//! Curve preview and the curve editing session.
//!
//! A `curve` property holds a single [`Curve`], or a [`CurveSet`] when the
//! editor data names its curves. Editing happens in a [`CurveSession`] that
//! works on a copy and writes back only on commit.

use crate::editor::{DrawResult, EditorBase, EditorInput, EditorView, PropertyEditor, Widget};
use crate::error::{PropertyError, RegistryError};
use crate::property::Property;
use crate::registry::EditorType;
use playgate_editor_curves::{Curve, CurveSet, CurveType};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::any::Any;
use std::rc::Rc;

/// Curves a session lets the user pick and edit
const MAX_EDITABLE_CURVES: usize = 4;

/// Editor data of `curve` properties
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurveInfo {
    /// Lower bound of the expected value range
    #[serde(default)]
    pub min: f32,
    /// Upper bound of the expected value range
    #[serde(default)]
    pub max: f32,
    /// Curve names; when present the value is a curve set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curves: Option<Vec<String>>,
}

impl CurveInfo {
    /// Curve names, empty for a single curve
    pub fn curve_names(&self) -> &[String] {
        self.curves.as_deref().unwrap_or(&[])
    }

    /// Whether the value is a curve set
    pub fn is_curve_set(&self) -> bool {
        !self.curve_names().is_empty()
    }

    /// Initial vertical zoom: the smallest power of two covering `min` and `max`
    pub fn zoom(&self) -> f32 {
        let range = self.max.abs().max(self.min.abs());
        let mut zoom = 1.0_f32;
        while zoom < range && zoom.is_finite() {
            zoom *= 2.0;
        }
        zoom
    }
}

/// Editor for `curve` properties
#[derive(Debug)]
pub struct CurveEditor {
    base: EditorBase,
    info: CurveInfo,
}

impl CurveEditor {
    /// Bind with explicit curve settings instead of the property's editor data.
    ///
    /// For a curve set holding fewer curves than `info` names, the padded set
    /// is written back to the property, which notifies its subscribers.
    pub fn with_info(name: &str, property: Rc<Property>, info: CurveInfo) -> Self {
        if info.is_curve_set() {
            let mut set = property.data::<CurveSet>();
            if set.len() < info.curve_names().len() {
                set.pad_to(info.curve_names().len());
                if let Err(err) = property.set_data(&set) {
                    tracing::warn!("{}", err);
                }
            }
        }
        Self {
            base: EditorBase::new(name, property),
            info,
        }
    }

    /// Curve settings
    pub fn info(&self) -> &CurveInfo {
        &self.info
    }

    /// Current curves; a single curve is returned as a one-curve set
    pub fn curves(&self) -> CurveSet {
        let property = self.base.property();
        if self.info.is_curve_set() {
            property.data::<CurveSet>()
        } else {
            let curve = property.data::<Curve>();
            let curve_type = curve.curve_type();
            CurveSet::new(vec![curve], curve_type)
        }
    }

    /// Start editing a copy of the current curves
    pub fn open_session(&self) -> CurveSession {
        CurveSession::open(Rc::clone(self.base.property()), &self.info)
    }
}

impl EditorType for CurveEditor {
    fn create(name: &str, property: Rc<Property>) -> Result<Self, RegistryError> {
        let info = property.editor_additional_data::<CurveInfo>();
        Ok(Self::with_info(name, property, info))
    }

    fn default_value() -> Option<Value> {
        Some(json!([0.0, 0.0]))
    }
}

impl PropertyEditor for CurveEditor {
    fn base(&self) -> &EditorBase {
        &self.base
    }

    fn view(&self) -> EditorView {
        self.base.view(Widget::Curve {
            curves: self.curves(),
            names: self.info.curve_names().to_vec(),
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

/// The curve dialog.
///
/// Keys are kept within `[0, 1]` after every edit. A curve never ends up
/// without keys: removing the last key puts `(0, 0)` back.
#[derive(Debug)]
pub struct CurveSession {
    target: Rc<Property>,
    curves: CurveSet,
    curve_set: bool,
    names: Vec<String>,
    visible: Vec<bool>,
    active: Option<(usize, f32)>,
    zoom: f32,
}

impl CurveSession {
    fn open(target: Rc<Property>, info: &CurveInfo) -> Self {
        let names = info.curve_names().to_vec();
        let (curves, zoom, visible) = if info.is_curve_set() {
            let mut set = target.data::<CurveSet>();
            set.pad_to(names.len());
            (set, 1.0, vec![true; names.len()])
        } else {
            let mut curve = target.data::<Curve>();
            if curve.is_empty() {
                curve.insert_key(0.0, 0.0);
            }
            let curve_type = curve.curve_type();
            (CurveSet::new(vec![curve], curve_type), info.zoom(), vec![true])
        };

        let mut session = Self {
            target,
            curves,
            curve_set: info.is_curve_set(),
            names,
            visible,
            active: None,
            zoom,
        };
        session.validate();
        tracing::debug!("Opened curve session: {}", session.title());
        session
    }

    /// Dialog title
    pub fn title(&self) -> String {
        let kind = if self.curve_set { "Edit curve set" } else { "Edit curve" };
        format!("{}: {}", kind, self.target.name())
    }

    /// Whether the session edits a curve set
    pub fn is_curve_set(&self) -> bool {
        self.curve_set
    }

    /// Curves being edited
    pub fn curves(&self) -> &CurveSet {
        &self.curves
    }

    /// Curve names, empty for a single curve
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Whether a curve is shown and editable
    pub fn is_visible(&self, curve: usize) -> bool {
        self.visible.get(curve).copied().unwrap_or(false)
    }

    /// Selected key as `(curve, time)`
    pub fn active(&self) -> Option<(usize, f32)> {
        self.active
    }

    /// Value of the selected key
    pub fn active_value(&self) -> Option<f32> {
        let (curve, time) = self.active?;
        self.curves.curve(curve)?.key(time)
    }

    /// Vertical zoom (half-height of the visible value range)
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Drop keys outside `[0, 1]`
    pub fn validate(&mut self) {
        for curve in self.curves.curves_mut() {
            curve.retain_keys_in(0.0, 1.0);
        }
        if self.active_value().is_none() {
            self.active = None;
        }
    }

    /// Select an existing key
    pub fn select_key(&mut self, curve: usize, time: f32) -> bool {
        let found = self.editable(curve).and_then(|c| c.key(time)).is_some();
        self.active = found.then_some((curve, time));
        found
    }

    /// Insert or replace a key and select it; time is clamped to `[0, 1]`
    pub fn insert_key(&mut self, curve: usize, time: f32, value: f32) -> bool {
        if time.is_nan() || value.is_nan() {
            return false;
        }
        let time = time.clamp(0.0, 1.0);
        let Some(target) = self.editable_mut(curve) else {
            return false;
        };
        target.insert_key(time, value);
        self.active = Some((curve, time));
        self.validate();
        true
    }

    /// Insert a key on the curve at `time`, keeping the curve's shape there
    pub fn insert_on_curve(&mut self, curve: usize, time: f32) -> Option<f32> {
        let value = self.editable(curve)?.value(time.clamp(0.0, 1.0));
        self.insert_key(curve, time, value).then_some(value)
    }

    /// Remove a key; an emptied curve gets `(0, 0)` back
    pub fn remove_key(&mut self, curve: usize, time: f32) -> bool {
        let Some(target) = self.editable_mut(curve) else {
            return false;
        };
        if target.remove_key(time).is_none() {
            return false;
        }
        if target.is_empty() {
            target.insert_key(0.0, 0.0);
        }
        self.active = None;
        self.validate();
        true
    }

    /// Drag the selected key to a new position.
    ///
    /// Refused when another key already sits at the new time.
    pub fn move_active_key(&mut self, time: f32, value: f32) -> bool {
        let Some((curve, active_time)) = self.active else {
            return false;
        };
        if time.is_nan() || value.is_nan() {
            return false;
        }
        let time = time.clamp(0.0, 1.0);
        let Some(target) = self.editable_mut(curve) else {
            return false;
        };
        if time != active_time && target.key(time).is_some() {
            return false;
        }
        target.remove_key(active_time);
        target.insert_key(time, value);
        self.active = Some((curve, time));
        self.validate();
        true
    }

    /// Move the selected key in time, keeping its value
    pub fn set_key_time(&mut self, time: f32) -> bool {
        match self.active_value() {
            Some(value) => self.move_active_key(time, value),
            None => false,
        }
    }

    /// Change the value of the selected key
    pub fn set_key_value(&mut self, value: f32) -> bool {
        match self.active {
            Some((_, time)) => self.move_active_key(time, value),
            None => false,
        }
    }

    /// Interpolation type of every curve
    pub fn set_curve_type(&mut self, curve_type: CurveType) {
        self.curves.set_curve_type(curve_type);
    }

    /// Cardinal tension of every visible curve
    pub fn set_tension(&mut self, tension: f32) {
        let visible = self.visible.clone();
        for (curve, shown) in self.curves.curves_mut().iter_mut().zip(visible) {
            if shown {
                curve.set_tension(tension);
            }
        }
    }

    /// Show or hide a curve; hiding the selected curve clears the selection
    pub fn set_visible(&mut self, curve: usize, visible: bool) -> bool {
        let Some(slot) = self.visible.get_mut(curve) else {
            return false;
        };
        *slot = visible;
        if !visible && self.active.is_some_and(|(active, _)| active == curve) {
            self.active = None;
        }
        true
    }

    /// Reset every visible curve to a single `(0, 0)` key
    pub fn reset(&mut self) {
        let visible = self.visible.clone();
        for (index, curve) in self.curves.curves_mut().iter_mut().enumerate() {
            if index < MAX_EDITABLE_CURVES && visible.get(index).copied().unwrap_or(false) {
                curve.clear();
                curve.insert_key(0.0, 0.0);
            }
        }
        self.active = None;
    }

    /// Zoom out for positive steps, in for negative ones
    pub fn zoom_by(&mut self, steps: i32) {
        if steps > 0 && self.zoom * 2.0 < f32::MAX * 0.5 {
            self.zoom *= 2.0;
        } else if steps < 0 && self.zoom * 0.5 > 0.001 {
            self.zoom *= 0.5;
        }
    }

    /// Write the edited curves to the property
    pub fn commit(self) -> Result<(), PropertyError> {
        if self.curve_set {
            self.target.set_data(&self.curves)?;
        } else if let Some(curve) = self.curves.curve(0) {
            self.target.set_data(curve)?;
        }
        tracing::debug!("Committed curve session: {}", self.target.name());
        Ok(())
    }

    /// Close without writing
    pub fn cancel(self) {
        tracing::debug!("Cancelled curve session: {}", self.target.name());
    }

    fn editable(&self, curve: usize) -> Option<&Curve> {
        if curve < MAX_EDITABLE_CURVES && self.is_visible(curve) {
            self.curves.curve(curve)
        } else {
            None
        }
    }

    fn editable_mut(&mut self, curve: usize) -> Option<&mut Curve> {
        if curve < MAX_EDITABLE_CURVES && self.is_visible(curve) {
            self.curves.curve_mut(curve)
        } else {
            None
        }
    }
}
