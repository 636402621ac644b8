// SPDX-License-Identifier: MIT OR Apache-2.0
//! Console rendering of editor views.

use playgate_editor_curves::{Curve, CurveSet};
use playgate_editor_properties::{EditorView, Widget};
use serde_json::Value;
use std::fmt;

const SPARKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Displays editor views as an indented text tree
pub struct ConsoleView<'a> {
    views: &'a [EditorView],
    samples: usize,
}

impl<'a> ConsoleView<'a> {
    /// Render `views`, previewing curves with `samples` points
    pub fn new(views: &'a [EditorView], samples: usize) -> Self {
        Self { views, samples }
    }
}

impl fmt::Display for ConsoleView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for view in self.views {
            write_view(f, view, 0, self.samples)?;
        }
        Ok(())
    }
}

fn write_view(
    f: &mut fmt::Formatter<'_>,
    view: &EditorView,
    depth: usize,
    samples: usize,
) -> fmt::Result {
    let indent = "  ".repeat(depth);
    write!(f, "{indent}{} <{}>: ", view.label, view.editor)?;

    match &view.widget {
        Widget::Text { text, valid } => writeln!(f, "{text:?}{}", invalid_marker(*valid)),
        Widget::Toggle { checked } => writeln!(f, "[{}]", if *checked { "x" } else { " " }),
        Widget::Choice { options, selected } => {
            let options: Vec<String> = options
                .iter()
                .enumerate()
                .map(|(i, label)| {
                    if Some(i) == *selected {
                        format!("*{label}")
                    } else {
                        label.clone()
                    }
                })
                .collect();
            writeln!(f, "{}", options.join(" | "))
        }
        Widget::Color {
            color,
            alpha_text,
            valid,
        } => {
            write!(f, "rgb({:.3}, {:.3}, {:.3})", color.r(), color.g(), color.b())?;
            if let Some(alpha) = alpha_text {
                write!(f, " alpha {alpha}{}", invalid_marker(*valid))?;
            }
            writeln!(f)
        }
        Widget::Vector { fields, valid } => {
            let fields: Vec<String> = fields
                .iter()
                .zip(valid)
                .map(|(text, valid)| format!("{text}{}", invalid_marker(*valid)))
                .collect();
            writeln!(f, "({})", fields.join(", "))
        }
        Widget::Curve { curves, names } => {
            writeln!(f, "{} curve(s), {}", curves.len(), curves.curve_type().name())?;
            for (index, line) in sparklines(curves, samples).into_iter().enumerate() {
                let name = names.get(index).map_or("", String::as_str);
                writeln!(f, "{indent}  {name:>6} {line}")?;
            }
            Ok(())
        }
        Widget::Button { caption, summary } => writeln!(f, "[{caption}] {summary}"),
        Widget::Group { children, actions } => {
            if actions.is_empty() {
                writeln!(f)?;
            } else {
                let actions: Vec<String> = actions.iter().map(|a| format!("[{a}]")).collect();
                writeln!(f, "{}", actions.join(" "))?;
            }
            for child in children {
                write_view(f, child, depth + 1, samples)?;
            }
            Ok(())
        }
        Widget::Error { message } => writeln!(f, "error: {message}"),
    }
}

fn invalid_marker(valid: bool) -> &'static str {
    if valid {
        ""
    } else {
        " (invalid)"
    }
}

/// One sparkline per curve, scaled to the range of all samples
pub fn sparklines(curves: &CurveSet, samples: usize) -> Vec<String> {
    let sampled = curves.sample(samples);
    let (low, high) = sampled
        .iter()
        .flatten()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(low, high), v| {
            (low.min(*v), high.max(*v))
        });
    let span = high - low;

    sampled
        .iter()
        .map(|values| {
            values
                .iter()
                .map(|v| {
                    let level = if span > f32::EPSILON {
                        ((v - low) / span * (SPARKS.len() - 1) as f32).round() as usize
                    } else {
                        0
                    };
                    SPARKS[level.min(SPARKS.len() - 1)]
                })
                .collect()
        })
        .collect()
}

/// Decode curve JSON: a curve set (`{"curves": ...}` or an array of key
/// arrays) or a single curve, returned as a one-curve set
pub fn parse_curves(json: &str) -> Result<CurveSet, serde_json::Error> {
    let value: Value = serde_json::from_str(json)?;
    let is_set = match &value {
        Value::Object(map) => map.contains_key("curves"),
        Value::Array(items) => items.first().is_some_and(Value::is_array),
        _ => false,
    };

    if is_set {
        serde_json::from_value(value)
    } else {
        let curve: Curve = serde_json::from_value(value)?;
        let curve_type = curve.curve_type();
        Ok(CurveSet::new(vec![curve], curve_type))
    }
}
