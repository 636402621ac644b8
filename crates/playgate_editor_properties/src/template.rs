// SPDX-License-Identifier: MIT OR Apache-2.0
//! Template-file editors.
//!
//! A template editor hands the property value to an external page (an
//! `.editor.html` file) running inside a [`TemplateHost`]. The page talks back
//! through named signals; the last value it applies is written to the
//! property when the session is committed.

use crate::editor::{DrawResult, EditorBase, EditorInput, EditorView, PropertyEditor, Widget};
use crate::error::TemplateError;
use crate::property::Property;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// File suffix of template editors
pub const TEMPLATE_SUFFIX: &str = ".editor.html";

/// Script evaluated in every page before initialization
pub const DEFAULT_BOOTSTRAP: &str = "resources/templates/api.wrapper.js";

/// Page signal: apply a value and close
pub const SIGNAL_CLOSE: &str = "pgEditorClose";
/// Page signal: apply a value
pub const SIGNAL_APPLY_VALUE: &str = "pgEditorApplyValue";
/// Page signal: ask for the current value
pub const SIGNAL_REQUEST_VALUE: &str = "pgEditorRequestValue";
/// Page signal: resize the window
pub const SIGNAL_APPLY_WINDOW_SIZE: &str = "pgEditorApplyWindowSize";

/// Runs template pages
pub trait TemplateHost {
    /// Load a template file
    fn load(&mut self, template: &Path) -> Result<(), TemplateError>;

    /// Evaluate a script in the loaded page and return its result
    fn evaluate(&mut self, script: &str) -> Result<Value, TemplateError>;

    /// Resize the window showing the page
    fn resize(&mut self, size: WindowSize);
}

/// Size of the template window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSize {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl WindowSize {
    /// Smallest allowed window
    pub const MIN: WindowSize = WindowSize {
        width: 240,
        height: 120,
    };

    /// Create a size, raised to [`WindowSize::MIN`]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(Self::MIN.width),
            height: height.max(Self::MIN.height),
        }
    }
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

/// A message sent by a template page
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateSignal {
    /// Apply a value and close the session
    Close(Option<Value>),
    /// Apply a value
    ApplyValue(Option<Value>),
    /// Push the current value to the page
    RequestValue,
    /// Resize the window; missing dimensions are kept
    ApplyWindowSize {
        /// New width
        width: Option<i64>,
        /// New height
        height: Option<i64>,
    },
}

impl TemplateSignal {
    /// Parse a signal from its name and JSON payload
    pub fn parse(name: &str, payload: &str) -> Result<Self, TemplateError> {
        match name {
            SIGNAL_CLOSE => Ok(TemplateSignal::Close(parse_value(name, payload)?)),
            SIGNAL_APPLY_VALUE => Ok(TemplateSignal::ApplyValue(parse_value(name, payload)?)),
            SIGNAL_REQUEST_VALUE => Ok(TemplateSignal::RequestValue),
            SIGNAL_APPLY_WINDOW_SIZE => {
                #[derive(Deserialize, Default)]
                struct Size {
                    width: Option<i64>,
                    height: Option<i64>,
                }

                let size: Option<Size> = if payload.trim().is_empty() {
                    None
                } else {
                    serde_json::from_str(payload).map_err(|source| {
                        TemplateError::MalformedSignal {
                            signal: name.to_string(),
                            source,
                        }
                    })?
                };
                let size = size.unwrap_or_default();
                Ok(TemplateSignal::ApplyWindowSize {
                    width: size.width,
                    height: size.height,
                })
            }
            other => Err(TemplateError::UnknownSignal(other.to_string())),
        }
    }
}

fn parse_value(signal: &str, payload: &str) -> Result<Option<Value>, TemplateError> {
    if payload.trim().is_empty() {
        return Ok(None);
    }
    let value: Value =
        serde_json::from_str(payload).map_err(|source| TemplateError::MalformedSignal {
            signal: signal.to_string(),
            source,
        })?;
    Ok(Some(value).filter(|v| !v.is_null()))
}

fn json_arg(value: Option<&Value>) -> String {
    value.map_or_else(|| "null".to_string(), Value::to_string)
}

/// Whether a template session still accepts signals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Page is running
    Open,
    /// Page was closed
    Closed,
}

/// A running template page editing one property
#[derive(Debug)]
pub struct TemplateSession<H: TemplateHost> {
    host: H,
    target: Rc<Property>,
    value: Option<Value>,
    size: WindowSize,
    state: SessionState,
}

impl<H: TemplateHost> TemplateSession<H> {
    /// Load the template, run the bootstrap script and initialize the page
    pub fn open(
        template: &Path,
        bootstrap: &Path,
        mut host: H,
        target: Rc<Property>,
    ) -> Result<Self, TemplateError> {
        if !template.is_file() {
            return Err(TemplateError::MissingTemplate(template.to_path_buf()));
        }
        host.load(template)?;

        if !bootstrap.is_file() {
            return Err(TemplateError::MissingBootstrap(bootstrap.to_path_buf()));
        }
        let script = std::fs::read_to_string(bootstrap).map_err(|source| TemplateError::Io {
            path: bootstrap.to_path_buf(),
            source,
        })?;
        host.evaluate(&script)?;

        let value = target.value();
        let init = format!(
            "window.onEditorInitialize ? window.onEditorInitialize({}) : false;",
            json_arg(value.as_ref())
        );
        if host.evaluate(&init)? != Value::Bool(true) {
            return Err(TemplateError::NotInitialized);
        }

        let size = WindowSize::default();
        host.resize(size);
        tracing::info!(
            "Opened template editor {} for {}",
            template.display(),
            target.name()
        );
        Ok(Self {
            host,
            target,
            value,
            size,
            state: SessionState::Open,
        })
    }

    /// Last value applied by the page
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Current window size
    pub fn size(&self) -> WindowSize {
        self.size
    }

    /// Session state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Host running the page
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable host running the page
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Parse and handle a raw page message
    pub fn handle_message(&mut self, name: &str, payload: &str) -> Result<SessionState, TemplateError> {
        let signal = TemplateSignal::parse(name, payload)?;
        self.handle(signal)
    }

    /// Handle a page signal
    pub fn handle(&mut self, signal: TemplateSignal) -> Result<SessionState, TemplateError> {
        if self.state == SessionState::Closed {
            return Err(TemplateError::Closed);
        }
        tracing::debug!("Template signal for {}: {:?}", self.target.name(), signal);

        match signal {
            TemplateSignal::Close(value) => {
                self.value = value;
                self.close()?;
            }
            TemplateSignal::ApplyValue(value) => self.value = value,
            TemplateSignal::RequestValue => {
                let script = format!(
                    "window.onEditorUpdateValue && window.onEditorUpdateValue({});",
                    json_arg(self.value.as_ref())
                );
                self.host.evaluate(&script)?;
            }
            TemplateSignal::ApplyWindowSize { width, height } => {
                let dimension = |requested: Option<i64>, current: u32| {
                    requested.map_or(current, |v| u32::try_from(v.max(0)).unwrap_or(u32::MAX))
                };
                self.size = WindowSize::new(
                    dimension(width, self.size.width),
                    dimension(height, self.size.height),
                );
                self.host.resize(self.size);
            }
        }
        Ok(self.state)
    }

    /// Tell the page it is closing
    pub fn close(&mut self) -> Result<(), TemplateError> {
        if self.state == SessionState::Closed {
            return Ok(());
        }
        self.state = SessionState::Closed;
        self.host
            .evaluate("window.onEditorClose && window.onEditorClose();")?;
        Ok(())
    }

    /// Close the page and write the last applied value to the property
    pub fn commit(mut self) -> Result<Option<Value>, TemplateError> {
        self.close()?;
        self.target.set_value(self.value.clone());
        tracing::info!("Committed template editor for {}", self.target.name());
        Ok(self.value)
    }

    /// Close the page without writing
    pub fn cancel(mut self) {
        if let Err(err) = self.close() {
            tracing::warn!("Template editor for {} closed with error: {}", self.target.name(), err);
        }
    }
}

/// Editor for properties whose id maps to a template file
#[derive(Debug)]
pub struct TemplateEditor {
    base: EditorBase,
    template: PathBuf,
}

impl TemplateEditor {
    /// Bind a template file to a property
    pub fn new(template: PathBuf, name: &str, property: Rc<Property>) -> Self {
        Self {
            base: EditorBase::new(name, property),
            template,
        }
    }

    /// Template file
    pub fn template(&self) -> &Path {
        &self.template
    }

    /// Open the page in `host`
    pub fn open_session<H: TemplateHost>(
        &self,
        host: H,
        bootstrap: &Path,
    ) -> Result<TemplateSession<H>, TemplateError> {
        TemplateSession::open(
            &self.template,
            bootstrap,
            host,
            Rc::clone(self.base.property()),
        )
    }
}

impl PropertyEditor for TemplateEditor {
    fn base(&self) -> &EditorBase {
        &self.base
    }

    fn view(&self) -> EditorView {
        let summary = self
            .template
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.base.view(Widget::Button {
            caption: "Edit value".to_string(),
            summary,
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default)]
    struct RecordingHost {
        loaded: Option<PathBuf>,
        scripts: Vec<String>,
        sizes: Vec<WindowSize>,
        initialize_result: Value,
        fail_on_close: bool,
    }

    impl RecordingHost {
        fn ready() -> Self {
            Self {
                initialize_result: Value::Bool(true),
                ..Default::default()
            }
        }
    }

    impl TemplateHost for RecordingHost {
        fn load(&mut self, template: &Path) -> Result<(), TemplateError> {
            self.loaded = Some(template.to_path_buf());
            Ok(())
        }

        fn evaluate(&mut self, script: &str) -> Result<Value, TemplateError> {
            self.scripts.push(script.to_string());
            if script.contains("onEditorInitialize") {
                return Ok(self.initialize_result.clone());
            }
            if self.fail_on_close && script.contains("onEditorClose") {
                return Err(TemplateError::Host("page crashed".to_string()));
            }
            Ok(Value::Null)
        }

        fn resize(&mut self, size: WindowSize) {
            self.sizes.push(size);
        }
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        template: PathBuf,
        bootstrap: PathBuf,
        property: Rc<Property>,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("Page.editor.html");
        let bootstrap = dir.path().join("api.wrapper.js");
        std::fs::write(&template, "<html></html>").unwrap();
        std::fs::write(&bootstrap, "window.pg = {};").unwrap();
        let property = Rc::new(Property::with_value("page", "Page", Some(json!({"a": 1})), None).unwrap());
        Fixture {
            _dir: dir,
            template,
            bootstrap,
            property,
        }
    }

    fn open(fixture: &Fixture, host: RecordingHost) -> Result<TemplateSession<RecordingHost>, TemplateError> {
        let editor = TemplateEditor::new(fixture.template.clone(), "", Rc::clone(&fixture.property));
        editor.open_session(host, &fixture.bootstrap)
    }

    #[test]
    fn test_open_runs_bootstrap_then_initialize() {
        let fixture = fixture();
        let session = open(&fixture, RecordingHost::ready()).unwrap();

        let host = session.host();
        assert_eq!(host.loaded.as_deref(), Some(fixture.template.as_path()));
        assert_eq!(host.scripts[0], "window.pg = {};");
        assert_eq!(
            host.scripts[1],
            r#"window.onEditorInitialize ? window.onEditorInitialize({"a":1}) : false;"#
        );
        assert_eq!(session.size(), WindowSize::default());
    }

    #[test]
    fn test_initialize_must_return_true() {
        let fixture = fixture();
        let host = RecordingHost {
            initialize_result: json!(false),
            ..Default::default()
        };
        assert!(matches!(open(&fixture, host), Err(TemplateError::NotInitialized)));
    }

    #[test]
    fn test_missing_files() {
        let mut fixture = fixture();
        fixture.bootstrap = fixture.bootstrap.with_file_name("missing.js");
        assert!(matches!(
            open(&fixture, RecordingHost::ready()),
            Err(TemplateError::MissingBootstrap(_))
        ));

        fixture.template = fixture.template.with_file_name("missing.editor.html");
        assert!(matches!(
            open(&fixture, RecordingHost::ready()),
            Err(TemplateError::MissingTemplate(_))
        ));
    }

    #[test]
    fn test_apply_then_commit_writes_last_value() {
        let fixture = fixture();
        let mut session = open(&fixture, RecordingHost::ready()).unwrap();

        session.handle_message(SIGNAL_APPLY_VALUE, r#"{"a": 2}"#).unwrap();
        session.handle_message(SIGNAL_APPLY_VALUE, r#"{"a": 3}"#).unwrap();
        assert_eq!(fixture.property.value(), Some(json!({"a": 1})));

        session.handle_message(SIGNAL_REQUEST_VALUE, "").unwrap();
        assert_eq!(
            session.host().scripts.last().map(String::as_str),
            Some(r#"window.onEditorUpdateValue && window.onEditorUpdateValue({"a":3});"#)
        );

        assert_eq!(session.commit().unwrap(), Some(json!({"a": 3})));
        assert_eq!(fixture.property.value(), Some(json!({"a": 3})));
    }

    #[test]
    fn test_close_signal_ends_session() {
        let fixture = fixture();
        let mut session = open(&fixture, RecordingHost::ready()).unwrap();

        let state = session.handle_message(SIGNAL_CLOSE, "null").unwrap();
        assert_eq!(state, SessionState::Closed);
        assert_eq!(
            session.host().scripts.last().map(String::as_str),
            Some("window.onEditorClose && window.onEditorClose();")
        );
        assert!(matches!(
            session.handle(TemplateSignal::RequestValue),
            Err(TemplateError::Closed)
        ));

        session.commit().unwrap();
        assert_eq!(fixture.property.value(), None);
    }

    #[test]
    fn test_failed_close_aborts_commit() {
        let fixture = fixture();
        let host = RecordingHost {
            fail_on_close: true,
            ..RecordingHost::ready()
        };
        let mut session = open(&fixture, host).unwrap();
        session.handle_message(SIGNAL_APPLY_VALUE, "5").unwrap();

        assert!(session.commit().is_err());
        assert_eq!(fixture.property.value(), Some(json!({"a": 1})));
    }

    #[test]
    fn test_window_size_respects_minimum() {
        let fixture = fixture();
        let mut session = open(&fixture, RecordingHost::ready()).unwrap();

        session.handle_message(SIGNAL_APPLY_WINDOW_SIZE, r#"{"width": 100}"#).unwrap();
        assert_eq!(session.size(), WindowSize::new(240, 480));

        session.handle_message(SIGNAL_APPLY_WINDOW_SIZE, r#"{"height": 900}"#).unwrap();
        assert_eq!(session.size(), WindowSize { width: 240, height: 900 });
        assert_eq!(session.host().sizes.len(), 3);
    }

    #[test]
    fn test_signal_parse_errors() {
        assert!(matches!(
            TemplateSignal::parse("pgSomething", ""),
            Err(TemplateError::UnknownSignal(_))
        ));
        assert!(matches!(
            TemplateSignal::parse(SIGNAL_APPLY_VALUE, "{broken"),
            Err(TemplateError::MalformedSignal { .. })
        ));
        assert_eq!(
            TemplateSignal::parse(SIGNAL_APPLY_WINDOW_SIZE, "").unwrap(),
            TemplateSignal::ApplyWindowSize {
                width: None,
                height: None
            }
        );
    }

    #[test]
    fn test_editor_view() {
        let fixture = fixture();
        let editor = TemplateEditor::new(fixture.template.clone(), "", Rc::clone(&fixture.property));
        assert_eq!(
            editor.view().widget,
            Widget::Button {
                caption: "Edit value".into(),
                summary: "Page.editor.html".into()
            }
        );
    }
}
