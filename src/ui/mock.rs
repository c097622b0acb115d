//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion.
//!
//! # Example
//!
//! ```
//! use pylocate::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.success("Resolved 2 interpreters");
//! ui.data("[]");
//!
//! assert!(ui.successes().contains(&"Resolved 2 interpreters".to_string()));
//! assert_eq!(ui.data_output(), "[]");
//! ```

use super::{OutputMode, UserInterface};

/// Mock UI implementation for testing.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
    key_values: Vec<(String, String)>,
    data: Vec<String>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new MockUI with a specific output mode.
    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn key_values(&self) -> &[(String, String)] {
        &self.key_values
    }

    /// Value shown for `key`, if any.
    pub fn value_for(&self, key: &str) -> Option<&str> {
        self.key_values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All data output joined with newlines.
    pub fn data_output(&self) -> String {
        self.data.join("\n")
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn key_value(&mut self, key: &str, value: &str) {
        self.key_values.push((key.to_string(), value.to_string()));
    }

    fn data(&mut self, content: &str) {
        self.data.push(content.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_interactions() {
        let mut ui = MockUI::new();
        ui.message("hello");
        ui.warning("careful");
        ui.error("broken");
        ui.show_header("/usr/bin/python3");
        ui.key_value("kind", "unknown");

        assert_eq!(ui.messages(), ["hello"]);
        assert_eq!(ui.warnings(), ["careful"]);
        assert_eq!(ui.errors(), ["broken"]);
        assert_eq!(ui.headers(), ["/usr/bin/python3"]);
        assert_eq!(ui.value_for("kind"), Some("unknown"));
        assert_eq!(ui.value_for("org"), None);
    }

    #[test]
    fn with_mode_sets_mode() {
        assert_eq!(MockUI::with_mode(OutputMode::Quiet).output_mode(), OutputMode::Quiet);
    }
}
