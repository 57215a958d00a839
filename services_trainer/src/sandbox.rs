//! Free-practice sandbox
//!
//! An engine with no validator attached. Reset puts it back to the content
//! it was created with and drops registers and search history.

use std::time::Duration;

use input_types::KeyEvent;
use modal_core::{EditorCore, EditorSnapshot, EngineConfig};
use tracing::debug;

use crate::lesson::TrainerResult;

/// Independent practice engine
#[derive(Debug)]
pub struct Sandbox {
    config: EngineConfig,
    initial: String,
    engine: EditorCore,
}

impl Sandbox {
    pub fn new(content: impl Into<String>) -> Self {
        Self::with_config(content, EngineConfig::default())
    }

    pub fn with_config(content: impl Into<String>, config: EngineConfig) -> Self {
        let initial = content.into();
        let engine = Self::fresh_engine(&initial, &config);
        Self {
            config,
            initial,
            engine,
        }
    }

    fn fresh_engine(content: &str, config: &EngineConfig) -> EditorCore {
        let mut engine = EditorCore::with_config(config.clone());
        engine.load_content(content);
        engine
    }

    pub fn engine(&self) -> &EditorCore {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut EditorCore {
        &mut self.engine
    }

    pub fn snapshot(&self) -> EditorSnapshot {
        self.engine.snapshot()
    }

    pub fn handle_key(&mut self, event: &mut KeyEvent) -> bool {
        self.engine.handle_key(event)
    }

    /// Feed a key-notation script, returning how many keys were consumed
    pub fn type_keys(&mut self, notation: &str) -> TrainerResult<usize> {
        Ok(self.engine.apply_keys(notation)?)
    }

    pub fn tick(&mut self, now: Duration) -> bool {
        self.engine.tick(now)
    }

    /// Start over from the initial content with a clean engine
    pub fn reset(&mut self) {
        self.engine = Self::fresh_engine(&self.initial, &self.config);
        debug!("sandbox reset");
    }

    /// Replace the content reset goes back to, and reset
    pub fn replace_content(&mut self, content: impl Into<String>) {
        self.initial = content.into();
        self.reset();
    }
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::new(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modal_core::EditorMode;

    #[test]
    fn test_reset_restores_content_and_registers() {
        let mut sandbox = Sandbox::new("hello\nworld");
        sandbox.type_keys("ddix<Esc>").unwrap();
        assert_eq!(sandbox.snapshot().lines, vec!["xworld"]);

        sandbox.reset();
        let snapshot = sandbox.snapshot();
        assert_eq!(snapshot.lines, vec!["hello", "world"]);
        assert_eq!(snapshot.mode, EditorMode::Normal);
        assert!(snapshot.registers.is_empty());
    }

    #[test]
    fn test_replace_content() {
        let mut sandbox = Sandbox::default();
        sandbox.replace_content("new text");
        assert_eq!(sandbox.snapshot().lines, vec!["new text"]);
        sandbox.type_keys("x").unwrap();
        sandbox.reset();
        assert_eq!(sandbox.snapshot().lines, vec!["new text"]);
    }

    #[test]
    fn test_bad_notation() {
        let mut sandbox = Sandbox::default();
        assert!(sandbox.type_keys("<Nope>").is_err());
    }
}
