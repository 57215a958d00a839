//! Lessons and step validation
//!
//! A lesson is an ordered list of steps. Each step loads its own content
//! into the engine and is complete once its validator accepts the state
//! produced by a consumed key.

use std::fmt;
use std::time::Duration;

use input_types::{parse_keys, KeyEvent, KeyNotationError};
use modal_core::{EditorCore, EditorMode, EditorSnapshot, EngineConfig, Position};
use thiserror::Error;
use tracing::{debug, info};

/// Lesson harness error
#[derive(Debug, Error)]
pub enum TrainerError {
    #[error("Lesson {0} has no steps")]
    EmptyLesson(String),

    #[error("Lesson is already finished")]
    LessonFinished,

    #[error("Invalid key notation: {0}")]
    Notation(#[from] KeyNotationError),
}

/// Trainer result
pub type TrainerResult<T> = Result<T, TrainerError>;

/// Decides whether a step is done
///
/// `previous` is the state before the key that produced `current`.
pub trait StepValidator {
    fn is_complete(&self, current: &EditorSnapshot, previous: &EditorSnapshot) -> bool;
}

impl<F> StepValidator for F
where
    F: Fn(&EditorSnapshot, &EditorSnapshot) -> bool,
{
    fn is_complete(&self, current: &EditorSnapshot, previous: &EditorSnapshot) -> bool {
        self(current, previous)
    }
}

/// Cursor reached a position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorAt(pub Position);

impl StepValidator for CursorAt {
    fn is_complete(&self, current: &EditorSnapshot, _previous: &EditorSnapshot) -> bool {
        current.cursor == self.0
    }
}

/// Buffer holds exactly these lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinesEqual(pub Vec<String>);

impl LinesEqual {
    pub fn new<S: AsRef<str>>(lines: &[S]) -> Self {
        Self(lines.iter().map(|s| s.as_ref().to_string()).collect())
    }
}

impl StepValidator for LinesEqual {
    fn is_complete(&self, current: &EditorSnapshot, _previous: &EditorSnapshot) -> bool {
        current.lines == self.0
    }
}

/// Editor is in a mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeIs(pub EditorMode);

impl StepValidator for ModeIs {
    fn is_complete(&self, current: &EditorSnapshot, _previous: &EditorSnapshot) -> bool {
        current.mode == self.0
    }
}

/// A register holds this text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterEquals {
    pub name: char,
    pub text: String,
}

impl RegisterEquals {
    pub fn new(name: char, text: impl Into<String>) -> Self {
        Self {
            name,
            text: text.into(),
        }
    }
}

impl StepValidator for RegisterEquals {
    fn is_complete(&self, current: &EditorSnapshot, _previous: &EditorSnapshot) -> bool {
        current.register(self.name) == Some(self.text.as_str())
    }
}

/// Every inner validator passes
#[derive(Default)]
pub struct All(pub Vec<Box<dyn StepValidator>>);

impl All {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, validator: impl StepValidator + 'static) -> Self {
        self.0.push(Box::new(validator));
        self
    }
}

impl StepValidator for All {
    fn is_complete(&self, current: &EditorSnapshot, previous: &EditorSnapshot) -> bool {
        self.0.iter().all(|v| v.is_complete(current, previous))
    }
}

/// One lesson step
pub struct LessonStep {
    pub instructions: String,
    /// Buffer content loaded when the step starts
    pub content: String,
    validator: Box<dyn StepValidator>,
}

impl LessonStep {
    pub fn new(
        instructions: impl Into<String>,
        content: impl Into<String>,
        validator: impl StepValidator + 'static,
    ) -> Self {
        Self {
            instructions: instructions.into(),
            content: content.into(),
            validator: Box::new(validator),
        }
    }

    pub fn is_complete(&self, current: &EditorSnapshot, previous: &EditorSnapshot) -> bool {
        self.validator.is_complete(current, previous)
    }
}

impl fmt::Debug for LessonStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LessonStep")
            .field("instructions", &self.instructions)
            .field("content", &self.content)
            .finish_non_exhaustive()
    }
}

/// An ordered set of steps
#[derive(Debug)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    pub steps: Vec<LessonStep>,
}

impl Lesson {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            steps: Vec::new(),
        }
    }

    /// Append a step
    pub fn step(mut self, step: LessonStep) -> Self {
        self.steps.push(step);
        self
    }
}

/// What a key did to the lesson
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The engine did not consume the key
    Ignored,
    /// Consumed, step still open
    InProgress,
    /// The step at `index` was completed and the next one loaded
    StepComplete { index: usize },
    /// The last step was completed
    LessonComplete,
}

/// Drives a lesson through its own engine
#[derive(Debug)]
pub struct LessonRunner {
    lesson: Lesson,
    engine: EditorCore,
    step: usize,
    finished: bool,
}

impl LessonRunner {
    pub fn new(lesson: Lesson) -> TrainerResult<Self> {
        Self::with_config(lesson, EngineConfig::default())
    }

    pub fn with_config(lesson: Lesson, config: EngineConfig) -> TrainerResult<Self> {
        let Some(first) = lesson.steps.first() else {
            return Err(TrainerError::EmptyLesson(lesson.id));
        };

        let mut engine = EditorCore::with_config(config);
        engine.load_content(&first.content);
        info!(lesson = %lesson.id, steps = lesson.steps.len(), "lesson started");

        Ok(Self {
            lesson,
            engine,
            step: 0,
            finished: false,
        })
    }

    pub fn lesson(&self) -> &Lesson {
        &self.lesson
    }

    pub fn engine(&self) -> &EditorCore {
        &self.engine
    }

    /// Index of the open step
    pub fn step_index(&self) -> usize {
        self.step
    }

    /// The open step, `None` once the lesson is finished
    pub fn current_step(&self) -> Option<&LessonStep> {
        if self.finished {
            None
        } else {
            self.lesson.steps.get(self.step)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn snapshot(&self) -> EditorSnapshot {
        self.engine.snapshot()
    }

    /// Feed one key and validate the open step
    pub fn press(&mut self, event: &mut KeyEvent) -> TrainerResult<StepOutcome> {
        if self.finished {
            return Err(TrainerError::LessonFinished);
        }

        let previous = self.engine.snapshot();
        if !self.engine.handle_key(event) {
            return Ok(StepOutcome::Ignored);
        }

        let current = self.engine.snapshot();
        let done = self
            .current_step()
            .is_some_and(|step| step.is_complete(&current, &previous));
        if !done {
            return Ok(StepOutcome::InProgress);
        }

        Ok(self.advance_step())
    }

    /// Feed a key-notation script, stopping early when the lesson finishes
    pub fn type_keys(&mut self, notation: &str) -> TrainerResult<StepOutcome> {
        let mut outcome = StepOutcome::Ignored;
        for mut event in parse_keys(notation)? {
            outcome = self.press(&mut event)?;
            if outcome == StepOutcome::LessonComplete {
                break;
            }
        }
        Ok(outcome)
    }

    /// Advance the engine's logical clock
    pub fn tick(&mut self, now: Duration) -> bool {
        self.engine.tick(now)
    }

    /// Reload the open step's content
    pub fn restart_step(&mut self) {
        if let Some(step) = self.current_step() {
            let content = step.content.clone();
            self.engine.load_content(&content);
            debug!(step = self.step, "step restarted");
        }
    }

    fn advance_step(&mut self) -> StepOutcome {
        let index = self.step;
        self.step += 1;

        match self.lesson.steps.get(self.step) {
            Some(next) => {
                info!(lesson = %self.lesson.id, step = index, "step complete");
                self.engine.load_content(&next.content);
                StepOutcome::StepComplete { index }
            }
            None => {
                info!(lesson = %self.lesson.id, "lesson complete");
                self.finished = true;
                StepOutcome::LessonComplete
            }
        }
    }
}
