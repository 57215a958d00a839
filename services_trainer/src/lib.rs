//! # Modal Trainer Services
//!
//! Lesson harness, practice sandbox and text rendering on top of
//! [`modal_core::EditorCore`].
//!
//! ## Philosophy
//!
//! - **Engine stays pure**: Lessons observe snapshots, they never reach into the engine
//! - **Validators are values**: A step is done when its validator says so
//! - **Testable**: Whole lessons run from key-notation scripts
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A lesson catalog or content format
//! - Progress persistence
//! - A styled renderer
//!
//! ## Design
//!
//! - `LessonRunner` owns an engine, feeds it keys and validates after each consumed key
//! - `Sandbox` is an engine with a reset button
//! - `TextView` turns a snapshot into plain text

pub mod lesson;
pub mod render;
pub mod sandbox;

pub use lesson::{
    All, CursorAt, Lesson, LessonRunner, LessonStep, LinesEqual, ModeIs, RegisterEquals,
    StepOutcome, StepValidator, TrainerError, TrainerResult,
};
pub use render::TextView;
pub use sandbox::Sandbox;
