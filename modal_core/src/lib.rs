//! # Modal Core
//!
//! Modal text-editing engine for the trainer.
//!
//! ## Philosophy
//!
//! - **Deterministic**: Same key trace and clock ticks => same editor state
//! - **Modal editing**: Normal, Insert, Visual, Command modes
//! - **Mechanism over policy**: Core interprets keys, hosts decide rendering
//! - **Explicit time**: The prefix timeout runs on a logical clock the host advances
//!
//! ## Design
//!
//! The core provides:
//! - EditorCore: State machine for modal editing
//! - EditorSnapshot: Serializable state for renderers, validators and parity tests
//! - EngineConfig: Prefix timeout and tab width, loadable from JSON
//!
//! Keys arrive as [`input_types::KeyEvent`]s. A consumed key has its default
//! action suppressed and fires the change hook with a fresh snapshot.

pub mod buffer;
pub mod command;
pub mod config;
pub mod core;
pub mod mode;
pub mod motion;
pub mod pending;
pub mod register;
pub mod search;
pub mod snapshot;

pub use buffer::{Position, TextBuffer};
pub use command::{parse_command, Command, SubstituteRange, Substitution};
pub use config::{ConfigError, EngineConfig};
pub use core::{ChangeHook, EditorCore};
pub use mode::{EditorMode, Selection, SelectionKind};
pub use pending::{MultiKey, PendingCommand, Prefix, MAX_COUNT};
pub use register::{Registers, UNNAMED};
pub use search::Direction;
pub use snapshot::EditorSnapshot;

pub use input_types::{Key, KeyEvent, Modifiers};
