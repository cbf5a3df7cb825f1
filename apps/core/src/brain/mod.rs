//! # Brain Module
//!
//! Deterministic, pattern-based understanding of user utterances for NEXUS.
//! Runs before any external handler is called.
//!
//! ## Components
//! - `patterns`: closed tag vocabularies and their phrase matchers
//! - `mode`: the active mode and its persisted state
//! - `commands`: per-mode and cross-cutting command grammars
//! - `classifier`: ordered rule list deciding switch / command / chat
//! - `requirements`: tech stack, features and name from a project request
//! - `blueprint`: components, pages, dependencies and endpoints for a request

pub mod blueprint;
pub mod classifier;
pub mod commands;
pub mod mode;
pub mod patterns;
pub mod requirements;

pub use blueprint::Blueprint;
pub use classifier::{Classification, ClassificationResult, CommandPrecedence, IntentClassifier};
pub use commands::{CommandArgs, CommandKind, CommandRoute, MatchedCommand};
pub use mode::{FileModeStore, MemoryModeStore, Mode, ModeState, ModeStore};
pub use patterns::{Feature, Layer, PatternLibrary, ProjectType, TechStack, Vocabulary};
pub use requirements::{RequirementAnalyzer, RequirementExtraction};
