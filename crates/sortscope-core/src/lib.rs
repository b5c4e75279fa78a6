//! Sortscope Core - Instrumented arrays and procedural access sounds for sorting visualizers

pub mod algorithms;
pub mod array;
pub mod audio;
pub mod config;
pub mod pacing;
pub mod show;
pub mod sound;
pub mod types;

pub use types::*;
