//! Decorative piano tones for progress slots and the header keyboard.

pub mod manager;
pub mod notes;
pub mod output;
pub mod synth;
pub mod types;

pub use manager::ToneManager;
pub use types::*;
