//! Terminal User Interface module.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `helpers` - Loader spawning and the task panic guard
//! - `render` - Layout and overlay stacking
//! - `hero` - Now-playing hero carousel
//! - `carousel` - Grid rows
//! - `detail` - Detail overlay
//! - `status` - Status bar widget
//! - `help` - Help overlay

mod carousel;
mod detail;
mod events;
mod help;
mod helpers;
mod hero;
mod input;
mod loop_runner;
mod render;
mod status;

// Re-export the public API
pub use loop_runner::{run, Action};
