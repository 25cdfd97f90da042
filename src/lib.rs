//! Upload CSV or Excel files, clean and edit them, chart them, and convert
//! them to the other format.
//!
//! The processing core lives in [`data`] and [`state`] and has no UI
//! dependency; the `rusty-convert` binary draws it with egui.

pub mod data;
pub mod error;
pub mod state;
