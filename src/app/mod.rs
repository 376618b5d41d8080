//! Application orchestration — state management, frame dispatch and input handling.

pub mod event;
pub mod frames;
pub mod handler;
pub mod settings;
pub mod state;
