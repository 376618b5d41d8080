//! UI / rendering layer — everything that touches Ratatui widgets.
//!
//! This layer takes the *core* data structures and turns them into cells on
//! the terminal.  No I/O happens here.

pub mod contents;
pub mod header;
pub mod layout;
pub mod page;
pub mod popup;
pub mod theme;
