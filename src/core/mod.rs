//! Core logic — scrolling, scheduling and document model.
//!
//! Nothing in here touches the terminal; time arrives as explicit
//! timestamps so everything can be driven deterministically.

pub mod animator;
pub mod back_to_top;
pub mod document;
pub mod easing;
pub mod scheduler;
pub mod toggle;
pub mod visibility;
