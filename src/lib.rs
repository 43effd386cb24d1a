//! Pulse-eased smooth scrolling engine.
//!
//! Translates discrete wheel, keyboard, and middle-mouse-drag input into
//! queued, eased, per-frame scroll deltas applied to the nearest scrollable
//! container of a document.  The engine never touches a concrete platform:
//! the embedding application implements [`host::HostPage`], feeds input
//! events to a [`engine::SmoothScroll`] instance, and drives it with frame
//! ticks.  [`page::Document`] is a complete in-memory host used by the
//! terminal demo binary and the test suite.

pub mod config;
pub mod core;
pub mod engine;
pub mod host;
pub mod page;

pub use config::ScrollConfig;
pub use engine::{Handled, SmoothScroll};
pub use host::{
    ElementId, HostPage, KeyEvent, MouseButton, MouseEvent, Overflow, ScrollKey, WheelEvent,
};
pub use page::Document;
