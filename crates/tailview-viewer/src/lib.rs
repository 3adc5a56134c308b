#![forbid(unsafe_code)]

//! Stateful half of the tailview log stream viewer.
//!
//! Built on the pure primitives in `tailview-core`, this crate owns the
//! viewport: render-window math, the auto-scroll (follow) controller,
//! warn/error marker navigation, the keyboard surface, and the
//! [`StreamViewer`] that ties them together over one entry sequence.
//!
//! The viewer is a pure reaction to pushed entries and local user input:
//! single-threaded, synchronous, with no I/O. Hosting surfaces integrate
//! through narrow seams: [`host::ScrollHost`] for the scroll container,
//! [`keys::InputSource`] for the global key listener, and optional hooks
//! for stream toggling and clipboard export.

pub mod follow;
pub mod host;
pub mod keys;
pub mod markers;
pub mod viewer;
pub mod window;

pub use follow::{FollowController, FollowMode};
pub use host::{MemoryScrollHost, ScrollHost};
pub use keys::{InputSource, Key, KeyAction, SubscriptionId};
pub use markers::{Direction, clamp_cursor, next_marker};
pub use viewer::{HostEffect, StreamViewer, ViewerConfig, ViewerSurface};
pub use window::{DEFAULT_OVERSCAN, RenderWindow, compute_window};
