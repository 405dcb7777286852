//! Transparent, click-through Direct2D overlay for instrumenting another
//! window.
//!
//! [`Overlay::start`] spawns a render thread that creates a borderless,
//! always-on-top, input-transparent window, keeps it glued to the tracked
//! target window, and invokes a caller-supplied callback once per frame with
//! a [`Frame`] exposing immediate-mode text/shape primitives.
//!
//! ```no_run
//! # #[cfg(target_os = "windows")] {
//! use d2d_overlay::{Color, Overlay, OverlayOptions};
//!
//! let overlay = Overlay::start(|frame| {
//!     let (w, h) = (frame.width(), frame.height());
//!     frame.rect(10.0, 10.0, w - 20.0, h - 20.0, 2.0, Color::rgb(1.0, 0.0, 0.0), false, 1.0);
//! })
//! .expect("overlay startup");
//! overlay.set_options(OverlayOptions::DRAW_FPS);
//! # }
//! ```

pub mod error;
pub mod logging;
pub mod options;
pub mod overlay;
pub mod scheduler;
pub mod surface;
pub mod tracker;

#[cfg(target_os = "windows")]
mod d2d;
#[cfg(target_os = "windows")]
mod win32;

pub use error::OverlayError;
pub use options::OverlayOptions;
pub use overlay::{BackendFactory, DrawCallback, Overlay};
pub use scheduler::{OverlayBackend, PumpEvent};
pub use surface::{Color, DrawSurface, Frame};
pub use tracker::{TargetBounds, TargetProvider, WindowId};
