//! Frame scheduler: the message-pump-driven render loop.
//!
//! Each iteration drains one window message, synchronizes overlay geometry
//! with the tracked window, and either draws a frame through the caller's
//! callback or brackets an empty frame when drawing is gated off. The loop
//! yields for at least [`PUMP_TICK`] every iteration so stop requests are
//! observed within one iteration's worth of time.

use std::time::{Duration, Instant};

use crate::overlay::Shared;
use crate::surface::{Color, DrawSurface, Frame};
use crate::tracker::{TargetBounds, TargetProvider, WindowId};
use crate::OverlayOptions;

/// Baseline per-iteration yield.
pub(crate) const PUMP_TICK: Duration = Duration::from_millis(1);

/// Target frame interval for the frame cap (~60 Hz).
pub(crate) const FRAME_INTERVAL: Duration = Duration::from_millis(17);

/// Frame-cap pauses at or above this bound are treated as a stalled frame
/// and skipped rather than slept through.
const MAX_CAP_PAUSE: Duration = Duration::from_millis(30);

/// The FPS readout refreshes at most once per this window.
const FPS_REFRESH_WINDOW: Duration = Duration::from_millis(100);

const FPS_TEXT_SIZE: f32 = 20.0;
const FPS_RIGHT_MARGIN: f32 = 50.0;
const FPS_COLOR: Color = Color::rgb(0.0, 1.0, 0.0);

/// Outcome of draining one pending window message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpEvent {
    Continue,
    /// A quit message was posted; the loop must terminate.
    Quit,
}

/// Platform seam between the scheduler and the windowing system.
///
/// The Windows implementation wraps the overlay HWND and its Direct2D
/// surface; tests drive the loop with recording fakes so the pump logic
/// stays host-independent.
///
/// Implementations are created on the render thread by a factory closure and
/// never leave it, so they need not be `Send`.
pub trait OverlayBackend {
    /// Drain at most one pending message for the overlay window.
    fn poll_message(&mut self) -> PumpEvent;

    /// Whether the overlay window still exists. External destruction makes
    /// this return false and ends the loop.
    fn window_alive(&self) -> bool;

    /// Find a window owned by the current process to track when no explicit
    /// target provider was supplied.
    fn discover_self_target(&mut self) -> Option<WindowId>;

    /// Live client-area bounds of the target, or `None` when the window is
    /// gone, invalid, or degenerate.
    fn target_bounds(&mut self, target: WindowId) -> Option<TargetBounds>;

    fn target_is_foreground(&mut self, target: WindowId) -> bool;

    /// Move/resize the overlay window to `bounds`. Returns false when the
    /// overlay is minimized and was left untouched.
    fn place_window(&mut self, bounds: TargetBounds) -> bool;

    fn surface(&mut self) -> &mut dyn DrawSurface;

    /// Destroy the overlay window. Runs on the render thread after the loop
    /// exits.
    fn destroy(&mut self);

    fn sleep(&mut self, dur: Duration) {
        std::thread::sleep(dur);
    }

    fn now(&mut self) -> Instant {
        Instant::now()
    }
}

/// Per-frame timestamps and the cached FPS readout value.
pub(crate) struct FrameTiming {
    last_frame: Instant,
    last_refresh: Instant,
    fps: u32,
}

impl FrameTiming {
    pub(crate) fn new(now: Instant) -> Self {
        Self {
            last_frame: now,
            last_refresh: now,
            fps: 0,
        }
    }

    /// Time since the previous drawn frame; advances the frame timestamp.
    pub(crate) fn frame_elapsed(&mut self, now: Instant) -> Duration {
        let elapsed = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        elapsed
    }

    /// Refresh the cached FPS value from the instantaneous frame time, at
    /// most once per [`FPS_REFRESH_WINDOW`], and return the value to show.
    pub(crate) fn refresh_fps(&mut self, now: Instant, elapsed: Duration) -> u32 {
        if now.saturating_duration_since(self.last_refresh) > FPS_REFRESH_WINDOW {
            let elapsed_ms = elapsed.as_millis().max(1) as u32;
            self.fps = 1000 / elapsed_ms;
            self.last_refresh = now;
        }
        self.fps
    }
}

/// How long to sleep to approximate [`FRAME_INTERVAL`], if at all.
///
/// Only pauses strictly inside `(0, MAX_CAP_PAUSE)` are applied: a frame
/// slower than the target gets no pause, and a pathological elapsed value
/// cannot stall the loop.
pub(crate) fn frame_cap_pause(elapsed: Duration) -> Option<Duration> {
    let pause = FRAME_INTERVAL.checked_sub(elapsed)?;
    if pause.is_zero() || pause >= MAX_CAP_PAUSE {
        return None;
    }
    Some(pause)
}

/// Run the overlay loop until a stop is requested, the window dies, or a
/// quit message arrives. Destroys the window before returning.
pub(crate) fn run_loop(
    backend: &mut dyn OverlayBackend,
    shared: &Shared,
    provider: &mut TargetProvider,
    callback: &mut (dyn FnMut(&mut Frame<'_>) + Send),
) {
    let now = backend.now();
    let mut timing = FrameTiming::new(now);

    loop {
        if shared.is_stopping() || !backend.window_alive() {
            break;
        }
        if backend.poll_message() == PumpEvent::Quit {
            break;
        }

        if let Some(font) = shared.take_font_change() {
            backend.surface().set_font(&font);
        }

        // Target geometry is queried live every tick; losing the target just
        // skips the frame and retries.
        let target = match provider() {
            Some(target) => target,
            None => {
                backend.sleep(PUMP_TICK);
                continue;
            }
        };
        let bounds = match backend.target_bounds(target) {
            Some(bounds) => bounds,
            None => {
                backend.sleep(PUMP_TICK);
                continue;
            }
        };

        if backend.place_window(bounds) {
            backend.surface().resize(bounds.width, bounds.height);
        }
        backend.surface().begin_frame();
        backend.surface().clear();

        let options = shared.options();
        let gated = !shared.is_enabled()
            || (options.contains(OverlayOptions::REQUIRE_FOREGROUND)
                && !backend.target_is_foreground(target));
        if gated {
            backend.surface().end_frame();
            backend.sleep(PUMP_TICK);
            continue;
        }

        let now = backend.now();
        let elapsed = timing.frame_elapsed(now);

        if options.contains(OverlayOptions::DRAW_FPS) {
            let fps = timing.refresh_fps(now, elapsed);
            backend.surface().draw_text(
                &fps.to_string(),
                FPS_TEXT_SIZE,
                bounds.width as f32 - FPS_RIGHT_MARGIN,
                0.0,
                FPS_COLOR,
                1.0,
            );
        }

        if options.contains(OverlayOptions::FRAME_CAP) {
            if let Some(pause) = frame_cap_pause(elapsed) {
                backend.sleep(pause);
            }
        }

        {
            let mut frame =
                Frame::new(backend.surface(), bounds.width as f32, bounds.height as f32);
            callback(&mut frame);
        }

        backend.surface().end_frame();
        backend.sleep(PUMP_TICK);
    }

    backend.destroy();
}
