//! Overlay lifecycle: render-thread spawn, creation handshake, stop/join.
//!
//! The caller thread never touches the window or rendering objects directly;
//! it signals intent through the shared flag block and the render thread
//! picks the changes up on its next iteration.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crate::error::OverlayError;
use crate::options::OverlayOptions;
use crate::scheduler::{run_loop, OverlayBackend};
use crate::surface::Frame;
use crate::tracker::TargetProvider;

/// Per-frame draw callback. Runs synchronously on the render thread.
pub type DrawCallback = Box<dyn FnMut(&mut Frame<'_>) + Send>;

/// Creates the platform backend on the render thread. The overlay window has
/// thread affinity, so the backend is built after the thread starts and never
/// leaves it.
pub type BackendFactory =
    Box<dyn FnOnce() -> Result<Box<dyn OverlayBackend>, OverlayError> + Send>;

// One overlay per process. Claimed by `start`, released once `stop` has
// joined the render thread, so a restart cannot overlap a stop in progress.
static ACTIVE: AtomicBool = AtomicBool::new(false);

/// Flags shared between the caller thread and the render thread.
///
/// Enable and stop stay two independent atomics: they are read and written at
/// different rates by different concerns, and a stopped loop never iterates,
/// so their combination carries no meaning. Writes take effect on the next
/// loop iteration, not synchronously with the call.
pub(crate) struct Shared {
    enabled: AtomicBool,
    stopping: AtomicBool,
    /// True while the render thread is inside its loop with a live window.
    alive: AtomicBool,
    options: AtomicU32,
    /// Pending font change, drained by the render loop.
    font: Mutex<Option<String>>,
}

impl Shared {
    pub(crate) fn new() -> Self {
        Self {
            enabled: AtomicBool::new(true),
            stopping: AtomicBool::new(false),
            alive: AtomicBool::new(false),
            options: AtomicU32::new(OverlayOptions::empty().bits()),
            font: Mutex::new(None),
        }
    }

    pub(crate) fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    pub(crate) fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }

    pub(crate) fn is_stopping(&self) -> bool {
        self.stopping.load(Ordering::Acquire)
    }

    pub(crate) fn request_stop(&self) {
        self.stopping.store(true, Ordering::Release);
    }

    pub(crate) fn options(&self) -> OverlayOptions {
        OverlayOptions::from_bits_truncate(self.options.load(Ordering::Acquire))
    }

    pub(crate) fn merge_options(&self, options: OverlayOptions) {
        self.options.fetch_or(options.bits(), Ordering::AcqRel);
    }

    pub(crate) fn set_font(&self, name: &str) {
        if let Ok(mut font) = self.font.lock() {
            *font = Some(name.to_string());
        }
    }

    pub(crate) fn take_font_change(&self) -> Option<String> {
        self.font.lock().ok().and_then(|mut font| font.take())
    }

    pub(crate) fn mark_alive(&self) {
        self.alive.store(true, Ordering::Release);
    }

    pub(crate) fn clear_alive(&self) {
        self.alive.store(false, Ordering::Release);
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }
}

/// A running overlay: a transparent, click-through, always-on-top window
/// tracking a target window, redrawn every frame through the caller's
/// callback.
///
/// Dropping the overlay stops it.
pub struct Overlay {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl Overlay {
    /// Start an overlay over this process's own main window, discovered by
    /// enumerating top-level windows owned by the current process.
    ///
    /// Returns once the overlay window and render target exist, or with the
    /// startup error that prevented them from being created.
    #[cfg(target_os = "windows")]
    pub fn start<F>(callback: F) -> Result<Self, OverlayError>
    where
        F: FnMut(&mut Frame<'_>) + Send + 'static,
    {
        Self::spawn(
            Box::new(|| {
                crate::win32::Win32Backend::create().map(|b| Box::new(b) as Box<dyn OverlayBackend>)
            }),
            None,
            Box::new(callback),
        )
    }

    /// Start an overlay over the window returned by `provider`, queried
    /// every frame.
    #[cfg(target_os = "windows")]
    pub fn start_with_target<F>(callback: F, provider: TargetProvider) -> Result<Self, OverlayError>
    where
        F: FnMut(&mut Frame<'_>) + Send + 'static,
    {
        Self::spawn(
            Box::new(|| {
                crate::win32::Win32Backend::create().map(|b| Box::new(b) as Box<dyn OverlayBackend>)
            }),
            Some(provider),
            Box::new(callback),
        )
    }

    /// Start an overlay over a caller-supplied backend. This is the seam the
    /// tests drive the full lifecycle through; `factory` runs on the render
    /// thread.
    pub fn start_with_backend(
        factory: BackendFactory,
        provider: Option<TargetProvider>,
        callback: DrawCallback,
    ) -> Result<Self, OverlayError> {
        Self::spawn(factory, provider, callback)
    }

    fn spawn(
        factory: BackendFactory,
        provider: Option<TargetProvider>,
        mut callback: DrawCallback,
    ) -> Result<Self, OverlayError> {
        if ACTIVE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(OverlayError::AlreadyRunning);
        }

        let shared = Arc::new(Shared::new());
        let thread_shared = Arc::clone(&shared);
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), OverlayError>>();

        let spawned = thread::Builder::new()
            .name("overlay-render".into())
            .spawn(move || {
                let mut backend = match factory() {
                    Ok(backend) => backend,
                    Err(err) => {
                        let _ = ready_tx.send(Err(err));
                        return;
                    }
                };
                let mut provider = match provider {
                    Some(provider) => provider,
                    None => match backend.discover_self_target() {
                        Some(target) => {
                            Box::new(move || Some(target)) as TargetProvider
                        }
                        None => {
                            backend.destroy();
                            let _ = ready_tx.send(Err(OverlayError::SelfWindowNotFound));
                            return;
                        }
                    },
                };

                thread_shared.mark_alive();
                let _ = ready_tx.send(Ok(()));
                run_loop(
                    backend.as_mut(),
                    &thread_shared,
                    &mut provider,
                    &mut *callback,
                );
                thread_shared.clear_alive();
            });

        let worker = match spawned {
            Ok(worker) => worker,
            Err(err) => {
                ACTIVE.store(false, Ordering::Release);
                return Err(OverlayError::SpawnThread(err));
            }
        };

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                shared,
                worker: Some(worker),
            }),
            Ok(Err(err)) => {
                let _ = worker.join();
                ACTIVE.store(false, Ordering::Release);
                Err(err)
            }
            Err(_) => {
                tracing::error!("render thread exited without reporting startup status");
                let _ = worker.join();
                ACTIVE.store(false, Ordering::Release);
                Err(OverlayError::WorkerGone)
            }
        }
    }

    /// True while the loop has not been stopped and the overlay window still
    /// exists. Goes false on its own if the window is destroyed externally,
    /// but `stop` must still be called (or the overlay dropped) to release
    /// the render thread.
    pub fn is_running(&self) -> bool {
        !self.shared.is_stopping() && self.shared.is_alive()
    }

    /// Whether the draw callback runs. A disabled overlay keeps pumping
    /// messages and tracking the target; it just brackets empty frames.
    pub fn is_enabled(&self) -> bool {
        self.shared.is_enabled()
    }

    /// Takes effect on the next loop iteration.
    pub fn set_enabled(&self, enabled: bool) {
        self.shared.set_enabled(enabled);
    }

    /// OR `options` into the active set. Options cannot be removed once set.
    pub fn set_options(&self, options: OverlayOptions) {
        self.shared.merge_options(options);
    }

    /// Font used for subsequent text layouts, including the FPS readout.
    pub fn set_font_name(&self, name: &str) {
        self.shared.set_font(name);
    }

    /// Tear the overlay down: the render thread observes the stop flag within
    /// one iteration, destroys its window, and exits. Safe to call from any
    /// thread and more than once.
    pub fn stop(&mut self) {
        self.shared.request_stop();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::error!("render thread panicked during shutdown");
            }
            ACTIVE.store(false, Ordering::Release);
        }
    }
}

impl Drop for Overlay {
    fn drop(&mut self) {
        self.stop();
    }
}
