use thiserror::Error;

/// Failures surfaced by [`crate::Overlay`] startup and lifecycle calls.
///
/// Once the render loop is running, transient conditions (missing target
/// window, text layout failures) are absorbed by the loop itself and never
/// reported here.
#[derive(Debug, Error)]
pub enum OverlayError {
    /// Another overlay created by this process is still active.
    #[error("an overlay is already running in this process")]
    AlreadyRunning,

    /// No explicit target provider was given and no top-level window
    /// belonging to the current process could be found.
    #[error("no top-level window belongs to the current process")]
    SelfWindowNotFound,

    /// Registering the window class or creating the overlay window failed.
    #[error("overlay window creation failed: {0}")]
    WindowCreation(String),

    /// Creating the Direct2D render target or its resources failed.
    #[error("render target creation failed: {0}")]
    RenderTarget(String),

    /// The render thread could not be spawned.
    #[error("failed to spawn render thread")]
    SpawnThread(#[from] std::io::Error),

    /// The render thread exited before confirming window creation.
    #[error("render thread exited before the overlay window was created")]
    WorkerGone,
}
