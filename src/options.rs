use bitflags::bitflags;

bitflags! {
    /// Feature flags consumed by the render loop.
    ///
    /// Flags are merged with a monotonic OR: [`crate::Overlay::set_options`]
    /// can turn features on but there is no way to turn one off again while
    /// the overlay runs.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct OverlayOptions: u32 {
        /// Only draw while the target window is the foreground window.
        const REQUIRE_FOREGROUND = 1;
        /// Render an FPS readout near the top-right corner.
        const DRAW_FPS = 1 << 1;
        /// Sleep between frames to approximate a ~60 Hz frame interval.
        const FRAME_CAP = 1 << 2;
    }
}
