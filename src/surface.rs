//! Drawing surface seam and the per-frame draw handle.
//!
//! The render loop talks to an opaque [`DrawSurface`]; on Windows this is
//! backed by Direct2D, in tests by recording fakes. Draw calls fully re-set
//! color and opacity every time, so no brush state leaks between calls.

/// Normalized RGBA color. All channels are in `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// One frame's worth of drawing on a transparent surface.
///
/// `begin_frame` and `end_frame` always pair, even when the frame draws
/// nothing. `resize` is called before `begin_frame` whenever the tracked
/// window changed size.
pub trait DrawSurface {
    fn resize(&mut self, width: u32, height: u32);
    fn begin_frame(&mut self);
    /// Clear the whole surface to fully transparent.
    fn clear(&mut self);
    fn end_frame(&mut self);

    /// Change the font used by subsequent `draw_text` calls.
    fn set_font(&mut self, name: &str);

    /// Lay out and draw `text` at `(x, y)`. A failed layout skips the draw.
    fn draw_text(&mut self, text: &str, size: f32, x: f32, y: f32, color: Color, opacity: f32);

    fn draw_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        thickness: f32,
        color: Color,
        filled: bool,
        opacity: f32,
    );

    fn draw_line(
        &mut self,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        thickness: f32,
        color: Color,
        opacity: f32,
    );

    /// Ellipse centered at `(cx, cy)`; `thickness` is ignored when filled.
    #[allow(clippy::too_many_arguments)]
    fn draw_ellipse(
        &mut self,
        cx: f32,
        cy: f32,
        rx: f32,
        ry: f32,
        thickness: f32,
        color: Color,
        filled: bool,
        opacity: f32,
    );
}

/// Drawing handle passed to the per-frame callback.
///
/// Only valid for the duration of one callback invocation on the render
/// thread; `width`/`height` reflect the tracked window's client area for
/// this frame.
pub struct Frame<'a> {
    surface: &'a mut dyn DrawSurface,
    width: f32,
    height: f32,
}

impl<'a> Frame<'a> {
    /// Wrap a surface for one frame. Normally done by the render loop; public
    /// so tests and headless backends can exercise callbacks directly.
    pub fn new(surface: &'a mut dyn DrawSurface, width: f32, height: f32) -> Self {
        Self {
            surface,
            width,
            height,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn text(&mut self, text: &str, size: f32, x: f32, y: f32, color: Color, opacity: f32) {
        self.surface.draw_text(text, size, x, y, color, opacity);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        thickness: f32,
        color: Color,
        filled: bool,
        opacity: f32,
    ) {
        self.surface
            .draw_rect(x, y, width, height, thickness, color, filled, opacity);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn line(
        &mut self,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        thickness: f32,
        color: Color,
        opacity: f32,
    ) {
        self.surface
            .draw_line(x1, y1, x2, y2, thickness, color, opacity);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn circle(
        &mut self,
        cx: f32,
        cy: f32,
        radius: f32,
        thickness: f32,
        color: Color,
        filled: bool,
        opacity: f32,
    ) {
        self.surface
            .draw_ellipse(cx, cy, radius, radius, thickness, color, filled, opacity);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn ellipse(
        &mut self,
        cx: f32,
        cy: f32,
        rx: f32,
        ry: f32,
        thickness: f32,
        color: Color,
        filled: bool,
        opacity: f32,
    ) {
        self.surface
            .draw_ellipse(cx, cy, rx, ry, thickness, color, filled, opacity);
    }
}
