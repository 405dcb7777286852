//! Direct2D/DirectWrite implementation of [`DrawSurface`].
//!
//! One `ID2D1HwndRenderTarget` bound to the overlay window, one shared solid
//! brush whose color and opacity are fully re-set by every draw call, and a
//! per-call DirectWrite text layout so each string can carry its own font
//! size.

use windows::core::PCWSTR;
use windows::Win32::Foundation::HWND;
use windows::Win32::Graphics::Direct2D::Common::{
    D2D1_ALPHA_MODE_PREMULTIPLIED, D2D1_COLOR_F, D2D1_PIXEL_FORMAT, D2D_POINT_2F, D2D_RECT_F,
    D2D_SIZE_U,
};
use windows::Win32::Graphics::Direct2D::{
    D2D1CreateFactory, D2D1_ANTIALIAS_MODE_PER_PRIMITIVE, D2D1_DRAW_TEXT_OPTIONS_NONE,
    D2D1_ELLIPSE, D2D1_FACTORY_TYPE_MULTI_THREADED, D2D1_HWND_RENDER_TARGET_PROPERTIES,
    D2D1_PRESENT_OPTIONS_IMMEDIATELY, D2D1_RENDER_TARGET_PROPERTIES, ID2D1Factory,
    ID2D1HwndRenderTarget, ID2D1SolidColorBrush,
};
use windows::Win32::Graphics::DirectWrite::{
    DWriteCreateFactory, IDWriteFactory, IDWriteTextFormat, DWRITE_FACTORY_TYPE_SHARED,
    DWRITE_FONT_STRETCH_NORMAL, DWRITE_FONT_STYLE_NORMAL, DWRITE_FONT_WEIGHT_NORMAL,
    DWRITE_TEXT_RANGE,
};
use windows::Win32::Graphics::Dxgi::Common::DXGI_FORMAT_UNKNOWN;

use crate::error::OverlayError;
use crate::surface::{Color, DrawSurface};

const DEFAULT_FONT: &str = "Courier";
const BASE_FONT_SIZE: f32 = 10.0;

const TRANSPARENT: D2D1_COLOR_F = D2D1_COLOR_F {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 0.0,
};

fn to_wide(text: &str) -> Vec<u16> {
    text.encode_utf16().chain(std::iter::once(0)).collect()
}

fn color_f(color: Color) -> D2D1_COLOR_F {
    D2D1_COLOR_F {
        r: color.r,
        g: color.g,
        b: color.b,
        a: color.a,
    }
}

pub(crate) struct D2dSurface {
    // Held for the lifetime of the render target.
    _factory: ID2D1Factory,
    target: ID2D1HwndRenderTarget,
    brush: ID2D1SolidColorBrush,
    dwrite: IDWriteFactory,
    format: IDWriteTextFormat,
}

impl D2dSurface {
    pub(crate) fn new(hwnd: HWND) -> Result<Self, OverlayError> {
        unsafe {
            let factory: ID2D1Factory =
                D2D1CreateFactory(D2D1_FACTORY_TYPE_MULTI_THREADED, None)
                    .map_err(|err| OverlayError::RenderTarget(err.to_string()))?;

            let rt_props = D2D1_RENDER_TARGET_PROPERTIES {
                pixelFormat: D2D1_PIXEL_FORMAT {
                    format: DXGI_FORMAT_UNKNOWN,
                    alphaMode: D2D1_ALPHA_MODE_PREMULTIPLIED,
                },
                ..Default::default()
            };
            let hwnd_props = D2D1_HWND_RENDER_TARGET_PROPERTIES {
                hwnd,
                pixelSize: D2D_SIZE_U {
                    width: 200,
                    height: 200,
                },
                presentOptions: D2D1_PRESENT_OPTIONS_IMMEDIATELY,
            };
            let target = factory
                .CreateHwndRenderTarget(&rt_props, &hwnd_props)
                .map_err(|err| OverlayError::RenderTarget(err.to_string()))?;
            target.SetAntialiasMode(D2D1_ANTIALIAS_MODE_PER_PRIMITIVE);

            let brush = target
                .CreateSolidColorBrush(&TRANSPARENT, None)
                .map_err(|err| OverlayError::RenderTarget(err.to_string()))?;

            let dwrite: IDWriteFactory = DWriteCreateFactory(DWRITE_FACTORY_TYPE_SHARED)
                .map_err(|err| OverlayError::RenderTarget(err.to_string()))?;
            let format = Self::make_format(&dwrite, DEFAULT_FONT)
                .map_err(|err| OverlayError::RenderTarget(err.to_string()))?;

            Ok(Self {
                _factory: factory,
                target,
                brush,
                dwrite,
                format,
            })
        }
    }

    fn make_format(
        dwrite: &IDWriteFactory,
        font: &str,
    ) -> windows::core::Result<IDWriteTextFormat> {
        let family = to_wide(font);
        let locale = to_wide("en-US");
        unsafe {
            dwrite.CreateTextFormat(
                PCWSTR(family.as_ptr()),
                None,
                DWRITE_FONT_WEIGHT_NORMAL,
                DWRITE_FONT_STYLE_NORMAL,
                DWRITE_FONT_STRETCH_NORMAL,
                BASE_FONT_SIZE,
                PCWSTR(locale.as_ptr()),
            )
        }
    }

    fn apply_brush(&self, color: Color, opacity: f32) {
        unsafe {
            self.brush.SetColor(&color_f(color));
            self.brush.SetOpacity(opacity);
        }
    }
}

impl DrawSurface for D2dSurface {
    fn resize(&mut self, width: u32, height: u32) {
        let size = D2D_SIZE_U { width, height };
        if let Err(err) = unsafe { self.target.Resize(&size) } {
            tracing::debug!(?err, width, height, "render target resize failed");
        }
    }

    fn begin_frame(&mut self) {
        unsafe { self.target.BeginDraw() };
    }

    fn clear(&mut self) {
        unsafe { self.target.Clear(Some(&TRANSPARENT)) };
    }

    fn end_frame(&mut self) {
        if let Err(err) = unsafe { self.target.EndDraw(None, None) } {
            tracing::debug!(?err, "EndDraw failed");
        }
    }

    fn set_font(&mut self, name: &str) {
        match Self::make_format(&self.dwrite, name) {
            Ok(format) => self.format = format,
            // Keep the previous format on failure.
            Err(err) => tracing::debug!(?err, name, "text format creation failed"),
        }
    }

    fn draw_text(&mut self, text: &str, size: f32, x: f32, y: f32, color: Color, opacity: f32) {
        let wide: Vec<u16> = text.encode_utf16().collect();
        let bounds = unsafe { self.target.GetSize() };
        let layout = match unsafe {
            self.dwrite
                .CreateTextLayout(&wide, &self.format, bounds.width, bounds.height)
        } {
            Ok(layout) => layout,
            // A failed layout skips this draw only.
            Err(err) => {
                tracing::debug!(?err, "text layout failed");
                return;
            }
        };
        let range = DWRITE_TEXT_RANGE {
            startPosition: 0,
            length: wide.len() as u32,
        };
        unsafe {
            if let Err(err) = layout.SetFontSize(size, range) {
                tracing::debug!(?err, "SetFontSize failed");
            }
            self.apply_brush(color, opacity);
            self.target.DrawTextLayout(
                D2D_POINT_2F { x, y },
                &layout,
                &self.brush,
                D2D1_DRAW_TEXT_OPTIONS_NONE,
            );
        }
    }

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
    ) {
        self.apply_brush(color, opacity);
        let rect = D2D_RECT_F {
            left: x,
            top: y,
            right: x + width,
            bottom: y + height,
        };
        unsafe {
            if filled {
                self.target.FillRectangle(&rect, &self.brush);
            } else {
                self.target.DrawRectangle(&rect, &self.brush, thickness, None);
            }
        }
    }

    fn draw_line(
        &mut self,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        thickness: f32,
        color: Color,
        opacity: f32,
    ) {
        self.apply_brush(color, opacity);
        unsafe {
            self.target.DrawLine(
                D2D_POINT_2F { x: x1, y: y1 },
                D2D_POINT_2F { x: x2, y: y2 },
                &self.brush,
                thickness,
                None,
            );
        }
    }

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
    ) {
        self.apply_brush(color, opacity);
        let ellipse = D2D1_ELLIPSE {
            point: D2D_POINT_2F { x: cx, y: cy },
            radiusX: rx,
            radiusY: ry,
        };
        unsafe {
            if filled {
                self.target.FillEllipse(&ellipse, &self.brush);
            } else {
                self.target.DrawEllipse(&ellipse, &self.brush, thickness, None);
            }
        }
    }
}
