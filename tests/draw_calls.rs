//! Draw-primitive contract: every call carries its own color/opacity and
//! issues exactly one fill-or-stroke operation on the surface.

use std::sync::{Arc, Mutex};

use d2d_overlay::{Color, DrawSurface, Frame};

#[derive(Debug, Clone, PartialEq)]
enum Op {
    Text {
        text: String,
        size: f32,
        color: Color,
        opacity: f32,
    },
    Rect {
        filled: bool,
        thickness: f32,
        color: Color,
        opacity: f32,
    },
    Line {
        thickness: f32,
        color: Color,
        opacity: f32,
    },
    Ellipse {
        rx: f32,
        ry: f32,
        filled: bool,
        thickness: f32,
        color: Color,
        opacity: f32,
    },
}

#[derive(Clone, Default)]
struct RecordingSurface {
    ops: Arc<Mutex<Vec<Op>>>,
}

impl DrawSurface for RecordingSurface {
    fn resize(&mut self, _width: u32, _height: u32) {}
    fn begin_frame(&mut self) {}
    fn clear(&mut self) {}
    fn end_frame(&mut self) {}
    fn set_font(&mut self, _name: &str) {}

    fn draw_text(&mut self, text: &str, size: f32, _x: f32, _y: f32, color: Color, opacity: f32) {
        self.ops.lock().unwrap().push(Op::Text {
            text: text.to_string(),
            size,
            color,
            opacity,
        });
    }

    fn draw_rect(
        &mut self,
        _x: f32,
        _y: f32,
        _w: f32,
        _h: f32,
        thickness: f32,
        color: Color,
        filled: bool,
        opacity: f32,
    ) {
        self.ops.lock().unwrap().push(Op::Rect {
            filled,
            thickness,
            color,
            opacity,
        });
    }

    fn draw_line(
        &mut self,
        _x1: f32,
        _y1: f32,
        _x2: f32,
        _y2: f32,
        thickness: f32,
        color: Color,
        opacity: f32,
    ) {
        self.ops.lock().unwrap().push(Op::Line {
            thickness,
            color,
            opacity,
        });
    }

    fn draw_ellipse(
        &mut self,
        _cx: f32,
        _cy: f32,
        rx: f32,
        ry: f32,
        thickness: f32,
        color: Color,
        filled: bool,
        opacity: f32,
    ) {
        self.ops.lock().unwrap().push(Op::Ellipse {
            rx,
            ry,
            filled,
            thickness,
            color,
            opacity,
        });
    }
}

#[test]
fn each_primitive_issues_exactly_one_operation() {
    let mut surface = RecordingSurface::default();
    let ops = Arc::clone(&surface.ops);
    let mut frame = Frame::new(&mut surface, 800.0, 600.0);

    let red = Color::rgba(1.0, 0.0, 0.0, 0.5);
    frame.text("hello", 14.0, 10.0, 10.0, red, 0.9);
    frame.rect(0.0, 0.0, 100.0, 50.0, 2.0, red, false, 1.0);
    frame.rect(0.0, 0.0, 100.0, 50.0, 2.0, red, true, 1.0);
    frame.line(0.0, 0.0, 10.0, 10.0, 3.0, red, 0.7);
    frame.ellipse(50.0, 50.0, 20.0, 10.0, 1.0, red, false, 1.0);

    let ops = ops.lock().unwrap();
    assert_eq!(ops.len(), 5);
    assert_eq!(
        ops[0],
        Op::Text {
            text: "hello".into(),
            size: 14.0,
            color: red,
            opacity: 0.9
        }
    );
    assert_eq!(
        ops[1],
        Op::Rect {
            filled: false,
            thickness: 2.0,
            color: red,
            opacity: 1.0
        }
    );
    assert_eq!(
        ops[2],
        Op::Rect {
            filled: true,
            thickness: 2.0,
            color: red,
            opacity: 1.0
        }
    );
    assert_eq!(
        ops[3],
        Op::Line {
            thickness: 3.0,
            color: red,
            opacity: 0.7
        }
    );
    assert_eq!(
        ops[4],
        Op::Ellipse {
            rx: 20.0,
            ry: 10.0,
            filled: false,
            thickness: 1.0,
            color: red,
            opacity: 1.0
        }
    );
}

#[test]
fn circle_is_an_ellipse_with_equal_radii() {
    let mut surface = RecordingSurface::default();
    let ops = Arc::clone(&surface.ops);
    let mut frame = Frame::new(&mut surface, 640.0, 480.0);

    frame.circle(100.0, 100.0, 25.0, 2.0, Color::rgb(0.0, 1.0, 0.0), true, 1.0);

    let ops = ops.lock().unwrap();
    assert_eq!(ops.len(), 1);
    match &ops[0] {
        Op::Ellipse { rx, ry, filled, .. } => {
            assert_eq!(*rx, 25.0);
            assert_eq!(*ry, 25.0);
            assert!(*filled);
        }
        other => panic!("expected ellipse, got {other:?}"),
    }
}

#[test]
fn frame_reports_tracked_size() {
    let mut surface = RecordingSurface::default();
    let frame = Frame::new(&mut surface, 800.0, 600.0);
    assert_eq!(frame.width(), 800.0);
    assert_eq!(frame.height(), 600.0);
}
