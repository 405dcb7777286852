//! Target-window identity and geometry.
//!
//! The tracked window belongs to a foreign application and can move, resize,
//! minimize, or close at any time, so geometry is re-queried live every
//! iteration and never cached.

/// Identity of a native window, stored as a raw handle value so it can cross
/// threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowId(pub isize);

/// Called every iteration to obtain the current target window, if any.
pub type TargetProvider = Box<dyn FnMut() -> Option<WindowId> + Send>;

/// Screen-space client-area rectangle of the tracked window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetBounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl TargetBounds {
    /// Build bounds from a client rectangle in screen coordinates, rejecting
    /// degenerate (zero or negative sized) rectangles so the scheduler skips
    /// the iteration instead of resizing to nothing.
    pub fn from_client_rect(left: i32, top: i32, right: i32, bottom: i32) -> Option<Self> {
        let width = right - left;
        let height = bottom - top;
        if width <= 0 || height <= 0 {
            return None;
        }
        Some(Self {
            x: left,
            y: top,
            width: width as u32,
            height: height as u32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_rect_to_bounds() {
        let bounds = TargetBounds::from_client_rect(100, 100, 900, 700).expect("bounds");
        assert_eq!(
            bounds,
            TargetBounds {
                x: 100,
                y: 100,
                width: 800,
                height: 600
            }
        );
    }

    #[test]
    fn degenerate_rects_are_rejected() {
        assert!(TargetBounds::from_client_rect(10, 10, 10, 400).is_none());
        assert!(TargetBounds::from_client_rect(10, 10, 400, 10).is_none());
        assert!(TargetBounds::from_client_rect(50, 50, 20, 20).is_none());
    }
}
