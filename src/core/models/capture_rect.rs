use serde::{Deserialize, Serialize};

/// A rectangle in desktop coordinates. Monitors left of or above the primary one have
/// negative origins, so `x`/`y` are signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CaptureRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl CaptureRect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds the rect spanned by two corners given in any order.
    pub fn from_corners(first: (i32, i32), second: (i32, i32)) -> Self {
        let left = first.0.min(second.0);
        let top = first.1.min(second.1);
        let right = first.0.max(second.0);
        let bottom = first.1.max(second.1);

        Self::new(left, top, (right - left) as u32, (bottom - top) as u32)
    }

    pub fn is_null(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub fn union(&self, other: &CaptureRect) -> CaptureRect {
        if self.is_null() {
            return *other;
        }
        if other.is_null() {
            return *self;
        }

        Self::from_corners(
            (self.x.min(other.x), self.y.min(other.y)),
            (self.right().max(other.right()), self.bottom().max(other.bottom())),
        )
    }

    pub fn intersection(&self, other: &CaptureRect) -> Option<CaptureRect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right <= left || bottom <= top {
            return None;
        }

        Some(Self::new(left, top, (right - left) as u32, (bottom - top) as u32))
    }

    pub fn translated(&self, dx: i32, dy: i32) -> CaptureRect {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

impl std::fmt::Display for CaptureRect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{} at ({}, {})", self.width, self.height, self.x, self.y)
    }
}
