//! Geometric primitives in canvas space.
//!
//! The canvas uses screen conventions: origin at the top-left, X grows to the
//! right and Y grows downward. All values are canvas-local pixels; translating
//! device coordinates into this space is the host's job.

/// A 2D point in canvas coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Vector from `other` to `self`
    #[inline]
    pub fn minus(self, other: Point) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    #[inline]
    pub fn distance(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis-aligned rectangle given by its top-left corner and size.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(origin: Point, width: f32, height: f32) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    pub fn max_x(&self) -> f32 {
        self.origin.x + self.width
    }

    pub fn max_y(&self) -> f32 {
        self.origin.y + self.height
    }

    /// Inclusive on every edge, matching how blocks are hit.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.origin.x && p.x <= self.max_x() && p.y >= self.origin.y && p.y <= self.max_y()
    }
}

/// Quantize a point down to the top-left corner of its grid cell.
#[inline]
pub fn snap_to_grid(p: Point, grid_size: f32) -> Point {
    Point::new(
        (p.x / grid_size).floor() * grid_size,
        (p.y / grid_size).floor() * grid_size,
    )
}

/// Top-left corner of grid cell `(col, row)`.
#[inline]
pub fn grid_cell(col: i32, row: i32, grid_size: f32) -> Point {
    Point::new(col as f32 * grid_size, row as f32 * grid_size)
}

/// Whether `value` is a whole multiple of `grid_size`.
pub fn is_grid_aligned(value: f32, grid_size: f32) -> bool {
    let cells = value / grid_size;
    (cells - cells.round()).abs() < 1e-4
}

/// A four-point orthogonal polyline: horizontal stub, vertical segment,
/// horizontal stub.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManhattanPath {
    pub points: [Point; 4],
}

impl ManhattanPath {
    pub fn new(start: Point, vertical_x: f32, end: Point) -> Self {
        Self {
            points: [
                start,
                Point::new(vertical_x, start.y),
                Point::new(vertical_x, end.y),
                end,
            ],
        }
    }

    pub fn start(&self) -> Point {
        self.points[0]
    }

    pub fn end(&self) -> Point {
        self.points[3]
    }

    pub fn vertical_x(&self) -> f32 {
        self.points[1].x
    }

    /// Within `tolerance` of the vertical segment, between the two stub heights.
    pub fn hits_vertical(&self, p: Point, tolerance: f32) -> bool {
        let (start, end) = (self.start(), self.end());
        (p.x - self.vertical_x()).abs() <= tolerance
            && p.y >= start.y.min(end.y)
            && p.y <= start.y.max(end.y)
    }

    /// Within `tolerance` of either horizontal stub.
    pub fn hits_horizontal(&self, p: Point, tolerance: f32) -> bool {
        let vx = self.vertical_x();
        let on_stub = |anchor: Point| {
            (p.y - anchor.y).abs() <= tolerance && p.x >= anchor.x.min(vx) && p.x <= anchor.x.max(vx)
        };
        on_stub(self.start()) || on_stub(self.end())
    }
}
