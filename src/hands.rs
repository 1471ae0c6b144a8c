//! Screen geometry and hand outlines.
//!
//! Hands are stored as outlines pointing straight up from the dial centre,
//! in screen coordinates (y grows downward). [`HandShape::outline`] rotates
//! an outline clockwise by an [`Angle`] and translates it to the centre,
//! which is what the compositor draws.

use heapless::Vec;

use crate::angle::Angle;

/// Maximum number of points in one hand outline.
pub const MAX_OUTLINE_POINTS: usize = 8;

/// A rotated, translated hand outline.
pub type Outline = Vec<Point, MAX_OUTLINE_POINTS>;

/// Integer screen coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// Horizontal position, growing right.
    pub x: i32,
    /// Vertical position, growing down.
    pub y: i32,
}

impl Point {
    /// Creates a point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Rotates around the origin clockwise by `angle`, then offsets by `origin`.
    pub fn rotate_translate(&self, angle: Angle, origin: Point) -> Point {
        let (sin, cos) = (libm::sinf(angle.radians()), libm::cosf(angle.radians()));
        let (x, y) = (self.x as f32, self.y as f32);
        Point {
            x: origin.x + libm::roundf(x * cos - y * sin) as i32,
            y: origin.y + libm::roundf(x * sin + y * cos) as i32,
        }
    }
}

/// Axis-aligned rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// Top-left corner.
    pub origin: Point,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            origin: Point::new(x, y),
            width,
            height,
        }
    }

    /// Returns true if `p` lies inside the rectangle.
    pub const fn contains(&self, p: Point) -> bool {
        p.x >= self.origin.x
            && p.y >= self.origin.y
            && p.x < self.origin.x + self.width as i32
            && p.y < self.origin.y + self.height as i32
    }
}

/// Static outline of a hand, pointing at twelve o'clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandShape {
    /// Outline points relative to the dial centre.
    pub points: &'static [Point],
    /// Interior point from which every outline vertex is visible.
    ///
    /// Filled hands are drawn as a triangle fan around it.
    pub hub: Point,
}

/// Thin second hand: a single line from just off centre to the rim.
pub const SECOND_HAND: HandShape = HandShape {
    points: &[Point::new(0, -4), Point::new(0, -79)],
    hub: Point::new(0, -4),
};

/// Minute hand: narrow stem widening to a kite-shaped tip.
pub const MINUTE_HAND: HandShape = HandShape {
    points: &[
        Point::new(-1, 0),
        Point::new(-1, -13),
        Point::new(-5, -50),
        Point::new(0, -70),
        Point::new(5, -50),
        Point::new(1, -13),
        Point::new(1, 0),
    ],
    hub: Point::new(0, -13),
};

/// Hour hand: shorter and wider than the minute hand.
pub const HOUR_HAND: HandShape = HandShape {
    points: &[
        Point::new(-3, 0),
        Point::new(-3, -13),
        Point::new(-7, -42),
        Point::new(0, -52),
        Point::new(7, -42),
        Point::new(3, -13),
        Point::new(3, 0),
    ],
    hub: Point::new(0, -13),
};

impl HandShape {
    /// Outline rotated to `angle` and moved to `center`.
    pub fn outline(&self, angle: Angle, center: Point) -> Outline {
        self.points
            .iter()
            .take(MAX_OUTLINE_POINTS)
            .map(|p| p.rotate_translate(angle, center))
            .collect()
    }

    /// Fan hub rotated to `angle` and moved to `center`.
    pub fn hub(&self, angle: Angle, center: Point) -> Point {
        self.hub.rotate_translate(angle, center)
    }

    /// Returns true if the hand is drawn as an open line rather than a filled shape.
    pub fn is_line(&self) -> bool {
        self.points.len() == 2
    }
}
