//! Basic geometric primitives.
//!
//! All coordinates are logical pixels with the origin at the top-left corner
//! of the viewport, matching what dialog hosts report for rendered surfaces.

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// The X coordinate.
    pub x: f32,
    /// The Y coordinate.
    pub y: f32,
}

impl Point {
    /// The origin (i.e. `{ 0, 0 }`).
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Creates a new [`Point`] with the given coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<[f32; 2]> for Point {
    fn from([x, y]: [f32; 2]) -> Self {
        Self::new(x, y)
    }
}

/// An amount of space in 2 dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    /// The width.
    pub width: f32,
    /// The height.
    pub height: f32,
}

impl Size {
    /// A [`Size`] with zero width and height.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Creates a new [`Size`] with the given dimensions.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rectangle {
    /// X coordinate of the top-left corner.
    pub x: f32,
    /// Y coordinate of the top-left corner.
    pub y: f32,
    /// The width of the rectangle.
    pub width: f32,
    /// The height of the rectangle.
    pub height: f32,
}

impl Rectangle {
    /// Creates a new [`Rectangle`] with its top-left corner at the given
    /// [`Point`] and with the provided [`Size`].
    #[must_use]
    pub const fn new(top_left: Point, size: Size) -> Self {
        Self {
            x: top_left.x,
            y: top_left.y,
            width: size.width,
            height: size.height,
        }
    }

    /// Creates a degenerate, zero-size [`Rectangle`] at the given [`Point`].
    ///
    /// Pointer-triggered popups anchor to one of these.
    #[must_use]
    pub const fn at(point: Point) -> Self {
        Self::new(point, Size::ZERO)
    }

    /// Returns the position of the top-left corner.
    #[must_use]
    pub const fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Returns the [`Size`] of the [`Rectangle`].
    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Returns the X coordinate of the horizontal center.
    #[must_use]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Returns the Y coordinate of the vertical center.
    #[must_use]
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Returns true if the given [`Point`] is contained in the [`Rectangle`].
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        self.x <= point.x
            && point.x < self.x + self.width
            && self.y <= point.y
            && point.y < self.y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_rectangle_at_point() {
        let rect = Rectangle::at(Point::new(40.0, 25.0));

        assert_eq!(rect.position(), Point::new(40.0, 25.0));
        assert_eq!(rect.size(), Size::ZERO);
    }

    #[test]
    fn contains_is_inclusive_of_origin() {
        let rect = Rectangle::new(Point::new(10.0, 10.0), Size::new(20.0, 20.0));

        assert!(rect.contains(Point::new(10.0, 10.0)));
        assert!(rect.contains(Point::new(29.0, 29.0)));
        assert!(!rect.contains(Point::new(30.0, 30.0)));
        assert!(!rect.contains(Point::new(9.0, 15.0)));
    }

    #[test]
    fn center_of_rectangle() {
        let rect = Rectangle::new(Point::new(0.0, 10.0), Size::new(50.0, 20.0));

        assert_eq!(rect.center_x(), 25.0);
        assert_eq!(rect.center_y(), 20.0);
    }
}
