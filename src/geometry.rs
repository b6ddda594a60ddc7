use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// 2D position in either world or screen space. Canvas APIs take f64, so
/// everything downstream stays in f64.
#[derive(Debug, Default, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn scaled(self, factor: f64) -> Self {
        Point {
            x: self.x * factor,
            y: self.y * factor,
        }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Size { width, height }
    }

    pub fn scaled(self, factor: f64) -> Self {
        Size {
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Default, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct Rect {
    pub position: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(position: Point, size: Size) -> Self {
        Rect { position, size }
    }

    pub fn from_coords(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect {
            position: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn min(&self) -> Point {
        self.position
    }

    pub fn max(&self) -> Point {
        Point {
            x: self.position.x + self.size.width,
            y: self.position.y + self.size.height,
        }
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.position.x + self.size.width * 0.5,
            y: self.position.y + self.size.height * 0.5,
        }
    }

    /// Containment is inclusive on both edges, so a point sitting exactly on
    /// the boundary still counts as a hit.
    pub fn contains(&self, point: Point) -> bool {
        let min = self.min();
        let max = self.max();
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_inclusive_on_the_min_edge() {
        let rect = Rect::from_coords(40.0, 40.0, 20.0, 20.0);
        assert!(rect.contains(Point::new(40.0, 40.0)));
    }

    #[test]
    fn contains_is_inclusive_on_the_max_edge() {
        let rect = Rect::from_coords(40.0, 40.0, 20.0, 20.0);
        assert!(rect.contains(Point::new(60.0, 60.0)));
    }

    #[test]
    fn point_past_the_max_edge_is_outside() {
        let rect = Rect::from_coords(40.0, 40.0, 20.0, 20.0);
        assert!(!rect.contains(Point::new(61.0, 50.0)));
        assert!(!rect.contains(Point::new(50.0, 61.0)));
    }

    #[test]
    fn point_before_the_min_edge_is_outside() {
        let rect = Rect::from_coords(40.0, 40.0, 20.0, 20.0);
        assert!(!rect.contains(Point::new(39.0, 50.0)));
    }

    #[test]
    fn center_is_the_midpoint() {
        let rect = Rect::from_coords(0.0, 0.0, 640.0, 360.0);
        assert_eq!(rect.center(), Point::new(320.0, 180.0));
    }

    #[test]
    fn point_arithmetic() {
        let delta = Point::new(10.0, -5.0) - Point::new(0.0, 0.0);
        assert_eq!(delta, Point::new(10.0, -5.0));
        assert_eq!(
            Point::new(1.0, 2.0) + Point::new(3.0, 4.0),
            Point::new(4.0, 6.0)
        );
        assert_eq!(Point::new(2.0, 3.0).scaled(2.0), Point::new(4.0, 6.0));
    }
}
