//! Touch hit-testing
//!
//! Plain value shapes in screen pixels. Every test is inclusive of the
//! boundary and uses integer math only.

/// Touch or pixel position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Point {
    pub x: i16,
    pub y: i16,
}

impl Point {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle, `x..=x + width` by `y..=y + height`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rect {
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
}

/// Ellipse with semi-axes `a` (horizontal) and `b` (vertical)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ellipse {
    pub center: Point,
    pub a: u16,
    pub b: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Circle {
    pub center: Point,
    pub radius: u16,
}

/// Start/stop button beside the logo, padded past its drawn radius of 16
pub const START_STOP_BUTTON: Circle = Circle {
    center: Point::new(215, 20),
    radius: 24,
};

pub fn rect_contains(rect: &Rect, p: Point) -> bool {
    let (x, y) = (i32::from(p.x), i32::from(p.y));
    let (left, top) = (i32::from(rect.x), i32::from(rect.y));
    x >= left
        && x <= left + i32::from(rect.width)
        && y >= top
        && y <= top + i32::from(rect.height)
}

/// `dx²/a² + dy²/b² <= 1`, multiplied through by `a²b²`
pub fn ellipse_contains(ellipse: &Ellipse, p: Point) -> bool {
    let dx = i64::from(p.x) - i64::from(ellipse.center.x);
    let dy = i64::from(p.y) - i64::from(ellipse.center.y);
    let a2 = i64::from(ellipse.a).pow(2);
    let b2 = i64::from(ellipse.b).pow(2);
    if a2 == 0 || b2 == 0 {
        return dx == 0 && dy == 0;
    }
    dx * dx * b2 + dy * dy * a2 <= a2 * b2
}

pub fn circle_contains(circle: &Circle, p: Point) -> bool {
    let dx = i64::from(p.x) - i64::from(circle.center.x);
    let dy = i64::from(p.y) - i64::from(circle.center.y);
    dx * dx + dy * dy <= i64::from(circle.radius).pow(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges_inclusive() {
        let r = Rect {
            x: 10,
            y: 20,
            width: 30,
            height: 40,
        };
        assert!(rect_contains(&r, Point::new(10, 20)));
        assert!(rect_contains(&r, Point::new(40, 60)));
        assert!(!rect_contains(&r, Point::new(41, 60)));
        assert!(!rect_contains(&r, Point::new(9, 30)));
    }

    #[test]
    fn test_ellipse() {
        let e = Ellipse {
            center: Point::new(100, 100),
            a: 20,
            b: 10,
        };
        assert!(ellipse_contains(&e, Point::new(120, 100)));
        assert!(ellipse_contains(&e, Point::new(100, 90)));
        assert!(!ellipse_contains(&e, Point::new(100, 89)));
        assert!(!ellipse_contains(&e, Point::new(115, 108)));
    }

    #[test]
    fn test_circle() {
        let c = Circle {
            center: Point::new(0, 0),
            radius: 24,
        };
        assert!(circle_contains(&c, Point::new(24, 0)));
        assert!(circle_contains(&c, Point::new(-16, -16)));
        assert!(!circle_contains(&c, Point::new(17, 17)));
    }

    #[test]
    fn test_degenerate_ellipse() {
        let e = Ellipse {
            center: Point::new(5, 5),
            a: 0,
            b: 3,
        };
        assert!(ellipse_contains(&e, Point::new(5, 5)));
        assert!(!ellipse_contains(&e, Point::new(5, 6)));
    }
}
