pub mod card;
pub mod dealer;
pub mod deck;

use crate::engine::{Point, Rect, Renderer, Size};

/// `count` points on a circle, walking clockwise from `start_deg`
/// (270 is straight down in screen space).
pub fn circle_positions(count: usize, radius: f64, start_deg: f64) -> Vec<Point> {
    if count == 0 {
        return Vec::new();
    }
    let step = 360.0 / count as f64;
    (0..count)
        .map(|i| {
            let rad = (start_deg - step * i as f64).to_radians();
            Point::new(rad.cos() * radius, -rad.sin() * radius)
        })
        .collect()
}

/// Card face drawn from primitives, used when the `gameCard` texture is
/// missing. Centred on the current origin.
pub fn draw_card_face(renderer: &Renderer, size: Size) {
    let bounds = Rect::new(-size.width * 0.5, -size.height * 0.5, size.width, size.height);
    renderer.fill_rounded_rect(&bounds, 8.0, 0x16213e, 1.0);
    let inset = Rect::new(bounds.x + 3.0, bounds.y + 3.0, bounds.width - 6.0, bounds.height - 6.0);
    renderer.fill_rounded_rect(&inset, 6.0, 0x1a1a2e, 1.0);
    renderer.fill_circle(
        Point::new(0.0, -size.height * 0.1),
        size.width * 0.1,
        0xe94560,
        1.0,
    );
    renderer.fill_circle(Point::new(0.0, size.height * 0.2), size.width * 0.15, 0x0f3460, 1.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn three_stacks_start_below_centre_and_go_clockwise() {
        let points = circle_positions(3, 250.0, 270.0);
        assert_eq!(points.len(), 3);
        assert_abs_diff_eq!(points[0].x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(points[0].y, 250.0, epsilon = 1e-9);
        // 150 degrees: upper left
        assert!(points[1].x < 0.0 && points[1].y < 0.0);
        // 30 degrees: upper right
        assert!(points[2].x > 0.0 && points[2].y < 0.0);
        for point in &points {
            assert_abs_diff_eq!(point.x.hypot(point.y), 250.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn no_stacks_no_points() {
        assert!(circle_positions(0, 250.0, 270.0).is_empty());
    }
}
