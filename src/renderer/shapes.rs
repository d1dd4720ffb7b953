//! Shape generation for 2D primitives
//!
//! Everything is emitted as a triangle list in viewport pixels.

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;

fn rim_point(center: Vec2, radius: f32, i: u32, segments: u32) -> Vec2 {
    let theta = (i as f32 / segments as f32) * TAU;
    center + Vec2::new(theta.cos(), theta.sin()) * radius
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let a = rim_point(center, radius, i, segments);
        let b = rim_point(center, radius, i + 1, segments);

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(a.x, a.y, color));
        vertices.push(Vertex::new(b.x, b.y, color));
    }

    vertices
}

/// Radial gradient disc. `stops` are `(t, color)` pairs with `t` rising from
/// 0 (center) to 1 (rim); colors interpolate across each band.
pub fn radial_gradient(
    center: Vec2,
    radius: f32,
    stops: &[(f32, [f32; 4])],
    segments: u32,
) -> Vec<Vertex> {
    if stops.is_empty() || radius <= 0.0 {
        return Vec::new();
    }
    if stops.len() == 1 {
        return circle(center, radius, stops[0].1, segments);
    }

    let mut vertices = Vec::with_capacity(segments as usize * 6 * stops.len());

    for band in stops.windows(2) {
        let (t0, c0) = band[0];
        let (t1, c1) = band[1];
        let (r0, r1) = (radius * t0, radius * t1);

        for i in 0..segments {
            let outer1 = rim_point(center, r1, i, segments);
            let outer2 = rim_point(center, r1, i + 1, segments);

            if r0 <= 0.0 {
                vertices.push(Vertex::new(center.x, center.y, c0));
                vertices.push(Vertex::new(outer1.x, outer1.y, c1));
                vertices.push(Vertex::new(outer2.x, outer2.y, c1));
                continue;
            }

            let inner1 = rim_point(center, r0, i, segments);
            let inner2 = rim_point(center, r0, i + 1, segments);

            // Two triangles per segment
            vertices.push(Vertex::new(inner1.x, inner1.y, c0));
            vertices.push(Vertex::new(outer1.x, outer1.y, c1));
            vertices.push(Vertex::new(inner2.x, inner2.y, c0));

            vertices.push(Vertex::new(inner2.x, inner2.y, c0));
            vertices.push(Vertex::new(outer1.x, outer1.y, c1));
            vertices.push(Vertex::new(outer2.x, outer2.y, c1));
        }
    }

    vertices
}

/// Axis-aligned rectangle from its top-left corner
pub fn rect(top_left: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    if size.x <= 0.0 || size.y <= 0.0 {
        return Vec::new();
    }
    let (x0, y0) = (top_left.x, top_left.y);
    let (x1, y1) = (x0 + size.x, y0 + size.y);
    vec![
        Vertex::new(x0, y0, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x1, y1, color),
    ]
}

/// Bar of `length` x `width` starting at `origin` and extending along `angle`,
/// centered across its width
pub fn rotated_bar(
    origin: Vec2,
    angle: f32,
    length: f32,
    width: f32,
    color: [f32; 4],
) -> Vec<Vertex> {
    let along = Vec2::from_angle(angle);
    let across = along.perp() * (width * 0.5);

    let a = origin - across;
    let b = origin + across;
    let c = origin + along * length + across;
    let d = origin + along * length - across;

    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(a.x, a.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(d.x, d.y, color),
    ]
}

/// Background + fill bar, fill proportional to `fraction`
pub fn meter(
    top_left: Vec2,
    size: Vec2,
    fraction: f32,
    background: [f32; 4],
    fill: [f32; 4],
) -> Vec<Vertex> {
    let mut vertices = rect(top_left, size, background);
    let filled = Vec2::new(size.x * fraction.clamp(0.0, 1.0), size.y);
    vertices.extend(rect(top_left, filled, fill));
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_vertex_count() {
        let v = circle(Vec2::ZERO, 10.0, [1.0; 4], 16);
        assert_eq!(v.len(), 48);
        for vert in &v {
            let p = Vec2::from(vert.position);
            assert!(p.length() <= 10.0 + 1e-4);
        }
    }

    #[test]
    fn test_gradient_colors_by_band() {
        let inner = [1.0, 0.0, 0.0, 1.0];
        let outer = [0.0, 0.0, 1.0, 0.0];
        let v = radial_gradient(Vec2::ZERO, 10.0, &[(0.0, inner), (1.0, outer)], 8);
        assert_eq!(v.len(), 24);
        assert_eq!(v[0].color, inner);
        assert_eq!(v[1].color, outer);

        let three = radial_gradient(
            Vec2::ZERO,
            10.0,
            &[(0.0, inner), (0.5, inner), (1.0, outer)],
            8,
        );
        assert_eq!(three.len(), 24 + 48);
        assert!(radial_gradient(Vec2::ZERO, 0.0, &[(0.0, inner)], 8).is_empty());
    }

    #[test]
    fn test_meter_fill_width() {
        let v = meter(Vec2::ZERO, Vec2::new(40.0, 6.0), 0.5, [0.0; 4], [1.0; 4]);
        assert_eq!(v.len(), 12);
        let max_fill_x = v[6..].iter().map(|v| v.position[0]).fold(0.0, f32::max);
        assert_eq!(max_fill_x, 20.0);

        // Empty fill draws only the background
        assert_eq!(meter(Vec2::ZERO, Vec2::new(40.0, 6.0), 0.0, [0.0; 4], [1.0; 4]).len(), 6);
    }

    #[test]
    fn test_rotated_bar_points_along_angle() {
        let v = rotated_bar(Vec2::ZERO, std::f32::consts::FRAC_PI_2, 40.0, 8.0, [1.0; 4]);
        let max_y = v.iter().map(|v| v.position[1]).fold(f32::MIN, f32::max);
        let max_x = v.iter().map(|v| v.position[0].abs()).fold(0.0, f32::max);
        assert!((max_y - 40.0).abs() < 1e-4);
        assert!((max_x - 4.0).abs() < 1e-4);
    }
}
