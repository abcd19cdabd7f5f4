//! Shape generation for 2D primitives
//!
//! Everything is emitted as triangle lists in field coordinates.

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::{Vertex, colors};
use crate::consts::{BALL_RADIUS, BOUNDARY_WIDTH, PEG_RADIUS};
use crate::layout::Layout;
use crate::sim::Frame;

/// Segments used for balls and pegs
const CIRCLE_SEGMENTS: u32 = 16;

/// Filled circle as a fan of `segments` triangles
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let rim = |i: u32| center + Vec2::from_angle(i as f32 / segments as f32 * TAU) * radius;
    (0..segments)
        .flat_map(|i| [center, rim(i), rim(i + 1)])
        .map(|p| Vertex::at(p, color))
        .collect()
}

/// Thick segment from `a` to `b` as two triangles
pub fn line(a: Vec2, b: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (b - a).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    let half = dir.perp() * (width / 2.0);
    [a + half, a - half, b + half, b + half, a - half, b - half]
        .into_iter()
        .map(|p| Vertex::at(p, color))
        .collect()
}

/// Pegs in the scatter band
pub fn pegs(layout: &Layout) -> Vec<Vertex> {
    layout
        .pegs()
        .into_iter()
        .flat_map(|p| circle(p, PEG_RADIUS, colors::PEG, CIRCLE_SEGMENTS / 2))
        .collect()
}

/// Bin walls plus the ground line under them
pub fn column_boundaries(layout: &Layout) -> Vec<Vertex> {
    let mut vertices: Vec<Vertex> = layout
        .column_boundaries()
        .into_iter()
        .flat_map(|(bottom, top)| line(bottom, top, BOUNDARY_WIDTH, colors::BIN_WALL))
        .collect();

    let (min, max) = layout.field_bounds();
    vertices.extend(line(
        Vec2::new(min.x, min.y),
        Vec2::new(max.x, min.y),
        BOUNDARY_WIDTH,
        colors::GROUND,
    ));
    vertices
}

/// Balls, in draw order
pub fn balls(frame: &Frame, radius: f32) -> Vec<Vertex> {
    frame
        .balls
        .iter()
        .flat_map(|b| circle(b.pos, radius, colors::opaque(b.color), CIRCLE_SEGMENTS))
        .collect()
}

/// Static board geometry (cacheable across frames)
pub fn board(layout: &Layout) -> Vec<Vertex> {
    let mut vertices = column_boundaries(layout);
    vertices.extend(pegs(layout));
    vertices
}

/// Whole scene: board first, balls on top
pub fn scene(layout: &Layout, frame: &Frame) -> Vec<Vertex> {
    let mut vertices = board(layout);
    vertices.extend(balls(frame, BALL_RADIUS));
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::sim::{FrameBall, SimState, SeededSource};

    #[test]
    fn test_circle_vertex_count() {
        let v = circle(Vec2::new(0.5, 0.5), 0.1, [1.0; 4], 12);
        assert_eq!(v.len(), 36);
        for vertex in &v {
            let d = Vec2::from(vertex.position).distance(Vec2::new(0.5, 0.5));
            assert!(d <= 0.1 + 1e-5);
        }
    }

    #[test]
    fn test_line_is_quad() {
        let v = line(Vec2::ZERO, Vec2::new(0.0, 1.0), 0.2, [1.0; 4]);
        assert_eq!(v.len(), 6);
        for vertex in &v {
            assert!((vertex.position[0].abs() - 0.1).abs() < 1e-6);
        }
        assert!(line(Vec2::ONE, Vec2::ONE, 0.2, [1.0; 4]).is_empty());
    }

    #[test]
    fn test_balls_use_particle_colors() {
        let frame = Frame {
            tick: 0,
            run: 0,
            balls: vec![FrameBall {
                pos: Vec2::new(0.5, 0.5),
                color: [0.1, 0.2, 0.3],
            }],
        };
        let v = balls(&frame, 0.01);
        assert_eq!(v.len(), (CIRCLE_SEGMENTS * 3) as usize);
        assert_eq!(v[0].color, [0.1, 0.2, 0.3, 1.0]);
    }

    #[test]
    fn test_scene_contains_board_and_balls() {
        let mut rng = SeededSource::new(11);
        let state = SimState::new(
            SimConfig {
                population: 4,
                ..Default::default()
            },
            &mut rng,
        )
        .expect("valid config");
        let board_len = board(&state.layout).len();
        let scene = scene(&state.layout, &state.snapshot());
        assert_eq!(scene.len(), board_len + 4 * (CIRCLE_SEGMENTS * 3) as usize);
        // (columns + 1) walls and one ground line, six vertices each
        assert!(board_len >= (state.config.total_columns + 2) * 6);
    }
}
