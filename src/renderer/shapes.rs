//! Shape generation for 2D primitives
//!
//! Screen space is the 800x480 viewport with y pointing down; vertices leave
//! here already in normalized device coordinates.

use std::ops::Range;

use glam::Vec2;

use super::scene::DrawCommand;
use super::vertex::{SpriteVertex, Vertex};
use crate::assets::TextureKey;
use crate::consts::{VIEW_HEIGHT, VIEW_WIDTH};
use crate::sim::Rect;

/// Map viewport pixels to NDC
#[inline]
pub fn to_ndc(p: Vec2) -> Vec2 {
    Vec2::new(p.x / VIEW_WIDTH * 2.0 - 1.0, 1.0 - p.y / VIEW_HEIGHT * 2.0)
}

/// Rectangle corners (top-left, top-right, bottom-right, bottom-left) turned
/// by `rotation` around the center
fn corners(rect: &Rect, rotation: f32) -> [Vec2; 4] {
    let c = rect.center();
    let h = rect.size / 2.0;
    let rot = Vec2::from_angle(rotation);
    [
        Vec2::new(-h.x, -h.y),
        Vec2::new(h.x, -h.y),
        Vec2::new(h.x, h.y),
        Vec2::new(-h.x, h.y),
    ]
    .map(|offset| to_ndc(c + rot.rotate(offset)))
}

/// Two triangles covering a rectangle
pub fn quad(rect: &Rect, color: [f32; 4], rotation: f32) -> [Vertex; 6] {
    let [tl, tr, br, bl] = corners(rect, rotation);
    [tl, bl, tr, tr, bl, br].map(|p| Vertex::new(p.x, p.y, color))
}

/// Textured quad; the whole texture maps onto the rectangle
pub fn sprite_quad(rect: &Rect, rotation: f32) -> [SpriteVertex; 6] {
    let [tl, tr, br, bl] = corners(rect, rotation);
    [
        SpriteVertex::new(tl.x, tl.y, 0.0, 0.0),
        SpriteVertex::new(bl.x, bl.y, 0.0, 1.0),
        SpriteVertex::new(tr.x, tr.y, 1.0, 0.0),
        SpriteVertex::new(tr.x, tr.y, 1.0, 0.0),
        SpriteVertex::new(bl.x, bl.y, 0.0, 1.0),
        SpriteVertex::new(br.x, br.y, 1.0, 1.0),
    ]
}

/// One draw call
#[derive(Debug, Clone, PartialEq)]
pub enum Batch {
    /// Range into `Tessellation::flat`
    Flat(Range<u32>),
    /// Range into `Tessellation::sprites`, drawn with one texture
    Sprite { key: TextureKey, vertices: Range<u32> },
}

/// Vertex data for a frame, with draw calls in painter's order
#[derive(Debug, Clone, Default)]
pub struct Tessellation {
    pub flat: Vec<Vertex>,
    pub sprites: Vec<SpriteVertex>,
    pub batches: Vec<Batch>,
}

/// Convert draw commands to vertices. Consecutive fills share a batch.
pub fn tessellate(commands: &[DrawCommand]) -> Tessellation {
    let mut out = Tessellation::default();

    for cmd in commands {
        match cmd {
            DrawCommand::Fill {
                rect,
                color,
                rotation,
            } => {
                let start = out.flat.len() as u32;
                out.flat.extend_from_slice(&quad(rect, *color, *rotation));
                let end = out.flat.len() as u32;
                match out.batches.last_mut() {
                    Some(Batch::Flat(range)) if range.end == start => range.end = end,
                    _ => out.batches.push(Batch::Flat(start..end)),
                }
            }
            DrawCommand::Sprite {
                key,
                rect,
                rotation,
            } => {
                let start = out.sprites.len() as u32;
                out.sprites.extend_from_slice(&sprite_quad(rect, *rotation));
                out.batches.push(Batch::Sprite {
                    key: *key,
                    vertices: start..out.sprites.len() as u32,
                });
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ObstacleKind;

    fn close(a: [f32; 2], b: [f32; 2]) -> bool {
        (a[0] - b[0]).abs() < 1e-5 && (a[1] - b[1]).abs() < 1e-5
    }

    #[test]
    fn test_viewport_corners_map_to_ndc() {
        assert_eq!(to_ndc(Vec2::ZERO), Vec2::new(-1.0, 1.0));
        assert_eq!(to_ndc(Vec2::new(VIEW_WIDTH, VIEW_HEIGHT)), Vec2::new(1.0, -1.0));
        assert_eq!(to_ndc(Vec2::new(400.0, 240.0)), Vec2::ZERO);
    }

    #[test]
    fn test_quad_covers_rect() {
        let v = quad(&Rect::new(0.0, 0.0, VIEW_WIDTH, VIEW_HEIGHT), [1.0; 4], 0.0);
        assert!(close(v[0].position, [-1.0, 1.0]));
        assert!(close(v[5].position, [1.0, -1.0]));
    }

    #[test]
    fn test_half_turn_swaps_corners() {
        let rect = Rect::new(100.0, 100.0, 60.0, 60.0);
        let flat = quad(&rect, [1.0; 4], 0.0);
        let turned = quad(&rect, [1.0; 4], std::f32::consts::PI);
        assert!(close(flat[0].position, turned[5].position));
    }

    #[test]
    fn test_fills_merge_sprites_split() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let key = TextureKey::Obstacle(ObstacleKind::Spike);
        let commands = vec![
            DrawCommand::fill(rect, [1.0; 4]),
            DrawCommand::fill(rect, [0.5; 4]),
            DrawCommand::Sprite {
                key,
                rect,
                rotation: 0.0,
            },
            DrawCommand::fill(rect, [1.0; 4]),
        ];
        let t = tessellate(&commands);
        assert_eq!(t.flat.len(), 18);
        assert_eq!(t.sprites.len(), 6);
        assert_eq!(
            t.batches,
            vec![
                Batch::Flat(0..12),
                Batch::Sprite {
                    key,
                    vertices: 0..6
                },
                Batch::Flat(12..18),
            ]
        );
    }
}
