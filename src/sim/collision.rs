//! Two-pass AABB collision response
//!
//! The player is moved along x first and resolved against every obstacle,
//! then moved along y and resolved again. Obstacles are scanned in list
//! order; the first kill stops the pass. Contact shoves from water and
//! rotating hazards are summed during the vertical scan and applied after it.

use super::obstacle::{HorizontalResponse, Obstacle, VerticalResponse};
use super::rect::Rect;
use crate::consts::SPAWN_X;

/// Result of the horizontal pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalOutcome {
    Clear,
    /// Touched a lethal obstacle, player is back at spawn
    Killed,
}

/// Result of the vertical pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerticalOutcome {
    /// Touched a lethal obstacle, player is back at spawn
    pub killed: bool,
    /// Launched by a spring
    pub bounced: bool,
    /// Came to rest on top of an obstacle
    pub landed: bool,
}

/// Send the body back to the spawn column and stop it vertically.
/// Height is left untouched; gravity brings it back to the ground.
#[inline]
fn kill(body: &mut Rect, vel_y: &mut f32) {
    body.pos.x = SPAWN_X;
    *vel_y = 0.0;
}

/// Resolve overlaps after a horizontal move from `old_x`
pub fn resolve_horizontal(
    body: &mut Rect,
    vel_y: &mut f32,
    old_x: f32,
    obstacles: &[Obstacle],
) -> HorizontalOutcome {
    for obstacle in obstacles {
        let r = &obstacle.rect;
        if !body.overlaps(r) {
            continue;
        }
        match obstacle.kind.horizontal() {
            HorizontalResponse::Kill => {
                kill(body, vel_y);
                return HorizontalOutcome::Killed;
            }
            HorizontalResponse::Block => {
                let moved = body.left() - old_x;
                let push_left = if moved > 0.0 {
                    true
                } else if moved < 0.0 {
                    false
                } else {
                    // No motion this tick: leave through the shallower side
                    body.right() - r.left() < r.right() - body.left()
                };
                if push_left {
                    body.set_right(r.left());
                } else {
                    body.set_left(r.right());
                }
            }
        }
    }
    HorizontalOutcome::Clear
}

/// Resolve overlaps after a vertical move.
///
/// `old_top`/`old_bottom` are the body edges before the vertical move and
/// decide whether an obstacle was approached from above or below.
pub fn resolve_vertical(
    body: &mut Rect,
    vel_y: &mut f32,
    old_top: f32,
    old_bottom: f32,
    obstacles: &[Obstacle],
) -> VerticalOutcome {
    let mut outcome = VerticalOutcome::default();
    let mut shove = 0.0;

    for obstacle in obstacles {
        let r = &obstacle.rect;
        if !body.overlaps(r) {
            continue;
        }
        let from_above = old_bottom <= r.top();
        let from_below = old_top >= r.bottom();

        match obstacle.kind.vertical() {
            VerticalResponse::Kill => {
                kill(body, vel_y);
                outcome.killed = true;
                return outcome;
            }
            VerticalResponse::Launch { vel_y: launch } => {
                *vel_y = launch;
                body.set_bottom(r.top());
                outcome.bounced = true;
            }
            VerticalResponse::Land => {
                if from_above {
                    body.set_bottom(r.top());
                    *vel_y = 0.0;
                    outcome.landed = true;
                } else if from_below {
                    body.set_top(r.bottom());
                    *vel_y = vel_y.max(0.0);
                }
            }
            VerticalResponse::Shove { dx } => {
                shove += dx;
                if from_above {
                    body.set_bottom(r.top());
                    *vel_y = 0.0;
                    outcome.landed = true;
                } else if from_below {
                    body.set_top(r.bottom());
                    *vel_y = vel_y.max(0.0);
                }
            }
        }
    }

    if shove != 0.0 && apply_shove(body, vel_y, shove, obstacles) == HorizontalOutcome::Killed {
        outcome.killed = true;
    }

    outcome
}

/// Move the body sideways by a contact shove and settle what it runs into.
///
/// Obstacles the body already overlapped belong to the vertical pass and are
/// left alone; anything newly entered is resolved like a horizontal move.
fn apply_shove(
    body: &mut Rect,
    vel_y: &mut f32,
    dx: f32,
    obstacles: &[Obstacle],
) -> HorizontalOutcome {
    let before = *body;
    body.pos.x += dx;

    for obstacle in obstacles {
        let r = &obstacle.rect;
        if before.overlaps(r) || !body.overlaps(r) {
            continue;
        }
        match obstacle.kind.horizontal() {
            HorizontalResponse::Kill => {
                kill(body, vel_y);
                return HorizontalOutcome::Killed;
            }
            HorizontalResponse::Block => {
                if dx < 0.0 {
                    body.set_left(r.right());
                } else {
                    body.set_right(r.left());
                }
            }
        }
    }
    HorizontalOutcome::Clear
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::obstacle::ObstacleKind;

    fn body_at(x: f32, y: f32) -> Rect {
        Rect::new(x, y, PLAYER_WIDTH, PLAYER_HEIGHT)
    }

    #[test]
    fn test_block_from_left() {
        let wall = [Obstacle::on_ground(ObstacleKind::Spring, 100.0, 40.0, 20.0)];
        let mut body = body_at(60.0, GROUND_Y - PLAYER_HEIGHT);
        let mut vy = 0.0;
        let out = resolve_horizontal(&mut body, &mut vy, 55.0, &wall);
        assert_eq!(out, HorizontalOutcome::Clear);
        assert_eq!(body.right(), 100.0);
        assert!(!body.overlaps(&wall[0].rect));
    }

    #[test]
    fn test_block_from_right() {
        let wall = [Obstacle::on_ground(ObstacleKind::Rotating, 100.0, 60.0, 60.0)];
        let mut body = body_at(155.0, GROUND_Y - PLAYER_HEIGHT);
        let mut vy = 0.0;
        resolve_horizontal(&mut body, &mut vy, 160.0, &wall);
        assert_eq!(body.left(), 160.0);
    }

    #[test]
    fn test_spike_stops_horizontal_pass() {
        let obstacles = [
            Obstacle::on_ground(ObstacleKind::Spike, 100.0, 100.0, 10.0),
            Obstacle::on_ground(ObstacleKind::Spring, 100.0, 40.0, 20.0),
        ];
        let mut body = body_at(60.0, GROUND_Y - PLAYER_HEIGHT);
        let mut vy = 3.0;
        let out = resolve_horizontal(&mut body, &mut vy, 55.0, &obstacles);
        assert_eq!(out, HorizontalOutcome::Killed);
        assert_eq!(body.left(), SPAWN_X);
        assert_eq!(vy, 0.0);
    }

    #[test]
    fn test_platform_ignored_when_not_overlapping() {
        let platform = [Obstacle::new(ObstacleKind::Platform, 550.0, GROUND_Y - 120.0, 80.0, 20.0)];
        let mut body = body_at(300.0, GROUND_Y - PLAYER_HEIGHT);
        let mut vy = 0.5;
        let (old_top, old_bottom) = (body.top(), body.bottom());
        let out = resolve_vertical(&mut body, &mut vy, old_top, old_bottom, &platform);
        assert_eq!(out, VerticalOutcome::default());
        assert_eq!(vy, 0.5);
    }

    #[test]
    fn test_platform_bonk_from_below() {
        let platform = [Obstacle::new(ObstacleKind::Platform, 0.0, 200.0, 200.0, 20.0)];
        // Head was just under the platform, then moved up into it
        let mut body = body_at(50.0, 225.0);
        let old_top = body.top();
        let old_bottom = body.bottom();
        body.pos.y -= 8.0;
        let mut vy = -8.0;
        let out = resolve_vertical(&mut body, &mut vy, old_top, old_bottom, &platform);
        assert!(!out.landed);
        assert_eq!(body.top(), 220.0);
        assert_eq!(vy, 0.0);
    }

    #[test]
    fn test_water_drags_and_supports() {
        let water = [Obstacle::new(ObstacleKind::Water, 400.0, GROUND_Y - 5.0, 200.0, 10.0)];
        let mut body = body_at(450.0, GROUND_Y - 5.0 - PLAYER_HEIGHT);
        let old_top = body.top();
        let old_bottom = body.bottom();
        body.pos.y += 0.5;
        let mut vy = 0.5;
        let out = resolve_vertical(&mut body, &mut vy, old_top, old_bottom, &water);
        assert!(out.landed);
        assert_eq!(body.left(), 450.0 - WATER_DRAG);
        assert_eq!(body.bottom(), GROUND_Y - 5.0);
        assert_eq!(vy, 0.0);
    }

    #[test]
    fn test_first_spike_wins_vertical() {
        let obstacles = [
            Obstacle::on_ground(ObstacleKind::Spike, 100.0, 100.0, 10.0),
            Obstacle::on_ground(ObstacleKind::Spring, 100.0, 100.0, 20.0),
        ];
        let mut body = body_at(120.0, GROUND_Y - 15.0 - PLAYER_HEIGHT);
        let old_top = body.top() - 10.0;
        let old_bottom = body.bottom() - 10.0;
        body.pos.y += 10.0;
        let mut vy = 10.0;
        let out = resolve_vertical(&mut body, &mut vy, old_top, old_bottom, &obstacles);
        assert!(out.killed);
        assert!(!out.bounced);
        assert_eq!(body.left(), SPAWN_X);
        assert_eq!(vy, 0.0);
    }

    #[test]
    fn test_shove_stops_at_platform_side() {
        // Landing on water right next to a low platform
        let obstacles = [
            Obstacle::new(ObstacleKind::Water, 120.0, GROUND_Y - 5.0, 300.0, 10.0),
            Obstacle::new(ObstacleKind::Platform, 200.0, 320.0, 100.0, 20.0),
        ];
        let mut body = body_at(301.0, GROUND_Y - 5.0 - PLAYER_HEIGHT - 10.0);
        let old_top = body.top();
        let old_bottom = body.bottom();
        body.pos.y += 16.5;
        let mut vy = 16.5;
        let out = resolve_vertical(&mut body, &mut vy, old_top, old_bottom, &obstacles);
        assert!(out.landed);
        assert!(!out.killed);
        assert_eq!(body.left(), 300.0);
        assert_eq!(body.bottom(), GROUND_Y - 5.0);
        for o in &obstacles {
            assert!(!body.overlaps(&o.rect));
        }
    }

    #[test]
    fn test_shove_into_spike_kills() {
        let obstacles = [
            Obstacle::new(ObstacleKind::Water, 300.0, GROUND_Y - 5.0, 200.0, 10.0),
            Obstacle::new(ObstacleKind::Spike, 200.0, GROUND_Y - 90.0, 100.0, 10.0),
        ];
        let mut body = body_at(300.0, GROUND_Y - 5.0 - PLAYER_HEIGHT);
        let old_top = body.top();
        let old_bottom = body.bottom();
        body.pos.y += 0.5;
        let mut vy = 0.5;
        let out = resolve_vertical(&mut body, &mut vy, old_top, old_bottom, &obstacles);
        assert!(out.killed);
        assert_eq!(body.left(), SPAWN_X);
    }
}
