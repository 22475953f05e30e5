//! Per-tick simulation step
//!
//! Physics is tick driven: every velocity is in pixels per tick. Wall-clock
//! time (`TickInput::now_ms`) only paces animation and banners.

use super::animation::{AnimState, Facing, FightAnimation};
use super::camera::camera_offset;
use super::collision::{HorizontalOutcome, resolve_horizontal, resolve_vertical};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input for a single tick
///
/// Held keys are level-triggered. `jump`, `fight`, `flee` and `start` are
/// press edges and must be cleared by the caller once consumed.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub down: bool,
    /// Jump pressed this tick
    pub jump: bool,
    /// Fight pressed this tick (battle only)
    pub fight: bool,
    /// Flee pressed this tick (battle only)
    pub flee: bool,
    /// Start pressed this tick (intro only)
    pub start: bool,
    /// Idle/demo mode - autopilot plays the game
    pub idle_mode: bool,
    /// Host wall clock in milliseconds
    pub now_ms: f64,
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();

    let input = if input.idle_mode {
        autopilot(state, input)
    } else {
        input.clone()
    };
    let input = &input;
    let now = input.now_ms;

    match state.phase {
        GamePhase::Complete => return,

        GamePhase::Intro => {
            if input.start || input.jump {
                state.load_level(0, now);
                state.phase = GamePhase::Playing;
                state.events.push(GameEvent::LevelStarted { level: 1 });
            }
            return;
        }

        GamePhase::LevelBanner { until_ms } => {
            if now >= until_ms {
                state.phase = GamePhase::Playing;
            }
            return;
        }

        GamePhase::Victory(fight) => {
            if fight.finished(now) {
                state.phase = GamePhase::Playing;
            }
            return;
        }

        GamePhase::Battle => {
            if input.fight {
                state.enemy.alive = false;
                state.phase = if state.victory_animation {
                    GamePhase::Victory(FightAnimation::new(now))
                } else {
                    GamePhase::Playing
                };
                state.events.push(GameEvent::EnemyDefeated);
                log::debug!("Defeated {}", state.enemy.kind.name());
            } else if input.flee {
                state.player.rect.pos.x = SPAWN_X;
                state.phase = GamePhase::Playing;
                state.events.push(GameEvent::Fled);
            }
            // Fleeing is a teleport, the backdrop stays put
            update_view(state, input, 0.0);
            return;
        }

        GamePhase::Playing => {}
    }

    state.time_ticks += 1;
    let old_x = state.player.rect.left();

    step_player(state, input);

    // Encounter
    if state.enemy.alive && state.player.rect.overlaps(&state.enemy.rect) {
        state.phase = GamePhase::Battle;
        state.events.push(GameEvent::BattleStarted);
    }

    // Level exit
    if state.phase == GamePhase::Playing
        && !state.enemy.alive
        && state.player.rect.left() >= state.level_end_x()
    {
        advance_level(state, now);
        return;
    }

    // A spike respawn is a teleport, the backdrop stays put
    let dx = if state.events.contains(&GameEvent::SpikeHit) {
        0.0
    } else {
        state.player.rect.left() - old_x
    };
    update_view(state, input, dx);
}

/// Movement, gravity and both collision passes
fn step_player(state: &mut GameState, input: &TickInput) {
    let player = &mut state.player;

    // Jump only from rest
    if input.jump && player.vel_y == 0.0 {
        player.vel_y = JUMP_SPEED;
        state.events.push(GameEvent::Jumped);
    }

    // Horizontal
    let old_x = player.rect.left();
    if input.left {
        player.rect.pos.x = (player.rect.pos.x - PLAYER_SPEED).max(SPAWN_X);
    }
    if input.right {
        player.rect.pos.x += PLAYER_SPEED;
    }
    if resolve_horizontal(&mut player.rect, &mut player.vel_y, old_x, &state.obstacles)
        == HorizontalOutcome::Killed
    {
        state.events.push(GameEvent::SpikeHit);
    }

    // Vertical
    let old_top = player.rect.top();
    let old_bottom = player.rect.bottom();
    player.vel_y += GRAVITY;
    player.rect.pos.y += player.vel_y;
    let outcome = resolve_vertical(
        &mut player.rect,
        &mut player.vel_y,
        old_top,
        old_bottom,
        &state.obstacles,
    );
    if outcome.killed {
        state.events.push(GameEvent::SpikeHit);
    }
    if outcome.bounced {
        state.events.push(GameEvent::SpringBounce);
    }

    // Contact shoves can not push past the spawn column
    player.rect.pos.x = player.rect.pos.x.max(SPAWN_X);

    // Ground
    if player.rect.bottom() >= GROUND_Y {
        player.rect.set_bottom(GROUND_Y);
        player.vel_y = 0.0;
    }
}

/// Camera, parallax, facing and animation for this tick.
///
/// `dx` is the distance walked this tick; teleports pass zero.
fn update_view(state: &mut GameState, input: &TickInput, dx: f32) {
    let player = &mut state.player;
    state.camera_x = camera_offset(player.rect.left());
    state.parallax.advance(dx);

    player.facing = Facing::from_input(input.left);
    let anim_state = AnimState::select(
        player.vel_y,
        input.down && player.grounded(),
        input.left,
        input.right,
    );
    player.anim.update(anim_state, input.now_ms);
}

/// Move to the next level or finish the run
fn advance_level(state: &mut GameState, now_ms: f64) {
    let next = state.level_index + 1;
    if next >= NUM_LEVELS {
        state.phase = GamePhase::Complete;
        state.events.push(GameEvent::RunComplete);
        return;
    }

    state.load_level(next, now_ms);
    state.phase = GamePhase::LevelBanner {
        until_ms: now_ms + LEVEL_BANNER_MS,
    };
    state.events.push(GameEvent::LevelStarted { level: next + 1 });
}

/// Demo input: walk right, jump when a simulated jump beats walking on,
/// always fight
fn autopilot(state: &GameState, input: &TickInput) -> TickInput {
    let mut out = TickInput {
        idle_mode: true,
        now_ms: input.now_ms,
        ..Default::default()
    };

    match state.phase {
        GamePhase::Intro => out.start = true,
        GamePhase::Battle => out.fight = true,
        GamePhase::Playing => {
            out.right = true;
            if state.player.grounded() {
                let leap = rollout(state, true, 0);
                let walk = rollout(state, false, leap.ticks);
                let worth_it = walk.fatal || leap.x > walk.x + AUTOPILOT_MARGIN;
                if !leap.fatal && worth_it && leap.rest.as_ref().is_none_or(has_way_forward) {
                    out.jump = true;
                } else if walk.fatal {
                    // Nothing safe ahead, hold still
                    out.right = false;
                }
            }
        }
        _ => {}
    }

    out
}

/// Walking ticks simulated after a jump comes to rest
const AUTOPILOT_SETTLE: u32 = 60;
/// A jump still in the air after this many ticks counts as lost
const AUTOPILOT_HORIZON: u32 = 240;
/// Distance a jump must gain over walking to be taken
const AUTOPILOT_MARGIN: f32 = 2.0 * PLAYER_SPEED;
/// Walking ticks searched for a safe jump after a planned landing
const AUTOPILOT_ESCAPE: u32 = 40;

/// Where holding right from a state leads
struct Rollout {
    /// Died before coming to rest
    fatal: bool,
    /// Last x reached alive; infinite once the level is left behind
    x: f32,
    ticks: u32,
    /// State on first coming to rest
    rest: Option<GameState>,
}

/// Hold right from `state`, jumping on the first tick when `jump` is set.
///
/// Runs until the player has rested two ticks in a row (a jump apex rests
/// for one), then walks on for `AUTOPILOT_SETTLE` ticks and at least
/// `min_ticks` in total. Dying after the rest only ends the run early.
fn rollout(state: &GameState, jump: bool, min_ticks: u32) -> Rollout {
    let mut sim = state.clone();
    let mut input = TickInput {
        right: true,
        jump,
        ..Default::default()
    };
    let mut resting = u32::from(!jump && sim.player.grounded());
    let mut rest: Option<GameState> = None;
    let mut rested_at = 0;
    let mut x = sim.player.rect.left();
    let mut ticks = 0;

    loop {
        if rest.is_none() && ticks >= AUTOPILOT_HORIZON {
            return Rollout {
                fatal: true,
                x,
                ticks,
                rest,
            };
        }

        tick(&mut sim, &input);
        input.jump = false;
        ticks += 1;

        if sim.events.contains(&GameEvent::SpikeHit) {
            return Rollout {
                fatal: rest.is_none(),
                x,
                ticks,
                rest,
            };
        }
        if sim.level_index != state.level_index || sim.phase == GamePhase::Complete {
            return Rollout {
                fatal: false,
                x: f32::INFINITY,
                ticks,
                rest,
            };
        }
        x = sim.player.rect.left();
        if sim.phase != GamePhase::Playing {
            // Reached the boss
            return Rollout {
                fatal: false,
                x,
                ticks,
                rest,
            };
        }

        resting = if sim.player.grounded() { resting + 1 } else { 0 };
        if rest.is_none() && resting >= 2 {
            rest = Some(sim.clone());
            rested_at = ticks;
        }
        if rest.is_some() && ticks >= min_ticks.max(rested_at + AUTOPILOT_SETTLE) {
            return Rollout {
                fatal: false,
                x,
                ticks,
                rest,
            };
        }
    }
}

/// Whether a resting player can go on without dying: some safe jump turns
/// up before walking runs into something lethal.
fn has_way_forward(state: &GameState) -> bool {
    let mut sim = state.clone();
    let walk = TickInput {
        right: true,
        ..Default::default()
    };

    for _ in 0..AUTOPILOT_ESCAPE {
        if sim.phase != GamePhase::Playing || sim.level_index != state.level_index {
            return true;
        }
        if sim.player.grounded() && !rollout(&sim, true, 0).fatal {
            return true;
        }
        tick(&mut sim, &walk);
        if sim.events.contains(&GameEvent::SpikeHit) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::obstacle::{Obstacle, ObstacleKind};

    fn playing_state() -> GameState {
        let mut state = GameState::new().with_victory_animation(false);
        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
        );
        state.obstacles.clear();
        state
    }

    #[test]
    fn test_intro_waits_for_start() {
        let mut state = GameState::new();
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Intro);

        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
        );
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.events, vec![GameEvent::LevelStarted { level: 1 }]);
    }

    #[test]
    fn test_standing_still_stays_grounded() {
        let mut state = playing_state();
        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.player.vel_y, 0.0);
        assert_eq!(state.player.rect.bottom(), GROUND_Y);
        assert_eq!(state.player.anim.state, AnimState::Idle);
    }

    #[test]
    fn test_jump_arc_returns_to_ground() {
        let mut state = playing_state();
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &jump);
        assert_eq!(state.player.vel_y, JUMP_SPEED + GRAVITY);
        assert_eq!(state.events, vec![GameEvent::Jumped]);
        assert_eq!(state.player.anim.state, AnimState::Jump);

        for _ in 0..60 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.player.rect.bottom(), GROUND_Y);
        assert_eq!(state.player.vel_y, 0.0);
    }

    #[test]
    fn test_left_clamped_at_spawn() {
        let mut state = playing_state();
        let left = TickInput {
            left: true,
            ..Default::default()
        };
        for _ in 0..5 {
            tick(&mut state, &left);
        }
        assert_eq!(state.player.rect.left(), SPAWN_X);
        assert_eq!(state.player.facing, Facing::Left);
    }

    #[test]
    fn test_crouch_only_when_grounded() {
        let mut state = playing_state();
        let down = TickInput {
            down: true,
            ..Default::default()
        };
        tick(&mut state, &down);
        assert_eq!(state.player.anim.state, AnimState::Crouch);
        // Collision box is unchanged
        assert_eq!(state.player.rect.size.y, PLAYER_HEIGHT);
    }

    #[test]
    fn test_spike_from_above_resets() {
        let mut state = playing_state();
        state
            .obstacles
            .push(Obstacle::on_ground(ObstacleKind::Spike, 300.0, 100.0, 10.0));
        state.player.rect.pos.x = 320.0;
        state.player.rect.set_bottom(GROUND_Y - 12.0);
        state.player.vel_y = 4.0;

        tick(&mut state, &TickInput::default());
        assert_eq!(state.player.rect.left(), SPAWN_X);
        assert!(state.events.contains(&GameEvent::SpikeHit));
    }

    #[test]
    fn test_battle_freezes_player() {
        let mut state = playing_state();
        state.player.rect.pos.x = state.enemy.rect.left() - PLAYER_WIDTH - 2.0;
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        tick(&mut state, &right);
        assert_eq!(state.phase, GamePhase::Battle);
        assert!(state.events.contains(&GameEvent::BattleStarted));

        let frozen_x = state.player.rect.left();
        for _ in 0..10 {
            tick(&mut state, &right);
        }
        assert_eq!(state.player.rect.left(), frozen_x);
        assert_eq!(state.phase, GamePhase::Battle);
    }

    #[test]
    fn test_flee_keeps_enemy() {
        let mut state = playing_state();
        state.phase = GamePhase::Battle;
        state.player.rect.pos.x = 1500.0;
        tick(
            &mut state,
            &TickInput {
                flee: true,
                ..Default::default()
            },
        );
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.rect.left(), SPAWN_X);
        assert!(state.enemy.alive);
        assert_eq!(state.events, vec![GameEvent::Fled]);
    }

    #[test]
    fn test_victory_animation_blocks_input() {
        let mut state = playing_state().with_victory_animation(true);
        state.phase = GamePhase::Battle;
        tick(
            &mut state,
            &TickInput {
                fight: true,
                now_ms: 100.0,
                ..Default::default()
            },
        );
        assert!(matches!(state.phase, GamePhase::Victory(_)));
        assert!(state.blocking_animation());
        assert!(!state.enemy.alive);

        let x = state.player.rect.left();
        tick(
            &mut state,
            &TickInput {
                right: true,
                now_ms: 100.0 + VICTORY_MS / 2.0,
                ..Default::default()
            },
        );
        assert_eq!(state.player.rect.left(), x);

        tick(
            &mut state,
            &TickInput {
                now_ms: 100.0 + VICTORY_MS,
                ..Default::default()
            },
        );
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_banner_then_play() {
        let mut state = playing_state();
        state.enemy.alive = false;
        state.player.rect.pos.x = LEVEL_WIDTH;
        tick(
            &mut state,
            &TickInput {
                now_ms: 1000.0,
                ..Default::default()
            },
        );
        assert_eq!(state.level_index, 1);
        assert_eq!(
            state.phase,
            GamePhase::LevelBanner {
                until_ms: 1000.0 + LEVEL_BANNER_MS
            }
        );

        let right = TickInput {
            right: true,
            now_ms: 1500.0,
            ..Default::default()
        };
        tick(&mut state, &right);
        assert_eq!(state.player.rect.left(), SPAWN_X);

        tick(
            &mut state,
            &TickInput {
                now_ms: 1000.0 + LEVEL_BANNER_MS,
                ..Default::default()
            },
        );
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_last_level_completes_run() {
        let mut state = playing_state();
        state.load_level(NUM_LEVELS - 1, 0.0);
        state.obstacles.clear();
        state.enemy.alive = false;
        state.player.rect.pos.x = LEVEL_WIDTH - 1.0;
        tick(
            &mut state,
            &TickInput {
                right: true,
                ..Default::default()
            },
        );
        assert_eq!(state.phase, GamePhase::Complete);
        assert_eq!(state.events, vec![GameEvent::RunComplete]);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Complete);
    }

    #[test]
    fn test_respawn_leaves_backdrop_still() {
        let mut state = playing_state();
        assert!(state.parallax.backdrop_enabled);
        state
            .obstacles
            .push(Obstacle::on_ground(ObstacleKind::Spike, 300.0, 50.0, 10.0));
        state.player.rect.pos.x = 300.0 - PLAYER_WIDTH - 2.0;
        let right = TickInput {
            right: true,
            ..Default::default()
        };

        tick(&mut state, &right);
        assert!(state.events.contains(&GameEvent::SpikeHit));
        assert_eq!(state.parallax.backdrop, 0.0);

        // Walking still scrolls it
        tick(&mut state, &right);
        assert!(state.parallax.backdrop < 0.0);
    }

    #[test]
    fn test_autopilot_takes_spring_over_spike_run() {
        // Campus screen 2: a spring right before a long spike strip
        let mut state = GameState::new().with_victory_animation(false);
        state.load_level(0, 0.0);
        state.phase = GamePhase::Playing;
        state.player.rect.pos.x = 680.0;
        let idle = TickInput {
            idle_mode: true,
            ..Default::default()
        };

        for _ in 0..150 {
            tick(&mut state, &idle);
            assert!(!state.events.contains(&GameEvent::SpikeHit));
        }
        assert!(state.player.rect.left() > 1120.0);
    }

    #[test]
    fn test_autopilot_skips_landing_in_front_of_spike() {
        // Any jump from here lands too close to the spike to clear it later
        let mut state = playing_state();
        state
            .obstacles
            .push(Obstacle::on_ground(ObstacleKind::Spike, 520.0, 110.0, 10.0));
        state.player.rect.pos.x = 262.0;
        let leap = rollout(&state, true, 0);
        assert!(!leap.fatal);
        let rest = leap.rest.expect("jump lands");
        assert!(!has_way_forward(&rest));

        let idle = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        tick(&mut state, &idle);
        assert!(!state.events.contains(&GameEvent::Jumped));
    }

    #[test]
    fn test_autopilot_jumps_blockers() {
        let mut state = playing_state();
        state
            .obstacles
            .push(Obstacle::on_ground(ObstacleKind::Spring, 100.0, 40.0, 20.0));
        state.player.rect.pos.x = 100.0 - PLAYER_WIDTH - 10.0;
        let idle = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        tick(&mut state, &idle);
        assert!(state.events.contains(&GameEvent::Jumped));
    }

    #[test]
    fn test_autopilot_fights() {
        let mut state = playing_state();
        state.phase = GamePhase::Battle;
        tick(
            &mut state,
            &TickInput {
                idle_mode: true,
                ..Default::default()
            },
        );
        assert!(!state.enemy.alive);
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new();
        let mut b = GameState::new();
        let mut input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for i in 0..600 {
            input.now_ms = i as f64 * 1000.0 / TICK_RATE as f64;
            tick(&mut a, &input);
            tick(&mut b, &input);
        }
        assert_eq!(a.player.rect, b.player.rect);
        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.phase, b.phase);
    }
}
