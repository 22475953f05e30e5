//! End-to-end scenarios driven through `tick`

use campus_run::consts::*;
use campus_run::sim::{
    GameEvent, GamePhase, GameState, Obstacle, ObstacleKind, Player, TickInput, tick,
};

fn playing(obstacles: Vec<Obstacle>) -> GameState {
    let mut state = GameState::new().with_victory_animation(false);
    tick(
        &mut state,
        &TickInput {
            start: true,
            ..Default::default()
        },
    );
    assert_eq!(state.phase, GamePhase::Playing);
    state.obstacles = obstacles;
    state
}

fn idle() -> TickInput {
    TickInput::default()
}

fn right() -> TickInput {
    TickInput {
        right: true,
        ..Default::default()
    }
}

fn fight() -> TickInput {
    TickInput {
        fight: true,
        ..Default::default()
    }
}

#[test]
fn holding_right_moves_at_constant_speed() {
    let mut state = playing(Vec::new());
    for _ in 0..50 {
        let before = state.player.rect.left();
        tick(&mut state, &right());
        assert_eq!(state.player.rect.left(), before + PLAYER_SPEED);
        assert_eq!(state.player.rect.bottom(), GROUND_Y);
    }
}

#[test]
fn landing_on_platform_from_above() {
    let platform = Obstacle::new(ObstacleKind::Platform, 300.0, 250.0, 100.0, 20.0);
    let mut state = playing(vec![platform]);
    state.player.rect.pos.x = 320.0;
    state.player.rect.set_bottom(249.0);
    state.player.vel_y = 2.0;

    tick(&mut state, &idle());
    assert_eq!(state.player.vel_y, 0.0);
    assert_eq!(state.player.rect.top(), platform.rect.top() - PLAYER_HEIGHT);

    // Standing on it afterwards
    for _ in 0..10 {
        tick(&mut state, &idle());
        assert_eq!(state.player.rect.bottom(), platform.rect.top());
    }
}

#[test]
fn falling_onto_spring_launches() {
    let spring = Obstacle::on_ground(ObstacleKind::Spring, 300.0, 40.0, 20.0);
    let mut state = playing(vec![spring]);
    state.player.rect.pos.x = 295.0;
    state.player.rect.set_bottom(spring.rect.top() - 1.0);
    state.player.vel_y = 3.0;

    tick(&mut state, &idle());
    assert_eq!(state.player.vel_y, JUMP_SPEED * 1.5);
    assert_eq!(state.player.rect.bottom(), spring.rect.top());
    assert!(state.events.contains(&GameEvent::SpringBounce));
}

#[test]
fn water_drags_player_back() {
    let water = Obstacle::new(ObstacleKind::Water, 200.0, GROUND_Y - 5.0, 200.0, 10.0);
    let mut state = playing(vec![water]);
    state.player.rect.pos.x = 300.0;
    state.player.rect.set_bottom(water.rect.top());

    for _ in 0..4 {
        let before = state.player.rect.left();
        tick(&mut state, &idle());
        assert_eq!(state.player.rect.left(), before - 2.5);
        assert_eq!(state.player.rect.bottom(), water.rect.top());
    }
}

#[test]
fn walking_into_spike_respawns() {
    let spike = Obstacle::on_ground(ObstacleKind::Spike, 100.0, 100.0, 10.0);
    let mut state = playing(vec![spike]);
    state.player.rect.pos.x = spike.rect.left() - PLAYER_WIDTH - 2.0;

    tick(&mut state, &right());
    assert_eq!(state.player.rect.left(), SPAWN_X);
    assert!(state.events.contains(&GameEvent::SpikeHit));
}

#[test]
fn level_exit_requires_defeated_enemy() {
    let mut state = playing(Vec::new());

    // Past the end with the enemy alive: nothing happens
    state.player.rect.pos.x = LEVEL_WIDTH + 10.0;
    tick(&mut state, &idle());
    assert_eq!(state.level_index, 0);
    assert_eq!(state.phase, GamePhase::Playing);

    // Walk into the enemy and fight
    state.player.rect.pos.x = state.enemy.rect.left() - 10.0;
    tick(&mut state, &idle());
    assert_eq!(state.phase, GamePhase::Battle);
    tick(&mut state, &fight());
    assert!(!state.enemy.alive);
    assert_eq!(state.phase, GamePhase::Playing);

    // Next tick at the exit advances and resets the player
    state.player.rect.pos.x = LEVEL_WIDTH;
    tick(
        &mut state,
        &TickInput {
            now_ms: 5000.0,
            ..Default::default()
        },
    );
    assert_eq!(state.level_index, 1);
    assert_eq!(state.player.rect, Player::spawn_rect());
    assert_eq!(state.player.vel_y, 0.0);
    assert!(state.enemy.alive);
    assert_eq!(
        state.phase,
        GamePhase::LevelBanner {
            until_ms: 5000.0 + LEVEL_BANNER_MS
        }
    );
    assert_eq!(state.events, vec![GameEvent::LevelStarted { level: 2 }]);
}

#[test]
fn banner_ignores_input_until_it_expires() {
    let mut state = playing(Vec::new());
    state.phase = GamePhase::LevelBanner { until_ms: 2000.0 };

    tick(
        &mut state,
        &TickInput {
            right: true,
            jump: true,
            now_ms: 1000.0,
            ..Default::default()
        },
    );
    assert_eq!(state.player.rect, Player::spawn_rect());
    assert!(state.blocking_animation());

    tick(
        &mut state,
        &TickInput {
            now_ms: 2000.0,
            ..Default::default()
        },
    );
    assert_eq!(state.phase, GamePhase::Playing);
}

#[test]
fn victory_sequence_runs_before_play_resumes() {
    let mut state = playing(Vec::new()).with_victory_animation(true);
    state.player.rect.pos.x = state.enemy.rect.left() - 10.0;
    tick(&mut state, &idle());
    assert!(state.in_battle());

    tick(
        &mut state,
        &TickInput {
            fight: true,
            now_ms: 1000.0,
            ..Default::default()
        },
    );
    assert!(matches!(state.phase, GamePhase::Victory(_)));

    tick(
        &mut state,
        &TickInput {
            now_ms: 1000.0 + VICTORY_MS / 2.0,
            ..Default::default()
        },
    );
    assert!(matches!(state.phase, GamePhase::Victory(_)));

    tick(
        &mut state,
        &TickInput {
            now_ms: 1000.0 + VICTORY_MS,
            ..Default::default()
        },
    );
    assert_eq!(state.phase, GamePhase::Playing);
}

#[test]
fn clearing_every_level_completes_the_run() {
    let mut state = playing(Vec::new());
    let mut now = 0.0;

    for level in 0..NUM_LEVELS {
        assert_eq!(state.level_index, level);
        state.obstacles.clear();
        state.player.rect.pos.x = state.enemy.rect.left() - 10.0;
        tick(&mut state, &idle());
        tick(&mut state, &fight());
        state.player.rect.pos.x = LEVEL_WIDTH;
        now += 10_000.0;
        tick(
            &mut state,
            &TickInput {
                now_ms: now,
                ..Default::default()
            },
        );
        if level + 1 < NUM_LEVELS {
            // Let the banner run out
            tick(
                &mut state,
                &TickInput {
                    now_ms: now + LEVEL_BANNER_MS,
                    ..Default::default()
                },
            );
            assert_eq!(state.phase, GamePhase::Playing);
        }
    }

    assert_eq!(state.phase, GamePhase::Complete);
    assert_eq!(state.events, vec![GameEvent::RunComplete]);

    // Nothing moves once complete
    let snapshot = state.player.rect;
    tick(&mut state, &right());
    assert_eq!(state.player.rect, snapshot);
}

#[test]
fn identical_inputs_give_identical_runs() {
    let inputs: Vec<TickInput> = (0..600)
        .map(|i| TickInput {
            right: i % 7 != 0,
            jump: i % 45 == 0,
            down: i % 90 == 10,
            start: i == 0,
            now_ms: i as f64 * 1000.0 / TICK_RATE as f64,
            ..Default::default()
        })
        .collect();

    let run = || {
        let mut state = GameState::new();
        for input in &inputs {
            tick(&mut state, input);
        }
        serde_json::to_string(&state).expect("serialize")
    };
    assert_eq!(run(), run());
}

#[test]
fn autopilot_clears_every_level() {
    let mut state = GameState::new();
    let mut started = Vec::new();
    let mut ticks = 0u64;

    // Five simulated minutes is far more than a clean run needs
    while state.phase != GamePhase::Complete && ticks < 5 * 60 * TICK_RATE as u64 {
        tick(
            &mut state,
            &TickInput {
                idle_mode: true,
                now_ms: ticks as f64 * 1000.0 / TICK_RATE as f64,
                ..Default::default()
            },
        );
        for event in &state.events {
            if let GameEvent::LevelStarted { level } = event {
                started.push(*level);
            }
        }
        ticks += 1;
    }

    assert_eq!(
        state.phase,
        GamePhase::Complete,
        "stuck on level {} at x={}",
        state.level_number(),
        state.player.rect.left()
    );
    assert_eq!(started, vec![1, 2, 3, 4, 5]);
}
