//! End-to-end run scenarios driven through the public API

use alley_runner::{PauseBrake, Tuning};
use alley_runner::consts::SIM_DT_MS;
use alley_runner::sim::{
    CollisionOutcome, GameEvent, ObstacleId, ObstacleKind, PauseStage, Pose, RunPhase, RunState,
    TickInput, on_overlap, primary_action, tick,
};
use rand::SeedableRng;
use rand_pcg::Pcg32;

fn step(state: &mut RunState, steps: u32) -> Vec<GameEvent> {
    let input = TickInput::default();
    let mut events = Vec::new();
    for _ in 0..steps {
        tick(state, &input, SIM_DT_MS);
        events.extend(state.drain_events());
    }
    events
}

fn started(tuning: Tuning) -> RunState {
    let mut state = RunState::with_tuning(2024, tuning);
    primary_action(&mut state);
    state.drain_events();
    state
}

fn quiet_tuning() -> Tuning {
    Tuning {
        spawn_interval_ms: 60_000.0,
        ..Default::default()
    }
}

fn place(state: &mut RunState, kind: ObstacleKind) -> ObstacleId {
    let mut rng = Pcg32::seed_from_u64(17);
    let speed = state.scroll_speed();
    state.obstacles.spawn(kind, speed, &mut rng)
}

fn count_spawns(events: &[GameEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, GameEvent::Spawned { .. }))
        .count()
}

/// Tick until the scripted pause hands control back
fn finish_pause(state: &mut RunState) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for _ in 0..1000 {
        if state.phase != RunPhase::ScriptedPause {
            break;
        }
        events.extend(step(state, 1));
    }
    assert_eq!(state.phase, RunPhase::Running, "pause never finished");
    events
}

#[test]
fn test_one_spawn_per_interval() {
    let mut state = started(Tuning::default());

    let events = step(&mut state, 100);
    assert_eq!(count_spawns(&events), 0);

    // 1000 ms -> 1300 ms crosses the first interval only
    let events = step(&mut state, 30);
    assert_eq!(count_spawns(&events), 1);
    assert_eq!(state.spawner.fired, 1);
}

#[test]
fn test_third_fish_plays_the_scripted_pause() {
    let mut state = started(Tuning::default());
    state.score = 2;
    let fish = place(&mut state, ObstacleKind::Collectible);

    // Caught mid-leap: the pause has to wait for the landing
    assert!(!state.player.on_ground);
    assert_eq!(
        on_overlap(&mut state, fish),
        CollisionOutcome::Collected {
            score: 3,
            milestone: Some(3)
        }
    );
    assert_eq!(state.phase, RunPhase::ScriptedPause);
    assert!(!state.spawner.is_running(&state.timers));

    let events = finish_pause(&mut state);
    assert_eq!(count_spawns(&events), 0, "no spawning while paused");
    assert!(events.contains(&GameEvent::PoseChanged(Pose::Squatting)));
    assert!(events.contains(&GameEvent::ScriptedPauseEnded { milestone: 3 }));
    assert_eq!(state.player.pose, Pose::Running);
    assert!(state.player.gravity_enabled);
    assert!(!state.physics_paused);
    assert!(state.consumed_milestones.contains(&3));
    assert!(state.spawner.is_running(&state.timers));

    let events = step(&mut state, 130);
    assert!(count_spawns(&events) >= 1, "spawning resumed");
}

#[test]
fn test_pose_is_held_for_the_full_hold_time() {
    let mut state = started(quiet_tuning());
    step(&mut state, 200);
    assert!(state.is_grounded());

    state.score = 2;
    let fish = place(&mut state, ObstacleKind::Collectible);
    on_overlap(&mut state, fish);

    // First grounded sample lands on the 50 ms poll
    step(&mut state, 5);
    assert!(matches!(state.pause.stage(), PauseStage::PoseHeld { .. }));
    assert!(state.physics_paused);

    step(&mut state, 190);
    assert_eq!(state.phase, RunPhase::ScriptedPause);
    assert_eq!(state.player.pose, Pose::Squatting);

    step(&mut state, 20);
    assert_eq!(state.phase, RunPhase::Running);
    assert_eq!(state.pause.stage(), PauseStage::Idle);
}

#[test]
fn test_hazard_ends_the_run_and_late_fish_do_not_count() {
    let mut state = started(quiet_tuning());
    let hazard = place(&mut state, ObstacleKind::Hazard);
    let fish = place(&mut state, ObstacleKind::Collectible);

    assert_eq!(on_overlap(&mut state, hazard), CollisionOutcome::GameOver);
    assert_eq!(state.phase, RunPhase::GameOver);

    assert_eq!(on_overlap(&mut state, fish), CollisionOutcome::Ignored);
    assert_eq!(state.score, 0);

    let speed = state.scroll_speed();
    step(&mut state, 100);
    assert_eq!(state.phase, RunPhase::GameOver);
    assert_eq!(state.scroll_speed(), speed);
    assert_eq!(state.score, 0);
}

#[test]
fn test_restart_after_game_over_starts_clean() {
    let mut state = started(quiet_tuning());
    step(&mut state, 300);
    state.score = 4;
    state.consumed_milestones.insert(3);
    let hazard = place(&mut state, ObstacleKind::Hazard);
    on_overlap(&mut state, hazard);
    assert_eq!(state.phase, RunPhase::GameOver);

    primary_action(&mut state);

    assert_eq!(state.phase, RunPhase::Running);
    assert_eq!(state.run_number, 2);
    assert_eq!(state.score, 0);
    assert_eq!(state.scroll_speed(), state.tuning.baseline_speed);
    assert!(state.consumed_milestones.is_empty());
    assert_eq!(state.obstacles.active_count(), 0);
    // Only the new run's spawn timer
    assert_eq!(state.timers.live_count(), 1);
    assert!(state.events().contains(&GameEvent::GameOver { score: 4 }));
}

#[test]
fn test_restart_mid_pause_leaves_no_orphans() {
    let mut state = started(quiet_tuning());
    state.score = 2;
    let fish = place(&mut state, ObstacleKind::Collectible);
    on_overlap(&mut state, fish);
    assert!(state.pause.is_active());

    state.reset_for_new_run();
    assert_eq!(state.phase, RunPhase::Idle);
    assert_eq!(state.timers.live_count(), 0);

    primary_action(&mut state);
    let events = step(&mut state, 400);
    assert!(!events.iter().any(|e| matches!(
        e,
        GameEvent::PoseChanged(_) | GameEvent::ScriptedPauseEnded { .. }
    )));
    assert_eq!(state.phase, RunPhase::Running);
    assert_eq!(state.player.pose, Pose::Running);
}

#[test]
fn test_each_milestone_fires_once_per_run() {
    let mut state = started(quiet_tuning());
    let mut pauses = Vec::new();

    for _ in 0..22 {
        let fish = place(&mut state, ObstacleKind::Collectible);
        if let CollisionOutcome::Collected {
            milestone: Some(m), ..
        } = on_overlap(&mut state, fish)
        {
            pauses.push(m);
            finish_pause(&mut state);
        }
    }
    assert_eq!(state.score, 22);
    assert_eq!(pauses, vec![3, 10, 20]);

    // Passing 3 again in the same run does nothing
    state.score = 2;
    let fish = place(&mut state, ObstacleKind::Collectible);
    assert_eq!(
        on_overlap(&mut state, fish),
        CollisionOutcome::Collected {
            score: 3,
            milestone: None
        }
    );
    assert_eq!(state.phase, RunPhase::Running);
}

#[test]
fn test_consumed_fish_cannot_be_collected_twice() {
    let mut state = started(quiet_tuning());
    let fish = place(&mut state, ObstacleKind::Collectible);

    assert!(matches!(
        on_overlap(&mut state, fish),
        CollisionOutcome::Collected { score: 1, .. }
    ));
    assert_eq!(on_overlap(&mut state, fish), CollisionOutcome::Ignored);
    assert_eq!(state.score, 1);
}

#[test]
fn test_airborne_press_is_ignored() {
    let mut state = started(quiet_tuning());
    step(&mut state, 10);
    assert!(!state.is_grounded());

    let vel = state.player.vel;
    primary_action(&mut state);
    let events = state.drain_events();
    assert_eq!(state.player.vel, vel);
    assert!(!events.contains(&GameEvent::Jumped));
}

#[test]
fn test_hazard_while_landing_ends_the_pause() {
    // Slow sampling keeps the pause waiting for the landing
    let tuning = Tuning {
        ground_poll_ms: 5000.0,
        ..quiet_tuning()
    };
    let mut state = started(tuning);
    step(&mut state, 200);
    assert!(state.is_grounded());

    state.score = 2;
    let fish = place(&mut state, ObstacleKind::Collectible);
    on_overlap(&mut state, fish);
    assert_eq!(state.phase, RunPhase::ScriptedPause);

    let hazard = place(&mut state, ObstacleKind::Hazard);
    let start_x = state.obstacles.get(hazard).map(|o| o.pos.x);
    let events = step(&mut state, 10);
    assert!(
        state.obstacles.get(hazard).map(|o| o.pos.x) < start_x,
        "obstacles keep coming while awaiting the landing"
    );

    let mut events = [events, step(&mut state, 400)].concat();
    events.retain(|e| {
        matches!(
            e,
            GameEvent::GameOver { .. }
                | GameEvent::PoseChanged(_)
                | GameEvent::ScriptedPauseEnded { .. }
        )
    });
    assert_eq!(events, vec![GameEvent::GameOver { score: 3 }]);
    assert_eq!(state.phase, RunPhase::GameOver);
    assert_eq!(state.pause.stage(), PauseStage::Idle);
    assert!(!state.spawner.is_running(&state.timers));
}

#[test]
fn test_decay_brake_slows_a_grounded_hop() {
    let tuning = Tuning {
        pause_brake: PauseBrake::Decay { per_second: 100.0 },
        ..quiet_tuning()
    };
    let mut state = started(tuning);
    step(&mut state, 150);
    assert!(state.is_grounded());
    assert_eq!(state.player.horizontal_nudge_velocity(), 50.0);

    state.score = 2;
    let fish = place(&mut state, ObstacleKind::Collectible);
    on_overlap(&mut state, fish);

    // Still drifting, just slower, before the first landing sample
    step(&mut state, 3);
    let vx = state.player.horizontal_nudge_velocity();
    assert!(vx > 0.0 && vx < 50.0, "vx = {vx}");

    finish_pause(&mut state);
    assert_eq!(state.player.horizontal_nudge_velocity(), 0.0);
}

