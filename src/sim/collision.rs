//! Collision resolution
//!
//! Called with an obstacle the player overlaps, either from the built-in
//! overlap pass in the tick or from a host physics engine. Overlap callbacks
//! can arrive late, so anything outside the live window (running, or a
//! scripted pause still waiting for the landing) or already inactive is
//! ignored.

use super::obstacle::{ObstacleId, ObstacleKind, Removal};
use super::pause;
use super::state::{Cue, GameEvent, Prompt, RunPhase, RunState};

/// What a resolved overlap did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionOutcome {
    /// Stale or out-of-phase overlap; nothing changed
    Ignored,
    /// Hazard hit; the run is over
    GameOver,
    /// Fish collected
    Collected {
        score: u32,
        /// Set when this catch started a scripted pause
        milestone: Option<u32>,
    },
}

/// Resolve a player/obstacle overlap
pub fn resolve(state: &mut RunState, id: ObstacleId) -> CollisionOutcome {
    if !state.obstacles_live() {
        return CollisionOutcome::Ignored;
    }
    let Some(obstacle) = state.obstacles.get(id).filter(|o| o.active) else {
        return CollisionOutcome::Ignored;
    };
    let (kind, pos) = (obstacle.kind, obstacle.pos);

    match kind {
        ObstacleKind::Hazard => {
            game_over(state);
            CollisionOutcome::GameOver
        }
        ObstacleKind::Collectible => {
            if !state.obstacles.destroy(id) {
                return CollisionOutcome::Ignored;
            }
            state.score += 1;
            let score = state.score;
            state.emit(GameEvent::Removed {
                id,
                reason: Removal::Consumed,
            });
            state.emit(GameEvent::Collected { id, pos });
            state.emit(GameEvent::PlayCue(Cue::Collect));
            state.emit(GameEvent::ScoreChanged(score));

            // A catch while landing into a pause never starts another one
            let milestone = (state.phase == RunPhase::Running
                && state.tuning.is_milestone(score)
                && state.consumed_milestones.insert(score))
            .then_some(score);
            if let Some(milestone) = milestone {
                pause::enter(state, milestone);
            }
            CollisionOutcome::Collected { score, milestone }
        }
    }
}

fn game_over(state: &mut RunState) {
    if state.pause.cancel(&mut state.timers) {
        log::debug!("Hit while landing into a scripted pause");
    }
    state.phase = RunPhase::GameOver;
    state.physics_paused = true;
    state.player.hit = true;
    state.spawner.suspend(&mut state.timers);

    let score = state.score;
    state.emit(GameEvent::PlayCue(Cue::Hit));
    state.emit(GameEvent::StopCue(Cue::Music));
    state.emit(GameEvent::GameOver { score });
    state.emit(GameEvent::Prompt(Prompt::GameOver));
    log::info!(
        "Game over: {} fish in {:.1}s",
        score,
        state.elapsed_run_time_ms() / 1000.0
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_state() -> RunState {
        let mut state = RunState::new(3);
        state.phase = RunPhase::Running;
        state.physics_paused = false;
        state.spawner.start(&mut state.timers);
        state
    }

    fn spawn(state: &mut RunState, kind: ObstacleKind) -> ObstacleId {
        let speed = state.scroll_speed();
        state.obstacles.spawn(kind, speed, &mut state.rng)
    }

    #[test]
    fn test_hazard_ends_run() {
        let mut state = running_state();
        let id = spawn(&mut state, ObstacleKind::Hazard);

        assert_eq!(resolve(&mut state, id), CollisionOutcome::GameOver);
        assert_eq!(state.phase, RunPhase::GameOver);
        assert!(state.physics_paused);
        assert!(state.player.hit);
        assert!(!state.spawner.is_running(&state.timers));
        assert!(state.events().contains(&GameEvent::StopCue(Cue::Music)));
    }

    #[test]
    fn test_collectible_scores_and_is_consumed() {
        let mut state = running_state();
        let id = spawn(&mut state, ObstacleKind::Collectible);

        assert_eq!(
            resolve(&mut state, id),
            CollisionOutcome::Collected {
                score: 1,
                milestone: None
            }
        );
        assert_eq!(state.score, 1);
        assert!(!state.obstacles.get(id).unwrap().active);

        // Second overlap report for the same fish
        assert_eq!(resolve(&mut state, id), CollisionOutcome::Ignored);
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_inactive_obstacle_is_ignored_for_any_kind() {
        for kind in [ObstacleKind::Hazard, ObstacleKind::Collectible] {
            let mut state = running_state();
            let id = spawn(&mut state, kind);
            state.obstacles.destroy(id);

            assert_eq!(resolve(&mut state, id), CollisionOutcome::Ignored);
            assert_eq!(state.phase, RunPhase::Running);
            assert_eq!(state.score, 0);
        }
    }

    #[test]
    fn test_unknown_id_is_ignored() {
        let mut state = running_state();
        assert_eq!(resolve(&mut state, 999), CollisionOutcome::Ignored);
    }

    #[test]
    fn test_third_fish_starts_pause() {
        let mut state = running_state();
        for _ in 0..2 {
            let id = spawn(&mut state, ObstacleKind::Collectible);
            resolve(&mut state, id);
        }
        let id = spawn(&mut state, ObstacleKind::Collectible);
        assert_eq!(
            resolve(&mut state, id),
            CollisionOutcome::Collected {
                score: 3,
                milestone: Some(3)
            }
        );
        assert_eq!(state.phase, RunPhase::ScriptedPause);
        assert!(state.consumed_milestones.contains(&3));
    }

    #[test]
    fn test_consumed_milestone_does_not_retrigger() {
        let mut state = running_state();
        state.consumed_milestones.insert(3);
        state.score = 2;
        let id = spawn(&mut state, ObstacleKind::Collectible);
        assert_eq!(
            resolve(&mut state, id),
            CollisionOutcome::Collected {
                score: 3,
                milestone: None
            }
        );
        assert_eq!(state.phase, RunPhase::Running);
    }

    #[test]
    fn test_no_scoring_after_game_over() {
        let mut state = running_state();
        let hazard = spawn(&mut state, ObstacleKind::Hazard);
        let fish = spawn(&mut state, ObstacleKind::Collectible);
        resolve(&mut state, hazard);

        assert_eq!(resolve(&mut state, fish), CollisionOutcome::Ignored);
        assert_eq!(state.score, 0);
        assert!(state.obstacles.get(fish).unwrap().active);
    }

    fn landing_into_pause() -> RunState {
        let mut state = running_state();
        state.score = 2;
        let fish = spawn(&mut state, ObstacleKind::Collectible);
        resolve(&mut state, fish);
        assert!(matches!(
            state.pause.stage(),
            pause::PauseStage::AwaitingLanding { .. }
        ));
        state
    }

    #[test]
    fn test_hazard_while_landing_ends_run_and_pause() {
        let mut state = landing_into_pause();
        let hazard = spawn(&mut state, ObstacleKind::Hazard);

        assert_eq!(resolve(&mut state, hazard), CollisionOutcome::GameOver);
        assert_eq!(state.phase, RunPhase::GameOver);
        assert!(!state.pause.is_active());
        assert_eq!(state.timers.live_count(), 1, "only the suspended spawner");
    }

    #[test]
    fn test_fish_while_landing_scores_without_second_pause() {
        let mut state = landing_into_pause();
        state.tuning.milestones.push(4);
        let fish = spawn(&mut state, ObstacleKind::Collectible);

        assert_eq!(
            resolve(&mut state, fish),
            CollisionOutcome::Collected {
                score: 4,
                milestone: None
            }
        );
        assert_eq!(state.phase, RunPhase::ScriptedPause);
        assert!(!state.consumed_milestones.contains(&4));
    }

    #[test]
    fn test_overlaps_ignored_once_pose_is_held() {
        let mut state = landing_into_pause();
        state.player.on_ground = true;
        let poll = match state.pause.stage() {
            pause::PauseStage::AwaitingLanding { poll, .. } => poll,
            other => panic!("unexpected stage {other:?}"),
        };
        pause::on_ground_poll(&mut state, poll);

        let hazard = spawn(&mut state, ObstacleKind::Hazard);
        assert_eq!(resolve(&mut state, hazard), CollisionOutcome::Ignored);
        assert_eq!(state.phase, RunPhase::ScriptedPause);
    }
}
