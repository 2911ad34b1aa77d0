//! Per-frame simulation step
//!
//! Advances the match by one host frame and reports what happened.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{RowContact, reflect_off_field, row_contact};
use super::state::{GameEvent, MatchPhase, MatchState, Outcome, Rgba};
use crate::consts::*;

/// Input intent for a single frame, independent of the physical device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Tap/click/enter released this frame
    pub confirm: bool,
}

impl MatchState {
    /// See [`tick`]
    pub fn advance(&mut self, input: &TickInput, dt: f32) -> Vec<GameEvent> {
        tick(self, input, dt)
    }
}

/// Advance the match by one frame of `dt` seconds.
///
/// Returned events are in ball order, with `MatchOver` (if any) last.
pub fn tick(state: &mut MatchState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    if dt.is_finite() && dt > 0.0 {
        state.clock_secs += f64::from(dt);
    }

    match state.phase {
        MatchPhase::NotStarted => {
            if input.confirm {
                log::info!("Match started");
                state.phase = MatchPhase::InPlay;
            }
            Vec::new()
        }
        MatchPhase::Over => {
            if input.confirm && state.restart_ready() {
                state.reset();
                state.spawn_canonical_ball();
                state.phase = MatchPhase::InPlay;
                log::info!("Match restarted");
            }
            Vec::new()
        }
        MatchPhase::InPlay => play_frame(state, input),
    }
}

fn play_frame(state: &mut MatchState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();

    // Both directions may be held; they cancel out
    if input.move_left {
        state.paddle.shift(-state.paddle.speed);
    }
    if input.move_right {
        state.paddle.shift(state.paddle.speed);
    }

    let field_width = state.field.width;
    for (i, ball) in state.balls.iter_mut().enumerate() {
        ball.step();

        match row_contact(ball, &state.paddle) {
            RowContact::Above => {
                reflect_off_field(ball, field_width);
            }
            RowContact::Hit => {
                ball.vel.y = -ball.vel.y;
                state.score.player += 1;
                events.push(GameEvent::BallHit { ball: i });
            }
            RowContact::Miss => {
                ball.reset(field_width, &mut state.rng);
                state.score.opponent += 1;
                events.push(GameEvent::BallMiss { ball: i });
            }
        }
    }

    if let Some(outcome) = state.score.winner(WINNER_SCORE) {
        events.push(end_match(state, outcome));
    } else if state.score.player as usize == state.balls.len() * ESCALATION_POINTS_PER_BALL {
        escalate(state);
    }

    events
}

fn end_match(state: &mut MatchState, outcome: Outcome) -> GameEvent {
    let now = state.clock_secs;
    state.timing.ended_at = Some(now);
    state.timing.elapsed_secs = now - state.timing.started_at;
    state.over_at = Some(now);
    state.phase = MatchPhase::Over;

    log::info!(
        "Match over ({:?}), score {}, {:.2}s",
        outcome,
        state.score,
        state.timing.elapsed_secs
    );

    GameEvent::MatchOver {
        outcome,
        elapsed_secs: state.timing.elapsed_secs,
    }
}

/// Add a ball with random speed, size and color. Alpha stays 0.
fn escalate(state: &mut MatchState) {
    let speed = state.rng.random_range(ESCALATION_SPEED);
    let radius = state.rng.random_range(ESCALATION_RADIUS);
    let color = Rgba::new(
        state.rng.random(),
        state.rng.random(),
        state.rng.random(),
        0,
    );
    let index = state.push_ball(radius, color, IVec2::splat(speed));
    log::debug!(
        "Escalation at {} points: ball {} added",
        state.score.player,
        index
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{CANONICAL_BALL_COLOR, Score};
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    const CONFIRM: TickInput = TickInput {
        move_left: false,
        move_right: false,
        confirm: true,
    };

    /// 400x600 field (paddle x 150..=250, y 589) with the canonical ball, in play
    fn started(seed: u64) -> MatchState {
        let mut state = MatchState::new(400, 600, seed).unwrap();
        state.spawn_canonical_ball();
        tick(&mut state, &CONFIRM, DT);
        assert_eq!(state.phase, MatchPhase::InPlay);
        state
    }

    /// Put ball 0 one frame away from the paddle row at column `x`
    fn aim(state: &mut MatchState, x: i32) {
        state.balls[0].pos = IVec2::new(x, 580);
        state.balls[0].vel = IVec2::new(0, 5);
    }

    #[test]
    fn test_not_started_waits_for_confirm() {
        let mut state = MatchState::new(400, 600, 3).unwrap();
        state.spawn_canonical_ball();
        let before = state.balls[0];

        let input = TickInput {
            move_left: true,
            ..Default::default()
        };
        for _ in 0..10 {
            assert!(tick(&mut state, &input, DT).is_empty());
        }
        assert_eq!(state.phase, MatchPhase::NotStarted);
        assert_eq!(state.paddle.x, 150);
        assert_eq!(state.balls[0], before);

        tick(&mut state, &CONFIRM, DT);
        assert_eq!(state.phase, MatchPhase::InPlay);
        // The starting frame does not move anything
        assert_eq!(state.balls[0], before);
    }

    #[test]
    fn test_paddle_movement() {
        let mut state = started(5);
        let left = TickInput {
            move_left: true,
            ..Default::default()
        };
        tick(&mut state, &left, DT);
        assert_eq!(state.paddle.x, 142);

        let right = TickInput {
            move_right: true,
            ..Default::default()
        };
        tick(&mut state, &right, DT);
        tick(&mut state, &right, DT);
        assert_eq!(state.paddle.x, 158);

        let both = TickInput {
            move_left: true,
            move_right: true,
            confirm: false,
        };
        tick(&mut state, &both, DT);
        assert_eq!(state.paddle.x, 158);
        assert_eq!(state.paddle.y, 589);
    }

    #[test]
    fn test_paddle_is_not_clamped() {
        let mut state = started(5);
        let left = TickInput {
            move_left: true,
            ..Default::default()
        };
        for _ in 0..40 {
            tick(&mut state, &left, DT);
        }
        assert_eq!(state.paddle.x, 150 - 40 * PADDLE_SPEED);
    }

    #[test]
    fn test_wall_reflection() {
        let mut state = started(8);
        state.balls[0].pos = IVec2::new(8, 100);
        state.balls[0].vel = IVec2::new(-5, 5);

        let events = tick(&mut state, &TickInput::default(), DT);
        assert!(events.is_empty());
        assert_eq!(state.balls[0].pos, IVec2::new(3, 105));
        assert_eq!(state.balls[0].vel, IVec2::new(5, 5));
    }

    #[test]
    fn test_ceiling_reflection() {
        let mut state = started(8);
        state.balls[0].pos = IVec2::new(100, 8);
        state.balls[0].vel = IVec2::new(3, -5);

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.balls[0].vel, IVec2::new(3, 5));
    }

    #[test]
    fn test_hit_keeps_position_and_looks() {
        let mut state = started(11);
        aim(&mut state, 200);

        let events = tick(&mut state, &TickInput::default(), DT);
        assert_eq!(events, vec![GameEvent::BallHit { ball: 0 }]);
        let ball = state.balls[0];
        assert_eq!(ball.pos, IVec2::new(200, 585));
        assert_eq!(ball.vel, IVec2::new(0, -5));
        assert_eq!(ball.radius, 5);
        assert_eq!(ball.color, CANONICAL_BALL_COLOR);
        assert_eq!(state.score, Score { player: 1, opponent: 0 });
    }

    #[test]
    fn test_hit_on_paddle_edges() {
        for x in [150, 250] {
            let mut state = started(11);
            aim(&mut state, x);
            let events = tick(&mut state, &TickInput::default(), DT);
            assert_eq!(events, vec![GameEvent::BallHit { ball: 0 }], "x = {}", x);
        }
    }

    #[test]
    fn test_miss_respawns_ball() {
        let mut state = started(12);
        aim(&mut state, 20);

        let events = tick(&mut state, &TickInput::default(), DT);
        assert_eq!(events, vec![GameEvent::BallMiss { ball: 0 }]);
        let ball = state.balls[0];
        assert_eq!(ball.pos.y, 5);
        assert!((0..400).contains(&ball.pos.x));
        assert_eq!(ball.vel, IVec2::new(0, 5));
        assert_eq!(state.score, Score { player: 0, opponent: 1 });
    }

    #[test]
    fn test_events_follow_ball_order() {
        let mut state = started(13);
        state.spawn_canonical_ball();
        state.balls[0].pos = IVec2::new(20, 580);
        state.balls[0].vel = IVec2::new(0, 5);
        state.balls[1].pos = IVec2::new(200, 580);
        state.balls[1].vel = IVec2::new(0, 5);

        let events = tick(&mut state, &TickInput::default(), DT);
        assert_eq!(
            events,
            vec![GameEvent::BallMiss { ball: 0 }, GameEvent::BallHit { ball: 1 }]
        );
    }

    #[test]
    fn test_escalation_adds_one_ball() {
        let mut state = started(21);
        state.score.player = 2;
        aim(&mut state, 200);

        let events = tick(&mut state, &TickInput::default(), DT);
        assert_eq!(events, vec![GameEvent::BallHit { ball: 0 }]);
        assert_eq!(state.balls.len(), 2);

        let added = state.balls[1];
        assert!((4..=10).contains(&added.radius));
        assert!((3..=6).contains(&added.vel.x));
        assert_eq!(added.vel.x, added.vel.y);
        assert_eq!(added.pos.y, added.radius);

        // 4 != 2 * 3, no new ball
        aim(&mut state, 200);
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.score.player, 4);
        assert_eq!(state.balls.len(), 2);
    }

    #[test]
    fn test_escalation_requires_exact_multiple() {
        let mut state = started(21);
        state.score.player = 4;
        aim(&mut state, 200);

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.score.player, 5);
        assert_eq!(state.balls.len(), 1);
    }

    #[test]
    fn test_escalation_fires_again_at_next_multiple() {
        let mut state = started(22);
        state.spawn_canonical_ball();
        state.score.player = 5;
        aim(&mut state, 200);

        let events = tick(&mut state, &TickInput::default(), DT);
        assert_eq!(events, vec![GameEvent::BallHit { ball: 0 }]);
        assert_eq!(state.score.player, 6);
        assert_eq!(state.balls.len(), 3);

        // Three balls escalate again at 9
        for expected in [7, 8] {
            aim(&mut state, 200);
            tick(&mut state, &TickInput::default(), DT);
            assert_eq!(state.score.player, expected);
            assert_eq!(state.balls.len(), 3);
        }
    }

    #[test]
    fn test_escalation_ball_is_transparent() {
        for seed in 0..20 {
            let mut state = started(seed);
            state.score.player = 2;
            aim(&mut state, 200);
            tick(&mut state, &TickInput::default(), DT);
            assert_eq!(state.balls[1].color.a, 0);
        }
    }

    #[test]
    fn test_in_play_without_balls_spawns_one() {
        let mut state = MatchState::new(400, 600, 1).unwrap();
        tick(&mut state, &CONFIRM, DT);
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.balls.len(), 1);
    }

    #[test]
    fn test_match_over_on_player_win() {
        let mut state = started(30);
        state.score.player = 20;
        aim(&mut state, 200);

        let events = tick(&mut state, &TickInput::default(), DT);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], GameEvent::BallHit { ball: 0 });
        assert!(matches!(
            events[1],
            GameEvent::MatchOver {
                outcome: Outcome::PlayerWon,
                ..
            }
        ));
        assert_eq!(state.phase, MatchPhase::Over);
        assert_eq!(state.outcome(), Some(Outcome::PlayerWon));
        assert!(state.timing.ended_at.is_some());
        assert!(state.timing.elapsed_secs > 0.0);
        // Winning takes priority over escalation (21 == 7 * 3 never checked)
        assert_eq!(state.balls.len(), 1);
    }

    #[test]
    fn test_match_over_on_opponent_win() {
        let mut state = started(31);
        state.score.opponent = 20;
        aim(&mut state, 20);

        let events = tick(&mut state, &TickInput::default(), DT);
        assert!(matches!(
            events.last(),
            Some(GameEvent::MatchOver {
                outcome: Outcome::OpponentWon,
                ..
            })
        ));
        assert_eq!(state.outcome(), Some(Outcome::OpponentWon));
    }

    #[test]
    fn test_frozen_after_match_over() {
        let mut state = started(32);
        state.score.opponent = 20;
        aim(&mut state, 20);
        tick(&mut state, &TickInput::default(), DT);

        let score = state.score;
        let balls = state.balls.clone();
        let paddle = state.paddle;
        let input = TickInput {
            move_left: true,
            move_right: false,
            confirm: true,
        };
        for _ in 0..60 {
            assert!(tick(&mut state, &input, DT).is_empty());
        }
        assert_eq!(state.phase, MatchPhase::Over);
        assert_eq!(state.score, score);
        assert_eq!(state.balls, balls);
        assert_eq!(state.paddle, paddle);
    }

    #[test]
    fn test_restart_cooldown() {
        let mut state = started(33);
        state.score.player = 20;
        aim(&mut state, 200);
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.phase, MatchPhase::Over);

        for _ in 0..3 {
            tick(&mut state, &CONFIRM, 0.5);
            assert_eq!(state.phase, MatchPhase::Over);
            assert!(!state.restart_ready());
        }

        // Clock is now 2.5s past the end
        tick(&mut state, &CONFIRM, 1.0);
        assert_eq!(state.phase, MatchPhase::InPlay);
        assert_eq!(state.score, Score::default());
        assert_eq!(state.balls.len(), 1);
        assert_eq!(state.balls[0].color, CANONICAL_BALL_COLOR);
        assert_eq!(state.paddle.x, 150);
        assert_eq!(state.timing.ended_at, None);
    }

    #[test]
    fn test_restart_needs_confirm() {
        let mut state = started(34);
        state.score.opponent = 20;
        aim(&mut state, 20);
        tick(&mut state, &TickInput::default(), DT);

        tick(&mut state, &TickInput::default(), 5.0);
        assert_eq!(state.phase, MatchPhase::Over);
        assert!(state.restart_ready());

        tick(&mut state, &CONFIRM, DT);
        assert_eq!(state.phase, MatchPhase::InPlay);
    }

    #[test]
    fn test_bad_dt_does_not_move_clock() {
        let mut state = started(35);
        let clock = state.clock_secs();
        tick(&mut state, &TickInput::default(), -1.0);
        tick(&mut state, &TickInput::default(), f32::NAN);
        assert_eq!(state.clock_secs(), clock);
    }

    /// Run until the canonical ball first reaches the paddle row
    fn first_contact(seed: u64) -> (usize, Vec<GameEvent>, bool, MatchState) {
        let mut state = started(seed);
        for frame in 0..1000 {
            let before = state.balls[0];
            let events = tick(&mut state, &TickInput::default(), DT);
            if !events.is_empty() {
                // No reflection happens on the resolving frame
                let x = before.pos.x + before.vel.x;
                return (frame, events, state.paddle.covers(x), state);
            }
        }
        panic!("ball never reached the paddle row");
    }

    #[test]
    fn test_first_contact_scenario() {
        for seed in [1, 2, 3, 99, 12345] {
            let (frame, events, on_paddle, state) = first_contact(seed);
            assert_eq!(events.len(), 1);
            if on_paddle {
                assert_eq!(events[0], GameEvent::BallHit { ball: 0 });
                assert_eq!(state.score, Score { player: 1, opponent: 0 });
            } else {
                assert_eq!(events[0], GameEvent::BallMiss { ball: 0 });
                assert_eq!(state.score, Score { player: 0, opponent: 1 });
            }

            let (frame2, events2, _, _) = first_contact(seed);
            assert_eq!(frame, frame2);
            assert_eq!(events, events2);
        }
    }

    #[test]
    fn test_determinism() {
        let inputs = [
            TickInput::default(),
            TickInput {
                move_left: true,
                ..Default::default()
            },
            TickInput {
                move_right: true,
                ..Default::default()
            },
            CONFIRM,
        ];

        let run = |seed: u64| {
            let mut state = MatchState::new(320, 480, seed).unwrap();
            state.spawn_canonical_ball();
            let mut events = Vec::new();
            for frame in 0..5000 {
                let input = inputs[(frame / 7) % inputs.len()];
                events.extend(tick(&mut state, &input, DT));
            }
            (state.snapshot().unwrap(), events)
        };

        let (a, events_a) = run(4242);
        let (b, events_b) = run(4242);
        assert_eq!(a, b);
        assert_eq!(events_a, events_b);
        assert!(!events_a.is_empty());
    }

    fn input_strategy() -> impl Strategy<Value = TickInput> {
        (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(l, r, c)| TickInput {
            move_left: l,
            move_right: r,
            confirm: c,
        })
    }

    proptest! {
        #[test]
        fn prop_scores_never_decrease_in_a_match(
            seed in any::<u64>(),
            inputs in prop::collection::vec(input_strategy(), 1..600),
        ) {
            let mut state = MatchState::new(240, 200, seed).unwrap();
            state.spawn_canonical_ball();

            for input in &inputs {
                let was_over = state.phase == MatchPhase::Over;
                let before = state.score;
                let events = tick(&mut state, input, DT);

                if !was_over {
                    prop_assert!(state.score.player >= before.player);
                    prop_assert!(state.score.opponent >= before.opponent);

                    let hits = events.iter().filter(|e| matches!(e, GameEvent::BallHit { .. })).count();
                    let misses = events.iter().filter(|e| matches!(e, GameEvent::BallMiss { .. })).count();
                    prop_assert_eq!((state.score.player - before.player) as usize, hits);
                    prop_assert_eq!((state.score.opponent - before.opponent) as usize, misses);
                }

                let overs = events.iter().filter(|e| matches!(e, GameEvent::MatchOver { .. })).count();
                prop_assert!(overs <= 1);
                if overs == 1 {
                    let last_is_over = matches!(events.last(), Some(GameEvent::MatchOver { .. }));
                    prop_assert!(last_is_over);
                    prop_assert_eq!(state.phase, MatchPhase::Over);
                }

                if state.phase == MatchPhase::InPlay {
                    prop_assert!(!state.balls.is_empty());
                }
                prop_assert!(state.balls.iter().all(|b| b.radius > 0));
            }
        }
    }
}
