//! Fronton entry point
//!
//! Native builds run a headless attract-mode demo: a scripted input source plays
//! matches back to back while events are logged and routed to the audio manager.
//! The browser build starts from `platform::web` instead.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::path::Path;

    use anyhow::{Context, Result};

    use fronton::audio::{AudioManager, LogSink};
    use fronton::sim::{Ball, GameEvent, MatchPhase, MatchState, TickInput};
    use fronton::Settings;

    /// Scripted player: taps to start and chases the most urgent ball
    #[derive(Debug, Default)]
    pub struct Autopilot;

    impl Autopilot {
        pub fn sample(&mut self, state: &MatchState) -> TickInput {
            match state.phase {
                MatchPhase::NotStarted => TickInput {
                    confirm: true,
                    ..Default::default()
                },
                MatchPhase::Over => TickInput {
                    confirm: state.restart_ready(),
                    ..Default::default()
                },
                MatchPhase::InPlay => {
                    let Some(target) = most_urgent(&state.balls) else {
                        return TickInput::default();
                    };
                    let center = state.paddle.x + state.paddle.width / 2;
                    let delta = target.pos.x - center;
                    TickInput {
                        move_left: delta < -state.paddle.speed,
                        move_right: delta > state.paddle.speed,
                        confirm: false,
                    }
                }
            }
        }
    }

    /// Lowest ball that is still falling
    fn most_urgent(balls: &[Ball]) -> Option<&Ball> {
        balls
            .iter()
            .filter(|b| b.vel.y > 0)
            .max_by_key(|b| b.pos.y)
    }

    pub fn run() -> Result<()> {
        env_logger::init();
        log::info!("Fronton (native) starting...");

        let settings = match std::env::args().nth(1) {
            Some(path) => Settings::load(Path::new(&path))?,
            None => Settings::default(),
        };

        let field = settings.field().context("display too small for a field")?;
        let mut state = match settings.seed {
            Some(seed) => MatchState::new(field.width, field.height, seed),
            None => MatchState::from_entropy(field.width, field.height),
        }
        .context("creating match")?;
        state.spawn_canonical_ball();
        log::info!(
            "Field {}x{}, paddle width {}, seed {}",
            field.width,
            field.height,
            state.paddle.width,
            state.seed
        );

        let mut audio = AudioManager::from_settings(LogSink, &settings);
        let mut pilot = Autopilot;
        let dt = settings.frame_dt();
        let mut matches = 0u32;

        for frame in 0..settings.max_frames {
            let input = pilot.sample(&state);
            let was = state.phase;
            let events = state.advance(&input, dt);

            if was != MatchPhase::InPlay && state.phase == MatchPhase::InPlay {
                audio.match_started();
            }
            audio.dispatch(&events);

            for event in &events {
                match event {
                    GameEvent::BallHit { ball } => {
                        log::debug!("frame {}: ball {} hit, {}", frame, ball, state.score)
                    }
                    GameEvent::BallMiss { ball } => {
                        log::debug!("frame {}: ball {} missed, {}", frame, ball, state.score)
                    }
                    GameEvent::MatchOver {
                        outcome,
                        elapsed_secs,
                    } => {
                        matches += 1;
                        log::info!(
                            "Match {} over: {:?}, {} in {:.2}s with {} balls",
                            matches,
                            outcome,
                            state.score,
                            elapsed_secs,
                            state.balls.len()
                        );
                    }
                }
            }
        }

        log::info!(
            "Demo finished after {} frames: {} matches, current score {} ({:?})",
            settings.max_frames,
            matches,
            state.score,
            state.phase
        );
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    demo::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
