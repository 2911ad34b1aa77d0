//! Platform glue
//!
//! The browser build exposes the simulation to JavaScript and plays cues through
//! Web Audio. Native hosts use the library directly (see `main.rs`).

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Numeric event codes handed across the JS boundary
pub mod codes {
    use crate::sim::{GameEvent, MatchPhase};

    pub const EVENT_HIT: u8 = 1;
    pub const EVENT_MISS: u8 = 2;
    pub const EVENT_OVER: u8 = 3;

    pub fn event_code(event: &GameEvent) -> u8 {
        match event {
            GameEvent::BallHit { .. } => EVENT_HIT,
            GameEvent::BallMiss { .. } => EVENT_MISS,
            GameEvent::MatchOver { .. } => EVENT_OVER,
        }
    }

    pub fn phase_code(phase: MatchPhase) -> u8 {
        match phase {
            MatchPhase::NotStarted => 0,
            MatchPhase::InPlay => 1,
            MatchPhase::Over => 2,
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::sim::Outcome;

        #[test]
        fn test_codes_are_distinct() {
            let codes = [
                event_code(&GameEvent::BallHit { ball: 0 }),
                event_code(&GameEvent::BallMiss { ball: 0 }),
                event_code(&GameEvent::MatchOver {
                    outcome: Outcome::PlayerWon,
                    elapsed_secs: 0.0,
                }),
            ];
            assert_eq!(codes, [EVENT_HIT, EVENT_MISS, EVENT_OVER]);
            assert_eq!(phase_code(MatchPhase::Over), 2);
        }
    }
}
