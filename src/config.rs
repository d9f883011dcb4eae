//! Tunable constants shared by the sequencer, the target field and the scene.
//!
//! There are no runtime config files; everything the game needs is a constant
//! here. The sequencer timings are additionally bundled into
//! [`SequencerConfig`] so tests can drive the state machine with a custom set.

// --- Sequencer timings (milliseconds) -----------------------------------------

/// How long a milestone overlay stays fully visible before fading out.
pub const MILESTONE_VISIBLE_MS: f64 = 7_000.0;
/// Length of the milestone fade-out.
pub const MILESTONE_FADE_MS: f64 = 600.0;
/// Delay between the win message and the leaderboard.
pub const WIN_MESSAGE_MS: f64 = 5_000.0;

/// Music level while a milestone overlay is on screen.
pub const DUCK_VOLUME: f64 = 10.0;
pub const DUCK_FADE_MS: f64 = 800.0;
/// Music level restored once the milestone overlay starts fading.
pub const RESTORE_VOLUME: f64 = 20.0;
pub const RESTORE_FADE_MS: f64 = 600.0;
/// Volume applied by `MusicController::start`.
pub const DEFAULT_MUSIC_VOLUME: f64 = 20.0;

/// Score at which the mega-heart replaces regular targets.
pub const TERMINAL_SCORE: u32 = 100;
/// Milestones fire at every multiple of this step below the terminal score.
pub const MILESTONE_STEP: u32 = 10;

// --- "No" button flee field ---------------------------------------------------

pub const FLEE_THRESHOLD: f64 = 100.0;
pub const FLEE_PUSH_STRENGTH: f64 = 12.0;
pub const FLEE_EDGE_MARGIN: f64 = 20.0;

// --- Scene ----------------------------------------------------------------------

pub const TIME_OF_DAY_STEP: f64 = 0.05;
pub const TIME_OF_DAY_START: f64 = 0.5;
/// Above this the scene switches to night (constellation, night sky, fog).
pub const NIGHT_THRESHOLD: f64 = 0.85;
/// Fireworks launch from this time of day onward.
pub const FIREWORKS_THRESHOLD: f64 = 0.8;

// --- Target field ---------------------------------------------------------------

pub const INITIAL_TARGETS: usize = 3;
pub const TARGET_SCALE: f64 = 2.0;
pub const MEGA_HEART_CLICKS: u32 = 10;
pub const MEGA_HEART_POSITION: [f64; 3] = [0.0, 3.0, -12.0];
pub const TRACER_MS: f64 = 200.0;

/// Timing bundle consumed by [`crate::sequencer::Sequencer`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SequencerConfig {
    pub milestone_visible_ms: f64,
    pub milestone_fade_ms: f64,
    pub win_message_ms: f64,
    pub duck_volume: f64,
    pub duck_fade_ms: f64,
    pub restore_volume: f64,
    pub restore_fade_ms: f64,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            milestone_visible_ms: MILESTONE_VISIBLE_MS,
            milestone_fade_ms: MILESTONE_FADE_MS,
            win_message_ms: WIN_MESSAGE_MS,
            duck_volume: DUCK_VOLUME,
            duck_fade_ms: DUCK_FADE_MS,
            restore_volume: RESTORE_VOLUME,
            restore_fade_ms: RESTORE_FADE_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_constants() {
        let cfg = SequencerConfig::default();
        assert_eq!(cfg.milestone_visible_ms, 7_000.0);
        assert_eq!(cfg.milestone_fade_ms, 600.0);
        assert_eq!(cfg.win_message_ms, 5_000.0);
    }

    #[test]
    fn night_starts_after_fireworks() {
        assert!(FIREWORKS_THRESHOLD < NIGHT_THRESHOLD);
    }
}
