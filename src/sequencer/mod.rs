//! Score-driven presentation sequencer.
//!
//! Owns the score and every overlay flag. Game code reports hits and the
//! mega-heart break; the browser glue reports button presses, pointer samples
//! and the frame clock. The sequencer answers with overlay state, a single
//! "overlay active" gate for target spawning, commands to the music
//! controller, and a small outbox of [`Effect`]s for the host.
//!
//! Flow: Start -> Adventure -> Playing (milestone overlays come and go on top)
//! -> Won(Message) -> Won(Leaderboard) -> Replay -> Start.

pub mod flee;
pub mod milestones;

use crate::config::SequencerConfig;
use crate::music::MusicController;
use crate::timer::TimerQueue;

pub use flee::{FleeButton, Rect};
pub use milestones::{MILESTONE_COUNT, MILESTONES, Milestone, PhotoLayout};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WinPhase {
    Message,
    Leaderboard,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Start,
    Adventure,
    Playing,
    Won(WinPhase),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MilestonePhase {
    Visible,
    Fading,
}

/// What the player currently sees on top of the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Overlay {
    None,
    StartScreen,
    AdventureScreen,
    MilestoneMessage { threshold: u32, fading: bool },
    WinMessage,
    WinLeaderboard,
}

/// Requests for the host that fall outside overlay rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Give the mouse back (the win screen needs a clickable Replay button).
    ReleasePointerLock,
    /// Rebuild the scene and target field for a fresh session.
    ResetWorld,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TimerScope {
    Milestone(usize),
    Win,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ActiveMilestone {
    index: usize,
    phase: MilestonePhase,
}

pub struct Sequencer<M> {
    config: SequencerConfig,
    music: M,
    screen: Screen,
    score: u32,
    shown: [bool; MILESTONE_COUNT],
    active: Option<ActiveMilestone>,
    timers: TimerQueue<TimerScope>,
    flee: FleeButton,
    aiming: bool,
    session: u32,
    effects: Vec<Effect>,
}

impl<M: MusicController> Sequencer<M> {
    pub fn new(music: M) -> Self {
        Self::with_config(music, SequencerConfig::default())
    }

    pub fn with_config(music: M, config: SequencerConfig) -> Self {
        Self {
            config,
            music,
            screen: Screen::Start,
            score: 0,
            shown: [false; MILESTONE_COUNT],
            active: None,
            timers: TimerQueue::new(),
            flee: FleeButton::new(),
            aiming: false,
            session: 0,
            effects: Vec::new(),
        }
    }

    // --- Queries --------------------------------------------------------------

    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    pub fn music(&self) -> &M {
        &self.music
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// True once the player clicked into the scene after the intro.
    pub fn is_aiming(&self) -> bool {
        self.aiming
    }

    pub fn flee_button(&self) -> &FleeButton {
        &self.flee
    }

    pub fn milestone_shown(&self, threshold: u32) -> bool {
        milestones::index_for_score(threshold).is_some_and(|i| self.shown[i])
    }

    /// The milestone overlay on screen, if any.
    pub fn visible_milestone(&self) -> Option<(&'static Milestone, MilestonePhase)> {
        self.active.map(|a| (&MILESTONES[a.index], a.phase))
    }

    pub fn is_won(&self) -> bool {
        matches!(self.screen, Screen::Won(_))
    }

    /// Logical OR of every state that hides targets: both intro screens and
    /// any milestone overlay, fading included.
    pub fn overlay_active(&self) -> bool {
        matches!(self.screen, Screen::Start | Screen::Adventure) || self.active.is_some()
    }

    pub fn overlay(&self) -> Overlay {
        match self.screen {
            Screen::Start => Overlay::StartScreen,
            Screen::Adventure => Overlay::AdventureScreen,
            Screen::Won(WinPhase::Message) => Overlay::WinMessage,
            Screen::Won(WinPhase::Leaderboard) => Overlay::WinLeaderboard,
            Screen::Playing => match self.active {
                Some(a) => Overlay::MilestoneMessage {
                    threshold: MILESTONES[a.index].threshold,
                    fading: a.phase == MilestonePhase::Fading,
                },
                None => Overlay::None,
            },
        }
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    // --- Intro ----------------------------------------------------------------

    /// "yes" on the start screen.
    pub fn confirm_valentine(&mut self) {
        if self.screen == Screen::Start {
            log::debug!("start screen confirmed");
            self.screen = Screen::Adventure;
        }
    }

    /// "Let's go!" on the adventure screen. Must run inside the click handler
    /// so the browser lets the music start.
    pub fn begin_adventure(&mut self) {
        if self.screen == Screen::Adventure {
            log::debug!("adventure started");
            self.screen = Screen::Playing;
            self.aiming = true;
            self.music.start();
        }
    }

    /// Click on the scene outside any intro screen.
    pub fn game_clicked(&mut self) {
        if matches!(self.screen, Screen::Start | Screen::Adventure) {
            return;
        }
        self.aiming = true;
        self.music.start();
    }

    /// Pointer sample over the start screen.
    pub fn pointer_moved(&mut self, pointer: (f64, f64), no_button: Rect, viewport: (f64, f64)) -> bool {
        if self.screen != Screen::Start {
            return false;
        }
        self.flee.on_pointer_move(pointer, no_button, viewport)
    }

    // --- Game reports ---------------------------------------------------------

    /// One resolved hit. Returns the new score.
    pub fn on_score_update(&mut self, now: f64) -> u32 {
        if self.screen != Screen::Playing {
            log::debug!("score update ignored in {:?}", self.screen);
            return self.score;
        }
        self.score += 1;
        if let Some(index) = milestones::index_for_score(self.score) {
            if !self.shown[index] {
                self.show_milestone(index, now);
            }
        }
        self.score
    }

    /// The mega-heart broke.
    pub fn on_win(&mut self, now: f64) {
        if self.screen != Screen::Playing {
            return;
        }
        if let Some(a) = self.active.take() {
            self.timers.cancel_scope(TimerScope::Milestone(a.index));
        }
        log::info!("won with score {}", self.score);
        self.screen = Screen::Won(WinPhase::Message);
        self.timers.schedule(now, self.config.win_message_ms, TimerScope::Win);
        self.effects.push(Effect::ReleasePointerLock);
    }

    /// Full reset to the start screen. Cancels every pending timer so nothing
    /// from the old session fires into the new one.
    pub fn replay(&mut self) {
        let cancelled = self.timers.cancel_all();
        log::info!("replay (session {}, {} timers cancelled)", self.session + 1, cancelled);
        self.music.reset();
        self.screen = Screen::Start;
        self.score = 0;
        self.shown = [false; MILESTONE_COUNT];
        self.active = None;
        self.flee.reset();
        self.aiming = false;
        self.session += 1;
        self.effects.push(Effect::ResetWorld);
    }

    // --- Clock ----------------------------------------------------------------

    /// Fire every timer due by `now`, then advance music fades.
    pub fn tick(&mut self, now: f64) {
        while let Some(fired) = self.timers.pop_due(now) {
            match fired.scope {
                TimerScope::Milestone(index) => self.on_milestone_timer(index, fired.due_ms),
                TimerScope::Win => self.on_win_timer(),
            }
        }
        self.music.tick(now);
    }

    fn show_milestone(&mut self, index: usize, now: f64) {
        // Thresholds are ten hits apart and targets are hidden while an
        // overlay is up, but keep the single-overlay rule regardless.
        if let Some(prev) = self.active.take() {
            self.timers.cancel_scope(TimerScope::Milestone(prev.index));
        }
        self.shown[index] = true;
        self.active = Some(ActiveMilestone { index, phase: MilestonePhase::Visible });
        self.timers.schedule(now, self.config.milestone_visible_ms, TimerScope::Milestone(index));
        self.music.fade_volume(self.config.duck_volume, self.config.duck_fade_ms, now);
        log::debug!("milestone {} shown", MILESTONES[index].threshold);
    }

    fn on_milestone_timer(&mut self, index: usize, at: f64) {
        let Some(active) = self.active.filter(|a| a.index == index) else {
            log::debug!("stale milestone timer {index} ignored");
            return;
        };
        match active.phase {
            MilestonePhase::Visible => {
                self.active = Some(ActiveMilestone { index, phase: MilestonePhase::Fading });
                self.timers.schedule(at, self.config.milestone_fade_ms, TimerScope::Milestone(index));
                self.music.fade_volume(self.config.restore_volume, self.config.restore_fade_ms, at);
                log::debug!("milestone {} fading", MILESTONES[index].threshold);
            }
            MilestonePhase::Fading => {
                self.active = None;
                log::debug!("milestone {} hidden", MILESTONES[index].threshold);
            }
        }
    }

    fn on_win_timer(&mut self) {
        if self.screen == Screen::Won(WinPhase::Message) {
            self.screen = Screen::Won(WinPhase::Leaderboard);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct NullMusic {
        level: f64,
    }

    impl MusicController for NullMusic {
        fn start(&mut self) {}
        fn set_volume(&mut self, level: f64) {
            self.level = level;
        }
        fn volume(&self) -> f64 {
            self.level
        }
        fn reset(&mut self) {}
        fn fade_volume(&mut self, target: f64, _duration_ms: f64, _now: f64) {
            self.level = target;
        }
        fn tick(&mut self, _now: f64) {}
    }

    fn playing() -> Sequencer<NullMusic> {
        let mut s = Sequencer::new(NullMusic::default());
        s.confirm_valentine();
        s.begin_adventure();
        s
    }

    #[test]
    fn intro_gates_overlay() {
        let mut s = Sequencer::new(NullMusic::default());
        assert_eq!(s.overlay(), Overlay::StartScreen);
        assert!(s.overlay_active());
        s.begin_adventure();
        assert_eq!(s.screen(), Screen::Start, "cannot skip the start screen");
        s.confirm_valentine();
        assert_eq!(s.overlay(), Overlay::AdventureScreen);
        s.begin_adventure();
        assert_eq!(s.overlay(), Overlay::None);
        assert!(!s.overlay_active());
    }

    #[test]
    fn hits_before_playing_do_not_count() {
        let mut s = Sequencer::new(NullMusic::default());
        assert_eq!(s.on_score_update(0.0), 0);
    }

    #[test]
    fn stale_timer_after_replay_is_inert() {
        let mut s = playing();
        for _ in 0..10 {
            s.on_score_update(0.0);
        }
        assert!(s.pending_timers() > 0);
        s.replay();
        assert_eq!(s.pending_timers(), 0);
        s.tick(10_000.0);
        assert_eq!(s.overlay(), Overlay::StartScreen);
    }

    #[test]
    fn win_cancels_open_milestone() {
        let mut s = playing();
        for _ in 0..10 {
            s.on_score_update(0.0);
        }
        s.on_win(100.0);
        assert!(s.visible_milestone().is_none());
        assert_eq!(s.pending_timers(), 1);
        assert_eq!(s.drain_effects(), vec![Effect::ReleasePointerLock]);
        assert!(s.drain_effects().is_empty());
    }
}
