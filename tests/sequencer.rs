// Integration tests (native) for the presentation sequencer.
// A simulated millisecond clock drives every timer; music is a recording fake
// backed by the real fader so volume curves can be sampled.

use approx::assert_abs_diff_eq;
use valentine_quest::music::{Fader, MusicController};
use valentine_quest::sequencer::{
    Effect, FleeButton, MILESTONES, MilestonePhase, Overlay, PhotoLayout, Rect, Screen, Sequencer, WinPhase,
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Start,
    Reset,
    Fade { target: f64, duration_ms: f64, at: f64 },
}

struct FakeMusic {
    fader: Fader,
    calls: Vec<Call>,
}

impl FakeMusic {
    fn new() -> Self {
        Self { fader: Fader::new(20.0), calls: Vec::new() }
    }

    fn fades(&self) -> Vec<Call> {
        self.calls.iter().filter(|c| matches!(c, Call::Fade { .. })).cloned().collect()
    }
}

impl MusicController for FakeMusic {
    fn start(&mut self) {
        self.calls.push(Call::Start);
        self.fader.set(20.0);
    }
    fn set_volume(&mut self, level: f64) {
        self.fader.set(level);
    }
    fn volume(&self) -> f64 {
        self.fader.level()
    }
    fn reset(&mut self) {
        self.calls.push(Call::Reset);
    }
    fn fade_volume(&mut self, target: f64, duration_ms: f64, now: f64) {
        self.calls.push(Call::Fade { target, duration_ms, at: now });
        self.fader.begin(target, duration_ms, now);
    }
    fn tick(&mut self, now: f64) {
        self.fader.tick(now);
    }
}

fn playing() -> Sequencer<FakeMusic> {
    let mut s = Sequencer::new(FakeMusic::new());
    s.confirm_valentine();
    s.begin_adventure();
    s
}

/// Score `n` hits at `now`, returning the thresholds whose overlay opened.
fn hit(s: &mut Sequencer<FakeMusic>, n: u32, now: f64) -> Vec<u32> {
    let mut fired = Vec::new();
    for _ in 0..n {
        let before = s.visible_milestone().map(|(m, _)| m.threshold);
        s.on_score_update(now);
        let after = s.visible_milestone().map(|(m, _)| m.threshold);
        if let Some(threshold) = after.filter(|_| after != before) {
            fired.push(threshold);
        }
    }
    fired
}

/// Let every open overlay run out.
fn settle(s: &mut Sequencer<FakeMusic>, now: &mut f64) {
    *now += 7_600.0;
    s.tick(*now);
}

#[test]
fn each_milestone_fires_exactly_once_per_session() {
    let mut s = playing();
    let mut now = 0.0;
    let mut fired = Vec::new();
    for _ in 0..99 {
        fired.extend(hit(&mut s, 1, now));
        if s.visible_milestone().is_some() {
            settle(&mut s, &mut now);
        }
    }
    assert_eq!(fired, vec![10, 20, 30, 40, 50, 60, 70, 80, 90]);
    assert_eq!(s.score(), 99);
    for m in MILESTONES.iter() {
        assert!(s.milestone_shown(m.threshold));
    }
}

#[test]
fn replay_resets_score_and_flags() {
    let mut s = playing();
    let mut now = 0.0;
    let mut fired = Vec::new();
    for _ in 0..30 {
        fired.extend(hit(&mut s, 1, now));
        if s.visible_milestone().is_some() {
            settle(&mut s, &mut now);
        }
    }
    assert_eq!(fired, vec![10, 20, 30]);

    s.replay();
    assert_eq!(s.score(), 0);
    assert_eq!(s.screen(), Screen::Start);
    assert!(!s.milestone_shown(10));
    assert_eq!(s.drain_effects(), vec![Effect::ResetWorld]);
    assert!(s.music().calls.contains(&Call::Reset));

    s.confirm_valentine();
    s.begin_adventure();
    assert_eq!(hit(&mut s, 10, now), vec![10]);
}

#[test]
fn at_most_one_overlay_visible() {
    let mut s = playing();
    let mut now = 0.0;
    for step in 0..2_000 {
        if step % 3 == 0 {
            s.on_score_update(now);
        }
        now += 50.0;
        s.tick(now);
        match (s.overlay(), s.visible_milestone()) {
            (Overlay::MilestoneMessage { threshold, fading }, Some((m, phase))) => {
                assert_eq!(threshold, m.threshold);
                assert_eq!(fading, phase == MilestonePhase::Fading);
                assert!(s.overlay_active());
            }
            (Overlay::None, None) => assert!(!s.overlay_active()),
            other => panic!("overlay and milestone state disagree: {other:?}"),
        }
    }
}

#[test]
fn win_message_then_leaderboard_after_five_seconds() {
    let mut s = playing();
    hit(&mut s, 99, 0.0);
    s.tick(10_000.0);
    s.on_score_update(10_000.0);
    assert_eq!(s.score(), 100);

    s.on_win(20_000.0);
    assert_eq!(s.overlay(), Overlay::WinMessage);
    assert_eq!(s.drain_effects(), vec![Effect::ReleasePointerLock]);

    s.tick(24_999.0);
    assert_eq!(s.screen(), Screen::Won(WinPhase::Message));
    s.tick(25_000.0);
    assert_eq!(s.screen(), Screen::Won(WinPhase::Leaderboard));
    assert_eq!(s.overlay(), Overlay::WinLeaderboard);

    // A second break report changes nothing.
    s.on_win(25_001.0);
    assert_eq!(s.overlay(), Overlay::WinLeaderboard);
}

#[test]
fn replay_during_win_message_cancels_leaderboard_timer() {
    let mut s = playing();
    s.on_win(0.0);
    s.replay();
    s.tick(6_000.0);
    assert_eq!(s.overlay(), Overlay::StartScreen);
}

#[test]
fn ten_hits_show_first_card_then_fade_and_hide() {
    let mut s = playing();
    assert!(!s.overlay_active());
    let start = 1_000.0;
    hit(&mut s, 10, start);

    let (m, phase) = s.visible_milestone().expect("milestone 10 visible");
    assert_eq!(m.threshold, 10);
    assert_eq!(phase, MilestonePhase::Visible);
    assert_eq!(m.message, "Making you laugh is the absolute highlight of my day");
    assert_eq!(m.images, &["/images/val_1.png", "/images/val_2.png"]);
    assert_eq!(m.layout, PhotoLayout::Pair);
    assert!(s.overlay_active());
    assert_eq!(
        s.music().fades(),
        vec![Call::Fade { target: 10.0, duration_ms: 800.0, at: start }]
    );

    s.tick(start + 6_999.0);
    assert_eq!(s.visible_milestone().map(|(_, p)| p), Some(MilestonePhase::Visible));
    s.tick(start + 7_000.0);
    assert_eq!(s.overlay(), Overlay::MilestoneMessage { threshold: 10, fading: true });
    assert_eq!(
        s.music().fades().last(),
        Some(&Call::Fade { target: 20.0, duration_ms: 600.0, at: start + 7_000.0 })
    );
    assert!(s.overlay_active(), "targets stay hidden while fading");

    s.tick(start + 7_599.0);
    assert!(s.visible_milestone().is_some());
    s.tick(start + 7_600.0);
    assert_eq!(s.overlay(), Overlay::None);
    assert!(!s.overlay_active());
    assert_abs_diff_eq!(s.music().volume(), 20.0);
}

#[test]
fn duck_fade_reaches_target_and_stays_in_range() {
    let mut s = playing();
    hit(&mut s, 10, 0.0);
    let mut t = 0.0;
    while t <= 800.0 {
        s.tick(t);
        let v = s.music().volume();
        assert!((0.0..=100.0).contains(&v), "volume {v} at {t}ms");
        assert!((10.0..=20.0).contains(&v), "volume {v} overshot at {t}ms");
        t += 16.0;
    }
    s.tick(800.0);
    assert_abs_diff_eq!(s.music().volume(), 10.0, epsilon = 0.5);
}

#[test]
fn scores_outside_play_are_ignored() {
    let mut s = Sequencer::new(FakeMusic::new());
    s.on_score_update(0.0);
    s.confirm_valentine();
    s.on_score_update(0.0);
    assert_eq!(s.score(), 0);
    s.begin_adventure();
    assert_eq!(s.music().calls, vec![Call::Start]);
    s.on_score_update(0.0);
    assert_eq!(s.score(), 1);
}

#[test]
fn flee_button_stays_inside_margins() {
    let viewport = (1024.0, 768.0);
    let layout = Rect::new(560.0, 420.0, 80.0, 40.0);
    let mut button = FleeButton::new();
    // Sweep the pointer across and around the button many times.
    for pass in 0..40 {
        for i in 0..200 {
            let (ox, oy) = button.offset();
            let current = layout.translated(ox, oy);
            let (cx, cy) = current.center();
            let angle = (i as f64) * 0.37 + pass as f64;
            let r = (i % 90) as f64;
            let pointer = (cx + angle.cos() * r, cy + angle.sin() * r);
            button.on_pointer_move(pointer, current, viewport);

            let (ox, oy) = button.offset();
            let moved = layout.translated(ox, oy);
            assert!(moved.left >= 20.0 - 1e-9, "left {}", moved.left);
            assert!(moved.top >= 20.0 - 1e-9, "top {}", moved.top);
            assert!(moved.left + moved.width <= viewport.0 - 20.0 + 1e-9);
            assert!(moved.top + moved.height <= viewport.1 - 20.0 + 1e-9);
        }
    }
}

#[test]
fn flee_only_reacts_on_start_screen() {
    let mut s = Sequencer::new(FakeMusic::new());
    let rect = Rect::new(500.0, 400.0, 80.0, 40.0);
    assert!(s.pointer_moved((530.0, 420.0), rect, (1024.0, 768.0)));
    let offset = s.flee_button().offset();
    s.confirm_valentine();
    assert!(!s.pointer_moved((530.0, 420.0), rect.translated(offset.0, offset.1), (1024.0, 768.0)));
    s.replay();
    assert_eq!(s.flee_button().offset(), (0.0, 0.0));
}
