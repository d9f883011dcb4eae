//! Background music: the controller interface the sequencer commands, the
//! eased volume fade shared by implementations, and the `<audio>` backed
//! controller used in the browser.
//!
//! Volumes are on a 0-100 scale throughout.

use wasm_bindgen::prelude::*;
use web_sys::HtmlAudioElement;

use crate::config::DEFAULT_MUSIC_VOLUME;
use crate::error::{Result, ValentineError};

pub const MUSIC_SRC: &str = "/audio/background.mp3";

/// Operations the presentation sequencer issues. The sequencer never reads
/// state back; `volume()` exists for fades and for callers that render it.
pub trait MusicController {
    /// Begin playback at [`DEFAULT_MUSIC_VOLUME`]. Calling while already
    /// playing is a no-op. Host rejections (autoplay policy) are swallowed.
    fn start(&mut self);
    /// Set the level immediately, cancelling any running fade.
    fn set_volume(&mut self, level: f64);
    /// Live level, including the effect of an in-flight fade.
    fn volume(&self) -> f64;
    /// Pause and rewind to the beginning.
    fn reset(&mut self);
    /// Ease from the live level to `target` over `duration_ms`.
    fn fade_volume(&mut self, target: f64, duration_ms: f64, now: f64);
    /// Advance any running fade to `now`.
    fn tick(&mut self, now: f64);
}

fn clamp_level(level: f64) -> f64 {
    level.clamp(0.0, 100.0)
}

/// Quadratic ease-in-out on `t` in [0,1].
pub fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// One volume ramp. Sampling is pure so overlapping ramps compose by starting
/// the new one from whatever the old one reports at that instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VolumeFade {
    pub from: f64,
    pub to: f64,
    pub start_ms: f64,
    pub duration_ms: f64,
}

impl VolumeFade {
    pub fn new(from: f64, to: f64, start_ms: f64, duration_ms: f64) -> Self {
        Self {
            from: clamp_level(from),
            to: clamp_level(to),
            start_ms,
            duration_ms: duration_ms.max(0.0),
        }
    }

    pub fn progress(&self, now: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Level at `now`, rounded to a whole step and kept inside [0,100].
    pub fn level_at(&self, now: f64) -> f64 {
        let eased = ease_in_out(self.progress(now));
        clamp_level((self.from + (self.to - self.from) * eased).round())
    }

    pub fn is_done(&self, now: f64) -> bool {
        self.progress(now) >= 1.0
    }
}

/// Level bookkeeping shared by controllers: a current level plus an optional
/// running fade.
#[derive(Clone, Debug)]
pub struct Fader {
    level: f64,
    fade: Option<VolumeFade>,
}

impl Fader {
    pub fn new(level: f64) -> Self {
        Self { level: clamp_level(level), fade: None }
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    pub fn set(&mut self, level: f64) {
        self.fade = None;
        self.level = clamp_level(level.round());
    }

    pub fn begin(&mut self, target: f64, duration_ms: f64, now: f64) {
        // Settle the running fade at `now` first so the new ramp starts from
        // the live level rather than the last sampled frame.
        self.tick(now);
        let fade = VolumeFade::new(self.level, target, now, duration_ms);
        if fade.is_done(now) {
            self.set(target);
        } else {
            self.fade = Some(fade);
        }
    }

    /// Returns the new level when it changed.
    pub fn tick(&mut self, now: f64) -> Option<f64> {
        let fade = self.fade?;
        let next = fade.level_at(now);
        if fade.is_done(now) {
            self.fade = None;
        }
        if (next - self.level).abs() > f64::EPSILON {
            self.level = next;
            Some(next)
        } else {
            None
        }
    }
}

/// Controller over a hidden looping `<audio>` element.
pub struct MediaMusic {
    element: HtmlAudioElement,
    fader: Fader,
    on_rejected: Closure<dyn FnMut(JsValue)>,
}

impl MediaMusic {
    pub fn new(src: &str) -> Result<Self> {
        let element = HtmlAudioElement::new_with_src(src).map_err(ValentineError::audio)?;
        element.set_loop(true);
        element.set_preload("auto");
        let on_rejected = Closure::wrap(Box::new(|err: JsValue| {
            log::warn!("music playback rejected: {:?}", err);
        }) as Box<dyn FnMut(JsValue)>);
        let music = Self { element, fader: Fader::new(DEFAULT_MUSIC_VOLUME), on_rejected };
        music.apply();
        Ok(music)
    }

    fn apply(&self) {
        self.element.set_volume(self.fader.level() / 100.0);
    }
}

impl MusicController for MediaMusic {
    fn start(&mut self) {
        if !self.element.paused() {
            return;
        }
        self.fader.set(DEFAULT_MUSIC_VOLUME);
        self.apply();
        match self.element.play() {
            Ok(promise) => {
                let _ = promise.catch(&self.on_rejected);
            }
            Err(err) => log::warn!("music playback unavailable: {:?}", err),
        }
    }

    fn set_volume(&mut self, level: f64) {
        self.fader.set(level);
        self.apply();
    }

    fn volume(&self) -> f64 {
        self.fader.level()
    }

    fn reset(&mut self) {
        if let Err(err) = self.element.pause() {
            log::warn!("music pause failed: {:?}", err);
        }
        self.element.set_current_time(0.0);
    }

    fn fade_volume(&mut self, target: f64, duration_ms: f64, now: f64) {
        self.fader.begin(target, duration_ms, now);
        self.apply();
    }

    fn tick(&mut self, now: f64) {
        if self.fader.tick(now).is_some() {
            self.apply();
        }
    }
}
