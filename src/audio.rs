//! Procedural sound cues.
//!
//! [`AudioCues`] owns the page's single `AudioContext`; the app creates it
//! once per session and hands it to whatever emits sound. Every cue is
//! fire-and-forget: synthesis failures are logged and dropped.

use rand::Rng;
use web_sys::{
    AudioContext, AudioContextState, AudioNode, AudioParam, BiquadFilterType, OscillatorType,
};

use crate::error::{Result, ValentineError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundCue {
    /// Short descending "pew" for every shot.
    Shot,
    /// Rising chirp when a crab is clicked.
    CrabWheee,
    /// Bell for the n-th constellation star; pitch climbs a semitone per step.
    StarDing { step: u32 },
    RocketLaunch,
    FireworkBoom,
}

/// Pitch envelope of one oscillator voice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Sweep {
    Hold(f64),
    /// Exponential glide from `from` to `to` over `secs`.
    Exp { from: f64, to: f64, secs: f64 },
    /// Linear glide through `mid` (at 30% of the duration) to `to`.
    Linear { from: f64, mid: f64, to: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Voice {
    pub sweep: Sweep,
    pub gain: f32,
    /// Time for the gain to decay to silence.
    pub decay: f64,
    pub duration: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseBurst {
    pub filter: BiquadFilterType,
    pub cutoff: f32,
    pub q: f32,
    pub gain: f32,
    pub duration: f64,
}

const STAR_BASE_HZ: f64 = 523.25;

/// Oscillator voices making up a cue.
pub fn voices(cue: SoundCue) -> Vec<Voice> {
    match cue {
        SoundCue::Shot => vec![Voice {
            sweep: Sweep::Exp { from: 800.0, to: 100.0, secs: 0.05 },
            gain: 0.12,
            decay: 0.06,
            duration: 0.06,
        }],
        SoundCue::CrabWheee => vec![Voice {
            sweep: Sweep::Linear { from: 520.0, mid: 880.0, to: 1100.0 },
            gain: 0.2,
            decay: 0.35,
            duration: 0.35,
        }],
        SoundCue::StarDing { step } => {
            let base = star_frequency(step);
            [(1.0, 0.4, 0.15), (2.5, 0.25, 0.25), (5.5, 0.15, 0.1), (8.2, 0.08, 0.08)]
                .into_iter()
                .map(|(ratio, amp, decay)| Voice {
                    sweep: Sweep::Hold(base * ratio),
                    gain: (amp * 0.2) as f32,
                    decay,
                    duration: 0.6,
                })
                .collect()
        }
        SoundCue::RocketLaunch => vec![Voice {
            sweep: Sweep::Exp { from: 600.0, to: 2400.0, secs: 0.35 },
            gain: 0.2,
            decay: 0.35,
            duration: 0.35,
        }],
        SoundCue::FireworkBoom => vec![Voice {
            sweep: Sweep::Exp { from: 80.0, to: 20.0, secs: 0.6 },
            gain: 0.5,
            decay: 0.6,
            duration: 0.6,
        }],
    }
}

/// Filtered noise layered under a cue.
pub fn noise(cue: SoundCue) -> Option<NoiseBurst> {
    match cue {
        SoundCue::RocketLaunch => Some(NoiseBurst {
            filter: BiquadFilterType::Bandpass,
            cutoff: 2000.0,
            q: 2.0,
            gain: 0.06,
            duration: 0.35,
        }),
        SoundCue::FireworkBoom => Some(NoiseBurst {
            filter: BiquadFilterType::Lowpass,
            cutoff: 800.0,
            q: 0.5,
            gain: 0.4,
            duration: 0.6,
        }),
        _ => None,
    }
}

/// Bell pitch for the n-th star: C5 rising a semitone per step.
pub fn star_frequency(step: u32) -> f64 {
    STAR_BASE_HZ * 2f64.powf(step as f64 / 12.0)
}

pub struct AudioCues {
    ctx: AudioContext,
}

impl AudioCues {
    pub fn new() -> Result<Self> {
        let ctx = AudioContext::new().map_err(ValentineError::audio)?;
        Ok(Self { ctx })
    }

    /// Play a cue; never fails outward.
    pub fn play(&self, cue: SoundCue) {
        if let Err(err) = self.try_play(cue) {
            log::warn!("sound cue {:?} dropped: {}", cue, err);
        }
    }

    fn try_play(&self, cue: SoundCue) -> Result<()> {
        if self.ctx.state() == AudioContextState::Suspended {
            // Resolves on the next user gesture at the latest; nothing to await.
            let _ = self.ctx.resume();
        }
        let now = self.ctx.current_time();
        for voice in voices(cue) {
            self.play_voice(&voice, now)?;
        }
        if let Some(burst) = noise(cue) {
            self.play_noise(&burst, now)?;
        }
        Ok(())
    }

    fn play_voice(&self, voice: &Voice, now: f64) -> Result<()> {
        let osc = self.ctx.create_oscillator().map_err(ValentineError::audio)?;
        let gain = self.ctx.create_gain().map_err(ValentineError::audio)?;
        osc.set_type(OscillatorType::Sine);
        let freq = osc.frequency();
        match voice.sweep {
            Sweep::Hold(hz) => {
                freq.set_value_at_time(hz as f32, now).map_err(ValentineError::audio)?;
            }
            Sweep::Exp { from, to, secs } => {
                freq.set_value_at_time(from as f32, now).map_err(ValentineError::audio)?;
                freq.exponential_ramp_to_value_at_time(to as f32, now + secs)
                    .map_err(ValentineError::audio)?;
            }
            Sweep::Linear { from, mid, to } => {
                freq.set_value_at_time(from as f32, now).map_err(ValentineError::audio)?;
                freq.linear_ramp_to_value_at_time(mid as f32, now + voice.duration * 0.3)
                    .map_err(ValentineError::audio)?;
                freq.linear_ramp_to_value_at_time(to as f32, now + voice.duration)
                    .map_err(ValentineError::audio)?;
            }
        }
        envelope(&gain.gain(), voice.gain, now, voice.decay)?;
        connect(&osc, &gain)?;
        connect(&gain, &self.ctx.destination())?;
        osc.start_with_when(now).map_err(ValentineError::audio)?;
        osc.stop_with_when(now + voice.duration).map_err(ValentineError::audio)?;
        Ok(())
    }

    fn play_noise(&self, burst: &NoiseBurst, now: f64) -> Result<()> {
        let rate = self.ctx.sample_rate();
        let len = (rate as f64 * burst.duration) as usize;
        let mut rng = rand::thread_rng();
        let mut samples: Vec<f32> = (0..len)
            .map(|i| {
                let env = (-(i as f32) / (len as f32 * 0.25)).exp();
                rng.gen_range(-1.0f32..1.0) * env
            })
            .collect();
        let buffer = self
            .ctx
            .create_buffer(1, len as u32, rate)
            .map_err(ValentineError::audio)?;
        buffer.copy_to_channel(&mut samples, 0).map_err(ValentineError::audio)?;

        let source = self.ctx.create_buffer_source().map_err(ValentineError::audio)?;
        source.set_buffer(Some(&buffer));
        let filter = self.ctx.create_biquad_filter().map_err(ValentineError::audio)?;
        filter.set_type(burst.filter);
        filter.frequency().set_value(burst.cutoff);
        filter.q().set_value(burst.q);
        let gain = self.ctx.create_gain().map_err(ValentineError::audio)?;
        envelope(&gain.gain(), burst.gain, now, burst.duration)?;

        connect(&source, &filter)?;
        connect(&filter, &gain)?;
        connect(&gain, &self.ctx.destination())?;
        source.start_with_when(now).map_err(ValentineError::audio)?;
        Ok(())
    }
}

fn envelope(param: &AudioParam, peak: f32, now: f64, decay: f64) -> Result<()> {
    param.set_value_at_time(peak, now).map_err(ValentineError::audio)?;
    param
        .exponential_ramp_to_value_at_time(0.001, now + decay)
        .map_err(ValentineError::audio)?;
    Ok(())
}

fn connect(from: &AudioNode, to: &AudioNode) -> Result<()> {
    from.connect_with_audio_node(to).map_err(ValentineError::audio)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn star_pitch_climbs_an_octave_over_twelve_steps() {
        assert_relative_eq!(star_frequency(0), 523.25);
        assert_relative_eq!(star_frequency(12), 1046.5, max_relative = 1e-9);
    }

    #[test]
    fn bell_has_four_partials() {
        let v = voices(SoundCue::StarDing { step: 3 });
        assert_eq!(v.len(), 4);
        assert!(v.iter().all(|voice| voice.duration == 0.6));
    }

    #[test]
    fn only_fireworks_carry_noise() {
        assert!(noise(SoundCue::Shot).is_none());
        assert!(noise(SoundCue::CrabWheee).is_none());
        assert!(noise(SoundCue::RocketLaunch).is_some());
        assert!(noise(SoundCue::FireworkBoom).is_some());
    }
}
