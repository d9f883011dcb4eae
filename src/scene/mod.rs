//! Scene parameters driven by the time-of-day slider.
//!
//! Pure functions from a time value in [0,1] (0 morning, 0.5 noon, ~0.75
//! sunset, 1 night) to light intensities and colours. The renderer reads
//! these each frame; nothing here touches the sequencer.

pub mod camera;

use crate::config::{FIREWORKS_THRESHOLD, NIGHT_THRESHOLD, TIME_OF_DAY_START, TIME_OF_DAY_STEP};

pub use camera::Camera;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn hex(v: u32) -> Self {
        Self((v >> 16) as u8, (v >> 8) as u8, v as u8)
    }

    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }

    pub fn css(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    /// Scale brightness, used to fake directional shading on flat shapes.
    pub fn shade(self, k: f64) -> Rgb {
        let s = |c: u8| (c as f64 * k).round().clamp(0.0, 255.0) as u8;
        Rgb(s(self.0), s(self.1), s(self.2))
    }
}

fn channel(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeOfDay(f64);

impl Default for TimeOfDay {
    fn default() -> Self {
        Self(TIME_OF_DAY_START)
    }
}

impl TimeOfDay {
    pub fn new(v: f64) -> Self {
        Self(v.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Arrow keys nudge time by one step. Returns true when the key was used.
    pub fn apply_key(&mut self, key: &str) -> bool {
        match key {
            "ArrowLeft" => {
                *self = Self::new(self.0 - TIME_OF_DAY_STEP);
                true
            }
            "ArrowRight" => {
                *self = Self::new(self.0 + TIME_OF_DAY_STEP);
                true
            }
            _ => false,
        }
    }

    pub fn label(self) -> &'static str {
        match self.0 {
            t if t < 0.25 => "Morning",
            t if t < 0.55 => "Noon",
            t if t < 0.85 => "Sunset",
            _ => "Night",
        }
    }

    pub fn is_night(self) -> bool {
        self.0 > NIGHT_THRESHOLD
    }

    pub fn fireworks(self) -> bool {
        self.0 >= FIREWORKS_THRESHOLD
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lighting {
    pub ambient_intensity: f64,
    pub ambient_color: Rgb,
    pub sun_intensity: f64,
    pub sun_color: Rgb,
}

pub fn lighting(time: TimeOfDay) -> Lighting {
    let tod = time.value();
    if tod <= 0.5 {
        let t = tod * 2.0;
        Lighting {
            ambient_intensity: 0.3 + 0.4 * t,
            ambient_color: Rgb::hex(0xffffff),
            sun_intensity: 0.5 + 1.5 * t,
            sun_color: Rgb::hex(0xfffef8),
        }
    } else if tod <= 0.75 {
        let t = (tod - 0.5) / 0.25;
        Lighting {
            ambient_intensity: 0.5 - 0.2 * t,
            ambient_color: Rgb(255, channel(230.0 - 30.0 * t), channel(220.0 - 80.0 * t)),
            sun_intensity: 1.5 - 0.8 * t,
            sun_color: Rgb(255, channel(200.0 - 50.0 * t), channel(150.0 - 50.0 * t)),
        }
    } else {
        let t = (tod - 0.75) / 0.25;
        Lighting {
            ambient_intensity: 0.3 - 0.25 * t,
            ambient_color: Rgb(
                channel(150.0 - 80.0 * t),
                channel(120.0 - 50.0 * t),
                channel(180.0 - 20.0 * t),
            ),
            sun_intensity: 0.7 - 0.65 * t,
            sun_color: Rgb(channel(100.0 - 60.0 * t), channel(80.0 - 40.0 * t), 140),
        }
    }
}

const DAY_SKY: Rgb = Rgb::hex(0x87ceeb);
const NIGHT_SKY: Rgb = Rgb::hex(0x050508);
const LOVE_FOG: Rgb = Rgb::hex(0x200020);
const NIGHT_FOG: Rgb = Rgb::hex(0x0a0a1a);
pub const FOG_DENSITY: f64 = 0.018;

/// Background colour; blends to night between 0.82 and 0.92.
pub fn sky_color(time: TimeOfDay) -> Rgb {
    let t = ((time.value() - 0.82) / 0.1).clamp(0.0, 1.0);
    DAY_SKY.lerp(NIGHT_SKY, t)
}

pub fn fog_color(time: TimeOfDay) -> Rgb {
    if time.is_night() { NIGHT_FOG } else { LOVE_FOG }
}

/// Exponential-squared fog factor at `distance`, 0 = clear, 1 = fully fogged.
pub fn fog_amount(distance: f64) -> f64 {
    let d = FOG_DENSITY * distance;
    1.0 - (-(d * d)).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn arrow_keys_step_and_clamp() {
        let mut t = TimeOfDay::new(0.98);
        assert!(t.apply_key("ArrowRight"));
        assert_abs_diff_eq!(t.value(), 1.0);
        assert!(t.apply_key("ArrowRight"));
        assert_abs_diff_eq!(t.value(), 1.0);
        let mut t = TimeOfDay::new(0.02);
        t.apply_key("ArrowLeft");
        assert_abs_diff_eq!(t.value(), 0.0);
        assert!(!t.apply_key("a"));
    }

    #[test]
    fn labels_follow_bands() {
        assert_eq!(TimeOfDay::new(0.1).label(), "Morning");
        assert_eq!(TimeOfDay::new(0.5).label(), "Noon");
        assert_eq!(TimeOfDay::new(0.7).label(), "Sunset");
        assert_eq!(TimeOfDay::new(0.9).label(), "Night");
    }

    #[test]
    fn noon_is_brightest() {
        let noon = lighting(TimeOfDay::new(0.5));
        assert_abs_diff_eq!(noon.sun_intensity, 2.0);
        assert_abs_diff_eq!(noon.ambient_intensity, 0.7);
        let night = lighting(TimeOfDay::new(1.0));
        assert_abs_diff_eq!(night.sun_intensity, 0.05, epsilon = 1e-9);
        assert_eq!(night.sun_color, Rgb(40, 40, 140));
    }

    #[test]
    fn sky_blends_late() {
        assert_eq!(sky_color(TimeOfDay::new(0.5)), DAY_SKY);
        assert_eq!(sky_color(TimeOfDay::new(1.0)), NIGHT_SKY);
        assert_eq!(Rgb::hex(0x87ceeb).css(), "#87ceeb");
    }
}
