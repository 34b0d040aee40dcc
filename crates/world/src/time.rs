//! Day/night cycle.
//!
//! Time of day is a single fraction in `[0, 1)` advanced by elapsed milliseconds.
//! `0.0` is dawn (06:00), `0.25` noon, `0.5` evening and `0.75` midnight. Seven fixed
//! phases partition the circle; spawn rules and sunlight damage read the phase.

use serde::{Deserialize, Serialize};

/// Default real-time length of one day: ten minutes.
pub const DEFAULT_DAY_DURATION_MS: f64 = 600_000.0;

/// Named slice of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayPhase {
    /// `[0.00, 0.10)`
    Dawn,
    /// `[0.10, 0.25)`
    Morning,
    /// `[0.25, 0.35)`
    Noon,
    /// `[0.35, 0.45)`
    Afternoon,
    /// `[0.45, 0.55)`
    Dusk,
    /// `[0.55, 0.95)`
    Night,
    /// `[0.95, 1.00)`
    LateNight,
}

impl DayPhase {
    /// Phases with their half-open ranges, in scan order.
    pub const RANGES: [(DayPhase, f64, f64); 7] = [
        (DayPhase::Dawn, 0.0, 0.1),
        (DayPhase::Morning, 0.1, 0.25),
        (DayPhase::Noon, 0.25, 0.35),
        (DayPhase::Afternoon, 0.35, 0.45),
        (DayPhase::Dusk, 0.45, 0.55),
        (DayPhase::Night, 0.55, 0.95),
        (DayPhase::LateNight, 0.95, 1.0),
    ];

    /// Phase containing `fraction`. Anything outside every range reads as dawn.
    pub fn at(fraction: f64) -> Self {
        Self::RANGES
            .iter()
            .find(|(_, start, end)| fraction >= *start && fraction < *end)
            .map(|(phase, _, _)| *phase)
            .unwrap_or(DayPhase::Dawn)
    }

    /// Dusk, night and late night count as night.
    pub fn is_night(self) -> bool {
        matches!(self, DayPhase::Dusk | DayPhase::Night | DayPhase::LateNight)
    }

    /// Screen darkening for this phase, `0.0` (none) to `0.8`.
    pub fn darkness(self) -> f32 {
        match self {
            DayPhase::Dawn => 0.3,
            DayPhase::Morning | DayPhase::Noon | DayPhase::Afternoon => 0.0,
            DayPhase::Dusk => 0.4,
            DayPhase::Night => 0.7,
            DayPhase::LateNight => 0.8,
        }
    }

    /// Stable label.
    pub fn name(self) -> &'static str {
        match self {
            DayPhase::Dawn => "dawn",
            DayPhase::Morning => "morning",
            DayPhase::Noon => "noon",
            DayPhase::Afternoon => "afternoon",
            DayPhase::Dusk => "dusk",
            DayPhase::Night => "night",
            DayPhase::LateNight => "late_night",
        }
    }
}

/// Cyclic time-of-day clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayNightClock {
    time: f64,
    day_duration_ms: f64,
    /// While set, [`DayNightClock::advance`] does nothing.
    pub paused: bool,
}

impl DayNightClock {
    /// Clock at dawn with the given day length. Non-positive lengths fall back to the default.
    pub fn new(day_duration_ms: f64) -> Self {
        let day_duration_ms = if day_duration_ms.is_finite() && day_duration_ms > 0.0 {
            day_duration_ms
        } else {
            DEFAULT_DAY_DURATION_MS
        };
        Self {
            time: 0.0,
            day_duration_ms,
            paused: false,
        }
    }

    /// Length of one full cycle in milliseconds.
    pub fn day_duration_ms(&self) -> f64 {
        self.day_duration_ms
    }

    /// Current fraction in `[0, 1)`.
    pub fn time_fraction(&self) -> f64 {
        self.time
    }

    /// Move time forward by `delta_ms`, wrapping at the end of the day.
    pub fn advance(&mut self, delta_ms: f64) {
        if self.paused || !delta_ms.is_finite() {
            return;
        }
        self.time = wrap(self.time + delta_ms / self.day_duration_ms);
    }

    /// Jump to a fraction. Values outside `[0, 1)` are clamped into it.
    pub fn set_time(&mut self, fraction: f64) {
        self.time = clamp_fraction(fraction);
    }

    /// Jump to dawn.
    pub fn dawn(&mut self) {
        self.time = 0.0;
    }

    /// Jump to noon.
    pub fn noon(&mut self) {
        self.time = 0.25;
    }

    /// Jump to dusk.
    pub fn dusk(&mut self) {
        self.time = 0.45;
    }

    /// Jump to midnight.
    pub fn midnight(&mut self) {
        self.time = 0.75;
    }

    /// Current phase.
    pub fn phase(&self) -> DayPhase {
        DayPhase::at(self.time)
    }

    /// Night rules (spawning) are active.
    pub fn is_night(&self) -> bool {
        self.phase().is_night()
    }

    /// Day rules (sunlight damage) are active.
    pub fn is_day(&self) -> bool {
        !self.is_night()
    }

    /// Overlay darkness for the current phase.
    pub fn darkness(&self) -> f32 {
        self.phase().darkness()
    }

    /// Wall-clock reading, `"HH:MM"`, with fraction `0.0` at 06:00.
    pub fn time_string(&self) -> String {
        let shifted = (self.time + 0.25) % 1.0;
        let total_minutes = (shifted * 24.0 * 60.0).floor() as u32;
        format!("{:02}:{:02}", total_minutes / 60 % 24, total_minutes % 60)
    }
}

impl Default for DayNightClock {
    fn default() -> Self {
        Self::new(DEFAULT_DAY_DURATION_MS)
    }
}

fn wrap(fraction: f64) -> f64 {
    let wrapped = fraction.rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs.
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}

/// Clamp into `[0, 1)`; NaN reads as dawn.
pub(crate) fn clamp_fraction(fraction: f64) -> f64 {
    if fraction.is_nan() {
        return 0.0;
    }
    fraction.clamp(0.0, 1.0 - f64::EPSILON)
}
