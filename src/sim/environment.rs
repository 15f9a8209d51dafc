//! Ambient environment: time of day and weather
//!
//! Neither feeds back into gameplay. Both are advanced on game time and
//! reported to presentation through the snapshot.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::lerp;

/// Seconds per full day/night cycle
pub const DAY_LENGTH: f32 = 300.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeOfDay {
    Dawn,
    Day,
    Dusk,
    Night,
}

impl TimeOfDay {
    /// The phase that leads into this one
    fn previous(&self) -> TimeOfDay {
        match self {
            TimeOfDay::Dawn => TimeOfDay::Night,
            TimeOfDay::Day => TimeOfDay::Dawn,
            TimeOfDay::Dusk => TimeOfDay::Day,
            TimeOfDay::Night => TimeOfDay::Dusk,
        }
    }

    /// Cycle progress where this phase starts
    fn start(&self) -> f32 {
        match self {
            TimeOfDay::Dawn => 0.0,
            TimeOfDay::Day => 0.25,
            TimeOfDay::Dusk => 0.5,
            TimeOfDay::Night => 0.75,
        }
    }

    fn ambient_intensity(&self) -> f32 {
        match self {
            TimeOfDay::Dawn => 0.4,
            TimeOfDay::Day => 0.6,
            TimeOfDay::Dusk | TimeOfDay::Night => 0.35,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayNightCycle {
    /// Seconds into the current cycle
    pub time: f32,
    pub enabled: bool,
}

impl Default for DayNightCycle {
    fn default() -> Self {
        Self {
            // Levels open in daylight
            time: DAY_LENGTH * TimeOfDay::Day.start(),
            enabled: true,
        }
    }
}

impl DayNightCycle {
    pub fn update(&mut self, dt: f32) {
        if !self.enabled {
            return;
        }
        self.time += dt;
        if self.time >= DAY_LENGTH {
            self.time = 0.0;
        }
    }

    /// Fraction of the cycle in [0, 1)
    pub fn progress(&self) -> f32 {
        self.time / DAY_LENGTH
    }

    pub fn phase(&self) -> TimeOfDay {
        let p = self.progress();
        if p < 0.25 {
            TimeOfDay::Dawn
        } else if p < 0.5 {
            TimeOfDay::Day
        } else if p < 0.75 {
            TimeOfDay::Dusk
        } else {
            TimeOfDay::Night
        }
    }

    /// Blend factor from the previous phase into the current one
    pub fn blend(&self) -> f32 {
        ((self.progress() - self.phase().start()) / 0.25).clamp(0.0, 1.0)
    }

    /// Jump to the start of a phase
    pub fn set_phase(&mut self, phase: TimeOfDay) {
        self.time = DAY_LENGTH * phase.start();
    }

    /// Ambient light level blended across the phase boundary
    pub fn ambient_intensity(&self) -> f32 {
        let phase = self.phase();
        lerp(
            phase.previous().ambient_intensity(),
            phase.ambient_intensity(),
            self.blend(),
        )
    }

    pub fn visibility_multiplier(&self) -> f32 {
        match self.phase() {
            TimeOfDay::Night => 0.75,
            TimeOfDay::Dawn | TimeOfDay::Dusk => 0.8,
            TimeOfDay::Day => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Weather {
    Clear,
    Rain,
    Fog,
}

impl Weather {
    pub fn fog_density(&self) -> f32 {
        match self {
            Weather::Clear => 0.005,
            Weather::Rain => 0.01,
            Weather::Fog => 0.04,
        }
    }
}

/// Clear is listed twice so it comes up half the time
const WEATHER_TABLE: [Weather; 4] = [Weather::Clear, Weather::Clear, Weather::Rain, Weather::Fog];
const FIRST_WEATHER_CHANGE: f32 = 60.0;
const WEATHER_MIN_DURATION: f32 = 45.0;
const WEATHER_DURATION_SPREAD: f32 = 60.0;
const FOG_EASE_RATE: f32 = 0.5;
const MIN_FOG_DENSITY: f32 = 0.005;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSystem {
    pub current: Weather,
    pub enabled: bool,
    timer: f32,
    duration: f32,
    fog_density: f32,
    target_fog_density: f32,
}

impl Default for WeatherSystem {
    fn default() -> Self {
        Self::new(true)
    }
}

impl WeatherSystem {
    /// Clear skies with the first change a minute away
    pub fn new(enabled: bool) -> Self {
        Self {
            current: Weather::Clear,
            enabled,
            timer: 0.0,
            duration: FIRST_WEATHER_CHANGE,
            fog_density: MIN_FOG_DENSITY,
            target_fog_density: Weather::Clear.fog_density(),
        }
    }

    /// Returns the new weather when it changes this frame
    pub fn update(&mut self, dt: f32, rng: &mut Pcg32) -> Option<Weather> {
        let mut changed = None;
        if self.enabled {
            self.timer += dt;
            if self.timer >= self.duration {
                self.timer = 0.0;
                self.duration = WEATHER_MIN_DURATION + rng.random::<f32>() * WEATHER_DURATION_SPREAD;
                let next = WEATHER_TABLE[rng.random_range(0..WEATHER_TABLE.len())];
                self.set_weather(next);
                changed = Some(next);
            }
        }

        let diff = self.target_fog_density - self.fog_density;
        if diff != 0.0 {
            self.fog_density += diff * (dt * FOG_EASE_RATE).min(1.0);
        }
        changed
    }

    pub fn set_weather(&mut self, weather: Weather) {
        log::debug!("weather -> {:?}", weather);
        self.current = weather;
        self.target_fog_density = weather.fog_density();
    }

    /// Current fog density, never below the clear-sky floor
    pub fn fog_density(&self) -> f32 {
        self.fog_density.max(MIN_FOG_DENSITY)
    }

    pub fn is_raining(&self) -> bool {
        self.current == Weather::Rain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_phase_boundaries() {
        let mut cycle = DayNightCycle::default();
        assert_eq!(cycle.phase(), TimeOfDay::Day);
        cycle.set_phase(TimeOfDay::Dawn);
        assert_eq!(cycle.phase(), TimeOfDay::Dawn);
        assert_eq!(cycle.blend(), 0.0);
        cycle.update(74.9);
        assert_eq!(cycle.phase(), TimeOfDay::Dawn);
        cycle.update(0.2);
        assert_eq!(cycle.phase(), TimeOfDay::Day);
        cycle.set_phase(TimeOfDay::Night);
        assert_eq!(cycle.visibility_multiplier(), 0.75);
        cycle.update(75.0);
        // Wrapped back to dawn
        assert_eq!(cycle.phase(), TimeOfDay::Dawn);
        assert_eq!(cycle.visibility_multiplier(), 0.8);
    }

    #[test]
    fn test_ambient_blends_from_previous_phase() {
        let mut cycle = DayNightCycle::default();
        cycle.set_phase(TimeOfDay::Day);
        assert!((cycle.ambient_intensity() - 0.4).abs() < 1e-6);
        cycle.update(37.5);
        assert!((cycle.ambient_intensity() - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_disabled_cycle_holds() {
        let mut cycle = DayNightCycle::default();
        cycle.enabled = false;
        cycle.update(200.0);
        assert_eq!(cycle.phase(), TimeOfDay::Day);
    }

    #[test]
    fn test_first_weather_change_after_a_minute() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut weather = WeatherSystem::default();
        for _ in 0..599 {
            assert!(weather.update(0.1, &mut rng).is_none());
        }
        assert!(weather.update(0.2, &mut rng).is_some());
    }

    #[test]
    fn test_disabled_weather_never_changes() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut weather = WeatherSystem::new(false);
        for _ in 0..3000 {
            assert!(weather.update(0.1, &mut rng).is_none());
        }
        assert_eq!(weather.current, Weather::Clear);
    }

    #[test]
    fn test_fog_eases_toward_target() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut weather = WeatherSystem::default();
        weather.set_weather(Weather::Fog);
        let mut last = weather.fog_density();
        for _ in 0..20 {
            weather.update(0.1, &mut rng);
            let d = weather.fog_density();
            assert!(d > last && d < 0.04);
            last = d;
        }
        // 1 - 0.95^20 of the way there
        let expected = 0.005 + 0.035 * (1.0 - 0.95f32.powi(20));
        assert!((last - expected).abs() < 1e-4);
    }
}
