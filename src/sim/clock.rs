//! Frame timing and time-control effects
//!
//! Raw wall-clock deltas are capped before anything else sees them, then
//! the time-control layer applies slow motion (scales the game delta) and
//! screen shake (perturbs the camera only).

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::{MAX_FRAME_DELTA, SLOW_MO_DURATION, SLOW_MO_SCALE};
use crate::lerp;

/// Caps raw frame deltas to a hard ceiling
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    pub max_delta: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            max_delta: MAX_FRAME_DELTA,
        }
    }
}

impl FrameClock {
    pub fn new(max_delta: f32) -> Self {
        Self { max_delta }
    }

    /// Clamp a raw delta into `[0, max_delta]`. NaN maps to zero.
    pub fn cap(&self, raw_delta: f32) -> f32 {
        if raw_delta.is_nan() || raw_delta <= 0.0 {
            return 0.0;
        }
        raw_delta.min(self.max_delta)
    }
}

/// Quadratic ease-out
#[inline]
pub fn ease_out_quad(t: f32) -> f32 {
    1.0 - (1.0 - t) * (1.0 - t)
}

#[derive(Debug, Clone, Copy, Default)]
struct Shake {
    intensity: f32,
    duration: f32,
    elapsed: f32,
    active: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct SlowMo {
    scale: f32,
    duration: f32,
    elapsed: f32,
    active: bool,
}

/// Slow motion and screen shake
///
/// Both effects are independent one-shots and may run at the same time.
/// A new `shake` replaces the running one. A new `trigger_slow_mo` while
/// one is active restarts it from the target scale.
#[derive(Debug, Clone)]
pub struct TimeControl {
    shake: Shake,
    slow_mo: SlowMo,
    /// Current camera perturbation (zero when not shaking)
    offset: Vec3,
    /// Settings may turn shake off (reduced motion)
    pub shake_enabled: bool,
}

impl Default for TimeControl {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeControl {
    pub fn new() -> Self {
        Self {
            shake: Shake::default(),
            slow_mo: SlowMo::default(),
            offset: Vec3::ZERO,
            shake_enabled: true,
        }
    }

    /// Start a linearly decaying camera shake
    pub fn shake(&mut self, intensity: f32, duration: f32) {
        if !self.shake_enabled || duration <= 0.0 {
            return;
        }
        self.shake = Shake {
            intensity,
            duration,
            elapsed: 0.0,
            active: true,
        };
    }

    /// Start the default slow-motion effect (0.2x easing back over 2s)
    pub fn trigger_slow_mo(&mut self) {
        self.trigger_slow_mo_with(SLOW_MO_SCALE, SLOW_MO_DURATION);
    }

    pub fn trigger_slow_mo_with(&mut self, scale: f32, duration: f32) {
        if duration <= 0.0 {
            return;
        }
        self.slow_mo = SlowMo {
            scale,
            duration,
            elapsed: 0.0,
            active: true,
        };
    }

    pub fn is_shaking(&self) -> bool {
        self.shake.active
    }

    pub fn is_slow_mo(&self) -> bool {
        self.slow_mo.active
    }

    /// Current time scale (1.0 when slow motion is idle)
    pub fn time_scale(&self) -> f32 {
        if !self.slow_mo.active || self.slow_mo.elapsed >= self.slow_mo.duration {
            return 1.0;
        }
        let progress = self.slow_mo.elapsed / self.slow_mo.duration;
        lerp(self.slow_mo.scale, 1.0, ease_out_quad(progress))
    }

    /// Camera perturbation for this frame
    pub fn camera_offset(&self) -> Vec3 {
        self.offset
    }

    /// Advance both effects by a real (capped, unscaled) delta and return
    /// the game delta for this frame.
    ///
    /// The scale is sampled at the start of the frame, so the first frame
    /// after a trigger runs at exactly the target scale.
    pub fn update(&mut self, real_delta: f32, rng: &mut Pcg32) -> f32 {
        self.update_shake(real_delta, rng);

        if !self.slow_mo.active {
            return real_delta;
        }
        if self.slow_mo.elapsed >= self.slow_mo.duration {
            self.slow_mo.active = false;
            return real_delta;
        }
        let scale = self.time_scale();
        self.slow_mo.elapsed += real_delta;
        real_delta * scale
    }

    fn update_shake(&mut self, delta: f32, rng: &mut Pcg32) {
        if !self.shake.active {
            self.offset = Vec3::ZERO;
            return;
        }
        self.shake.elapsed += delta;
        if self.shake.elapsed >= self.shake.duration {
            self.shake.active = false;
            self.offset = Vec3::ZERO;
            return;
        }
        let progress = self.shake.elapsed / self.shake.duration;
        let amplitude = self.shake.intensity * (1.0 - progress);
        self.offset = Vec3::new(
            (rng.random::<f32>() - 0.5) * amplitude,
            (rng.random::<f32>() - 0.5) * amplitude,
            (rng.random::<f32>() - 0.5) * amplitude,
        );
    }

    /// Drop any running effects (level load)
    pub fn reset(&mut self) {
        self.shake = Shake::default();
        self.slow_mo = SlowMo::default();
        self.offset = Vec3::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn test_stall_is_capped() {
        let clock = FrameClock::default();
        assert!(clock.cap(5.0) <= 0.1);
        assert_eq!(clock.cap(0.016), 0.016);
        assert_eq!(clock.cap(-1.0), 0.0);
        assert_eq!(clock.cap(f32::NAN), 0.0);
    }

    #[test]
    fn test_shake_decays_to_zero_at_duration() {
        let mut rng = rng();
        let mut tc = TimeControl::new();
        tc.shake(0.4, 0.5);
        tc.update(0.25, &mut rng);
        assert!(tc.is_shaking());
        assert!(tc.camera_offset().abs().max_element() <= 0.4 * 0.5 * 0.5 + 1e-6);

        tc.update(0.25, &mut rng);
        assert!(!tc.is_shaking());
        assert_eq!(tc.camera_offset(), Vec3::ZERO);
    }

    #[test]
    fn test_shake_last_trigger_wins() {
        let mut rng = rng();
        let mut tc = TimeControl::new();
        tc.shake(1.0, 0.2);
        tc.update(0.15, &mut rng);
        tc.shake(0.1, 1.0);
        tc.update(0.15, &mut rng);
        // Still shaking under the second trigger, bounded by its intensity
        assert!(tc.is_shaking());
        assert!(tc.camera_offset().abs().max_element() <= 0.05 + 1e-6);
    }

    #[test]
    fn test_shake_disabled_is_ignored() {
        let mut tc = TimeControl::new();
        tc.shake_enabled = false;
        tc.shake(0.4, 0.5);
        assert!(!tc.is_shaking());
    }

    #[test]
    fn test_slow_mo_first_frame_and_recovery() {
        let mut rng = rng();
        let mut tc = TimeControl::new();
        tc.trigger_slow_mo_with(0.2, 2.0);

        let first = tc.update(0.016, &mut rng);
        assert!((first - 0.0032).abs() < 1e-7);

        // Run out the remaining duration
        let mut t = 0.016;
        while t < 2.0 {
            tc.update(0.05, &mut rng);
            t += 0.05;
        }
        let after = tc.update(0.016, &mut rng);
        assert_eq!(after, 0.016);
        assert!(!tc.is_slow_mo());
    }

    #[test]
    fn test_slow_mo_scale_is_monotonic() {
        let mut rng = rng();
        let mut tc = TimeControl::new();
        tc.trigger_slow_mo();
        let mut last = 0.0;
        for _ in 0..40 {
            let d = tc.update(0.05, &mut rng);
            assert!(d >= last - 1e-7);
            last = d;
        }
    }

    #[test]
    fn test_slow_mo_retrigger_restarts() {
        let mut rng = rng();
        let mut tc = TimeControl::new();
        tc.trigger_slow_mo();
        tc.update(1.0, &mut rng);
        tc.trigger_slow_mo();
        let d = tc.update(0.016, &mut rng);
        assert!((d - 0.016 * SLOW_MO_SCALE).abs() < 1e-7);
    }
}
