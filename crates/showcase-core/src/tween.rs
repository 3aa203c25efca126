//! Minimal property tweens.
//!
//! A tween owns only its destination and timing; the current value of the
//! animated property is passed in on every step. The start value is captured
//! the first time the tween runs past its delay, so a tween created while
//! another animation is still moving the property picks up from wherever that
//! animation left it.

use crate::color::Rgb;
use crate::easing::Ease;

pub trait Lerp: Copy {
    fn lerp_to(self, other: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    #[inline]
    fn lerp_to(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for Rgb {
    #[inline]
    fn lerp_to(self, other: Self, t: f32) -> Self {
        self.lerp(other, t)
    }
}

#[derive(Clone, Debug)]
pub struct Tween<T: Lerp> {
    target: T,
    from: Option<T>,
    delay: f32,
    duration: f32,
    ease: Ease,
    elapsed: f32,
    finished: bool,
}

impl<T: Lerp> Tween<T> {
    pub fn new(target: T, duration: f32, ease: Ease) -> Self {
        Self {
            target,
            from: None,
            delay: 0.0,
            duration: duration.max(0.0),
            ease,
            elapsed: 0.0,
            finished: false,
        }
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advance by `dt` seconds. Returns the value to write into the property,
    /// or `None` while the tween is still waiting out its delay or once it has
    /// already finished.
    pub fn step(&mut self, current: T, dt: f32) -> Option<T> {
        if self.finished {
            return None;
        }
        self.elapsed += dt.max(0.0);
        if self.elapsed < self.delay {
            return None;
        }
        let from = *self.from.get_or_insert(current);
        let progress = if self.duration <= 0.0 {
            1.0
        } else {
            ((self.elapsed - self.delay) / self.duration).min(1.0)
        };
        if progress >= 1.0 {
            self.finished = true;
            return Some(self.target);
        }
        Some(from.lerp_to(self.target, self.ease.apply(progress)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waits_for_delay_then_captures_current_value() {
        let mut tw = Tween::new(1.0_f32, 1.0, Ease::Linear).with_delay(0.3);
        assert_eq!(tw.step(0.0, 0.2), None);
        assert!(tw.from.is_none());
        // 0.1 s into the active window, starting from 0.5
        let v = tw.step(0.5, 0.2).unwrap();
        assert!((v - 0.55).abs() < 1e-5);
        assert!(tw.from.is_some());
    }

    #[test]
    fn lands_exactly_on_target_and_stops() {
        let mut tw = Tween::new(0.0_f32, 0.5, Ease::smooth());
        let mut value = 1.0;
        for _ in 0..40 {
            if let Some(v) = tw.step(value, 1.0 / 60.0) {
                value = v;
            }
        }
        assert!(tw.is_finished());
        assert_eq!(value, 0.0);
        assert_eq!(tw.step(value, 0.1), None);
    }

    #[test]
    fn zero_duration_completes_immediately() {
        let mut tw = Tween::new(3.0_f32, 0.0, Ease::Linear);
        assert_eq!(tw.step(1.0, 0.0), Some(3.0));
        assert!(tw.is_finished());
    }

    #[test]
    fn color_tween_reaches_target() {
        let from = Rgb::BLACK;
        let to = Rgb::new(1.0, 0.5, 0.25);
        let mut tw = Tween::new(to, 1.0, Ease::Linear);
        let mid = tw.step(from, 0.5).unwrap();
        assert!((mid.g - 0.25).abs() < 1e-6);
        assert_eq!(tw.step(mid, 0.5), Some(to));
    }
}
