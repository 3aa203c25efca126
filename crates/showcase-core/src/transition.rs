//! Show/hide timelines for a visual entity.
//!
//! Each timeline drives three properties concurrently: the scale uniform, the
//! cloud's X rotation and (for show) the page background. All tracks share
//! the scale track's start time.

use crate::color::Rgb;
use crate::config::TransitionConfig;
use crate::constants::FULL_TURN;
use crate::tween::Tween;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionKind {
    Show,
    Hide,
}

/// Values a timeline wants written this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TransitionStep {
    pub scale: Option<f32>,
    pub rotation_x: Option<f32>,
    pub background: Option<Rgb>,
    /// The scale track finished during this step.
    pub scale_completed: bool,
}

#[derive(Clone, Debug)]
pub struct Transition {
    kind: TransitionKind,
    scale: Tween<f32>,
    rotation: Tween<f32>,
    background: Option<Tween<Rgb>>,
}

impl Transition {
    /// Grow to full scale after the configured delay while spinning one turn
    /// and fading the page to `background`.
    pub fn show(cfg: &TransitionConfig, rotation_now: f32, background: Rgb) -> Self {
        let d = cfg.duration_sec;
        let delay = cfg.show_delay_sec;
        Self {
            kind: TransitionKind::Show,
            scale: Tween::new(1.0, d, cfg.ease).with_delay(delay),
            rotation: Tween::new(rotation_now + FULL_TURN, d, cfg.ease).with_delay(delay),
            background: Some(Tween::new(background, d, cfg.ease).with_delay(delay)),
        }
    }

    /// Collapse to zero scale while spinning one turn.
    pub fn hide(cfg: &TransitionConfig, rotation_now: f32) -> Self {
        let d = cfg.duration_sec;
        Self {
            kind: TransitionKind::Hide,
            scale: Tween::new(0.0, d, cfg.ease),
            rotation: Tween::new(rotation_now + FULL_TURN, d, cfg.ease),
            background: None,
        }
    }

    #[inline]
    pub fn kind(&self) -> TransitionKind {
        self.kind
    }

    pub fn is_finished(&self) -> bool {
        self.scale.is_finished()
            && self.rotation.is_finished()
            && self.background.as_ref().map_or(true, |b| b.is_finished())
    }

    pub fn step(&mut self, scale: f32, rotation_x: f32, background: Rgb, dt: f32) -> TransitionStep {
        let was_done = self.scale.is_finished();
        let scale = self.scale.step(scale, dt);
        let rotation_x = self.rotation.step(rotation_x, dt);
        let background = self
            .background
            .as_mut()
            .and_then(|b| b.step(background, dt));
        TransitionStep {
            scale,
            rotation_x,
            background,
            scale_completed: !was_done && self.scale.is_finished(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(t: &mut Transition, mut scale: f32, mut rot: f32, secs: f32) -> (f32, f32, bool) {
        let dt = 1.0 / 60.0;
        let mut completed = false;
        let mut elapsed = 0.0;
        while elapsed < secs {
            let s = t.step(scale, rot, Rgb::BLACK, dt);
            scale = s.scale.unwrap_or(scale);
            rot = s.rotation_x.unwrap_or(rot);
            completed |= s.scale_completed;
            elapsed += dt;
        }
        (scale, rot, completed)
    }

    #[test]
    fn show_waits_for_delay_then_reaches_full_scale_and_turn() {
        let cfg = TransitionConfig::default();
        let mut t = Transition::show(&cfg, 0.0, Rgb::new(1.0, 1.0, 1.0));
        let first = t.step(0.0, 0.0, Rgb::BLACK, 0.1);
        assert_eq!(first.scale, None);
        assert_eq!(first.background, None);
        let (scale, rot, completed) = run(&mut t, 0.0, 0.0, 1.6);
        assert_eq!(scale, 1.0);
        assert!((rot - FULL_TURN).abs() < 1e-6);
        assert!(completed);
        assert!(t.is_finished());
    }

    #[test]
    fn hide_collapses_without_touching_background() {
        let cfg = TransitionConfig::default();
        let mut t = Transition::hide(&cfg, 1.0);
        let s = t.step(1.0, 1.0, Rgb::BLACK, 0.1);
        assert!(s.scale.unwrap() < 1.0);
        assert_eq!(s.background, None);
        let (scale, _, completed) = run(&mut t, 1.0, 1.0, 1.3);
        assert_eq!(scale, 0.0);
        assert!(completed);
    }
}
