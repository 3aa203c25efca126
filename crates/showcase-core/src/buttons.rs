//! Animated style of the trigger buttons: staggered intro and hover feedback.

use crate::constants::*;
use crate::easing::Ease;
use crate::tween::Tween;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ButtonStyle {
    pub offset_y_px: f32,
    pub opacity: f32,
    pub scale: f32,
}

impl ButtonStyle {
    pub const REST: ButtonStyle = ButtonStyle {
        offset_y_px: 0.0,
        opacity: 1.0,
        scale: 1.0,
    };

    /// CSS `transform` value for this style.
    pub fn css_transform(&self) -> String {
        format!(
            "translateY({:.2}px) scale({:.4})",
            self.offset_y_px, self.scale
        )
    }
}

#[derive(Clone, Debug)]
pub struct ButtonFx {
    style: ButtonStyle,
    offset: Option<Tween<f32>>,
    opacity: Option<Tween<f32>>,
    scale: Option<Tween<f32>>,
}

impl ButtonFx {
    /// Start the page-load intro for the button at `index`: it rises from
    /// below and fades in, each button a little after the previous one.
    pub fn intro(index: usize) -> Self {
        let ease = Ease::smooth();
        let delay = BUTTON_INTRO_DELAY_SEC + BUTTON_INTRO_STAGGER_SEC * index as f32;
        Self {
            style: ButtonStyle {
                offset_y_px: BUTTON_INTRO_OFFSET_PX,
                opacity: 0.0,
                scale: 1.0,
            },
            offset: Some(Tween::new(0.0, TRANSITION_DURATION_SEC, ease).with_delay(delay)),
            opacity: Some(Tween::new(1.0, TRANSITION_DURATION_SEC, ease).with_delay(delay)),
            scale: None,
        }
    }

    #[inline]
    pub fn style(&self) -> ButtonStyle {
        self.style
    }

    fn hover_to(&mut self, opacity: f32, scale: f32) {
        let ease = Ease::smooth();
        self.opacity = Some(Tween::new(opacity, BUTTON_HOVER_DURATION_SEC, ease));
        self.scale = Some(Tween::new(scale, BUTTON_HOVER_DURATION_SEC, ease));
    }

    pub fn pointer_enter(&mut self) {
        self.hover_to(BUTTON_HOVER_OPACITY, BUTTON_HOVER_SCALE);
    }

    pub fn pointer_leave(&mut self) {
        self.hover_to(1.0, 1.0);
    }

    /// Advance all running tweens. Returns whether the style changed.
    pub fn step(&mut self, dt: f32) -> bool {
        fn drive(slot: &mut Option<Tween<f32>>, value: &mut f32, dt: f32) -> bool {
            let Some(tw) = slot.as_mut() else {
                return false;
            };
            let changed = match tw.step(*value, dt) {
                Some(v) => {
                    *value = v;
                    true
                }
                None => false,
            };
            if tw.is_finished() {
                *slot = None;
            }
            changed
        }
        let a = drive(&mut self.offset, &mut self.style.offset_y_px, dt);
        let b = drive(&mut self.opacity, &mut self.style.opacity, dt);
        let c = drive(&mut self.scale, &mut self.style.scale, dt);
        a || b || c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(fx: &mut ButtonFx, secs: f32) {
        let dt = 1.0 / 60.0;
        let mut t = 0.0;
        while t < secs {
            fx.step(dt);
            t += dt;
        }
    }

    #[test]
    fn intro_is_staggered() {
        let mut first = ButtonFx::intro(0);
        let mut last = ButtonFx::intro(4);
        assert_eq!(first.style().opacity, 0.0);
        // 0.55 s: first button has started, fifth (delay 1.02 s) has not
        run(&mut first, 0.55);
        run(&mut last, 0.55);
        assert!(first.style().opacity > 0.0);
        assert_eq!(last.style().opacity, 0.0);
        assert_eq!(last.style().offset_y_px, BUTTON_INTRO_OFFSET_PX);
        run(&mut last, 2.0);
        assert_eq!(last.style(), ButtonStyle::REST);
        assert!(!last.step(0.1));
    }

    #[test]
    fn hover_dims_and_restores() {
        let mut fx = ButtonFx::intro(0);
        run(&mut fx, 2.0);
        fx.pointer_enter();
        run(&mut fx, 1.0);
        assert_eq!(fx.style().opacity, BUTTON_HOVER_OPACITY);
        assert_eq!(fx.style().scale, BUTTON_HOVER_SCALE);
        fx.pointer_leave();
        run(&mut fx, 1.0);
        assert_eq!(fx.style(), ButtonStyle::REST);
    }

    #[test]
    fn transform_is_css() {
        assert_eq!(
            ButtonStyle::REST.css_transform(),
            "translateY(0.00px) scale(1.0000)"
        );
    }
}
