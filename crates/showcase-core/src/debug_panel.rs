//! Debug panel model: five numeric controls bound to an entity's uniforms.
//!
//! The web frontend mirrors this as DOM inputs. Writes go through the same
//! clamp-then-snap rule a slider applies, so a value set from the panel can
//! never leave the control's range.

use crate::constants::{PANEL_TITLE, PANEL_WIDTH_PX};
use crate::uniforms::{ParticleUniforms, UniformField};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamSpec {
    pub field: UniformField,
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl ParamSpec {
    pub const fn new(field: UniformField, min: f32, max: f32, step: f32) -> Self {
        Self {
            field,
            min,
            max,
            step,
        }
    }

    #[inline]
    pub fn label(&self) -> &'static str {
        self.field.uniform_name()
    }

    /// Clamp into [min, max], then snap to the step grid.
    pub fn quantize(&self, value: f32) -> f32 {
        if !value.is_finite() {
            return self.min.max(0.0).min(self.max);
        }
        let clamped = value.clamp(self.min, self.max);
        if self.step <= 0.0 {
            return clamped;
        }
        let snapped = (clamped / self.step).round() * self.step;
        // snapping can nudge past a bound that is not a multiple of step
        snapped.clamp(self.min, self.max)
    }
}

pub const PANEL_PARAMS: [ParamSpec; 5] = [
    ParamSpec::new(UniformField::Scale, -5.0, 5.0, 0.001),
    ParamSpec::new(UniformField::Amplitude, -50.0, 50.0, 0.001),
    ParamSpec::new(UniformField::Frequency, -50.0, 50.0, 0.001),
    ParamSpec::new(UniformField::TimeFrequency, -50.0, 50.0, 1.0),
    ParamSpec::new(UniformField::RandomFrequency, -1.0, 1.0, 0.001),
];

pub fn spec_for(field: UniformField) -> &'static ParamSpec {
    // PANEL_PARAMS covers every UniformField variant in declaration order
    &PANEL_PARAMS[field as usize]
}

/// Panel owned by one entity for its whole lifetime.
#[derive(Clone, Debug, PartialEq)]
pub struct DebugPanel {
    pub title: &'static str,
    pub width_px: u32,
    visible: bool,
    values: [f32; 5],
}

impl DebugPanel {
    pub fn new(uniforms: &ParticleUniforms) -> Self {
        let mut panel = Self {
            title: PANEL_TITLE,
            width_px: PANEL_WIDTH_PX,
            visible: false,
            values: [0.0; 5],
        };
        panel.sync_from(uniforms);
        panel
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Refresh displayed values from the uniforms (clamped to each control).
    pub fn sync_from(&mut self, uniforms: &ParticleUniforms) {
        for (slot, spec) in self.values.iter_mut().zip(PANEL_PARAMS.iter()) {
            *slot = spec.quantize(uniforms.get(spec.field));
        }
    }

    /// Write a user-entered value through the control's clamp into the uniforms.
    /// Returns the value actually stored.
    pub fn apply(&mut self, field: UniformField, raw: f32, uniforms: &mut ParticleUniforms) -> f32 {
        let value = spec_for(field).quantize(raw);
        uniforms.set(field, value);
        self.values[field as usize] = value;
        value
    }

    #[inline]
    pub fn value(&self, field: UniformField) -> f32 {
        self.values[field as usize]
    }

    pub fn controls(&self) -> impl Iterator<Item = (&'static ParamSpec, f32)> + '_ {
        PANEL_PARAMS.iter().zip(self.values.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    #[test]
    fn params_are_indexed_by_field() {
        for field in UniformField::ALL {
            assert_eq!(spec_for(field).field, field);
        }
    }

    #[test]
    fn quantize_clamps_and_snaps() {
        let scale = spec_for(UniformField::Scale);
        assert_eq!(scale.quantize(12.0), 5.0);
        assert_eq!(scale.quantize(-7.5), -5.0);
        assert!((scale.quantize(0.12345) - 0.123).abs() < 1e-6);
        let tf = spec_for(UniformField::TimeFrequency);
        assert_eq!(tf.quantize(4.6), 5.0);
        assert_eq!(tf.quantize(f32::NAN), 0.0);
    }

    #[test]
    fn apply_writes_clamped_value_into_uniforms() {
        let mut uniforms = ParticleUniforms::new(Rgb::BLACK, Rgb::BLACK);
        let mut panel = DebugPanel::new(&uniforms);
        let stored = panel.apply(UniformField::RandomFrequency, 3.0, &mut uniforms);
        assert_eq!(stored, 1.0);
        assert_eq!(uniforms.random_frequency, 1.0);
        assert_eq!(panel.value(UniformField::RandomFrequency), 1.0);
    }

    #[test]
    fn sync_reports_defaults() {
        let uniforms = ParticleUniforms::new(Rgb::BLACK, Rgb::BLACK);
        let panel = DebugPanel::new(&uniforms);
        assert_eq!(panel.value(UniformField::Amplitude), 8.0);
        assert_eq!(panel.value(UniformField::TimeFrequency), 5.0);
        assert!((panel.value(UniformField::RandomFrequency) - 0.01).abs() < 1e-6);
        assert_eq!(panel.controls().count(), 5);
        assert!(!panel.is_visible());
    }
}
