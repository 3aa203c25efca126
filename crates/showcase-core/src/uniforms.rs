use crate::color::Rgb;
use crate::constants::*;

/// Shader inputs of one particle cloud.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleUniforms {
    pub time: f32,
    pub scale: f32,
    pub amplitude: f32,
    pub frequency: f32,
    pub time_frequency: f32,
    pub random_frequency: f32,
    pub alpha: f32,
    pub colour1: Rgb,
    pub colour2: Rgb,
}

impl ParticleUniforms {
    pub fn new(colour1: Rgb, colour2: Rgb) -> Self {
        Self {
            time: 0.0,
            // collapsed until the show transition grows it
            scale: 0.0,
            amplitude: DEFAULT_AMPLITUDE,
            frequency: DEFAULT_FREQUENCY,
            time_frequency: DEFAULT_TIME_FREQUENCY,
            random_frequency: DEFAULT_RANDOM_FREQUENCY,
            alpha: DEFAULT_ALPHA,
            colour1,
            colour2,
        }
    }

    pub fn get(&self, field: UniformField) -> f32 {
        match field {
            UniformField::Scale => self.scale,
            UniformField::Amplitude => self.amplitude,
            UniformField::Frequency => self.frequency,
            UniformField::TimeFrequency => self.time_frequency,
            UniformField::RandomFrequency => self.random_frequency,
        }
    }

    pub fn set(&mut self, field: UniformField, value: f32) {
        let slot = match field {
            UniformField::Scale => &mut self.scale,
            UniformField::Amplitude => &mut self.amplitude,
            UniformField::Frequency => &mut self.frequency,
            UniformField::TimeFrequency => &mut self.time_frequency,
            UniformField::RandomFrequency => &mut self.random_frequency,
        };
        *slot = value;
    }
}

/// Scalar uniforms that can be edited live from the debug panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UniformField {
    Scale,
    Amplitude,
    Frequency,
    TimeFrequency,
    RandomFrequency,
}

impl UniformField {
    pub const ALL: [UniformField; 5] = [
        UniformField::Scale,
        UniformField::Amplitude,
        UniformField::Frequency,
        UniformField::TimeFrequency,
        UniformField::RandomFrequency,
    ];

    /// Name of the uniform in the shader and label on the panel.
    pub fn uniform_name(self) -> &'static str {
        match self {
            UniformField::Scale => "uScale",
            UniformField::Amplitude => "uAmplitude",
            UniformField::Frequency => "uFrequency",
            UniformField::TimeFrequency => "uTimeFrequency",
            UniformField::RandomFrequency => "uRandomFrequency",
        }
    }
}
