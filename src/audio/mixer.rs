// Audio mixer - combines the five channel outputs into one sample
//
// Uses the linear approximation of the hardware's non-linear mixing
// network:
//
// ```text
// output = 0.00752*(pulse1 + pulse2)
//        + 0.00851*triangle + 0.00494*noise + 0.00335*dmc
// ```
//
// followed by a first-order high-pass filter to strip the DC offset the
// DMC level introduces.

/// Pulse channel weight
const PULSE_WEIGHT: f32 = 0.00752;

/// Triangle channel weight
const TRIANGLE_WEIGHT: f32 = 0.00851;

/// Noise channel weight
const NOISE_WEIGHT: f32 = 0.00494;

/// DMC channel weight
const DMC_WEIGHT: f32 = 0.00335;

/// APU mixer with a master volume control
pub struct Mixer {
    /// 0.0 = mute, 1.0 = full volume
    volume: f32,
}

impl Mixer {
    pub fn new() -> Self {
        Self { volume: 1.0 }
    }

    pub fn with_volume(volume: f32) -> Self {
        Self {
            volume: volume.clamp(0.0, 1.0),
        }
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Combine the raw channel outputs into one sample
    ///
    /// Inputs are the channels' native ranges (0-15, DMC 0-127); the
    /// result lands in roughly [0.0, 1.0] before the high-pass filter
    /// recenters it.
    pub fn mix(&self, pulse1: u8, pulse2: u8, triangle: u8, noise: u8, dmc: u8) -> f32 {
        let pulse_out = PULSE_WEIGHT * (pulse1 + pulse2) as f32;
        let tnd_out = TRIANGLE_WEIGHT * triangle as f32
            + NOISE_WEIGHT * noise as f32
            + DMC_WEIGHT * dmc as f32;

        (pulse_out + tnd_out) * self.volume
    }
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new()
    }
}

/// First-order high-pass filter (RC form)
///
/// `y[n] = alpha * (y[n-1] + x[n] - x[n-1])` with alpha close to 1;
/// removes the DC component without touching the audible band much.
pub struct HighPassFilter {
    alpha: f32,
    prev_input: f32,
    prev_output: f32,
}

impl HighPassFilter {
    /// The default coefficient used by the APU output path
    pub const DEFAULT_ALPHA: f32 = 0.996;

    pub fn new() -> Self {
        Self::with_alpha(Self::DEFAULT_ALPHA)
    }

    pub fn with_alpha(alpha: f32) -> Self {
        Self {
            alpha,
            prev_input: 0.0,
            prev_output: 0.0,
        }
    }

    /// Filter one sample
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.alpha * (self.prev_output + input - self.prev_input);
        self.prev_input = input;
        self.prev_output = output;
        output
    }

    pub fn reset(&mut self) {
        self.prev_input = 0.0;
        self.prev_output = 0.0;
    }
}

impl Default for HighPassFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silence_mixes_to_zero() {
        let mixer = Mixer::new();
        assert_eq!(mixer.mix(0, 0, 0, 0, 0), 0.0);
    }

    #[test]
    fn test_mix_weights() {
        let mixer = Mixer::new();

        let pulses = mixer.mix(15, 15, 0, 0, 0);
        assert!((pulses - 0.00752 * 30.0).abs() < 1e-6);

        let triangle = mixer.mix(0, 0, 15, 0, 0);
        assert!((triangle - 0.00851 * 15.0).abs() < 1e-6);

        let dmc = mixer.mix(0, 0, 0, 0, 127);
        assert!((dmc - 0.00335 * 127.0).abs() < 1e-6);
    }

    #[test]
    fn test_volume_scales_output() {
        let mixer = Mixer::with_volume(0.5);
        let full = Mixer::new().mix(15, 15, 15, 15, 127);
        assert!((mixer.mix(15, 15, 15, 15, 127) - full * 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_volume_clamped() {
        assert_eq!(Mixer::with_volume(2.0).volume(), 1.0);
        assert_eq!(Mixer::with_volume(-1.0).volume(), 0.0);
    }

    #[test]
    fn test_high_pass_removes_dc() {
        let mut filter = HighPassFilter::new();

        // A constant input decays toward zero output
        let mut last = f32::MAX;
        for _ in 0..10_000 {
            last = filter.process(0.5);
        }
        assert!(last.abs() < 0.01, "DC component filtered out");
    }

    #[test]
    fn test_high_pass_passes_transitions() {
        let mut filter = HighPassFilter::new();
        filter.process(0.0);
        let jump = filter.process(1.0);
        assert!(jump > 0.9, "a step passes through nearly unattenuated");
    }
}
