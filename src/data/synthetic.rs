//! Deterministic synthetic absorbance spectra built from Gaussian bands.

use std::collections::BTreeMap;

use super::model::{MetadataValue, Spectrum};
use crate::error::SpectrumError;
use crate::rules::Label;

/// `(centre, sigma, amplitude)` of one absorption band.
pub type BandShape = (f64, f64, f64);

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Evenly spaced ascending axis from `lo` to `hi` inclusive.
pub fn wavenumber_axis(lo: f64, hi: f64, step: f64) -> Vec<f64> {
    if step <= 0.0 || hi < lo {
        return Vec::new();
    }
    let n = ((hi - lo) / step).round() as usize + 1;
    (0..n).map(|i| lo + i as f64 * step).collect()
}

/// The default mid-infrared axis: 600–4000 cm⁻¹ in 1 cm⁻¹ steps.
pub fn mid_infrared_axis() -> Vec<f64> {
    wavenumber_axis(600.0, 4000.0, 1.0)
}

/// Characteristic bands of each material. Blank has none.
pub fn reference_bands(label: Label) -> &'static [BandShape] {
    match label {
        Label::Blank => &[],
        Label::Ps => &[
            (3025.0, 6.0, 0.5),
            (2920.0, 8.0, 0.45),
            (1601.0, 5.0, 0.4),
            (1492.0, 5.0, 0.5),
            (1452.0, 5.0, 0.5),
            (756.0, 5.0, 0.6),
            (698.0, 5.0, 0.9),
        ],
        Label::Pp => &[
            (2950.0, 6.0, 0.6),
            (2917.0, 6.0, 0.5),
            (2867.0, 6.0, 0.35),
            (2838.0, 6.0, 0.3),
            (1456.0, 5.0, 0.4),
            (1376.0, 5.0, 0.35),
            (1166.0, 5.0, 0.2),
            (973.0, 5.0, 0.2),
        ],
        Label::Hdpe => &[
            (2915.0, 7.0, 0.8),
            (2848.0, 7.0, 0.6),
            (1465.0, 5.0, 0.35),
            (718.0, 4.0, 0.3),
        ],
        Label::Ldpe => &[
            (2915.0, 7.0, 0.4),
            (2848.0, 7.0, 0.3),
            (1465.0, 5.0, 0.3),
            (1377.0, 5.0, 0.1),
            (718.0, 4.0, 0.2),
        ],
        Label::Pu => &[
            (3320.0, 10.0, 0.35),
            (2935.0, 8.0, 0.4),
            (2865.0, 8.0, 0.3),
            (1730.0, 6.0, 0.7),
            (1530.0, 6.0, 0.5),
            (1220.0, 6.0, 0.6),
            (1075.0, 6.0, 0.5),
        ],
        Label::Pet => &[
            (1715.0, 6.0, 0.9),
            (1245.0, 8.0, 0.8),
            (1100.0, 6.0, 0.6),
            (1018.0, 5.0, 0.3),
            (725.0, 5.0, 0.6),
        ],
        Label::Pc => &[
            (2968.0, 6.0, 0.3),
            (1770.0, 6.0, 0.9),
            (1505.0, 5.0, 0.7),
            (1230.0, 8.0, 0.8),
            (1160.0, 6.0, 0.7),
            (830.0, 5.0, 0.4),
        ],
        Label::Polyester => &[(2930.0, 8.0, 0.3), (1725.0, 6.0, 0.7), (1160.0, 6.0, 0.5)],
        Label::Pvc => &[
            (2912.0, 8.0, 0.3),
            (1427.0, 5.0, 0.4),
            (1330.0, 5.0, 0.3),
            (1250.0, 6.0, 0.4),
            (1097.0, 6.0, 0.3),
            (690.0, 5.0, 0.8),
            (615.0, 5.0, 0.6),
        ],
    }
}

/// Sum of Gaussian bands plus optional Gaussian noise.
pub fn absorbance(axis: &[f64], bands: &[BandShape], noise_level: f64, rng: &mut SimpleRng) -> Vec<f64> {
    axis.iter()
        .map(|&wn| {
            let signal: f64 = bands
                .iter()
                .map(|&(mu, sigma, amp)| gaussian(wn, mu, sigma, amp))
                .sum();
            if noise_level > 0.0 {
                signal + rng.gauss(0.0, noise_level)
            } else {
                signal
            }
        })
        .collect()
}

/// A named spectrum of `label` over `axis`, scaled by `scale`.
pub fn material_spectrum(
    label: Label,
    axis: &[f64],
    scale: f64,
    noise_level: f64,
    rng: &mut SimpleRng,
) -> Result<Spectrum, SpectrumError> {
    let bands: Vec<BandShape> = reference_bands(label)
        .iter()
        .map(|&(mu, sigma, amp)| (mu, sigma, amp * scale))
        .collect();
    let y = absorbance(axis, &bands, noise_level, rng);

    let mut metadata = BTreeMap::new();
    metadata.insert("material".to_string(), MetadataValue::String(label.to_string()));
    metadata.insert("scale".to_string(), MetadataValue::Float(scale));

    Ok(Spectrum::new(axis.to_vec(), y)?
        .with_name(label.to_string())
        .with_metadata(metadata))
}

// ---------------------------------------------------------------------------
// Minimal deterministic PRNG (xoshiro256**)
// ---------------------------------------------------------------------------

pub struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    pub fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    pub fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_is_inclusive() {
        let axis = wavenumber_axis(600.0, 4000.0, 1.0);
        assert_eq!(axis.len(), 3401);
        assert_eq!(axis[axis.len() - 1], 4000.0);
    }

    #[test]
    fn rng_is_deterministic() {
        let (mut a, mut b) = (SimpleRng::new(7), SimpleRng::new(7));
        for _ in 0..10 {
            assert_eq!(a.next_f64(), b.next_f64());
        }
    }

    #[test]
    fn noiseless_band_peaks_at_its_centre() {
        let axis = mid_infrared_axis();
        let sp = material_spectrum(Label::Hdpe, &axis, 1.0, 0.0, &mut SimpleRng::new(1)).unwrap();
        let at = |wn: f64| sp.intensity()[(wn - 600.0) as usize];
        assert!((at(2915.0) - 0.8).abs() < 1e-12);
        assert!(at(2915.0) > at(2914.0) && at(2915.0) > at(2916.0));
        assert_eq!(sp.name(), Some("HDPE"));
    }
}
