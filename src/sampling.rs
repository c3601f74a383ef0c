//! Non-linear random sampling.
//!
//! Two shaping primitives drive the sampling demo: a power transform on a
//! uniform deviate (biasing values toward the low or high end) and a Bézier
//! transfer curve whose control polygon remaps the uniform deviate through
//! an arbitrary monotone-ish curve.  Curve presets persist to a small TOML
//! options file.

use bevy::math::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Uniform deviate raised to `power`, in `[0, 1)`.
///
/// `power > 1` biases toward 0, `power < 1` biases toward 1, `power == 1`
/// is plain uniform.
pub fn power_sample<R: Rng>(rng: &mut R, power: f32) -> f32 {
    rng.gen::<f32>().powf(power)
}

/// Power-shaped sample mapped into `[min, max)`.
pub fn power_range<R: Rng>(rng: &mut R, min: f32, max: f32, power: f32) -> f32 {
    min + power_sample(rng, power) * (max - min)
}

/// A Bézier transfer curve over the unit square.
///
/// The control polygon is evaluated with De Casteljau's algorithm; sampling
/// draws a uniform parameter and returns the curve's y, clamped to `[0, 1]`.
/// Degenerate curves (fewer than two controls) fall back to uniform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BellCurve {
    /// Control points, expected inside the unit square.
    pub controls: Vec<[f32; 2]>,
}

impl Default for BellCurve {
    /// A gentle centre-weighted bell.
    fn default() -> Self {
        Self {
            controls: vec![[0.0, 0.0], [0.25, 0.4], [0.75, 0.6], [1.0, 1.0]],
        }
    }
}

impl BellCurve {
    /// Evaluate the curve at parameter `t` in `[0, 1]`.
    pub fn evaluate(&self, t: f32) -> Vec2 {
        let mut points: Vec<Vec2> = self
            .controls
            .iter()
            .map(|c| Vec2::new(c[0], c[1]))
            .collect();
        if points.is_empty() {
            return Vec2::new(t, t);
        }
        let t = t.clamp(0.0, 1.0);
        while points.len() > 1 {
            for i in 0..points.len() - 1 {
                points[i] = points[i].lerp(points[i + 1], t);
            }
            points.pop();
        }
        points[0]
    }

    /// Draw one curve-shaped sample in `[0, 1]`.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f32 {
        if self.controls.len() < 2 {
            return rng.gen::<f32>();
        }
        self.evaluate(rng.gen::<f32>()).y.clamp(0.0, 1.0)
    }
}

/// Named Bézier presets persisted alongside the bench options.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BellPresets {
    pub presets: Vec<NamedBellCurve>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NamedBellCurve {
    pub name: String,
    pub curve: BellCurve,
}

impl BellPresets {
    /// Load presets from `path`.  A missing file yields the empty preset
    /// list; a malformed file is an error.
    pub fn load(path: &Path) -> Result<Self, String> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => return Err(format!("failed to read {}: {err}", path.display())),
        };
        toml::from_str(&contents)
            .map_err(|err| format!("failed to parse {}: {err}", path.display()))
    }

    /// Write presets to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| format!("failed to create {}: {err}", parent.display()))?;
        }
        let serialized = toml::to_string_pretty(self)
            .map_err(|err| format!("failed to serialize presets: {err}"))?;
        std::fs::write(path, serialized)
            .map_err(|err| format!("failed to write {}: {err}", path.display()))
    }
}

/// Bin `samples` (each in `[0, 1]`) into `bins` equal-width counts.
pub fn histogram(samples: &[f32], bins: usize) -> Vec<usize> {
    let mut counts = vec![0usize; bins];
    if bins == 0 {
        return counts;
    }
    for &s in samples {
        let idx = ((s * bins as f32) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn power_one_is_uniformish() {
        let mut rng = StdRng::seed_from_u64(2);
        let samples: Vec<f32> = (0..10_000).map(|_| power_sample(&mut rng, 1.0)).collect();
        let mean = samples.iter().sum::<f32>() / samples.len() as f32;
        assert!((mean - 0.5).abs() < 0.02, "uniform mean drifted: {mean}");
    }

    #[test]
    fn high_power_biases_low() {
        let mut rng = StdRng::seed_from_u64(2);
        let samples: Vec<f32> = (0..10_000).map(|_| power_sample(&mut rng, 3.0)).collect();
        let hist = histogram(&samples, 4);
        assert!(
            hist[0] > hist[3] * 3,
            "x³ should pile up in the lowest quartile: {hist:?}"
        );
    }

    #[test]
    fn fractional_power_biases_high() {
        let mut rng = StdRng::seed_from_u64(2);
        let samples: Vec<f32> = (0..10_000)
            .map(|_| power_sample(&mut rng, 1.0 / 3.0))
            .collect();
        let hist = histogram(&samples, 4);
        assert!(hist[3] > hist[0] * 3, "x^⅓ should pile up high: {hist:?}");
    }

    #[test]
    fn power_range_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..1000 {
            let v = power_range(&mut rng, -5.0, 5.0, 2.0);
            assert!((-5.0..5.0).contains(&v));
        }
    }

    #[test]
    fn bezier_endpoints_are_first_and_last_controls() {
        let curve = BellCurve::default();
        assert!((curve.evaluate(0.0) - Vec2::new(0.0, 0.0)).length() < 1e-6);
        assert!((curve.evaluate(1.0) - Vec2::new(1.0, 1.0)).length() < 1e-6);
    }

    #[test]
    fn bezier_midpoint_of_straight_line_is_halfway() {
        let line = BellCurve {
            controls: vec![[0.0, 0.0], [1.0, 1.0]],
        };
        let mid = line.evaluate(0.5);
        assert!((mid - Vec2::new(0.5, 0.5)).length() < 1e-6);
    }

    #[test]
    fn bell_samples_stay_in_unit_interval() {
        let curve = BellCurve::default();
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..1000 {
            let s = curve.sample(&mut rng);
            assert!((0.0..=1.0).contains(&s));
        }
    }

    #[test]
    fn degenerate_curve_falls_back_to_uniform() {
        let curve = BellCurve { controls: vec![] };
        let mut rng = StdRng::seed_from_u64(4);
        let s = curve.sample(&mut rng);
        assert!((0.0..=1.0).contains(&s));
    }

    #[test]
    fn histogram_counts_every_sample_once() {
        let samples = vec![0.0, 0.1, 0.5, 0.99, 1.0];
        let hist = histogram(&samples, 10);
        assert_eq!(hist.iter().sum::<usize>(), samples.len());
        assert_eq!(hist[9], 2, "0.99 and 1.0 land in the top bin");
    }

    #[test]
    fn presets_roundtrip_through_toml_file() {
        let dir = std::env::temp_dir().join("regolith_test_presets");
        let path = dir.join("bell_presets.toml");
        let presets = BellPresets {
            presets: vec![NamedBellCurve {
                name: "ore-density".to_string(),
                curve: BellCurve::default(),
            }],
        };
        presets.save(&path).expect("save should succeed");
        let loaded = BellPresets::load(&path).expect("load should succeed");
        assert_eq!(loaded, presets);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_preset_file_yields_empty_list() {
        let path = std::env::temp_dir().join("regolith_no_such_presets.toml");
        let _ = std::fs::remove_file(&path);
        let loaded = BellPresets::load(&path).expect("missing file is not an error");
        assert!(loaded.presets.is_empty());
    }
}
