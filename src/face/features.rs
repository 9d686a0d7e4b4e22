use std::path::Path;

use serde::{Deserialize, Serialize};

use super::model::ModelError;
use super::sample::FaceSample;

pub const FEATURE_COUNT: usize = 11;
pub const JAW_OPEN: usize = 0;

pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "jawOpen",
    "jawForward",
    "mouthFunnel",
    "mouthPucker",
    "mouthClose",
    "tongueOut",
    "mouthSmile",
    "mouthFrown",
    "mouthStretch",
    "mouthLowerDown",
    "mouthUpperUp",
];

pub type FeatureVector = [f64; FEATURE_COUNT];

/// Mouth-shape features in [`FEATURE_NAMES`] order. Left/right pairs are
/// averaged; head orientation is deliberately left out.
pub fn extract(sample: &FaceSample) -> FeatureVector {
    let b = &sample.blendshapes;
    let avg = |l: f32, r: f32| (l as f64 + r as f64) * 0.5;
    [
        b.jaw_open as f64,
        b.jaw_forward as f64,
        b.mouth_funnel as f64,
        b.mouth_pucker as f64,
        b.mouth_close as f64,
        b.tongue_out as f64,
        avg(b.mouth_smile_left, b.mouth_smile_right),
        avg(b.mouth_frown_left, b.mouth_frown_right),
        avg(b.mouth_stretch_left, b.mouth_stretch_right),
        avg(b.mouth_lower_down_left, b.mouth_lower_down_right),
        avg(b.mouth_upper_up_left, b.mouth_upper_up_right),
    ]
}

/// Per-feature z-score statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureStats {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

impl Default for FeatureStats {
    fn default() -> Self {
        Self::identity()
    }
}

impl FeatureStats {
    pub fn identity() -> Self {
        Self {
            mean: vec![0.0; FEATURE_COUNT],
            std: vec![1.0; FEATURE_COUNT],
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self, ModelError> {
        let stats: Self = serde_json::from_str(text)?;
        stats.validate()?;
        Ok(stats)
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let text = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.mean.len() != FEATURE_COUNT || self.std.len() != FEATURE_COUNT {
            return Err(ModelError::Shape(format!(
                "feature stats need {FEATURE_COUNT} means and stds, got {} and {}",
                self.mean.len(),
                self.std.len()
            )));
        }
        Ok(())
    }

    /// `(x - mean) / std`; a zero or non-finite std leaves the feature as-is.
    pub fn normalize(&self, features: &FeatureVector) -> FeatureVector {
        let mut out = *features;
        for (i, x) in out.iter_mut().enumerate() {
            let (Some(&mean), Some(&std)) = (self.mean.get(i), self.std.get(i)) else {
                continue;
            };
            if std == 0.0 || !std.is_finite() || !mean.is_finite() {
                continue;
            }
            *x = (*x - mean) / std;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face::sample::Blendshapes;

    #[test]
    fn pairs_are_averaged_in_order() {
        let sample = FaceSample {
            blendshapes: Blendshapes {
                jaw_open: 0.5,
                mouth_smile_left: 0.2,
                mouth_smile_right: 0.4,
                mouth_upper_up_left: 1.0,
                tongue_out: 0.25,
                ..Default::default()
            },
            ..Default::default()
        };
        let f = extract(&sample);
        assert_eq!(f[JAW_OPEN], 0.5);
        assert!((f[6] - 0.3).abs() < 1e-6);
        assert_eq!(f[5], 0.25);
        assert_eq!(f[10], 0.5);
    }

    #[test]
    fn zero_std_is_identity() {
        let mut stats = FeatureStats::identity();
        stats.mean[0] = 0.2;
        stats.std[0] = 0.0;
        stats.mean[1] = 0.5;
        stats.std[1] = 0.25;
        let mut f = [0.0; FEATURE_COUNT];
        f[0] = 0.7;
        f[1] = 1.0;
        let n = stats.normalize(&f);
        assert_eq!(n[0], 0.7);
        assert_eq!(n[1], 2.0);
    }

    #[test]
    fn stats_reject_wrong_length() {
        let err = FeatureStats::from_json_str(r#"{"mean":[0.0],"std":[1.0]}"#)
            .expect_err("short stats must fail");
        assert!(matches!(err, ModelError::Shape(_)));
    }

    #[test]
    fn stats_parse_from_json() {
        let text = serde_json::to_string(&FeatureStats::identity()).expect("serialize");
        let stats = FeatureStats::from_json_str(&text).expect("parse stats");
        assert_eq!(stats, FeatureStats::identity());
    }
}
