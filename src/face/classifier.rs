use std::path::Path;

use tracing::{debug, warn};

use super::features::{self, FeatureStats, JAW_OPEN};
use super::model::{VowelInference, VowelModel};
use super::sample::FaceSample;
use super::vowel::{VocalTractParams, Vowel};
use super::window::ClassifierWindow;

pub const DEFAULT_WINDOW: usize = 9;
pub const NEUTRAL_TONGUE_POSITION: f32 = 0.5;
pub const NEUTRAL_TONGUE_DIAMETER: f32 = 1.0;

const MIN_TOTAL_WEIGHT: f32 = 1e-6;

/// Result of one classifier step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VowelFrame {
    pub params: VocalTractParams,
    /// Empty while the window is warming up or when no model is loaded.
    pub probabilities: Vec<(Vowel, f32)>,
    pub top: Option<(Vowel, f32)>,
}

#[derive(Debug)]
pub struct VowelClassifier {
    model: Option<Box<dyn VowelInference>>,
    stats: FeatureStats,
    window: ClassifierWindow,
    last_jaw_feature: f64,
}

impl Default for VowelClassifier {
    fn default() -> Self {
        Self::without_model()
    }
}

impl VowelClassifier {
    pub fn new(model: Box<dyn VowelInference>, stats: FeatureStats) -> Self {
        let window = ClassifierWindow::new(model.window_len());
        Self {
            model: Some(model),
            stats,
            window,
            last_jaw_feature: 0.0,
        }
    }

    /// A classifier that always takes the neutral fallback blend.
    pub fn without_model() -> Self {
        Self {
            model: None,
            stats: FeatureStats::identity(),
            window: ClassifierWindow::new(DEFAULT_WINDOW),
            last_jaw_feature: 0.0,
        }
    }

    /// Load model and stats assets. Any failure is logged and leaves the
    /// classifier running without a model.
    pub fn load(model_path: Option<&Path>, stats_path: Option<&Path>) -> Self {
        let stats = match stats_path {
            Some(path) => FeatureStats::load(path).unwrap_or_else(|err| {
                warn!(path = %path.display(), error = %err, "feature stats unavailable; using identity");
                FeatureStats::identity()
            }),
            None => FeatureStats::identity(),
        };
        let Some(path) = model_path else {
            debug!("no vowel model configured");
            return Self {
                stats,
                ..Self::without_model()
            };
        };
        match VowelModel::load(path) {
            Ok(model) => {
                debug!(
                    path = %path.display(),
                    window = model.window_len(),
                    labels = model.labels().len(),
                    "vowel model loaded"
                );
                Self::new(Box::new(model), stats)
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "vowel model unavailable; vowel blend disabled");
                Self {
                    stats,
                    ..Self::without_model()
                }
            }
        }
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    pub fn window(&self) -> &ClassifierWindow {
        &self.window
    }

    pub fn process(&mut self, sample: &FaceSample) -> VowelFrame {
        let normalized = self.stats.normalize(&features::extract(sample));
        self.last_jaw_feature = normalized[JAW_OPEN];
        self.window.push(normalized);

        let probabilities = match &self.model {
            Some(model) if self.window.is_full() => model
                .infer(&self.window)
                .into_iter()
                .filter_map(|(label, p)| Vowel::from_label(&label).map(|v| (v, p)))
                .collect(),
            _ => Vec::new(),
        };

        let params = blend_vocal_tract_params(
            &probabilities,
            self.last_jaw_feature,
            sample.blendshapes.jaw_open,
        );
        let top = probabilities
            .iter()
            .copied()
            .filter(|(_, p)| p.is_finite())
            .max_by(|a, b| a.1.total_cmp(&b.1));

        VowelFrame {
            params,
            probabilities,
            top,
        }
    }

    pub fn reset(&mut self) {
        self.window.clear();
        self.last_jaw_feature = 0.0;
    }
}

/// Weighted average of vowel presets. `Silent` mass is left out; with no
/// usable weight the tongue sits at its neutral pose and the lips follow the
/// normalized jaw feature.
pub fn blend_vocal_tract_params(
    probabilities: &[(Vowel, f32)],
    last_jaw_feature: f64,
    raw_jaw_open: f32,
) -> VocalTractParams {
    let mut tp = 0.0f32;
    let mut td = 0.0f32;
    let mut lo = 0.0f32;
    let mut total = 0.0f32;

    for &(vowel, p) in probabilities {
        if vowel == Vowel::Silent {
            continue;
        }
        let weight = if p.is_finite() { p.max(0.0) } else { 0.0 };
        if weight == 0.0 {
            continue;
        }
        let preset = vowel.preset();
        tp += preset.tongue_position * weight;
        td += preset.tongue_diameter * weight;
        lo += preset.lip_open * weight;
        total += weight;
    }

    if total < MIN_TOTAL_WEIGHT {
        let lip = if last_jaw_feature.is_finite() {
            last_jaw_feature.clamp(0.0, 1.0) as f32
        } else {
            0.0
        };
        return VocalTractParams {
            tongue_position: NEUTRAL_TONGUE_POSITION,
            tongue_diameter: NEUTRAL_TONGUE_DIAMETER,
            lip_open: lip,
            jaw_open: raw_jaw_open,
        };
    }

    VocalTractParams {
        tongue_position: tp / total,
        tongue_diameter: td / total,
        lip_open: lo / total,
        jaw_open: raw_jaw_open,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face::features::FEATURE_COUNT;

    /// Always answers with a fixed distribution once the window is full.
    #[derive(Debug)]
    struct FixedInference {
        window: usize,
        output: Vec<(String, f32)>,
    }

    impl VowelInference for FixedInference {
        fn window_len(&self) -> usize {
            self.window
        }

        fn infer(&self, window: &ClassifierWindow) -> Vec<(String, f32)> {
            assert_eq!(window.len(), self.window);
            self.output.clone()
        }
    }

    fn sample_with_jaw(jaw: f32) -> FaceSample {
        let mut sample = FaceSample::default();
        sample.blendshapes.jaw_open = jaw;
        sample
    }

    #[test]
    fn fallback_without_model_is_deterministic() {
        let mut classifier = VowelClassifier::without_model();
        let first = classifier.process(&sample_with_jaw(0.3));
        let second = classifier.process(&sample_with_jaw(0.3));
        assert_eq!(first, second);
        assert!(first.probabilities.is_empty());
        assert_eq!(first.params.tongue_position, NEUTRAL_TONGUE_POSITION);
        assert_eq!(first.params.tongue_diameter, NEUTRAL_TONGUE_DIAMETER);
        assert!((first.params.lip_open - 0.3).abs() < 1e-6);
        assert_eq!(first.params.jaw_open, 0.3);
    }

    #[test]
    fn fallback_lip_is_clamped() {
        let params = blend_vocal_tract_params(&[], 3.5, 0.9);
        assert_eq!(params.lip_open, 1.0);
        let params = blend_vocal_tract_params(&[], -2.0, 0.1);
        assert_eq!(params.lip_open, 0.0);
        assert_eq!(params.jaw_open, 0.1);
    }

    #[test]
    fn single_vowel_reproduces_preset() {
        let params = blend_vocal_tract_params(&[(Vowel::I, 1.0)], 0.0, 0.2);
        let preset = Vowel::I.preset();
        assert_eq!(params.tongue_position, preset.tongue_position);
        assert_eq!(params.tongue_diameter, preset.tongue_diameter);
        assert_eq!(params.lip_open, preset.lip_open);
    }

    #[test]
    fn silent_mass_is_excluded() {
        let with_silence =
            blend_vocal_tract_params(&[(Vowel::A, 0.2), (Vowel::Silent, 0.8)], 0.0, 0.0);
        let without = blend_vocal_tract_params(&[(Vowel::A, 1.0)], 0.0, 0.0);
        assert!((with_silence.tongue_position - without.tongue_position).abs() < 1e-6);
        assert!((with_silence.lip_open - without.lip_open).abs() < 1e-6);
    }

    #[test]
    fn negative_and_nan_weights_are_ignored() {
        let params = blend_vocal_tract_params(
            &[(Vowel::U, -1.0), (Vowel::O, f32::NAN), (Vowel::Silent, 1.0)],
            0.5,
            0.0,
        );
        assert_eq!(params.tongue_position, NEUTRAL_TONGUE_POSITION);
        assert_eq!(params.lip_open, 0.5);
    }

    #[test]
    fn warm_up_then_inference() {
        let model = FixedInference {
            window: 3,
            output: vec![
                ("a".into(), 0.5),
                ("u".into(), 0.5),
                ("???".into(), 0.9),
            ],
        };
        let mut classifier = VowelClassifier::new(Box::new(model), FeatureStats::identity());
        assert!(classifier.has_model());

        for _ in 0..2 {
            let frame = classifier.process(&sample_with_jaw(0.4));
            assert!(frame.probabilities.is_empty());
            assert!(frame.top.is_none());
        }
        let frame = classifier.process(&sample_with_jaw(0.4));
        assert_eq!(frame.probabilities.len(), 2);
        let a = Vowel::A.preset();
        let u = Vowel::U.preset();
        let expected = (a.tongue_position + u.tongue_position) / 2.0;
        assert!((frame.params.tongue_position - expected).abs() < 1e-6);
        assert!(frame.top.is_some());

        classifier.reset();
        assert!(classifier.window().is_empty());
    }

    #[test]
    fn stats_normalize_the_jaw_fallback() {
        let mut stats = FeatureStats::identity();
        stats.mean[JAW_OPEN] = 0.2;
        stats.std[JAW_OPEN] = 0.5;
        let model = FixedInference {
            window: 1,
            output: vec![("none".into(), 1.0)],
        };
        let mut classifier = VowelClassifier::new(Box::new(model), stats);
        let frame = classifier.process(&sample_with_jaw(0.45));
        assert!((frame.params.lip_open - 0.5).abs() < 1e-6);
        assert_eq!(frame.top, Some((Vowel::Silent, 1.0)));
        assert_eq!(classifier.window().latest().map(|f| f.len()), Some(FEATURE_COUNT));
    }

    #[test]
    fn missing_assets_fall_back() {
        let classifier = VowelClassifier::load(
            Some(Path::new("/nonexistent/facechoir/model.json")),
            Some(Path::new("/nonexistent/facechoir/stats.json")),
        );
        assert!(!classifier.has_model());
    }
}
