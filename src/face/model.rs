//! Vowel classifier network loaded from a JSON asset.
//!
//! A small fully connected network runs once per frame over the flattened
//! feature window and ends in a softmax over its labels. Layer weights are
//! row-major `[out][in]`. Shapes are checked at load time so inference never
//! indexes out of bounds.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::features::FEATURE_COUNT;
use super::window::ClassifierWindow;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse classifier asset: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid classifier asset: {0}")]
    Shape(String),
}

/// Anything that turns a full feature window into label probabilities.
pub trait VowelInference: Send + fmt::Debug {
    /// Number of frames the window must hold before `infer` is called.
    fn window_len(&self) -> usize;
    fn infer(&self, window: &ClassifierWindow) -> Vec<(String, f32)>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Relu,
    Tanh,
    #[default]
    Linear,
}

impl Activation {
    fn apply(self, x: f64) -> f64 {
        match self {
            Activation::Relu => x.max(0.0),
            Activation::Tanh => x.tanh(),
            Activation::Linear => x,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerAsset {
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
    #[serde(default)]
    pub activation: Activation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelAsset {
    pub window: usize,
    #[serde(default = "ModelAsset::default_features")]
    pub features: usize,
    pub labels: Vec<String>,
    pub layers: Vec<LayerAsset>,
}

impl ModelAsset {
    fn default_features() -> usize {
        FEATURE_COUNT
    }
}

#[derive(Debug, Clone)]
pub struct VowelModel {
    window: usize,
    labels: Vec<String>,
    layers: Vec<LayerAsset>,
}

impl VowelModel {
    pub fn from_asset(asset: ModelAsset) -> Result<Self, ModelError> {
        if asset.window == 0 {
            return Err(ModelError::Shape("window must be > 0".into()));
        }
        if asset.features != FEATURE_COUNT {
            return Err(ModelError::Shape(format!(
                "model expects {} features per frame, extractor produces {FEATURE_COUNT}",
                asset.features
            )));
        }
        if asset.labels.is_empty() {
            return Err(ModelError::Shape("no output labels".into()));
        }
        if asset.layers.is_empty() {
            return Err(ModelError::Shape("no layers".into()));
        }

        let mut fan_in = asset.window * asset.features;
        for (idx, layer) in asset.layers.iter().enumerate() {
            if layer.weights.len() != layer.bias.len() {
                return Err(ModelError::Shape(format!(
                    "layer {idx}: {} weight rows but {} biases",
                    layer.weights.len(),
                    layer.bias.len()
                )));
            }
            if let Some(row) = layer.weights.iter().position(|r| r.len() != fan_in) {
                return Err(ModelError::Shape(format!(
                    "layer {idx} row {row}: expected {fan_in} inputs"
                )));
            }
            let finite = layer.bias.iter().all(|b| b.is_finite())
                && layer.weights.iter().flatten().all(|w| w.is_finite());
            if !finite {
                return Err(ModelError::Shape(format!("layer {idx}: non-finite parameter")));
            }
            fan_in = layer.bias.len();
        }
        if fan_in != asset.labels.len() {
            return Err(ModelError::Shape(format!(
                "final layer has {fan_in} outputs for {} labels",
                asset.labels.len()
            )));
        }

        Ok(Self {
            window: asset.window,
            labels: asset.labels,
            layers: asset.layers,
        })
    }

    pub fn from_json_str(text: &str) -> Result<Self, ModelError> {
        let asset: ModelAsset = serde_json::from_str(text)?;
        Self::from_asset(asset)
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let text = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Forward pass followed by a softmax. `input` must hold
    /// `window * FEATURE_COUNT` values.
    pub fn forward(&self, input: &[f64]) -> Vec<f32> {
        let mut activations = input.to_vec();
        for layer in &self.layers {
            activations = layer
                .weights
                .iter()
                .zip(&layer.bias)
                .map(|(row, bias)| {
                    let sum: f64 = row.iter().zip(&activations).map(|(w, x)| w * x).sum();
                    layer.activation.apply(sum + bias)
                })
                .collect();
        }
        softmax(&activations)
    }
}

impl VowelInference for VowelModel {
    fn window_len(&self) -> usize {
        self.window
    }

    fn infer(&self, window: &ClassifierWindow) -> Vec<(String, f32)> {
        let mut input = Vec::with_capacity(self.window * FEATURE_COUNT);
        window.flatten_into(&mut input);
        if input.len() != self.window * FEATURE_COUNT {
            return Vec::new();
        }
        self.labels
            .iter()
            .cloned()
            .zip(self.forward(&input))
            .collect()
    }
}

fn softmax(logits: &[f64]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return vec![0.0; logits.len()];
    }
    let exps: Vec<f64> = logits.iter().map(|x| (x - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.iter().map(|e| (e / total) as f32).collect()
}
