//! Face-tracking input: samples, feature extraction and vowel classification.

pub mod classifier;
pub mod features;
pub mod model;
pub mod sample;
pub mod synthetic;
pub mod vowel;
pub mod window;

pub use classifier::{VowelClassifier, VowelFrame, blend_vocal_tract_params};
pub use features::{FEATURE_COUNT, FeatureStats, FeatureVector};
pub use model::{ModelError, VowelInference, VowelModel};
pub use sample::{Blendshapes, CameraPose, FaceSample, Orientation, PitchAxis};
pub use vowel::{VocalTractParams, Vowel, VowelPreset};
pub use window::ClassifierWindow;
