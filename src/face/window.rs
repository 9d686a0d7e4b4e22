use std::collections::VecDeque;

use super::features::FeatureVector;

/// Fixed-length history of feature vectors, most recent last.
#[derive(Debug, Clone)]
pub struct ClassifierWindow {
    frames: VecDeque<FeatureVector>,
    capacity: usize,
}

impl ClassifierWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            frames: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, features: FeatureVector) {
        if self.frames.len() == self.capacity {
            self.frames.pop_front();
        }
        self.frames.push_back(features);
    }

    pub fn is_full(&self) -> bool {
        self.frames.len() == self.capacity
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&FeatureVector> {
        self.frames.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureVector> {
        self.frames.iter()
    }

    /// Oldest-first concatenation of all frames.
    pub fn flatten_into(&self, out: &mut Vec<f64>) {
        out.clear();
        for frame in &self.frames {
            out.extend_from_slice(frame);
        }
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}
