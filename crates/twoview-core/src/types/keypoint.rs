//! Labeled keypoints and per-view word maps.
//!
//! A [`WordMap`] associates visual-word ids with the image keypoints that
//! were quantized to that word. The same word may appear at several image
//! locations, so the map is multi-valued. Word ids iterate in ascending
//! order and keypoints sharing a word keep their insertion order, which
//! fixes the output order of the correspondence matchers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Pt2, Real};

/// Identifier of a visual word shared between views.
pub type WordId = u32;

/// A 2D image keypoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    /// Horizontal pixel coordinate.
    pub x: Real,
    /// Vertical pixel coordinate.
    pub y: Real,
}

impl Keypoint {
    pub fn new(x: Real, y: Real) -> Self {
        Self { x, y }
    }

    /// The keypoint position as a point.
    pub fn pt(&self) -> Pt2 {
        Pt2::new(self.x, self.y)
    }
}

/// Multi-valued mapping from visual-word id to image keypoints for one view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordMap {
    words: BTreeMap<WordId, Vec<Keypoint>>,
}

impl WordMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one keypoint under `word`, after any keypoint already stored there.
    pub fn insert(&mut self, word: WordId, keypoint: Keypoint) {
        self.words.entry(word).or_default().push(keypoint);
    }

    /// Keypoints stored under `word` (empty slice if the word is absent).
    pub fn get(&self, word: WordId) -> &[Keypoint] {
        self.words.get(&word).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate `(word, keypoints)` entries in ascending word order.
    pub fn iter(&self) -> impl Iterator<Item = (WordId, &[Keypoint])> {
        self.words.iter().map(|(w, kps)| (*w, kps.as_slice()))
    }

    /// Number of distinct words.
    pub fn num_words(&self) -> usize {
        self.words.len()
    }

    /// Total number of keypoints across all words.
    pub fn num_keypoints(&self) -> usize {
        self.words.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl FromIterator<(WordId, Keypoint)> for WordMap {
    fn from_iter<I: IntoIterator<Item = (WordId, Keypoint)>>(iter: I) -> Self {
        let mut map = WordMap::new();
        for (word, kp) in iter {
            map.insert(word, kp);
        }
        map
    }
}

/// A matched keypoint pair: the shared word id plus one keypoint per view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Correspondence {
    /// Visual word shared by both keypoints.
    pub word: WordId,
    /// Keypoint in view A.
    pub a: Keypoint,
    /// Keypoint in view B.
    pub b: Keypoint,
}

/// Output of a correspondence matcher.
///
/// `pairable_count` is the number of theoretically matchable pairs (the
/// min-multiplicity total over shared words). Depending on the matching
/// policy it may exceed `pairs.len()`, e.g. when ambiguous duplicate words
/// are counted but not emitted. It is reporting information only and is not
/// used by the geometric stages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PairMatches {
    /// Accepted correspondences, ordered by ascending word id.
    pub pairs: Vec<Correspondence>,
    /// Count of all theoretically matchable pairs.
    pub pairable_count: usize,
}
