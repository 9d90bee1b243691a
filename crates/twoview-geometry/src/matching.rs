//! Correspondence matching between two per-view word maps.
//!
//! Three policies are provided. All are pure functions of the two inputs;
//! correspondences come out in ascending word order, and keypoints sharing
//! a word keep the order they were inserted with.
//!
//! `pairable_count` in the returned [`PairMatches`] is the min-multiplicity
//! total of matchable pairs over shared words; it may differ from the
//! number of emitted correspondences and is reporting information only.

use twoview_core::{Correspondence, PairMatches, WordMap};

/// One-to-one matching, excluding ambiguous duplicate words.
///
/// A correspondence is emitted for each word present exactly once in both
/// views. When a word has duplicates in *both* views, the pairs it could
/// form are counted (min of the two multiplicities) but none is emitted, so
/// the geometric fit is not fed ambiguous, possibly false matches.
///
/// With `a = [1 2 3 4 6 6]` and `b = [1 1 2 4 5 6 6]` this yields the
/// correspondences `[(2,2) (4,4)]` and a pairable count of 4.
pub fn match_words_unique(a: &WordMap, b: &WordMap) -> PairMatches {
    let mut out = PairMatches::default();
    for (word, kps_a) in a.iter() {
        let kps_b = b.get(word);
        if kps_a.len() == 1 && kps_b.len() == 1 {
            out.pairs.push(Correspondence {
                word,
                a: kps_a[0],
                b: kps_b[0],
            });
            out.pairable_count += 1;
        } else if kps_a.len() > 1 && kps_b.len() > 1 {
            // Ambiguous duplicates: count, never emit.
            out.pairable_count += kps_a.len().min(kps_b.len());
        }
    }
    out
}

/// Exhaustive matching: the full per-word cross product.
///
/// Duplicate words generate multiple, possibly wrong, correspondences.
/// `pairable_count` is still the min-multiplicity total.
///
/// With `a = [1 2 3 4 6 6]` and `b = [1 1 2 4 5 6 6]` this yields
/// `[(1,1a) (1,1b) (2,2) (4,4) (6a,6a) (6a,6b) (6b,6a) (6b,6b)]` and a
/// pairable count of 5.
pub fn match_words_all(a: &WordMap, b: &WordMap) -> PairMatches {
    let mut out = PairMatches::default();
    for (word, kps_a) in a.iter() {
        let kps_b = b.get(word);
        out.pairable_count += kps_a.len().min(kps_b.len());
        for ka in kps_a {
            for kb in kps_b {
                out.pairs.push(Correspondence {
                    word,
                    a: *ka,
                    b: *kb,
                });
            }
        }
    }
    out
}

/// Positional matching: pairs duplicate entries by position.
///
/// For each shared word the keypoint lists are zipped, pairing the i-th
/// entry of one view with the i-th entry of the other. This is an
/// ordering-dependent legacy variant kept for data where duplicate words
/// are expected to align positionally.
///
/// With `a = [1 2 3 4 6 6]` and `b = [1 1 2 4 5 6 6]` this yields
/// `[(1,1a) (2,2) (4,4) (6a,6a) (6b,6b)]` and a pairable count of 5.
pub fn match_words_sequential(a: &WordMap, b: &WordMap) -> PairMatches {
    let mut out = PairMatches::default();
    for (word, kps_a) in a.iter() {
        for (ka, kb) in kps_a.iter().zip(b.get(word)) {
            out.pairs.push(Correspondence {
                word,
                a: *ka,
                b: *kb,
            });
            out.pairable_count += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use twoview_core::Keypoint;

    fn kp(i: u32) -> Keypoint {
        Keypoint::new(i as f64, i as f64 + 0.5)
    }

    /// The documented reference example: a = [1 2 3 4 6 6], b = [1 1 2 4 5 6 6].
    fn reference_maps() -> (WordMap, WordMap) {
        let a: WordMap = [
            (1, kp(10)),
            (2, kp(11)),
            (3, kp(12)),
            (4, kp(13)),
            (6, kp(14)),
            (6, kp(15)),
        ]
        .into_iter()
        .collect();
        let b: WordMap = [
            (1, kp(20)),
            (1, kp(21)),
            (2, kp(22)),
            (4, kp(23)),
            (5, kp(24)),
            (6, kp(25)),
            (6, kp(26)),
        ]
        .into_iter()
        .collect();
        (a, b)
    }

    #[test]
    fn unique_excludes_duplicates_but_counts_them() {
        let (a, b) = reference_maps();
        let m = match_words_unique(&a, &b);

        let words: Vec<u32> = m.pairs.iter().map(|c| c.word).collect();
        assert_eq!(words, vec![2, 4]);
        // word 2 + word 4 emitted, word 6 counted as min(2, 2) = 2.
        assert_eq!(m.pairable_count, 4);
    }

    #[test]
    fn all_emits_full_cross_product() {
        let (a, b) = reference_maps();
        let m = match_words_all(&a, &b);

        let words: Vec<u32> = m.pairs.iter().map(|c| c.word).collect();
        assert_eq!(words, vec![1, 1, 2, 4, 6, 6, 6, 6]);
        assert_eq!(m.pairable_count, 5);
        // Cross product order for word 6: (a0,b0) (a0,b1) (a1,b0) (a1,b1).
        assert_eq!(m.pairs[4].a, kp(14));
        assert_eq!(m.pairs[4].b, kp(25));
        assert_eq!(m.pairs[5].a, kp(14));
        assert_eq!(m.pairs[5].b, kp(26));
    }

    #[test]
    fn sequential_pairs_duplicates_by_position() {
        let (a, b) = reference_maps();
        let m = match_words_sequential(&a, &b);

        let words: Vec<u32> = m.pairs.iter().map(|c| c.word).collect();
        assert_eq!(words, vec![1, 2, 4, 6, 6]);
        assert_eq!(m.pairable_count, 5);
        // Word 1: first entry of each side.
        assert_eq!(m.pairs[0].a, kp(10));
        assert_eq!(m.pairs[0].b, kp(20));
        // Word 6 pairs positionally.
        assert_eq!(m.pairs[3].b, kp(25));
        assert_eq!(m.pairs[4].b, kp(26));
    }

    #[test]
    fn unique_and_all_agree_without_duplicates() {
        let a: WordMap = (0..9).map(|i| (i, kp(i))).collect();
        let b: WordMap = (3..12).map(|i| (i, kp(i + 100))).collect();

        let u = match_words_unique(&a, &b);
        let all = match_words_all(&a, &b);

        assert_eq!(u.pairs, all.pairs);
        assert_eq!(u.pairable_count, all.pairable_count);
        assert_eq!(u.pairs.len(), 6);
    }

    #[test]
    fn empty_inputs_yield_no_matches() {
        let empty = WordMap::new();
        let (a, _) = reference_maps();
        assert!(match_words_unique(&empty, &a).pairs.is_empty());
        assert!(match_words_all(&a, &empty).pairs.is_empty());
        assert_eq!(match_words_sequential(&a, &empty).pairable_count, 0);
    }
}
