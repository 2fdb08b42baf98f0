//! Ranking of roster slots by total score
//!
//! Level 2 - Phase-level implementation

/// Order slot indices by descending score.
///
/// Insertion order: each slot goes behind every already-placed slot whose
/// score is not lower, so ties keep the earlier slot first.
pub fn rank(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = Vec::with_capacity(scores.len());

    for (index, &score) in scores.iter().enumerate() {
        let position = order
            .iter()
            .rposition(|&placed| score <= scores[placed])
            .map_or(0, |p| p + 1);
        order.insert(position, index);
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_descending() {
        assert_eq!(rank(&[1.0, 3.0, 2.0]), vec![1, 2, 0]);
    }

    #[test]
    fn test_rank_ties_keep_index_order() {
        assert_eq!(rank(&[5.0, 5.0, 5.0]), vec![0, 1, 2]);
        assert_eq!(rank(&[1.0, 4.0, 1.0, 4.0]), vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_rank_empty_and_single() {
        assert!(rank(&[]).is_empty());
        assert_eq!(rank(&[2.5]), vec![0]);
    }

    #[test]
    fn test_rank_is_permutation() {
        let scores = [3.0, 9.0, 1.0, 9.0, 0.5, 3.0, 7.0];
        let mut order = rank(&scores);
        for pair in order.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert!(scores[a] > scores[b] || (scores[a] == scores[b] && a < b));
        }
        order.sort_unstable();
        assert_eq!(order, (0..scores.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_rank_idempotent_on_ranked_scores() {
        let scores = [10.0, 8.0, 8.0, 2.0];
        assert_eq!(rank(&scores), vec![0, 1, 2, 3]);
    }
}
