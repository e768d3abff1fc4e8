//! Maximal-marginal-relevance selection
//!
//! Plain top-k similarity returns near-duplicate passages when a corpus has
//! redundant boilerplate (repeated disclaimers across filings, etc). MMR
//! trades a controlled amount of relevance for diversity among the selected
//! set.

use crate::providers::vector_index::ScoredChunk;

/// Select up to `k` candidates by MMR.
///
/// `lambda` is the diversity weight in [0, 1]. Each round picks the
/// candidate maximizing
///
/// ```text
/// (1 - lambda) * sim(query, c) - lambda * max_sim(c, selected)
/// ```
///
/// so lambda = 0 degenerates to top-k by raw similarity and lambda = 1 to
/// pure diversity. Ties break toward the highest raw query similarity.
/// Candidates are expected in descending similarity order.
pub fn mmr_select(candidates: Vec<ScoredChunk>, k: usize, lambda: f32) -> Vec<ScoredChunk> {
    if k == 0 || candidates.is_empty() {
        return Vec::new();
    }
    let lambda = lambda.clamp(0.0, 1.0);

    let mut remaining = candidates;
    let mut selected: Vec<ScoredChunk> = Vec::with_capacity(k.min(remaining.len()));

    while selected.len() < k && !remaining.is_empty() {
        let mut best_idx = 0;
        let mut best_score = f32::NEG_INFINITY;
        let mut best_raw = f32::NEG_INFINITY;

        for (idx, candidate) in remaining.iter().enumerate() {
            let max_selected_sim = selected
                .iter()
                .map(|s| cosine_similarity(&candidate.embedding, &s.embedding))
                .fold(0.0f32, f32::max);

            let score = (1.0 - lambda) * candidate.similarity - lambda * max_selected_sim;

            let better = score > best_score
                || (score == best_score && candidate.similarity > best_raw);
            if better {
                best_idx = idx;
                best_score = score;
                best_raw = candidate.similarity;
            }
        }

        selected.push(remaining.swap_remove(best_idx));
    }

    selected
}

/// Cosine similarity mapped onto [0, 1]
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    ((dot / (norm_a * norm_b)) + 1.0) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocChunk;

    fn candidate(source: &str, similarity: f32, embedding: Vec<f32>) -> ScoredChunk {
        ScoredChunk {
            chunk: DocChunk::new(format!("content of {}", source), source),
            similarity,
            embedding,
        }
    }

    #[test]
    fn test_lambda_zero_is_top_k_by_raw_similarity() {
        let candidates = vec![
            candidate("a", 0.9, vec![1.0, 0.0]),
            candidate("b", 0.8, vec![1.0, 0.0]), // identical embedding to a
            candidate("c", 0.3, vec![0.0, 1.0]),
        ];

        let picked = mmr_select(candidates, 2, 0.0);
        let sources: Vec<&str> = picked.iter().map(|c| c.chunk.source.as_str()).collect();
        // No diversity effect: the near-duplicate still wins on raw score
        assert_eq!(sources, vec!["a", "b"]);
    }

    #[test]
    fn test_lambda_one_never_repicks_identical_embedding() {
        let candidates = vec![
            candidate("a", 0.9, vec![1.0, 0.0]),
            candidate("dup", 0.85, vec![1.0, 0.0]), // identical to a
            candidate("c", 0.3, vec![0.0, 1.0]),
        ];

        let picked = mmr_select(candidates, 2, 1.0);
        let sources: Vec<&str> = picked.iter().map(|c| c.chunk.source.as_str()).collect();
        // The orthogonal alternative is preferred over the duplicate
        assert_eq!(sources, vec!["a", "c"]);
    }

    #[test]
    fn test_ties_break_by_highest_raw_similarity() {
        // With lambda = 1 both unseen candidates have score -max_sim = 0 on
        // the first pick; the higher raw similarity must win.
        let candidates = vec![
            candidate("low", 0.4, vec![0.0, 1.0]),
            candidate("high", 0.9, vec![1.0, 0.0]),
        ];

        let picked = mmr_select(candidates, 1, 1.0);
        assert_eq!(picked[0].chunk.source, "high");
    }

    #[test]
    fn test_exhausts_candidates_when_k_exceeds_pool() {
        let candidates = vec![
            candidate("a", 0.9, vec![1.0, 0.0]),
            candidate("b", 0.5, vec![0.0, 1.0]),
        ];
        assert_eq!(mmr_select(candidates, 10, 0.5).len(), 2);
        assert!(mmr_select(Vec::new(), 5, 0.5).is_empty());
    }
}
