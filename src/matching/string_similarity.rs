//! Similarity scores between lines and blocks of lines.
//!
//! Scores are in `[0.0, 1.0]`; `1.0` means identical after trimming.

use crate::model::Line;
use strsim::normalized_levenshtein;

/// Normalized Levenshtein similarity of the trimmed line contents.
///
/// Two blank lines are identical. A blank line against a non-blank one
/// scores `0.0`.
#[must_use]
pub fn line_similarity(a: &Line, b: &Line) -> f64 {
    text_similarity(a.trimmed(), b.trimmed())
}

/// Same as [`line_similarity`] on raw strings (already normalized).
#[must_use]
pub fn text_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    normalized_levenshtein(a, b)
}

/// Cheap upper bound on [`text_similarity`] from the character counts.
///
/// Edit distance is at least the length difference, so similarity can
/// never exceed `min_len / max_len`.
#[must_use]
pub fn similarity_upper_bound(a: &str, b: &str) -> f64 {
    let (la, lb) = (a.chars().count(), b.chars().count());
    let max = la.max(lb);
    if max == 0 {
        return 1.0;
    }
    la.min(lb) as f64 / max as f64
}

/// True when the two lines reach `threshold`, skipping the edit distance
/// when the length bound already rules it out.
#[must_use]
pub fn lines_similar(a: &Line, b: &Line, threshold: f64) -> bool {
    let (ta, tb) = (a.trimmed(), b.trimmed());
    if ta == tb {
        return true;
    }
    similarity_upper_bound(ta, tb) >= threshold && text_similarity(ta, tb) >= threshold
}

/// Mean of per-line similarity scores over a block; `0.0` when empty.
#[must_use]
pub fn block_similarity<I>(scores: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = scores
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), score| (sum + score, count + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str) -> Line {
        Line {
            index: 0,
            text: text.to_string(),
            ends_with_line_break: true,
        }
    }

    #[test]
    fn test_identical_after_trim() {
        assert!((line_similarity(&line("  foo()"), &line("foo()  ")) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_blank_lines() {
        assert!((line_similarity(&line(""), &line("   ")) - 1.0).abs() < f64::EPSILON);
        assert!(line_similarity(&line(""), &line("x")).abs() < f64::EPSILON);
    }

    #[test]
    fn test_small_edit_scores_high() {
        let score = line_similarity(&line("let total = a + b;"), &line("let total = a + c;"));
        assert!(score > 0.9, "score was {score}");
    }

    #[test]
    fn test_unrelated_lines_score_low() {
        let score = line_similarity(&line("return Ok(())"), &line("struct Foo;"));
        assert!(score < 0.5, "score was {score}");
    }

    #[test]
    fn test_upper_bound_prunes() {
        assert!(similarity_upper_bound("ab", "abcdefgh") < 0.3);
        assert!(!lines_similar(&line("ab"), &line("abcdefgh"), 0.9));
    }

    #[test]
    fn test_block_similarity_mean() {
        let a = [line("one"), line("two")];
        let b = [line("one"), line("xyz")];
        let score = block_similarity(a.iter().zip(&b).map(|(x, y)| line_similarity(x, y)));
        assert!((score - 0.5).abs() < 1e-9, "score was {score}");
        assert!(block_similarity(std::iter::empty()).abs() < f64::EPSILON);
    }
}
