//! Property-based tests for the diff engine.
//!
//! Ensures the engine handles arbitrary input without panicking, and that
//! key result invariants hold across random inputs.

use linediff::diff::DiffEngine;
use linediff::model::{Document, LineRange, Side};
use proptest::prelude::*;

/// Texts over a tiny alphabet so that inputs share many lines.
fn text() -> impl Strategy<Value = String> {
    (
        prop::collection::vec("[ab ]{0,3}", 0..24),
        any::<bool>(),
    )
        .prop_map(|(lines, trailing_break)| {
            let mut text = lines.join("\n");
            if trailing_break && !text.is_empty() {
                text.push('\n');
            }
            text
        })
}

fn docs(a: &str, b: &str) -> (Document, Document) {
    (
        Document::tokenize(Side::Original, a),
        Document::tokenize(Side::Modified, b),
    )
}

fn line_keys(doc: &Document, range: LineRange) -> Vec<(String, bool)> {
    doc.slice(range)
        .iter()
        .map(|l| (l.text.clone(), l.ends_with_line_break))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn identity(a in text(), moves in any::<bool>(), ignore in any::<bool>()) {
        let result = DiffEngine::new()
            .compute_moves(moves)
            .ignore_trim_whitespace(ignore)
            .compute(&a, &a)
            .expect("diff");
        prop_assert!(result.changes.is_empty());
        prop_assert!(result.moves.is_empty());
        prop_assert!(!result.hit_timeout);
    }

    #[test]
    fn changes_reconstruct_modified(a in text(), b in text()) {
        let result = DiffEngine::new().compute(&a, &b).expect("diff");
        let (original, modified) = docs(&a, &b);

        for pair in result.changes.windows(2) {
            prop_assert!(pair[0].original_range.end_exclusive <= pair[1].original_range.start);
            prop_assert!(pair[0].modified_range.end_exclusive <= pair[1].modified_range.start);
        }

        let mut rebuilt = Vec::new();
        let mut next = 0;
        for change in &result.changes {
            rebuilt.extend(line_keys(&original, LineRange::new(next, change.original_range.start)));
            rebuilt.extend(line_keys(&modified, change.modified_range));
            next = change.original_range.end_exclusive;
        }
        rebuilt.extend(line_keys(&original, LineRange::new(next, original.len())));
        prop_assert_eq!(rebuilt, line_keys(&modified, modified.full_range()));
    }

    #[test]
    fn results_validate(
        a in text(),
        b in text(),
        moves in any::<bool>(),
        ignore in any::<bool>(),
    ) {
        let result = DiffEngine::new()
            .compute_moves(moves)
            .ignore_trim_whitespace(ignore)
            .compute(&a, &b)
            .expect("diff");
        let (original, modified) = docs(&a, &b);
        prop_assert!(result.validate(&original, &modified, ignore).is_ok());
    }

    #[test]
    fn inner_changes_are_contained(a in text(), b in text()) {
        let result = DiffEngine::new().compute(&a, &b).expect("diff");
        for change in &result.changes {
            let (orig_lo, orig_hi) = change.original_range.position_bounds();
            let (mod_lo, mod_hi) = change.modified_range.position_bounds();
            for inner in &change.inner_changes {
                prop_assert!(inner.original_range.is_within(orig_lo, orig_hi));
                prop_assert!(inner.modified_range.is_within(mod_lo, mod_hi));
            }
        }
    }

    #[test]
    fn trim_whitespace_is_ignored(
        lines in prop::collection::vec("[a-z]{1,6}", 1..20),
        pads in prop::collection::vec((0usize..3, 0usize..3), 20),
    ) {
        let original = lines.join("\n");
        let padded: Vec<String> = lines
            .iter()
            .zip(&pads)
            .map(|(l, (lead, trail))| format!("{}{l}{}", " ".repeat(*lead), "\t".repeat(*trail)))
            .collect();
        let modified = padded.join("\n");

        let result = DiffEngine::new()
            .ignore_trim_whitespace(true)
            .compute(&original, &modified)
            .expect("diff");
        prop_assert!(result.changes.is_empty());
    }

    #[test]
    fn zero_budget_is_valid_and_flagged(a in text(), b in text(), moves in any::<bool>()) {
        let result = DiffEngine::new()
            .compute_moves(moves)
            .with_max_computation_time_ms(0)
            .compute(&a, &b)
            .expect("timeouts are not errors");
        let (original, modified) = docs(&a, &b);
        prop_assert!(result.validate(&original, &modified, false).is_ok());
        prop_assert!(result.moves.is_empty());
        if a != b {
            prop_assert!(result.hit_timeout);
        }
    }

    #[test]
    fn single_insertion_is_minimal(len in 1usize..120, at_seed in any::<usize>()) {
        let lines: Vec<String> = (0..len).map(|i| format!("line {i}")).collect();
        let at = at_seed % (len + 1);
        let mut inserted = lines.clone();
        inserted.insert(at, "inserted".to_string());

        let result = DiffEngine::new()
            .compute(&(lines.join("\n") + "\n"), &(inserted.join("\n") + "\n"))
            .expect("diff");
        prop_assert_eq!(result.changes.len(), 1);
        let change = &result.changes[0];
        prop_assert!(change.original_range.is_empty());
        prop_assert_eq!(change.modified_range, LineRange::new(at, at + 1));
    }
}
