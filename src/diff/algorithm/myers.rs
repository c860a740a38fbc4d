//! Myers' O(ND) greedy alignment.
//!
//! Paths are kept as a linked list of snakes (diagonal runs of matches) in
//! an arena, so reconstructing the alignment is a walk from the final head
//! back to the origin. When the deadline fires mid-search, the path that
//! got furthest is used and everything after its last snake becomes one
//! trailing change.

use super::{AlignmentResult, DiffSequence, SequenceDiff, SequenceDiffAlgorithm};
use crate::diff::timeout::Deadline;
use crate::model::OffsetRange;

#[derive(Debug, Clone, Copy, Default)]
pub struct MyersDiffAlgorithm;

/// A run of matches starting at `(x, y)`.
#[derive(Debug, Clone, Copy)]
struct Snake {
    prev: Option<usize>,
    x: usize,
    y: usize,
    length: usize,
}

impl SequenceDiffAlgorithm for MyersDiffAlgorithm {
    fn compute<S: DiffSequence + ?Sized>(
        &self,
        seq1: &S,
        seq2: &S,
        deadline: &Deadline,
    ) -> AlignmentResult {
        let (n, m) = (seq1.len(), seq2.len());
        if n == 0 || m == 0 {
            return AlignmentResult::trivial(n, m, false);
        }

        let slide = |mut x: usize, mut y: usize| {
            while x < n && y < m && seq1.is_same(x, seq2, y) {
                x += 1;
                y += 1;
            }
            x
        };

        // Diagonal k = x - y lives at index k + center.
        let max_d = n + m;
        let center = max_d + 1;
        let mut frontier: Vec<isize> = vec![-1; 2 * max_d + 3];
        let mut heads: Vec<Option<usize>> = vec![None; 2 * max_d + 3];
        let mut arena: Vec<Snake> = Vec::new();

        let start = slide(0, 0);
        frontier[center] = start as isize;
        if start > 0 {
            arena.push(Snake {
                prev: None,
                x: 0,
                y: 0,
                length: start,
            });
            heads[center] = Some(0);
        }
        if start == n && start == m {
            return AlignmentResult::new(Vec::new(), false);
        }

        let (n_i, m_i) = (n as isize, m as isize);
        let mut furthest = (2 * start, center);

        for d in 1..=(max_d as isize) {
            for k in (-d..=d).step_by(2) {
                if k < -m_i || k > n_i {
                    continue;
                }
                if deadline.tick() {
                    tracing::debug!(d, "myers search interrupted by deadline");
                    let diffs = collect_diffs(&arena, heads[furthest.1], n, m);
                    return AlignmentResult::new(diffs, true);
                }

                let idx = (k + center as isize) as usize;

                // Deletion: step right from diagonal k - 1.
                let right = if k > -d && frontier[idx - 1] >= 0 && frontier[idx - 1] < n_i {
                    frontier[idx - 1] + 1
                } else {
                    -1
                };
                // Insertion: step down from diagonal k + 1.
                let down = if k < d && frontier[idx + 1] >= 0 && frontier[idx + 1] - k <= m_i {
                    frontier[idx + 1]
                } else {
                    -1
                };
                if right < 0 && down < 0 {
                    continue;
                }

                let from_right = right >= down;
                let x = if from_right { right } else { down };
                let y = x - k;
                if y < 0 || y > m_i {
                    continue;
                }

                let (x, y) = (x as usize, y as usize);
                let end_x = slide(x, y);
                let end_y = end_x - x + y;
                let prev = if from_right { heads[idx - 1] } else { heads[idx + 1] };

                frontier[idx] = end_x as isize;
                heads[idx] = if end_x > x {
                    arena.push(Snake {
                        prev,
                        x,
                        y,
                        length: end_x - x,
                    });
                    Some(arena.len() - 1)
                } else {
                    prev
                };

                if end_x == n && end_y == m {
                    return AlignmentResult::new(collect_diffs(&arena, heads[idx], n, m), false);
                }
                if end_x + end_y > furthest.0 {
                    furthest = (end_x + end_y, idx);
                }
            }
        }

        // Unreachable for well-formed sequences: d = n + m always reaches
        // the corner.
        AlignmentResult::trivial(n, m, false)
    }
}

/// Walk the snake list back from `head`, emitting the gaps as diffs.
fn collect_diffs(arena: &[Snake], head: Option<usize>, n: usize, m: usize) -> Vec<SequenceDiff> {
    let mut diffs = Vec::new();
    let (mut last_x, mut last_y) = (n, m);
    let mut cursor = head;

    loop {
        let (end_x, end_y) = cursor.map_or((0, 0), |i| {
            let snake = &arena[i];
            (snake.x + snake.length, snake.y + snake.length)
        });
        if end_x != last_x || end_y != last_y {
            diffs.push(SequenceDiff::new(
                OffsetRange::new(end_x, last_x),
                OffsetRange::new(end_y, last_y),
            ));
        }
        let Some(i) = cursor else { break };
        last_x = arena[i].x;
        last_y = arena[i].y;
        cursor = arena[i].prev;
    }

    diffs.reverse();
    diffs
}
