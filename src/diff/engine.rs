//! Diff engine implementation.

use std::time::Instant;

use super::algorithm::{Aligner, CharSequence, LineSequence, SequenceDiff};
use super::engine_config::{EngineLimits, MoveDetectionConfig};
use super::moves::{MoveContext, detect_moves};
use super::optimize::{drop_empty, optimize_char_diffs, optimize_line_diffs};
use super::result::DiffResult;
use super::timeout::Deadline;
use crate::config::DiffOptions;
use crate::error::{DiffErrorKind, LineDiffError, Result};
use crate::matching::{LineInterner, LineMatcher, TextLineMatcher, WhitespacePolicy};
use crate::model::{Document, LineRange, LineRangeMapping, MovedText, RangeMapping, Side};

/// Line and character diff engine.
///
/// Holds configuration only; every call builds its own working state, so a
/// single engine can be shared across threads.
pub struct DiffEngine {
    options: DiffOptions,
    limits: EngineLimits,
    move_config: MoveDetectionConfig,
    custom_matcher: Option<Box<dyn LineMatcher>>,
}

impl Default for DiffEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DiffEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiffEngine")
            .field("options", &self.options)
            .field("limits", &self.limits)
            .field("move_config", &self.move_config)
            .field(
                "matcher",
                &self.custom_matcher.as_ref().map_or("text", |m| m.name()),
            )
            .finish()
    }
}

impl DiffEngine {
    /// Create a new diff engine with default settings
    #[must_use]
    pub fn new() -> Self {
        Self {
            options: DiffOptions::default(),
            limits: EngineLimits::default(),
            move_config: MoveDetectionConfig::default(),
            custom_matcher: None,
        }
    }

    /// Replace all request options at once
    #[must_use]
    pub const fn with_options(mut self, options: DiffOptions) -> Self {
        self.options = options;
        self
    }

    /// Ignore leading/trailing whitespace when comparing lines
    #[must_use]
    pub const fn ignore_trim_whitespace(mut self, ignore: bool) -> Self {
        self.options.ignore_trim_whitespace = ignore;
        self
    }

    /// Report relocated blocks as moves
    #[must_use]
    pub const fn compute_moves(mut self, compute: bool) -> Self {
        self.options.compute_moves = compute;
        self
    }

    /// Wall-clock budget per call; `0` expires immediately
    #[must_use]
    pub const fn with_max_computation_time_ms(mut self, millis: u64) -> Self {
        self.options.max_computation_time_ms = millis;
        self
    }

    /// Set the algorithm size limits
    #[must_use]
    pub fn with_limits(mut self, limits: EngineLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Set the move detector parameters
    #[must_use]
    pub fn with_move_config(mut self, config: MoveDetectionConfig) -> Self {
        self.move_config = config;
        self
    }

    /// Use a custom line matcher for move detection.
    #[must_use]
    pub fn with_matcher(mut self, matcher: Box<dyn LineMatcher>) -> Self {
        self.custom_matcher = Some(matcher);
        self
    }

    #[must_use]
    pub const fn options(&self) -> &DiffOptions {
        &self.options
    }

    #[must_use]
    pub const fn limits(&self) -> &EngineLimits {
        &self.limits
    }

    #[must_use]
    pub const fn move_config(&self) -> &MoveDetectionConfig {
        &self.move_config
    }

    /// Diff two texts.
    ///
    /// # Errors
    ///
    /// Fails only on invalid engine settings; running out of time yields a
    /// coarser result with `hit_timeout` set.
    pub fn compute(&self, original: &str, modified: &str) -> Result<DiffResult> {
        let original = Document::tokenize(Side::Original, original);
        let modified = Document::tokenize(Side::Modified, modified);
        self.compute_documents(&original, &modified)
    }

    /// Diff two already tokenized documents.
    ///
    /// # Errors
    ///
    /// See [`DiffEngine::compute`].
    pub fn compute_documents(&self, original: &Document, modified: &Document) -> Result<DiffResult> {
        self.check_settings()?;
        let started = Instant::now();

        if original.content_hash() == modified.content_hash() && original.lines() == modified.lines()
        {
            tracing::debug!(lines = original.len(), "inputs are identical");
            return Ok(DiffResult::new());
        }

        let deadline = Deadline::from_millis(self.options.max_computation_time_ms);
        let policy = WhitespacePolicy::from_ignore_trim(self.options.ignore_trim_whitespace);
        let default_matcher = TextLineMatcher::new(policy);
        let matcher: &dyn LineMatcher = self.custom_matcher.as_deref().unwrap_or(&default_matcher);

        let mut interner = LineInterner::new(policy);
        let original_ids = interner.intern_document(original);
        let modified_ids = interner.intern_document(modified);
        tracing::debug!(
            original_lines = original.len(),
            modified_lines = modified.len(),
            distinct = interner.distinct(),
            "tokenized inputs"
        );

        let pass = RefinePass {
            original,
            modified,
            original_ids: &original_ids,
            modified_ids: &modified_ids,
            line_aligner: Aligner::new(self.limits.line_dp_cell_limit),
            char_aligner: Aligner::new(self.limits.char_dp_cell_limit),
            policy,
            deadline: &deadline,
        };

        let line_diffs = pass.align_lines(original.full_range(), modified.full_range());
        tracing::debug!(hunks = line_diffs.len(), "line alignment done");

        let (line_diffs, blocks) = if self.options.compute_moves {
            let ctx = MoveContext {
                original,
                modified,
                original_ids: &original_ids,
                modified_ids: &modified_ids,
                matcher,
                config: &self.move_config,
            };
            let detection = detect_moves(&ctx, line_diffs, &deadline);
            (detection.diffs, detection.moves)
        } else {
            (line_diffs, Vec::new())
        };

        let changes = drop_empty(line_diffs.iter().map(|d| pass.to_mapping(d)).collect());
        let moves = blocks
            .iter()
            .map(|block| pass.moved_text(block.original, block.modified))
            .collect();

        let result = DiffResult {
            changes,
            moves,
            hit_timeout: deadline.was_hit(),
        };

        if result.hit_timeout {
            tracing::warn!(
                budget_ms = self.options.max_computation_time_ms,
                "diff computation exceeded its time budget, returning a coarser result"
            );
        }
        tracing::debug!(
            changes = result.changes.len(),
            moves = result.moves.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "diff computed"
        );

        Ok(result)
    }

    fn check_settings(&self) -> Result<()> {
        let threshold = self.move_config.similarity_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(LineDiffError::diff(
                "engine settings",
                DiffErrorKind::InvalidOption {
                    option: "similarity_threshold".to_string(),
                    message: format!("{threshold} is not in (0.0, 1.0]"),
                },
            ));
        }
        if self.move_config.min_block_lines == 0 {
            return Err(LineDiffError::diff(
                "engine settings",
                DiffErrorKind::InvalidOption {
                    option: "min_block_lines".to_string(),
                    message: "must be at least 1".to_string(),
                },
            ));
        }
        Ok(())
    }
}

/// Per-call state shared by the line pass, the character pass and the
/// alignment of moved blocks.
struct RefinePass<'a> {
    original: &'a Document,
    modified: &'a Document,
    original_ids: &'a [u32],
    modified_ids: &'a [u32],
    line_aligner: Aligner,
    char_aligner: Aligner,
    policy: WhitespacePolicy,
    deadline: &'a Deadline,
}

impl RefinePass<'_> {
    /// Optimized line diffs between two line spans, in document offsets.
    fn align_lines(&self, orig: LineRange, modi: LineRange) -> Vec<SequenceDiff> {
        let seq1 = LineSequence::new(&self.original_ids[orig.iter()]);
        let seq2 = LineSequence::new(&self.modified_ids[modi.iter()]);
        let alignment = self.line_aligner.align(&seq1, &seq2, self.deadline);
        let diffs = optimize_line_diffs(&seq1, &seq2, self.original.slice(orig), alignment.diffs);

        let (d1, d2) = (offset(orig.start), offset(modi.start));
        diffs.into_iter().map(|d| d.delta(d1, d2)).collect()
    }

    fn to_mapping(&self, diff: &SequenceDiff) -> LineRangeMapping {
        let orig = LineRange::from(diff.seq1_range);
        let modi = LineRange::from(diff.seq2_range);
        let mapping = LineRangeMapping::new(orig, modi);
        if mapping.is_modification() {
            mapping.with_inner_changes(self.inner_changes(orig, modi))
        } else {
            mapping
        }
    }

    fn inner_changes(&self, orig: LineRange, modi: LineRange) -> Vec<RangeMapping> {
        let seq1 = CharSequence::new(self.original.slice(orig), orig.start, self.policy);
        let seq2 = CharSequence::new(self.modified.slice(modi), modi.start, self.policy);
        let alignment = self.char_aligner.align(&seq1, &seq2, self.deadline);
        optimize_char_diffs(&seq1, &seq2, alignment.diffs, self.policy.ignores_trim())
            .into_iter()
            .map(|d| RangeMapping::new(seq1.text_range(d.seq1_range), seq2.text_range(d.seq2_range)))
            .collect()
    }

    fn moved_text(&self, orig: LineRange, modi: LineRange) -> MovedText {
        let changes = self
            .align_lines(orig, modi)
            .iter()
            .map(|d| self.to_mapping(d))
            .collect();
        MovedText {
            original_range: orig,
            modified_range: modi,
            changes: drop_empty(changes),
        }
    }
}

fn offset(start: usize) -> isize {
    isize::try_from(start).unwrap_or(isize::MAX)
}
