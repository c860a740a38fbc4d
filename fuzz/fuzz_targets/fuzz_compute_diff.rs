#![no_main]
use libfuzzer_sys::fuzz_target;
use linediff::DiffEngine;
use linediff::model::{Document, Side};

const MAX_INPUT_LEN: usize = 20_000;

/// Diff the two halves of the input against each other.
///
/// The first byte picks the options; every result must be consistent with
/// its inputs.
fuzz_target!(|data: &[u8]| {
    if data.is_empty() || data.len() > MAX_INPUT_LEN {
        return;
    }
    let (flags, rest) = data.split_at(1);
    let (left, right) = rest.split_at(rest.len() / 2);
    let (Ok(original), Ok(modified)) = (std::str::from_utf8(left), std::str::from_utf8(right))
    else {
        return;
    };

    let ignore = flags[0] & 1 != 0;
    let engine = DiffEngine::new()
        .ignore_trim_whitespace(ignore)
        .compute_moves(flags[0] & 2 != 0)
        .with_max_computation_time_ms(if flags[0] & 4 != 0 { 0 } else { 1_000 });

    if let Ok(result) = engine.compute(original, modified) {
        let a = Document::tokenize(Side::Original, original);
        let b = Document::tokenize(Side::Modified, modified);
        if let Err(e) = result.validate(&a, &b, ignore) {
            panic!("invalid result: {e}");
        }
    }
});
