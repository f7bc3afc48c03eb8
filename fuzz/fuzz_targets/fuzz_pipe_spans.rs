#![no_main]

use libfuzzer_sys::fuzz_target;

use gridmark_markdown::{escape_pipes, split_pipe_spans};

/// Keep span fuzzing bounded: pathological inputs should not drive very large
/// allocations.
const MAX_INPUT_BYTES: usize = 64 * 1024;

fuzz_target!(|data: &[u8]| {
    let data = &data[..data.len().min(MAX_INPUT_BYTES)];
    let line = String::from_utf8_lossy(data);

    // Splitting on unescaped pipes and rejoining must reproduce the input.
    let spans = split_pipe_spans(&line);
    assert_eq!(spans.join("|"), line);

    // No span may retain an unescaped pipe once escaped, and escaping an
    // already-escaped span must be a no-op.
    for span in &spans {
        let escaped = escape_pipes(span);
        assert_eq!(split_pipe_spans(&escaped).len(), 1);
        assert_eq!(escape_pipes(&escaped), escaped);
    }
});
