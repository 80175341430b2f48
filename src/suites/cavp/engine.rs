//! Batch generation and output verification.
//!
//! CAVP files can hold thousands of cases; handing them all to the
//! external tool as one argument list is avoided by re-invoking it in
//! bounded batches.

use log::error;

use crate::model::{Algorithm, BlockInput, Direction, Mode, Outcome};
use crate::tools::BlockTool;

pub const DEFAULT_MAX_BATCH: usize = 100;

/// Zips the parallel lists into one single-case input per index. When
/// the mode takes no IV a same-length run of "no IV" placeholders is
/// synthesized. Equal list lengths are a precondition (held by
/// `TestSection`), not re-checked here.
pub fn generate_inputs(
    keys: &[String],
    texts: &[String],
    init_vectors: Option<&[String]>,
) -> Vec<BlockInput> {
    let init_vectors: Vec<Option<String>> = match init_vectors {
        Some(ivs) => ivs.iter().cloned().map(Some).collect(),
        None => vec![None; keys.len()],
    };
    keys.iter()
        .zip(texts)
        .zip(init_vectors)
        .map(|((key, text), iv)| BlockInput::new(key.clone(), vec![text.clone()], iv))
        .collect()
}

/// Splits expected outputs and inputs into aligned windows of at most
/// `max_batch` elements, preserving order; the last window may be
/// shorter.
pub fn chunks<'a>(
    expected: &'a [String],
    inputs: &'a [BlockInput],
    max_batch: usize,
) -> impl Iterator<Item = (&'a [String], &'a [BlockInput])> {
    let max_batch = max_batch.max(1);
    expected.chunks(max_batch).zip(inputs.chunks(max_batch))
}

/// Strict ordered comparison: length first, then element-wise. Logs
/// both lengths on a length mismatch and the expected values on a
/// content mismatch.
pub fn verify_output(actual: &[String], expected: &[String]) -> bool {
    if actual.len() != expected.len() {
        error!("Unexpected output length!");
        error!("\tExpected: {}", expected.len());
        error!("\tActual: {}", actual.len());
        return false;
    }
    let matched = actual
        .iter()
        .zip(expected)
        .all(|(a, e)| a.eq_ignore_ascii_case(e));
    if !matched {
        error!("Expected output:\n{}", expected.join("\n"));
    }
    matched
}

/// Drives the tool over every batch of one direction. The first bad
/// batch decides: a mismatch ends the direction as FAILURE without
/// evaluating the remaining batches, a process error ends it as ERROR.
pub fn verify(
    tool: &dyn BlockTool,
    direction: Direction,
    algorithm: Algorithm,
    mode: Mode,
    inputs: &[BlockInput],
    expected: &[String],
    max_batch: usize,
) -> Outcome {
    for (expected_chunk, input_chunk) in chunks(expected, inputs, max_batch) {
        let actual = match tool.run_block(direction, algorithm, mode, input_chunk) {
            Ok(actual) => actual,
            Err(e) => {
                error!("Encountered an exception!");
                error!("{}", e);
                return Outcome::Error;
            }
        };
        if !verify_output(&actual, expected_chunk) {
            return Outcome::Failure;
        }
    }
    Outcome::Success
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn inputs_pair_up_by_index() {
        let keys = strings(&["k0", "k1"]);
        let texts = strings(&["t0", "t1"]);
        let ivs = strings(&["v0", "v1"]);

        let with_ivs = generate_inputs(&keys, &texts, Some(&ivs));
        assert_eq!(with_ivs.len(), 2);
        assert_eq!(with_ivs[1].key, "k1");
        assert_eq!(with_ivs[1].texts, ["t1"]);
        assert_eq!(with_ivs[1].iv.as_deref(), Some("v1"));

        let without_ivs = generate_inputs(&keys, &texts, None);
        assert!(without_ivs.iter().all(|input| input.iv.is_none()));
        assert_eq!(without_ivs.len(), 2);
    }

    #[test]
    fn chunk_windows_stay_aligned() {
        let expected = strings(&["a", "b", "c", "d", "e"]);
        let inputs = generate_inputs(
            &strings(&["1", "2", "3", "4", "5"]),
            &strings(&["x", "x", "x", "x", "x"]),
            None,
        );
        let windows: Vec<_> = chunks(&expected, &inputs, 2).collect();
        assert_eq!(windows.len(), 3);
        assert_eq!(windows[0].0, &expected[..2]);
        assert_eq!(windows[2].0.len(), 1);
        assert_eq!(windows[2].1.len(), 1);
    }

    #[test]
    fn chunking_boundary_lengths() {
        for len in [0, DEFAULT_MAX_BATCH - 1, DEFAULT_MAX_BATCH, DEFAULT_MAX_BATCH + 1] {
            let expected: Vec<String> = (0..len).map(|i| i.to_string()).collect();
            let keys = vec!["k".to_string(); len];
            let inputs = generate_inputs(&keys, &expected, None);

            let mut rebuilt = Vec::new();
            for (chunk, input_chunk) in chunks(&expected, &inputs, DEFAULT_MAX_BATCH) {
                assert_eq!(chunk.len(), input_chunk.len());
                rebuilt.extend_from_slice(chunk);
            }
            assert_eq!(rebuilt, expected);
        }
    }

    #[test]
    fn length_mismatch_fails_verification() {
        assert!(!verify_output(&strings(&["a"]), &strings(&["a", "b"])));
        assert!(verify_output(&strings(&[]), &strings(&[])));
    }

    #[test]
    fn comparison_is_order_sensitive() {
        let expected = strings(&["aa", "bb"]);
        assert!(verify_output(&strings(&["aa", "bb"]), &expected));
        assert!(!verify_output(&strings(&["bb", "aa"]), &expected));
    }

    #[test]
    fn comparison_ignores_hex_case() {
        assert!(verify_output(
            &strings(&["3AD77BB40D7A3660A89ECAF32466EF97"]),
            &strings(&["3ad77bb40d7a3660a89ecaf32466ef97"])
        ));
    }
}
