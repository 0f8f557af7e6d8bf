//! Transcript chunking.
//!
//! Splits a transcript into bounded, ordered segments for per-chunk
//! summarization. Boundaries prefer sentence ends (". ") so that chunks read
//! as complete thoughts; concatenating all chunks in order reproduces the
//! input exactly.

/// Split `text` into chunks of at most `max_chars` characters each,
/// preferring to end a chunk just after the last ". " inside the window.
///
/// Chunks are materialized eagerly: the chunk count drives the total retry
/// budget and cost accounting downstream.
///
/// Known edge case: a run of more than `max_chars` characters without any
/// ". " inside it becomes a single oversized-window chunk of exactly
/// `max_chars` characters rather than being cut mid-sentence elsewhere; a
/// sentence longer than the ceiling is therefore split at the raw limit.
///
/// Empty input yields an empty vector; the caller decides whether that is an
/// error.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    debug_assert!(max_chars > 0, "chunk size ceiling must be positive");

    let mut chunks = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        // Window of at most max_chars characters, on a char boundary.
        let end = rest
            .char_indices()
            .nth(max_chars)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let mut chunk = &rest[..end];

        // Cut just after the last sentence end, if there is one past the start.
        if let Some(p) = chunk.rfind(". ") {
            if p > 0 {
                chunk = &chunk[..p + 1];
            }
        }

        chunks.push(chunk.to_string());
        rest = &rest[chunk.len()..];
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_no_chunks() {
        assert!(chunk_text("", 6000).is_empty());
    }

    #[test]
    fn test_short_input_is_single_chunk() {
        let chunks = chunk_text("Just one short line", 6000);
        assert_eq!(chunks, vec!["Just one short line"]);
    }

    #[test]
    fn test_chunks_reproduce_input_exactly() {
        let text = "First sentence. Second sentence. Third one here. Fourth. \
                    Fifth goes on a little longer than the rest. Sixth."
            .repeat(40);
        for max_chars in [1, 7, 50, 333, 6000] {
            let chunks = chunk_text(&text, max_chars);
            assert_eq!(chunks.concat(), text, "lossy at ceiling {}", max_chars);
        }
    }

    #[test]
    fn test_chunk_size_bound() {
        let text = "One sentence here. Another sentence there. ".repeat(300);
        let chunks = chunk_text(&text, 100);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 100, "oversized chunk: {:?}", chunk);
        }
    }

    #[test]
    fn test_prefers_sentence_boundary() {
        // ". " occurs well before the ceiling; boundary must fall after it.
        let text = "Alpha beta gamma. Delta epsilon zeta eta theta iota kappa";
        let chunks = chunk_text(text, 40);
        assert_eq!(chunks[0], "Alpha beta gamma.");
        assert!(chunks[1].starts_with(" Delta"));
    }

    #[test]
    fn test_sentence_free_run_uses_raw_limit() {
        let text = "x".repeat(250);
        let chunks = chunk_text(&text, 100);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 100);
        assert_eq!(chunks[1].len(), 100);
        assert_eq!(chunks[2].len(), 50);
    }

    #[test]
    fn test_boundary_near_ceiling() {
        // 6001 characters with the last ". " ending at position 5990: the
        // first chunk ends right after that period, the second carries the
        // remainder including the character past the ceiling.
        let mut text = "a".repeat(5988);
        text.push_str(". ");
        text.push_str(&"b".repeat(11));
        assert_eq!(text.chars().count(), 6001);

        let chunks = chunk_text(&text, 6000);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].len(), 5989);
        assert!(chunks[0].ends_with('.'));
        assert_eq!(chunks[1], format!(" {}", "b".repeat(11)));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_multibyte_input_splits_on_char_boundaries() {
        let text = "æøå æøå æøå. æøå æøå æøå æøå".repeat(10);
        let chunks = chunk_text(&text, 10);
        assert_eq!(chunks.concat(), text);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 10);
        }
    }
}
