//! Deterministic overlapping chunking over extracted text.
//!
//! The indexing stage downstream owns the chunks; this module only
//! guarantees that splitting the same text with the same configuration
//! always yields the same chunks with stable byte offsets.

use serde::Serialize;

use crate::config::ChunkConfig;

/// A contiguous window of the source text. `offset` is a byte offset into
/// the exact string that was split, so callers can map chunks back to
/// document positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    /// Position of this chunk in document order.
    pub index: usize,
    /// Byte offset of the chunk's first character in the source text.
    pub offset: usize,
    /// The chunk text.
    pub text: String,
}

/// Splits text into overlapping windows measured in characters, breaking at
/// whitespace near the window end when possible.
pub struct Chunker {
    config: ChunkConfig,
}

impl Chunker {
    /// `config` must satisfy `overlap < size` (enforced by config
    /// validation).
    pub fn new(config: ChunkConfig) -> Self {
        Self { config }
    }

    pub fn split(&self, text: &str) -> Vec<Chunk> {
        let size = self.config.size;
        let overlap = self.config.overlap;

        // Char-indexed view: byte offset of every char, plus a sentinel so
        // slicing [start..end] works for the final chunk.
        let mut offsets: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        offsets.push(text.len());
        let n = offsets.len() - 1;

        if n == 0 {
            return Vec::new();
        }

        let chars: Vec<char> = text.chars().collect();
        let mut chunks = Vec::new();
        let mut start = 0usize;

        loop {
            let mut end = (start + size).min(n);

            // Prefer a whitespace boundary in the back half of the window,
            // so words aren't cut mid-token. Never applies to the last
            // chunk, which just runs to the end.
            if end < n {
                let search_floor = start + (size / 2).max(1);
                if let Some(ws) = (search_floor..end).rev().find(|&i| chars[i].is_whitespace()) {
                    end = ws + 1;
                }
            }

            chunks.push(Chunk {
                index: chunks.len(),
                offset: offsets[start],
                text: text[offsets[start]..offsets[end]].to_string(),
            });

            if end >= n {
                break;
            }
            // Progress even when a large overlap meets a shrunk window.
            start = end.saturating_sub(overlap).max(start + 1);
        }

        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunker(size: usize, overlap: usize) -> Chunker {
        Chunker::new(ChunkConfig { size, overlap })
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(chunker(10, 2).split("").is_empty());
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let chunks = chunker(100, 10).split("short text");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "short text");
        assert_eq!(chunks[0].offset, 0);
    }

    #[test]
    fn exact_windows_without_whitespace() {
        // No whitespace, so the soft boundary never kicks in.
        let chunks = chunker(4, 2).split("abcdefghij");
        let texts: Vec<_> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["abcd", "cdef", "efgh", "ghij"]);
        let offsets: Vec<_> = chunks.iter().map(|c| c.offset).collect();
        assert_eq!(offsets, vec![0, 2, 4, 6]);
    }

    #[test]
    fn neighbors_overlap() {
        let text = "abcdefghijklmnopqrstuvwxyz";
        let chunks = chunker(10, 3).split(text);
        for pair in chunks.windows(2) {
            let prev_end = pair[0].offset + pair[0].text.len();
            assert!(pair[1].offset < prev_end, "chunks must overlap");
        }
    }

    #[test]
    fn offsets_map_back_into_source_text() {
        let text = "The quick brown fox jumps over the lazy dog, twice over.";
        let chunks = chunker(16, 4).split(text);
        for chunk in &chunks {
            assert_eq!(&text[chunk.offset..chunk.offset + chunk.text.len()], chunk.text);
        }
    }

    #[test]
    fn prefers_breaking_at_whitespace() {
        let text = "alpha beta gamma delta epsilon zeta";
        let chunks = chunker(12, 2).split(text);
        for chunk in &chunks[..chunks.len() - 1] {
            assert!(
                chunk.text.ends_with(char::is_whitespace),
                "chunk {:?} should end at a word boundary",
                chunk.text
            );
        }
    }

    #[test]
    fn splitting_is_idempotent() {
        let text = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do \
                    eiusmod tempor incididunt ut labore et dolore magna aliqua.";
        let c = chunker(30, 8);
        assert_eq!(c.split(text), c.split(text));
    }

    #[test]
    fn multibyte_text_keeps_valid_offsets() {
        let text = "héllo wörld ünïcode tèxt gôes ön and ön ærøß";
        let chunks = chunker(10, 3).split(text);
        for chunk in &chunks {
            assert!(text.is_char_boundary(chunk.offset));
            assert_eq!(&text[chunk.offset..chunk.offset + chunk.text.len()], chunk.text);
        }
    }

    #[test]
    fn indices_are_sequential_document_order() {
        let chunks = chunker(5, 1).split("abcdefghijklmno");
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
        }
        for pair in chunks.windows(2) {
            assert!(pair[0].offset < pair[1].offset);
        }
    }
}
