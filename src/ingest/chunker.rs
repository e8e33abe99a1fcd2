use thiserror::Error;

use crate::constants::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};

#[derive(Debug, Error, PartialEq)]
pub enum ChunkerError {
    #[error("chunk_size must be greater than 0")]
    ZeroChunkSize,

    #[error("chunk_overlap ({overlap}) must be smaller than chunk_size ({size})")]
    OverlapTooLarge { size: usize, overlap: usize },
}

/// A slice of a source document, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct TextChunk {
    pub text: String,
    pub source_id: String,
    pub chunk_index: usize,
}

/// Character-window splitter; consecutive windows share `chunk_overlap` characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Default for TextChunker {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl TextChunker {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self, ChunkerError> {
        if chunk_size == 0 {
            return Err(ChunkerError::ZeroChunkSize);
        }
        if chunk_overlap >= chunk_size {
            return Err(ChunkerError::OverlapTooLarge {
                size: chunk_size,
                overlap: chunk_overlap,
            });
        }

        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Splits `text`; whitespace-only windows are skipped and indices stay contiguous.
    pub fn split(&self, text: &str, source_id: &str) -> Vec<TextChunk> {
        let chars: Vec<char> = text.chars().collect();
        let step = self.chunk_size - self.chunk_overlap;

        let mut chunks = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            let window: String = chars[start..end].iter().collect();
            let trimmed = window.trim();

            if !trimmed.is_empty() {
                chunks.push(TextChunk {
                    text: trimmed.to_string(),
                    source_id: source_id.to_string(),
                    chunk_index: chunks.len(),
                });
            }

            if end == chars.len() {
                break;
            }
            start += step;
        }

        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_sizes() {
        assert_eq!(TextChunker::new(0, 0), Err(ChunkerError::ZeroChunkSize));
        assert_eq!(
            TextChunker::new(10, 10),
            Err(ChunkerError::OverlapTooLarge {
                size: 10,
                overlap: 10
            })
        );
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        let chunks = TextChunker::default().split("  hello world  ", "doc");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "hello world");
        assert_eq!(chunks[0].source_id, "doc");
        assert_eq!(chunks[0].chunk_index, 0);
    }

    #[test]
    fn test_windows_overlap() {
        let chunker = TextChunker::new(4, 2).unwrap();
        let texts: Vec<String> = chunker
            .split("abcdefgh", "doc")
            .into_iter()
            .map(|c| c.text)
            .collect();
        assert_eq!(texts, vec!["abcd", "cdef", "efgh"]);
    }

    #[test]
    fn test_no_overlap_covers_text_exactly() {
        let chunker = TextChunker::new(3, 0).unwrap();
        let texts: Vec<String> = chunker
            .split("abcdefg", "doc")
            .into_iter()
            .map(|c| c.text)
            .collect();
        assert_eq!(texts, vec!["abc", "def", "g"]);
    }

    #[test]
    fn test_whitespace_windows_skipped_and_indices_contiguous() {
        let chunker = TextChunker::new(4, 0).unwrap();
        let chunks = chunker.split("abcd        efgh", "doc");
        let indices: Vec<usize> = chunks.iter().map(|c| c.chunk_index).collect();
        assert_eq!(chunks.len(), 2);
        assert_eq!(indices, vec![0, 1]);
        assert_eq!(chunks[1].text, "efgh");
    }

    #[test]
    fn test_multibyte_text_splits_on_chars() {
        let chunker = TextChunker::new(2, 0).unwrap();
        let texts: Vec<String> = chunker
            .split("日本語で", "doc")
            .into_iter()
            .map(|c| c.text)
            .collect();
        assert_eq!(texts, vec!["日本", "語で"]);
    }

    #[test]
    fn test_empty_text_has_no_chunks() {
        assert!(TextChunker::default().split("", "doc").is_empty());
        assert!(TextChunker::default().split("   \n\t", "doc").is_empty());
    }
}
