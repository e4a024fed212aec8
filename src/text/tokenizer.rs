// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::error::AppError;
use std::path::Path;
use tokenizers::Tokenizer as HfTokenizer;

/// Thin wrapper over a `tokenizer.json` with a hard context length.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    tokenizer: HfTokenizer,
    max_length: usize,
}

impl Tokenizer {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        Self::from_file_with_max_length(path, usize::MAX)
    }

    pub fn from_file_with_max_length<P: AsRef<Path>>(
        path: P,
        max_length: usize,
    ) -> Result<Self, AppError> {
        if max_length < 2 {
            return Err(AppError::ModelLoadError(format!(
                "Tokenizer max_length must be at least 2, got {}",
                max_length
            )));
        }

        let tokenizer = HfTokenizer::from_file(path.as_ref())
            .map_err(|e| AppError::ModelLoadError(e.to_string()))?;

        Ok(Self {
            tokenizer,
            max_length,
        })
    }

    /// Encodes `text`, truncating to the context length.
    ///
    /// With special tokens the trailing marker survives truncation, so a
    /// model pooling at the end-of-text position still finds it.
    pub fn encode(&self, text: &str, add_special_tokens: bool) -> Result<Encoding, AppError> {
        let encoding = self
            .tokenizer
            .encode(text, add_special_tokens)
            .map_err(|e| AppError::TokenizationError(e.to_string()))?;

        let mut ids = encoding.get_ids().to_vec();
        let original_len = ids.len();

        if ids.len() > self.max_length {
            let last = ids[ids.len() - 1];
            if add_special_tokens {
                ids.truncate(self.max_length - 1);
                ids.push(last);
            } else {
                ids.truncate(self.max_length);
            }
        }

        Ok(Encoding { ids, original_len })
    }

    pub fn decode(&self, ids: &[u32], skip_special_tokens: bool) -> Result<String, AppError> {
        self.tokenizer
            .decode(ids, skip_special_tokens)
            .map_err(|e| AppError::TokenizationError(e.to_string()))
    }

    pub fn get_max_length(&self) -> usize {
        self.max_length
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoding {
    pub ids: Vec<u32>,
    original_len: usize,
}

impl Encoding {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn get_ids(&self) -> &[u32] {
        &self.ids
    }

    pub fn is_truncated(&self) -> bool {
        self.original_len > self.ids.len()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Word-level tokenizer with CLIP-style start and end markers (ids 0 and 1).
    pub(crate) fn word_level_tokenizer_file() -> NamedTempFile {
        let special = |id: u32, content: &str| {
            serde_json::json!({
                "id": id,
                "content": content,
                "single_word": false,
                "lstrip": false,
                "rstrip": false,
                "normalized": false,
                "special": true
            })
        };
        let template_token = |id: &str| serde_json::json!({ "SpecialToken": { "id": id, "type_id": 0 } });
        let sequence = |id: &str| serde_json::json!({ "Sequence": { "id": id, "type_id": 0 } });

        let json = serde_json::json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": [
                special(0, "<|startoftext|>"),
                special(1, "<|endoftext|>")
            ],
            "normalizer": null,
            "pre_tokenizer": { "type": "Whitespace" },
            "post_processor": {
                "type": "TemplateProcessing",
                "single": [
                    template_token("<|startoftext|>"),
                    sequence("A"),
                    template_token("<|endoftext|>")
                ],
                "pair": [
                    template_token("<|startoftext|>"),
                    sequence("A"),
                    sequence("B"),
                    template_token("<|endoftext|>")
                ],
                "special_tokens": {
                    "<|startoftext|>": {
                        "id": "<|startoftext|>",
                        "ids": [0],
                        "tokens": ["<|startoftext|>"]
                    },
                    "<|endoftext|>": {
                        "id": "<|endoftext|>",
                        "ids": [1],
                        "tokens": ["<|endoftext|>"]
                    }
                }
            },
            "decoder": null,
            "model": {
                "type": "WordLevel",
                "vocab": {
                    "<|startoftext|>": 0,
                    "<|endoftext|>": 1,
                    "<unk>": 2,
                    "a": 3,
                    "photo": 4,
                    "of": 5,
                    "cat": 6,
                    "dog": 7
                },
                "unk_token": "<unk>"
            }
        });

        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        write!(file, "{}", json).unwrap();
        file
    }

    #[test]
    fn test_encode_adds_markers() {
        let file = word_level_tokenizer_file();
        let tokenizer = Tokenizer::from_file_with_max_length(file.path(), 77).unwrap();

        let encoding = tokenizer.encode("a photo of a cat", true).unwrap();
        assert_eq!(encoding.get_ids(), &[0, 3, 4, 5, 3, 6, 1]);
        assert!(!encoding.is_truncated());
    }

    #[test]
    fn test_encode_empty_text() {
        let file = word_level_tokenizer_file();
        let tokenizer = Tokenizer::from_file_with_max_length(file.path(), 77).unwrap();

        let encoding = tokenizer.encode("", true).unwrap();
        assert_eq!(encoding.get_ids(), &[0, 1]);
    }

    #[test]
    fn test_truncation_keeps_end_marker() {
        let file = word_level_tokenizer_file();
        let tokenizer = Tokenizer::from_file_with_max_length(file.path(), 5).unwrap();

        let long_text = "a photo of a dog ".repeat(40);
        let encoding = tokenizer.encode(&long_text, true).unwrap();

        assert_eq!(encoding.len(), 5);
        assert!(encoding.is_truncated());
        assert_eq!(encoding.ids[0], 0);
        assert_eq!(*encoding.ids.last().unwrap(), 1);
    }

    #[test]
    fn test_truncation_without_special_tokens() {
        let file = word_level_tokenizer_file();
        let tokenizer = Tokenizer::from_file_with_max_length(file.path(), 3).unwrap();

        let encoding = tokenizer.encode("a photo of a cat", false).unwrap();
        assert_eq!(encoding.get_ids(), &[3, 4, 5]);
    }

    #[test]
    fn test_unknown_words_map_to_unk() {
        let file = word_level_tokenizer_file();
        let tokenizer = Tokenizer::from_file(file.path()).unwrap();

        let encoding = tokenizer.encode("zebra", false).unwrap();
        assert_eq!(encoding.get_ids(), &[2]);
    }

    #[test]
    fn test_decode_skips_special_tokens() {
        let file = word_level_tokenizer_file();
        let tokenizer = Tokenizer::from_file(file.path()).unwrap();

        let decoded = tokenizer.decode(&[0, 3, 6, 1], true).unwrap();
        assert_eq!(decoded, "a cat");
    }

    #[test]
    fn test_missing_file() {
        let result = Tokenizer::from_file("/nonexistent/tokenizer.json");
        assert!(matches!(result, Err(AppError::ModelLoadError(_))));
    }

    #[test]
    fn test_rejects_tiny_max_length() {
        let file = word_level_tokenizer_file();
        assert!(Tokenizer::from_file_with_max_length(file.path(), 1).is_err());
    }
}
