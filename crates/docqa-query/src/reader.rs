//! Offline extractive answerer based on term overlap.
//!
//! Each sentence of the context is scored by the fraction of the question's
//! distinct content words it contains. The best sentence is returned verbatim
//! together with its byte span in the context.

use async_trait::async_trait;
use docqa_core::{AnswerError, AnswerExtractor, ExtractedAnswer};
use std::collections::BTreeSet;
use unicode_segmentation::UnicodeSegmentation;

/// Default upper bound on context length, in words.
pub const DEFAULT_MAX_CONTEXT_WORDS: usize = 2048;

const STOPWORDS: &[&str] = &[
    "a", "about", "an", "and", "are", "as", "at", "be", "by", "can", "could", "did", "do", "does",
    "for", "from", "has", "have", "how", "i", "in", "is", "it", "its", "me", "of", "on", "or",
    "that", "the", "their", "there", "these", "this", "those", "to", "was", "were", "what",
    "when", "where", "which", "who", "whom", "whose", "why", "will", "with", "would", "you",
];

/// Sentence-level lexical answer extractor.
pub struct LexicalReader {
    max_context_words: usize,
}

impl LexicalReader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_context_words: DEFAULT_MAX_CONTEXT_WORDS,
        }
    }

    /// Reader that rejects contexts longer than `max_context_words`.
    #[must_use]
    pub fn with_max_context_words(max_context_words: usize) -> Self {
        Self { max_context_words }
    }

    fn best_sentence(&self, terms: &BTreeSet<String>, context: &str) -> ExtractedAnswer {
        let mut best = ExtractedAnswer {
            answer: String::new(),
            score: 0.0,
            start: 0,
            end: 0,
        };

        for (offset, raw) in context.split_sentence_bound_indices() {
            let sentence = raw.trim();
            if sentence.is_empty() {
                continue;
            }

            let words: BTreeSet<String> = content_terms(sentence).collect();
            let matched = terms.iter().filter(|t| words.contains(*t)).count();
            let score = matched as f32 / terms.len() as f32;

            if score > best.score {
                let start = offset + (raw.len() - raw.trim_start().len());
                best = ExtractedAnswer {
                    answer: sentence.to_string(),
                    score,
                    start,
                    end: start + sentence.len(),
                };
            }
        }

        best
    }
}

impl Default for LexicalReader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnswerExtractor for LexicalReader {
    fn model_name(&self) -> &str {
        "lexical-overlap"
    }

    async fn extract(&self, question: &str, context: &str) -> Result<ExtractedAnswer, AnswerError> {
        let words = context.split_whitespace().count();
        if words > self.max_context_words {
            return Err(AnswerError::ContextTooLong {
                words,
                max: self.max_context_words,
            });
        }

        let terms: BTreeSet<String> = content_terms(question).collect();
        if terms.is_empty() {
            return Ok(ExtractedAnswer {
                answer: String::new(),
                score: 0.0,
                start: 0,
                end: 0,
            });
        }

        Ok(self.best_sentence(&terms, context))
    }
}

/// Lowercase alphanumeric tokens that are not stopwords.
fn content_terms(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .filter(|token| !STOPWORDS.contains(&token.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTEXT: &str = "Emperor penguins breed in winter.  Most penguins live in the \
                           Southern Hemisphere. They eat krill and fish.";

    #[tokio::test]
    async fn test_returns_best_sentence_verbatim() {
        let reader = LexicalReader::new();

        let answer = reader
            .extract("Where do penguins live?", CONTEXT)
            .await
            .unwrap();

        assert_eq!(answer.answer, "Most penguins live in the Southern Hemisphere.");
        assert_eq!(&CONTEXT[answer.start..answer.end], answer.answer);
        assert!((answer.score - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_partial_overlap_score() {
        let reader = LexicalReader::new();

        let answer = reader
            .extract("What do penguins eat for breakfast?", CONTEXT)
            .await
            .unwrap();

        // Every sentence matches one of {penguins, eat, breakfast}; the first wins
        assert_eq!(answer.answer, "Emperor penguins breed in winter.");
        assert!((answer.score - 1.0 / 3.0).abs() < 1e-6);
        assert_eq!(answer.start, 0);
    }

    #[tokio::test]
    async fn test_no_overlap_is_empty_answer() {
        let reader = LexicalReader::new();
        let answer = reader.extract("Who wrote Hamlet?", CONTEXT).await.unwrap();
        assert!(answer.answer.is_empty());
        assert_eq!(answer.score, 0.0);
    }

    #[tokio::test]
    async fn test_stopword_only_question_is_empty_answer() {
        let reader = LexicalReader::new();
        let answer = reader.extract("What is it?", CONTEXT).await.unwrap();
        assert!(answer.answer.is_empty());
        assert_eq!(answer.score, 0.0);
    }

    #[tokio::test]
    async fn test_context_too_long() {
        let reader = LexicalReader::with_max_context_words(5);
        let result = reader.extract("penguins", CONTEXT).await;
        assert!(matches!(
            result,
            Err(AnswerError::ContextTooLong { words: 17, max: 5 })
        ));
    }

    #[test]
    fn test_content_terms() {
        let terms: Vec<String> = content_terms("Where do the Penguins LIVE?").collect();
        assert_eq!(terms, vec!["penguins", "live"]);
    }

    #[test]
    fn test_model_name() {
        assert_eq!(LexicalReader::default().model_name(), "lexical-overlap");
    }
}
