//! Multi-candidate answer aggregation.

use docqa_core::{AnswerExtractor, AnswerResult, Candidate, Retriever, SearchHit, StoreError};
use std::sync::Arc;
use tracing::{debug, warn};

/// Retrieves contexts for a question and picks the best extracted answer.
pub struct AnswerAggregator {
    /// Context source
    retriever: Arc<dyn Retriever>,
    /// Extractive answerer run on each context
    reader: Arc<dyn AnswerExtractor>,
}

impl AnswerAggregator {
    /// Create a new aggregator.
    pub fn new(retriever: Arc<dyn Retriever>, reader: Arc<dyn AnswerExtractor>) -> Self {
        Self { retriever, reader }
    }

    /// Answer `question` from up to `top_k` retrieved contexts.
    ///
    /// A failing extraction is recorded on its candidate with a zero score and
    /// does not abort the query. Retrieval errors are returned.
    pub async fn answer(&self, question: &str, top_k: usize) -> Result<AnswerResult, StoreError> {
        debug!("Answering: {}", question);

        let hits = self.retriever.search(question, top_k.max(1)).await?;
        if hits.is_empty() {
            return Ok(AnswerResult::no_documents());
        }

        let mut candidates = Vec::with_capacity(hits.len());
        for hit in hits {
            candidates.push(self.candidate(question, hit).await);
        }

        let best_answer = select_best(&candidates).cloned();
        debug!(
            "Scored {} candidates, best {:?}",
            candidates.len(),
            best_answer.as_ref().map(|c| c.score)
        );

        Ok(AnswerResult {
            best_answer,
            all_answers: candidates,
            message: None,
        })
    }

    async fn candidate(&self, question: &str, hit: SearchHit) -> Candidate {
        match self.reader.extract(question, &hit.text).await {
            Ok(extracted) => Candidate {
                answer: extracted.answer,
                score: sanitize_score(extracted.score),
                context: hit.text,
                record: hit.record,
                distance: hit.distance,
                error: None,
            },
            Err(e) => {
                warn!(
                    "{} failed on chunk {} of {}: {}",
                    self.reader.model_name(),
                    hit.record.chunk_index,
                    hit.record.source,
                    e
                );
                Candidate {
                    answer: String::new(),
                    score: 0.0,
                    context: hit.text,
                    record: hit.record,
                    distance: hit.distance,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

/// NaN scores rank as zero.
fn sanitize_score(score: f32) -> f32 {
    if score.is_nan() {
        0.0
    } else {
        score
    }
}

/// Highest-scoring candidate; the first one wins on ties.
fn select_best(candidates: &[Candidate]) -> Option<&Candidate> {
    let mut best: Option<&Candidate> = None;
    for candidate in candidates {
        if best.map_or(true, |b| candidate.score > b.score) {
            best = Some(candidate);
        }
    }
    best
}
