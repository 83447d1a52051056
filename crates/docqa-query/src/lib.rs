//! Question answering over the docqa index.

pub mod aggregator;
pub mod reader;

pub use aggregator::AnswerAggregator;
pub use reader::LexicalReader;
