use async_trait::async_trait;

use super::{SourceError, TextSource};
use crate::document::Document;

pub const SAMPLE_SENTENCES: [&str; 6] = [
    "I want to open a account.",
    "I want a credit card.",
    "I need to update my address.",
    "I want to apply for a loan.",
    "How do I check my balance?",
    "I lost my debit card.",
];

const SAMPLE_SOURCE_NAME: &str = "sample";

/// A fixed in-memory list of sentences.
///
/// `Default` gives the banking sample sentences, any other list can be passed to `new`.
/// Fetches are deterministic and return the sentences in list order.
#[derive(Debug, Clone)]
pub struct SampleTextSource {
    sentences: Vec<String>,
}

impl SampleTextSource {
    pub fn new<I, S>(sentences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sentences: sentences.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for SampleTextSource {
    fn default() -> Self {
        Self::new(SAMPLE_SENTENCES)
    }
}

#[async_trait]
impl TextSource for SampleTextSource {
    async fn fetch(&self, limit: usize) -> Result<Vec<Document>, SourceError> {
        Ok(self
            .sentences
            .iter()
            .take(limit)
            .map(|s| Document::from_source(s.as_str(), SAMPLE_SOURCE_NAME))
            .collect())
    }

    fn name(&self) -> &str {
        SAMPLE_SOURCE_NAME
    }
}
