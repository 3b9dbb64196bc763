//! Property tests for the vector index ranking.

use std::collections::HashMap;

use async_trait::async_trait;
use proptest::prelude::*;
use simsearch::{
    document::Document,
    embeddings::{EmbedderError, EmbeddingModel},
    vector_index::{cosine_distance, VectorIndex},
};

const DIM: usize = 8;

/// Looks texts up in a fixed table of vectors.
struct TableModel {
    vectors: HashMap<String, Vec<f64>>,
}

#[async_trait]
impl EmbeddingModel for TableModel {
    async fn embed(&self, data: &str) -> Result<Vec<f64>, EmbedderError> {
        self.vectors
            .get(data)
            .cloned()
            .ok_or_else(|| EmbedderError::ProviderError(format!("no vector for `{data}`")))
    }

    fn dimension(&self) -> usize {
        DIM
    }

    fn model_name(&self) -> &str {
        "table"
    }
}

/// Generate a vector with norm well away from zero.
fn arb_vector() -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec(-1.0f64..1.0f64, DIM)
        .prop_filter("non-zero vector", |v| v.iter().map(|x| x * x).sum::<f64>() > 1e-6)
}

fn build(vectors: &[Vec<f64>]) -> (VectorIndex, TableModel) {
    let model = TableModel {
        vectors: vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (format!("doc-{i}"), v.clone()))
            .collect(),
    };
    let documents = (0..vectors.len())
        .map(|i| Document::from_source(format!("doc-{i}"), "test"))
        .collect();
    let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
    let index = rt.block_on(VectorIndex::build(documents, &model)).unwrap();
    (index, model)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn every_document_is_its_own_nearest_neighbor(
        vectors in proptest::collection::vec(arb_vector(), 1..20),
    ) {
        let (index, model) = build(&vectors);
        for (i, vector) in vectors.iter().enumerate() {
            let results = index.query(vector, 1).unwrap();
            prop_assert_eq!(results.len(), 1);
            let top = &results[0];
            prop_assert!(top.distance.abs() < 1e-9, "self distance {}", top.distance);
            // duplicates or parallel vectors may tie, the winner must still be at distance ~0
            let top_vector = &model.vectors[top.document.content()];
            prop_assert!(cosine_distance(top_vector, &vectors[i]).abs() < 1e-9);
        }
    }

    #[test]
    fn results_sorted_ascending_and_ranked(
        vectors in proptest::collection::vec(arb_vector(), 1..20),
        query in arb_vector(),
        k in 1usize..25,
    ) {
        let (index, _) = build(&vectors);
        let results = index.query(&query, k).unwrap();

        prop_assert_eq!(results.len(), k.min(vectors.len()));
        for window in results.windows(2) {
            prop_assert!(window[0].distance <= window[1].distance);
        }
        for (i, result) in results.iter().enumerate() {
            prop_assert_eq!(result.rank, i + 1);
        }
    }

    #[test]
    fn oversized_k_returns_whole_index(
        vectors in proptest::collection::vec(arb_vector(), 1..10),
        query in arb_vector(),
    ) {
        let (index, _) = build(&vectors);
        prop_assert_eq!(index.query(&query, vectors.len() + 5).unwrap().len(), vectors.len());
    }

    #[test]
    fn cosine_distance_is_symmetric(a in arb_vector(), b in arb_vector()) {
        prop_assert_eq!(cosine_distance(&a, &b), cosine_distance(&b, &a));
    }

    #[test]
    fn zero_vector_is_at_distance_one(a in proptest::collection::vec(-1.0f64..1.0f64, DIM)) {
        let zero = vec![0.0; DIM];
        prop_assert_eq!(cosine_distance(&zero, &a), 1.0);
        prop_assert_eq!(cosine_distance(&a, &zero), 1.0);
    }
}
