//! Property tests for in-memory index search ordering and bounds.

use paperqa_index::document::Chunk;
use paperqa_index::index::{InMemoryIndex, VectorIndex};
use proptest::prelude::*;

/// Generate a non-zero L2-normalized embedding of the given dimension.
fn arb_normalized_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter_map("non-zero embedding", |mut v| {
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm < 1e-8 {
            return None;
        }
        for val in &mut v {
            *val /= norm;
        }
        Some(v)
    })
}

/// Generate the chunk set of one document: positional ids, normalized
/// embeddings.
fn arb_chunks(dim: usize) -> impl Strategy<Value = Vec<Chunk>> {
    proptest::collection::vec(("[a-z ]{5,30}", arb_normalized_embedding(dim)), 1..20).prop_map(
        |entries| {
            entries
                .into_iter()
                .enumerate()
                .map(|(index, (text, embedding))| Chunk {
                    id: format!("paper_{index}"),
                    index,
                    text,
                    embedding,
                    document_id: "paper".to_string(),
                })
                .collect()
        },
    )
}

const DIM: usize = 16;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Search returns at most `top_k` results, ordered by descending
    /// score, and only chunks that were actually indexed.
    #[test]
    fn search_is_bounded_ordered_and_drawn_from_indexed_set(
        chunks in arb_chunks(DIM),
        query in arb_normalized_embedding(DIM),
        top_k in 1usize..25,
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let (results, indexed_ids) = rt.block_on(async {
            let index = InMemoryIndex::new();
            let indexed_ids: Vec<String> = chunks.iter().map(|c| c.id.clone()).collect();
            index.replace(chunks).await.unwrap();
            let results = index.search(&query, top_k).await.unwrap();
            (results, indexed_ids)
        });

        prop_assert!(results.len() <= top_k);
        prop_assert!(results.len() <= indexed_ids.len());

        for result in &results {
            prop_assert!(indexed_ids.contains(&result.chunk.id));
        }

        for window in results.windows(2) {
            prop_assert!(
                window[0].score >= window[1].score,
                "results not in descending order: {} < {}",
                window[0].score,
                window[1].score,
            );
        }
    }
}

#[tokio::test]
async fn replace_discards_previously_indexed_chunks() {
    let index = InMemoryIndex::new();

    let old = vec![Chunk {
        id: "old_0".to_string(),
        index: 0,
        text: "stale".to_string(),
        embedding: vec![1.0, 0.0],
        document_id: "old".to_string(),
    }];
    index.replace(old).await.unwrap();
    assert_eq!(index.len().await, 1);

    let new = vec![
        Chunk {
            id: "new_0".to_string(),
            index: 0,
            text: "fresh".to_string(),
            embedding: vec![0.0, 1.0],
            document_id: "new".to_string(),
        },
        Chunk {
            id: "new_1".to_string(),
            index: 1,
            text: "fresher".to_string(),
            embedding: vec![0.0, -1.0],
            document_id: "new".to_string(),
        },
    ];
    index.replace(new).await.unwrap();
    assert_eq!(index.len().await, 2);

    let results = index.search(&[1.0, 0.0], 10).await.unwrap();
    assert!(results.iter().all(|r| r.chunk.document_id == "new"));
}

#[tokio::test]
async fn equal_scores_tie_break_by_chunk_index() {
    let index = InMemoryIndex::new();
    let chunks: Vec<Chunk> = (0..4)
        .map(|i| Chunk {
            id: format!("paper_{i}"),
            index: i,
            text: format!("chunk {i}"),
            embedding: vec![1.0, 0.0],
            document_id: "paper".to_string(),
        })
        .collect();
    index.replace(chunks).await.unwrap();

    let results = index.search(&[1.0, 0.0], 4).await.unwrap();
    let order: Vec<usize> = results.iter().map(|r| r.chunk.index).collect();
    assert_eq!(order, vec![0, 1, 2, 3]);
}
