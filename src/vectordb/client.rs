use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    Condition, CreateCollectionBuilder, DeletePointsBuilder, Distance, Filter, PointStruct, Range,
    SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder,
};
use tracing::debug;

use super::WriteConsistency;
use super::error::VectorDbError;
use super::model::{
    PAYLOAD_CHUNK_INDEX, PAYLOAD_SOURCE_ID, PassagePoint, candidate_from_scored_point,
};
use crate::gate::Candidate;

/// Qdrant collection holding corpus passages.
#[derive(Clone)]
pub struct QdrantIndex {
    client: Qdrant,
    url: String,
    collection: String,
}

impl QdrantIndex {
    pub fn new(url: &str, collection: &str) -> Result<Self, VectorDbError> {
        let client =
            Qdrant::from_url(url)
                .build()
                .map_err(|e| VectorDbError::ConnectionFailed {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;

        Ok(Self {
            client,
            url: url.to_string(),
            collection: collection.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub async fn health_check(&self) -> Result<(), VectorDbError> {
        self.client
            .health_check()
            .await
            .map_err(|e| VectorDbError::ConnectionFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn create_collection(&self, vector_size: u64) -> Result<(), VectorDbError> {
        let vectors_config = VectorParamsBuilder::new(vector_size, Distance::Cosine);

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(vectors_config)
                    .on_disk_payload(true),
            )
            .await
            .map_err(|e| VectorDbError::CreateCollectionFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        Ok(())
    }
}

/// Vector-search collaborator feeding the gate.
///
/// `search` must return candidates sorted by score, descending, ties in index order.
pub trait VectorIndex: Send + Sync {
    /// Creates the collection if missing.
    fn ensure_collection(
        &self,
        vector_size: u64,
    ) -> impl std::future::Future<Output = Result<(), VectorDbError>> + Send;

    fn upsert_passages(
        &self,
        points: Vec<PassagePoint>,
        consistency: WriteConsistency,
    ) -> impl std::future::Future<Output = Result<(), VectorDbError>> + Send;

    /// Top-`k` passages by similarity to `query`.
    fn search(
        &self,
        query: Vec<f32>,
        k: u64,
    ) -> impl std::future::Future<Output = Result<Vec<Candidate>, VectorDbError>> + Send;

    /// Removes every chunk ingested under `source_id`.
    fn delete_source(
        &self,
        source_id: &str,
    ) -> impl std::future::Future<Output = Result<(), VectorDbError>> + Send;

    /// Removes chunks of `source_id` whose `chunk_index` is `first_stale` or higher.
    fn delete_stale_chunks(
        &self,
        source_id: &str,
        first_stale: usize,
    ) -> impl std::future::Future<Output = Result<(), VectorDbError>> + Send;
}

impl VectorIndex for QdrantIndex {
    async fn ensure_collection(&self, vector_size: u64) -> Result<(), VectorDbError> {
        let exists = self
            .client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| VectorDbError::CreateCollectionFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        if !exists {
            debug!(collection = %self.collection, vector_size, "Creating collection");
            self.create_collection(vector_size).await?;
        }

        Ok(())
    }

    async fn upsert_passages(
        &self,
        points: Vec<PassagePoint>,
        consistency: WriteConsistency,
    ) -> Result<(), VectorDbError> {
        if points.is_empty() {
            return Ok(());
        }

        let qdrant_points: Vec<PointStruct> = points
            .into_iter()
            .map(|p| {
                let payload = p.payload();
                PointStruct::new(p.id, p.vector, payload)
            })
            .collect();

        self.client
            .upsert_points(
                UpsertPointsBuilder::new(&self.collection, qdrant_points)
                    .wait(consistency.into()),
            )
            .await
            .map_err(|e| VectorDbError::UpsertFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        Ok(())
    }

    async fn search(&self, query: Vec<f32>, k: u64) -> Result<Vec<Candidate>, VectorDbError> {
        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.collection, query, k).with_payload(true),
            )
            .await
            .map_err(|e| VectorDbError::SearchFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        Ok(response
            .result
            .into_iter()
            .filter_map(candidate_from_scored_point)
            .collect())
    }

    async fn delete_source(&self, source_id: &str) -> Result<(), VectorDbError> {
        let filter = Filter::must([Condition::matches(
            PAYLOAD_SOURCE_ID,
            source_id.to_string(),
        )]);

        self.delete_by_filter(filter).await
    }

    async fn delete_stale_chunks(
        &self,
        source_id: &str,
        first_stale: usize,
    ) -> Result<(), VectorDbError> {
        let filter = Filter::must([
            Condition::matches(PAYLOAD_SOURCE_ID, source_id.to_string()),
            Condition::range(
                PAYLOAD_CHUNK_INDEX,
                Range {
                    gte: Some(first_stale as f64),
                    ..Default::default()
                },
            ),
        ]);

        self.delete_by_filter(filter).await
    }
}

impl QdrantIndex {
    async fn delete_by_filter(&self, filter: Filter) -> Result<(), VectorDbError> {
        self.client
            .delete_points(
                DeletePointsBuilder::new(&self.collection)
                    .points(filter)
                    .wait(true),
            )
            .await
            .map_err(|e| VectorDbError::DeleteFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        Ok(())
    }
}
