use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::error::ProductResult;
use crate::models::{DeleteAck, InsertAck, Product, UpdateAck};
use crate::patch::ProductPatch;

/// Repository trait for Product persistence
///
/// Each method is a single round-trip to the document store. Absence is
/// reported through `Option` and acknowledgment counts; turning those into
/// errors is the service's job.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All products, newest first
    async fn list(&self) -> ProductResult<Vec<Product>>;

    async fn get_by_id(&self, id: ObjectId) -> ProductResult<Option<Product>>;

    /// Insert a new product; the store assigns the id
    async fn create(&self, product: Product) -> ProductResult<InsertAck>;

    /// Merge `patch` into the product and report the counts
    async fn update(&self, id: ObjectId, patch: ProductPatch) -> ProductResult<UpdateAck>;

    /// Merge `patch` into the product and return the document after the update
    async fn update_and_fetch(
        &self,
        id: ObjectId,
        patch: ProductPatch,
    ) -> ProductResult<Option<Product>>;

    async fn delete(&self, id: ObjectId) -> ProductResult<DeleteAck>;
}
