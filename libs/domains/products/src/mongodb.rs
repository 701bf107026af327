//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database,
    bson::{Document, doc, oid::ObjectId},
    options::ReturnDocument,
};
use tracing::instrument;

use crate::error::{ProductError, ProductResult};
use crate::models::{DeleteAck, InsertAck, Product, UpdateAck};
use crate::patch::ProductPatch;
use crate::repository::ProductRepository;

/// Collection holding product documents.
pub const COLLECTION_NAME: &str = "products";

/// Newest first: ObjectIds lead with their creation time.
fn newest_first() -> Document {
    doc! { "_id": -1 }
}

/// MongoDB implementation of the ProductRepository
#[derive(Clone)]
pub struct MongoProductRepository {
    collection: Collection<Product>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, COLLECTION_NAME)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection::<Product>(collection_name);
        Self { collection }
    }

    /// Get the underlying collection for advanced operations
    pub fn collection(&self) -> &Collection<Product> {
        &self.collection
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self))]
    async fn list(&self) -> ProductResult<Vec<Product>> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(newest_first())
            .await?;

        let products: Vec<Product> = cursor.try_collect().await?;
        tracing::debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_by_id(&self, id: ObjectId) -> ProductResult<Option<Product>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    #[instrument(skip(self, product), fields(title = %product.title))]
    async fn create(&self, product: Product) -> ProductResult<InsertAck> {
        let result = self.collection.insert_one(&product).await?;

        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            ProductError::Internal(format!(
                "Store returned a non-ObjectId id: {}",
                result.inserted_id
            ))
        })?;

        tracing::info!(id = %id, "Product created");
        Ok(InsertAck {
            acknowledged: true,
            inserted_id: id.to_hex(),
        })
    }

    #[instrument(skip(self, patch), fields(id = %id, fields = patch.len()))]
    async fn update(&self, id: ObjectId, patch: ProductPatch) -> ProductResult<UpdateAck> {
        let result = self
            .collection
            .update_one(doc! { "_id": id }, patch.into_update())
            .await?;

        Ok(UpdateAck {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
        })
    }

    #[instrument(skip(self, patch), fields(id = %id, fields = patch.len()))]
    async fn update_and_fetch(
        &self,
        id: ObjectId,
        patch: ProductPatch,
    ) -> ProductResult<Option<Product>> {
        Ok(self
            .collection
            .find_one_and_update(doc! { "_id": id }, patch.into_update())
            .return_document(ReturnDocument::After)
            .await?)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: ObjectId) -> ProductResult<DeleteAck> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;

        Ok(DeleteAck {
            acknowledged: true,
            deleted_count: result.deleted_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::Client;

    /// Nothing listens on port 1; operations fail server selection quickly.
    async fn unreachable_repository() -> MongoProductRepository {
        let client = Client::with_uri_str(
            "mongodb://127.0.0.1:1/?directConnection=true&serverSelectionTimeoutMS=200",
        )
        .await
        .unwrap();
        MongoProductRepository::new(&client.database("shop_test"))
    }

    #[test]
    fn test_list_sorts_by_descending_id() {
        assert_eq!(newest_first(), doc! { "_id": -1 });
    }

    #[tokio::test]
    async fn test_collection_name() {
        let repo = unreachable_repository().await;
        assert_eq!(repo.collection().name(), COLLECTION_NAME);
    }

    #[tokio::test]
    async fn test_unreachable_store_is_unavailable() {
        let repo = unreachable_repository().await;

        let err = repo.get_by_id(ObjectId::new()).await.unwrap_err();
        assert!(
            matches!(err, ProductError::StoreUnavailable(_)),
            "unexpected error: {err:?}"
        );
    }
}
