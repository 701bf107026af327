//! Product Service - Business logic layer

use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, DeleteAck, InsertAck, Product, UpdateAck, UpdateProduct};
use crate::patch::ProductPatch;
use crate::repository::ProductRepository;

/// Product service providing business logic operations
///
/// Validates input, applies creation defaults and turns absent documents
/// into [`ProductError::NotFound`].
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self) -> ProductResult<Vec<Product>> {
        self.repository.list().await
    }

    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_product(&self, id: ObjectId) -> ProductResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// Create a product, filling in `date`, `priority` and `imageUrl`
    #[instrument(skip(self, input))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<InsertAck> {
        if let Err(e) = input.validate() {
            tracing::debug!(error = %e, "Rejected product");
            return Err(ProductError::MissingRequiredFields);
        }

        let product = Product::try_from(input)?;
        self.repository.create(product).await
    }

    /// Merge the supplied fields and return the store's acknowledgment
    #[instrument(skip(self, input), fields(id = %id))]
    pub async fn update_product(
        &self,
        id: ObjectId,
        input: UpdateProduct,
    ) -> ProductResult<UpdateAck> {
        let patch = Self::non_empty_patch(input)?;

        let ack = self.repository.update(id, patch).await?;
        if ack.matched_count == 0 {
            return Err(ProductError::NotFound(id));
        }
        Ok(ack)
    }

    /// Merge the supplied fields and return the updated product
    #[instrument(skip(self, input), fields(id = %id))]
    pub async fn update_and_fetch_product(
        &self,
        id: ObjectId,
        input: UpdateProduct,
    ) -> ProductResult<Product> {
        let patch = Self::non_empty_patch(input)?;

        self.repository
            .update_and_fetch(id, patch)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_product(&self, id: ObjectId) -> ProductResult<DeleteAck> {
        let ack = self.repository.delete(id).await?;
        if ack.deleted_count == 0 {
            return Err(ProductError::NotFound(id));
        }
        Ok(ack)
    }

    fn non_empty_patch(input: UpdateProduct) -> ProductResult<ProductPatch> {
        let patch = input.into_patch();
        if patch.is_empty() {
            return Err(ProductError::EmptyPatch);
        }
        Ok(patch)
    }
}
