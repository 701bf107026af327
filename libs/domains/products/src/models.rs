use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::ProductError;
use crate::patch::ProductPatch;

/// Priority given to products created without one.
pub const DEFAULT_PRIORITY: &str = "Medium";

/// Image shown for products created without one.
pub const DEFAULT_IMAGE_URL: &str = "https://via.placeholder.com/150";

fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

fn default_priority() -> String {
    DEFAULT_PRIORITY.to_string()
}

fn default_image_url() -> String {
    DEFAULT_IMAGE_URL.to_string()
}

/// Product document as stored in the `products` collection.
///
/// Documents missing `date`, `priority` or `imageUrl` read back with the
/// creation defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub short_description: String,
    pub full_description: String,
    #[serde(deserialize_with = "price::deserialize")]
    pub price: f64,
    #[serde(default = "today", deserialize_with = "stored::date")]
    pub date: String,
    #[serde(default = "default_priority", deserialize_with = "stored::priority")]
    pub priority: String,
    #[serde(default = "default_image_url", deserialize_with = "stored::image_url")]
    pub image_url: String,
}

/// Older documents may hold `null` or `""` where a default now applies.
mod stored {
    use serde::{Deserialize, Deserializer};

    fn or_default<'de, D: Deserializer<'de>>(
        deserializer: D,
        default: fn() -> String,
    ) -> Result<String, D::Error> {
        Ok(Option::<String>::deserialize(deserializer)?
            .filter(|s| !s.is_empty())
            .unwrap_or_else(default))
    }

    pub fn date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        or_default(deserializer, super::today)
    }

    pub fn priority<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        or_default(deserializer, super::default_priority)
    }

    pub fn image_url<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        or_default(deserializer, super::default_image_url)
    }
}

impl TryFrom<CreateProduct> for Product {
    type Error = ProductError;

    /// Fills in `date`, `priority` and `imageUrl` when absent or empty.
    fn try_from(input: CreateProduct) -> Result<Self, Self::Error> {
        let required = |value: Option<String>| {
            value
                .filter(|s| !s.is_empty())
                .ok_or(ProductError::MissingRequiredFields)
        };

        Ok(Self {
            id: None,
            title: required(input.title)?,
            short_description: required(input.short_description)?,
            full_description: required(input.full_description)?,
            price: input.price.ok_or(ProductError::MissingRequiredFields)?,
            date: input.date.filter(|s| !s.is_empty()).unwrap_or_else(today),
            priority: input
                .priority
                .filter(|s| !s.is_empty())
                .unwrap_or_else(default_priority),
            image_url: input
                .image_url
                .filter(|s| !s.is_empty())
                .unwrap_or_else(default_image_url),
        })
    }
}

/// Product as returned to clients, with `_id` as a hex string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    #[serde(rename = "_id")]
    #[schema(example = "65f1c0ffee0000000000beef")]
    pub id: String,
    #[schema(example = "Desk lamp")]
    pub title: String,
    pub short_description: String,
    pub full_description: String,
    #[schema(example = 24.99)]
    pub price: f64,
    #[schema(example = "2024-03-13")]
    pub date: String,
    #[schema(example = "Medium")]
    pub priority: String,
    pub image_url: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.map(|id| id.to_hex()).unwrap_or_default(),
            title: product.title,
            short_description: product.short_description,
            full_description: product.full_description,
            price: product.price,
            date: product.date,
            priority: product.priority,
            image_url: product.image_url,
        }
    }
}

/// Body of `POST /products`.
///
/// `price` may be sent as a number or a numeric string.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    #[validate(required, length(min = 1))]
    pub title: Option<String>,
    #[validate(required, length(min = 1))]
    pub short_description: Option<String>,
    #[validate(required, length(min = 1))]
    pub full_description: Option<String>,
    #[validate(required)]
    #[serde(default, deserialize_with = "price::deserialize_option")]
    #[schema(value_type = Option<f64>, example = 24.99)]
    pub price: Option<f64>,
    /// `YYYY-MM-DD`, defaults to today (UTC)
    pub date: Option<String>,
    /// Defaults to `Medium`
    pub priority: Option<String>,
    pub image_url: Option<String>,
}

/// Body of `PATCH`/`PUT /products/{id}`.
///
/// Only non-empty fields are written; everything else keeps its stored value.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    pub title: Option<String>,
    pub short_description: Option<String>,
    pub full_description: Option<String>,
    #[serde(default, deserialize_with = "price::deserialize_option")]
    #[schema(value_type = Option<f64>)]
    pub price: Option<f64>,
    pub date: Option<String>,
    pub priority: Option<String>,
    pub image_url: Option<String>,
}

impl UpdateProduct {
    pub fn into_patch(self) -> ProductPatch {
        let mut patch = ProductPatch::new();
        patch
            .set_text("title", self.title)
            .set_text("shortDescription", self.short_description)
            .set_text("fullDescription", self.full_description)
            .set_some("price", self.price)
            .set_text("date", self.date)
            .set_text("priority", self.priority)
            .set_text("imageUrl", self.image_url);
        patch
    }
}

/// Result of an insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub acknowledged: bool,
    #[schema(example = "65f1c0ffee0000000000beef")]
    pub inserted_id: String,
}

/// Result of a partial update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAck {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
}

/// Result of a delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

mod price {
    use serde::Deserialize;
    use serde::de::{Deserializer, Error};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    /// Blank text counts as absent.
    fn coerce<E: Error>(raw: Raw) -> Result<Option<f64>, E> {
        match raw {
            Raw::Number(n) => Ok(Some(n)),
            Raw::Text(s) if s.trim().is_empty() => Ok(None),
            Raw::Text(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(Some)
                .ok_or_else(|| E::custom(format!("price must be numeric, got {:?}", s))),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        coerce(Raw::deserialize(deserializer)?)?
            .ok_or_else(|| D::Error::custom("price must not be blank"))
    }

    pub fn deserialize_option<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<f64>, D::Error> {
        match Option::<Raw>::deserialize(deserializer)? {
            Some(raw) => coerce(raw),
            None => Ok(None),
        }
    }
}
