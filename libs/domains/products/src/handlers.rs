//! HTTP handlers for Products API

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    JsonBody, ObjectIdPath,
    errors::responses::{
        BadRequestObjectIdResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse, ServiceUnavailableResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::models::{
    CreateProduct, DeleteAck, InsertAck, ProductResponse, UpdateAck, UpdateProduct,
};
use crate::repository::ProductRepository;
use crate::service::ProductService;

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product,
        update_product,
        replace_product_fields,
        delete_product,
    ),
    components(
        schemas(
            ProductResponse, CreateProduct, UpdateProduct,
            InsertAck, UpdateAck, DeleteAck
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestObjectIdResponse,
            InternalServerErrorResponse,
            ServiceUnavailableResponse
        )
    ),
    tags(
        (name = "Products", description = "Product catalogue endpoints")
    )
)]
pub struct ApiDoc;

/// Create the products router with all HTTP endpoints
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product)
                .patch(update_product)
                .put(replace_product_fields)
                .delete(delete_product),
        )
        .with_state(shared_service)
}

/// List all products, newest first
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    responses(
        (status = 200, description = "All products, newest first", body = Vec<ProductResponse>),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
) -> ProductResult<Json<Vec<ProductResponse>>> {
    let products = service.list_products().await?;
    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

/// Create a new product
///
/// Missing `date`, `priority` and `imageUrl` are defaulted. Responds with the
/// insert acknowledgment, not the created product.
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created", body = InsertAck),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    JsonBody(input): JsonBody<CreateProduct>,
) -> ProductResult<impl IntoResponse> {
    let ack = service.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(ack)))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product ObjectId (24 hex characters)")),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> ProductResult<Json<ProductResponse>> {
    let product = service.get_product(id).await?;
    Ok(Json(product.into()))
}

/// Partially update a product, returning the update acknowledgment
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product ObjectId (24 hex characters)")),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated", body = UpdateAck),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
    JsonBody(input): JsonBody<UpdateProduct>,
) -> ProductResult<Json<UpdateAck>> {
    let ack = service.update_product(id, input).await?;
    Ok(Json(ack))
}

/// Partially update a product, returning the updated product
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product ObjectId (24 hex characters)")),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product after the update", body = ProductResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn replace_product_fields<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
    JsonBody(input): JsonBody<UpdateProduct>,
) -> ProductResult<Json<ProductResponse>> {
    let product = service.update_and_fetch_product(id, input).await?;
    Ok(Json(product.into()))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product ObjectId (24 hex characters)")),
    responses(
        (status = 200, description = "Product deleted", body = DeleteAck),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> ProductResult<Json<DeleteAck>> {
    let ack = service.delete_product(id).await?;
    Ok(Json(ack))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProductError;
    use crate::models::Product;
    use crate::repository::MockProductRepository;
    use axum::body::Body;
    use axum::http::{Request, header};
    use http_body_util::BodyExt;
    use mongodb::bson::oid::ObjectId;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app(mock: MockProductRepository) -> Router {
        router(ProductService::new(mock))
    }

    fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder().method(method).uri(uri);
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn stored(id: ObjectId, title: &str) -> Product {
        Product {
            id: Some(id),
            title: title.into(),
            short_description: "short".into(),
            full_description: "full".into(),
            price: 12.5,
            date: "2024-03-13".into(),
            priority: "Medium".into(),
            image_url: "https://img.example.com/a.png".into(),
        }
    }

    #[tokio::test]
    async fn test_list_returns_hex_ids() {
        let id = ObjectId::new();
        let mut mock = MockProductRepository::new();
        mock.expect_list()
            .returning(move || Ok(vec![stored(id, "Lamp")]));

        let response = app(mock).oneshot(request("GET", "/", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body[0]["_id"], json!(id.to_hex()));
        assert_eq!(body[0]["shortDescription"], "short");
        assert_eq!(body[0]["price"], 12.5);
    }

    #[tokio::test]
    async fn test_create_returns_created_ack() {
        let id = ObjectId::new();
        let mut mock = MockProductRepository::new();
        mock.expect_create()
            .withf(|p| p.price == 12.5 && p.priority == "Medium")
            .returning(move |_| {
                Ok(InsertAck {
                    acknowledged: true,
                    inserted_id: id.to_hex(),
                })
            });

        let body = json!({
            "title": "Lamp",
            "shortDescription": "short",
            "fullDescription": "full",
            "price": "12.5"
        });
        let response = app(mock)
            .oneshot(request("POST", "/", Some(body)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body, json!({ "acknowledged": true, "insertedId": id.to_hex() }));
    }

    #[tokio::test]
    async fn test_create_missing_fields_is_bad_request() {
        let mut mock = MockProductRepository::new();
        mock.expect_create().never();

        let response = app(mock)
            .oneshot(request("POST", "/", Some(json!({ "title": "Lamp" }))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert_eq!(
            body["message"],
            "Title, short description, full description and price are required"
        );
    }

    #[tokio::test]
    async fn test_create_malformed_json() {
        let mut mock = MockProductRepository::new();
        mock.expect_create().never();

        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"title\":"))
            .unwrap();
        let response = app(mock).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "JSON_EXTRACTION");
    }

    #[tokio::test]
    async fn test_get_product() {
        let id = ObjectId::new();
        let mut mock = MockProductRepository::new();
        mock.expect_get_by_id()
            .returning(move |id| Ok(Some(stored(id, "Lamp"))));

        let response = app(mock)
            .oneshot(request("GET", &format!("/{}", id.to_hex()), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["title"], "Lamp");
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let mut mock = MockProductRepository::new();
        mock.expect_get_by_id().returning(|_| Ok(None));

        let response = app(mock)
            .oneshot(request("GET", &format!("/{}", ObjectId::new()), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_invalid_id_is_bad_request() {
        let mut mock = MockProductRepository::new();
        mock.expect_get_by_id().never();
        mock.expect_delete().never();

        let app = app(mock);
        for method in ["GET", "DELETE"] {
            let response = app
                .clone()
                .oneshot(request(method, "/not-an-object-id", None))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(json_body(response).await["error"], "INVALID_OBJECT_ID");
        }
    }

    #[tokio::test]
    async fn test_patch_returns_update_ack() {
        let id = ObjectId::new();
        let mut mock = MockProductRepository::new();
        mock.expect_update()
            .withf(move |target, patch| *target == id && patch.len() == 1)
            .returning(|_, _| {
                Ok(UpdateAck {
                    acknowledged: true,
                    matched_count: 1,
                    modified_count: 1,
                })
            });

        let response = app(mock)
            .oneshot(request(
                "PATCH",
                &format!("/{}", id.to_hex()),
                Some(json!({ "priority": "High", "title": "" })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({ "acknowledged": true, "matchedCount": 1, "modifiedCount": 1 })
        );
    }

    #[tokio::test]
    async fn test_patch_with_empty_body_is_bad_request() {
        let mut mock = MockProductRepository::new();
        mock.expect_update().never();

        let response = app(mock)
            .oneshot(request(
                "PATCH",
                &format!("/{}", ObjectId::new()),
                Some(json!({ "title": "", "price": null })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_put_returns_updated_document() {
        let id = ObjectId::new();
        let mut mock = MockProductRepository::new();
        mock.expect_update_and_fetch()
            .returning(|id, _| Ok(Some(stored(id, "Renamed"))));

        let response = app(mock)
            .oneshot(request(
                "PUT",
                &format!("/{}", id.to_hex()),
                Some(json!({ "title": "Renamed" })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["_id"], json!(id.to_hex()));
        assert_eq!(body["title"], "Renamed");
    }

    #[tokio::test]
    async fn test_put_missing_is_not_found() {
        let mut mock = MockProductRepository::new();
        mock.expect_update_and_fetch().returning(|_, _| Ok(None));

        let response = app(mock)
            .oneshot(request(
                "PUT",
                &format!("/{}", ObjectId::new()),
                Some(json!({ "title": "Renamed" })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_returns_ack() {
        let mut mock = MockProductRepository::new();
        mock.expect_delete().returning(|_| {
            Ok(DeleteAck {
                acknowledged: true,
                deleted_count: 1,
            })
        });

        let response = app(mock)
            .oneshot(request("DELETE", &format!("/{}", ObjectId::new()), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({ "acknowledged": true, "deletedCount": 1 })
        );
    }

    #[tokio::test]
    async fn test_store_unavailable_is_503() {
        let mut mock = MockProductRepository::new();
        mock.expect_list()
            .returning(|| Err(ProductError::StoreUnavailable("server selection timeout".into())));

        let response = app(mock).oneshot(request("GET", "/", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json_body(response).await["error"], "SERVICE_UNAVAILABLE");
    }
}
