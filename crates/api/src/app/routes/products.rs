use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tracing::info;

use crate::app::dto::{ProductRequest, ProductResponse};
use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

fn invalid_body(rejection: JsonRejection) -> axum::response::Response {
    errors::json_error(
        StatusCode::BAD_REQUEST,
        "invalid_request_body",
        rejection.body_text(),
    )
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<ProductRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return invalid_body(rejection),
    };

    match services.products().create_product(body.into()).await {
        Ok(product) => {
            info!(product_id = product.id(), "product created");
            (StatusCode::CREATED, Json(ProductResponse::from(&product))).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.products().get_product_by_id(&id).await {
        Ok(product) => {
            info!(product_id = product.id(), "product fetched");
            (StatusCode::OK, Json(ProductResponse::from(&product))).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.products().get_all_products().await {
        Ok(products) => {
            info!(count = products.len(), "products listed");
            let items = products.iter().map(ProductResponse::from).collect::<Vec<_>>();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<ProductRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return invalid_body(rejection),
    };

    match services.products().update_product(&id, body.into()).await {
        Ok(product) => {
            info!(product_id = product.id(), "product updated");
            (StatusCode::OK, Json(ProductResponse::from(&product))).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.products().delete_product(&id).await {
        Ok(()) => {
            info!(product_id = %id, "product deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}
