//! API service routes
//!
//! Every protected handler names its role gate in its signature through
//! `Authorized<Policy>`.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use axum_extra::extract::WithRejection;
use serde_json::json;
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::{
        AdminOnly, AdminOrSeller, AnyRole, Authorized, CustomerOnly, SellerOrCustomer,
    },
    models::{
        SearchQuery,
        order::{CreateOrderRequest, UpdateOrderRequest},
        product::CreateProductRequest,
        stall::{UpdateStallRequest, UpdateStallStatusRequest},
        user::{UpdateProfileRequest, UpdateUserRequest},
    },
};

type JsonBody<T> = WithRejection<Json<T>, ApiError>;

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/v1/lapak", get(list_stalls))
        .route("/v1/lapak/location", get(list_stalls_near))
        .route(
            "/v1/lapak/:id",
            get(get_stall).put(update_stall).delete(delete_stall),
        )
        .route("/v1/lapak/:id/status", put(update_stall_status))
        .route(
            "/v1/lapak/:id/product",
            get(list_stall_products).post(create_product),
        )
        .route("/v1/product", get(list_products))
        .route("/v1/product/:id", get(get_product))
        .route("/v1/pemesanan", get(list_orders))
        .route("/v1/pemesanan/self", get(list_own_orders))
        .route(
            "/v1/pemesanan/:id",
            get(get_order)
                .post(create_order)
                .put(update_order)
                .delete(cancel_order),
        )
        .route("/v1/users", get(list_users))
        .route("/v1/users/:id", get(get_user).put(update_user).delete(delete_user))
        .route(
            "/v1/users/:id/profile",
            get(get_user_profile).put(update_user_profile),
        )
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let reachable = matches!(
        common::database::health_check(&state.db_pool).await,
        Ok(true)
    );
    let (status, label) = if reachable {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
    };

    (
        status,
        Json(json!({
            "status": label,
            "service": "api-service"
        })),
    )
}

fn message(text: &str) -> Json<serde_json::Value> {
    Json(json!({ "message": text }))
}

pub async fn list_stalls(
    _: Authorized<AdminOnly>,
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.catalog.list_stalls(query.term()).await?))
}

/// Stalls in the calling customer's region
pub async fn list_stalls_near(
    auth: Authorized<CustomerOnly>,
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<impl IntoResponse> {
    let stalls = state
        .catalog
        .list_stalls_near(&auth.session, query.term())
        .await?;
    Ok(Json(stalls))
}

pub async fn get_stall(
    _: Authorized<AnyRole>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.catalog.get_stall(id).await?))
}

pub async fn update_stall(
    auth: Authorized<AdminOrSeller>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    WithRejection(Json(payload), _): JsonBody<UpdateStallRequest>,
) -> ApiResult<impl IntoResponse> {
    state
        .catalog
        .update_stall(&auth.session, id, payload)
        .await?;
    Ok(message("lapak updated"))
}

pub async fn update_stall_status(
    auth: Authorized<AdminOrSeller>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    WithRejection(Json(payload), _): JsonBody<UpdateStallStatusRequest>,
) -> ApiResult<impl IntoResponse> {
    state
        .catalog
        .update_stall_status(&auth.session, id, payload)
        .await?;
    Ok(message("lapak status updated"))
}

pub async fn delete_stall(
    _: Authorized<AdminOnly>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    state.catalog.delete_stall(id).await?;
    Ok(message("lapak deleted"))
}

pub async fn create_product(
    auth: Authorized<AdminOrSeller>,
    State(state): State<AppState>,
    Path(stall_id): Path<Uuid>,
    WithRejection(Json(payload), _): JsonBody<CreateProductRequest>,
) -> ApiResult<impl IntoResponse> {
    let product_id = state
        .catalog
        .create_product(&auth.session, stall_id, payload)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "product_id": product_id })),
    ))
}

pub async fn list_stall_products(
    _: Authorized<AnyRole>,
    State(state): State<AppState>,
    Path(stall_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.catalog.list_stall_products(stall_id).await?))
}

pub async fn list_products(
    auth: Authorized<AnyRole>,
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<impl IntoResponse> {
    let products = state
        .catalog
        .list_products(&auth.session, query.term())
        .await?;
    Ok(Json(products))
}

pub async fn get_product(
    _: Authorized<AnyRole>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.catalog.get_product(id).await?))
}

/// Place an order for the product in the path
pub async fn create_order(
    auth: Authorized<CustomerOnly>,
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    WithRejection(Json(payload), _): JsonBody<CreateOrderRequest>,
) -> ApiResult<impl IntoResponse> {
    state
        .orders
        .create_order(auth.session.user_id, product_id, payload)
        .await?;
    Ok((StatusCode::CREATED, message("pemesanan created")))
}

pub async fn list_orders(
    _: Authorized<AdminOnly>,
    State(state): State<AppState>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.orders.list_all().await?))
}

pub async fn list_own_orders(
    auth: Authorized<SellerOrCustomer>,
    State(state): State<AppState>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.orders.list_for_buyer(auth.session.user_id).await?))
}

pub async fn get_order(
    _: Authorized<AnyRole>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.orders.get(id).await?))
}

pub async fn update_order(
    _: Authorized<SellerOrCustomer>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    WithRejection(Json(payload), _): JsonBody<UpdateOrderRequest>,
) -> ApiResult<impl IntoResponse> {
    state.orders.update_status(id, payload).await?;
    Ok(message("pemesanan updated"))
}

/// Cancel an order, returning its quantity to stock
pub async fn cancel_order(
    _: Authorized<SellerOrCustomer>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    state.orders.cancel_order(id).await?;
    Ok(message("pemesanan deleted"))
}

pub async fn list_users(
    _: Authorized<AdminOnly>,
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.accounts.list(query.term()).await?))
}

pub async fn get_user(
    _: Authorized<AdminOnly>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.accounts.get(id).await?))
}

pub async fn get_user_profile(
    auth: Authorized<AnyRole>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.accounts.profile(&auth.session, id).await?))
}

pub async fn update_user_profile(
    auth: Authorized<AnyRole>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    WithRejection(Json(payload), _): JsonBody<UpdateProfileRequest>,
) -> ApiResult<impl IntoResponse> {
    state
        .accounts
        .update_profile(&auth.session, id, payload)
        .await?;
    Ok(message("user profile updated"))
}

pub async fn update_user(
    auth: Authorized<AnyRole>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    WithRejection(Json(payload), _): JsonBody<UpdateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    state.accounts.update(&auth.session, id, payload).await?;
    Ok(message("user updated"))
}

pub async fn delete_user(
    auth: Authorized<AdminOnly>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    state.accounts.delete(&auth.session, id).await?;
    Ok(message("user deleted"))
}
