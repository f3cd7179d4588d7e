//! # Routes
//!
//! Axum router configuration for the storefront and admin API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Storefront:
///   - GET   /api/v1/shop/items - Products with an image
///   - GET   /api/v1/cart - Current cart
///   - POST  /api/v1/cart/items/{product_id} - Add a product
///   - PATCH /api/v1/cart/items/{product_id}?action= - increment / decrement / remove
///   - POST  /api/v1/cart/checkout - Place the order
///
/// - Admin:
///   - GET /api/v1/admin/products?page=&limit= - Product table
///   - POST /api/v1/admin/products - Create product
///   - POST /api/v1/admin/products/seed - Add demo products
///   - GET /api/v1/admin/products/{product_id} - Product detail
///   - PUT /api/v1/admin/products/{product_id} - Edit product
///   - DELETE /api/v1/admin/products/{product_id} - Delete product
///   - GET /api/v1/admin/orders?page=&limit= - Order table
///   - GET /api/v1/admin/orders/{order_id} - Order detail
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let shop_routes = Router::new()
        .route("/shop/items", get(handlers::shop_items))
        .route("/cart", get(handlers::cart_view))
        .route(
            "/cart/items/{product_id}",
            post(handlers::add_to_cart).patch(handlers::update_quantity),
        )
        .route("/cart/checkout", post(handlers::place_order));

    let admin_routes = Router::new()
        .route(
            "/products",
            get(handlers::admin_list_products).post(handlers::admin_create_product),
        )
        .route("/products/seed", post(handlers::admin_seed_products))
        .route(
            "/products/{product_id}",
            get(handlers::admin_get_product)
                .put(handlers::admin_update_product)
                .delete(handlers::admin_delete_product),
        )
        .route("/orders", get(handlers::admin_list_orders))
        .route("/orders/{order_id}", get(handlers::admin_get_order));

    let api_routes = Router::new()
        .merge(shop_routes)
        .nest("/admin", admin_routes);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
