//! # Request Handlers
//!
//! Axum request handlers for the storefront cart and the admin listings.
//! Every cart response carries the full cart view model so the page can be
//! re-rendered from a single response.

use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cart_core::{
    list_orders, list_products, seed_catalog, CartAction, CartError, CartLineItem, CartSnapshot,
    LineUpdate, Order, OrderConfirmation, OrderItem, OrderRepository, PageRequest, Product,
    ProductCatalog, ProductFilter, ProductInput,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Raw listing query; values are parsed leniently by `PageRequest`
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
}

impl ListParams {
    fn page_request(&self) -> PageRequest {
        PageRequest::from_query(self.page.as_deref(), self.limit.as_deref())
    }
}

/// Quantity update query
#[derive(Debug, Default, Deserialize)]
pub struct UpdateParams {
    #[serde(default)]
    pub action: Option<String>,
}

/// One cart line as rendered
#[derive(Debug, Serialize)]
pub struct CartLineView {
    pub product_id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub unit_price: f64,
    pub quantity: u32,
    pub cost: f64,
}

impl From<&CartLineItem> for CartLineView {
    fn from(line: &CartLineItem) -> Self {
        Self {
            product_id: line.product_id,
            name: line.product.name.clone(),
            image: line.product.image.clone(),
            unit_price: line.product.price.as_decimal(),
            quantity: line.quantity,
            cost: line.cost().as_decimal(),
        }
    }
}

/// Cart view model: `{items, message, alert_type, total_cost}`
#[derive(Debug, Serialize)]
pub struct CartView {
    /// Pending order id. Removing the last line keeps it, so it can be
    /// present with an empty `items`; only checkout drops it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<Uuid>,
    pub items: Vec<CartLineView>,
    pub message: String,
    pub alert_type: String,
    pub total_cost: f64,
}

impl CartView {
    fn new(snapshot: &CartSnapshot, message: impl Into<String>, alert_type: &str) -> Self {
        Self {
            order_id: snapshot.order_id,
            items: snapshot.items.iter().map(CartLineView::from).collect(),
            message: message.into(),
            alert_type: alert_type.to_string(),
            total_cost: snapshot.total.as_decimal(),
        }
    }
}

/// Response to a quantity change
#[derive(Debug, Serialize)]
pub struct QuantityUpdateView {
    #[serde(flatten)]
    pub cart: CartView,
    pub action: String,
    /// A line left the cart; re-render the whole list
    pub refresh_cart_items: bool,
}

/// Frozen order line shown on the confirmation page
#[derive(Debug, Serialize)]
pub struct OrderLineView {
    pub product_id: Uuid,
    pub name: String,
    pub quantity: u32,
    pub cost: f64,
}

impl From<&OrderItem> for OrderLineView {
    fn from(item: &OrderItem) -> Self {
        Self {
            product_id: item.product_id,
            name: item.product.name.clone(),
            quantity: item.quantity,
            cost: item.cost.as_decimal(),
        }
    }
}

/// Checkout view model: `{items, total_cost}`
#[derive(Debug, Serialize)]
pub struct CheckoutView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<Uuid>,
    pub items: Vec<OrderLineView>,
    pub total_cost: f64,
}

impl From<OrderConfirmation> for CheckoutView {
    fn from(confirmation: OrderConfirmation) -> Self {
        Self {
            order_id: confirmation.order_id,
            items: confirmation.items.iter().map(OrderLineView::from).collect(),
            total_cost: confirmation.total.as_decimal(),
        }
    }
}

/// Order detail page
#[derive(Debug, Serialize)]
pub struct OrderDetailView {
    pub order: Order,
    pub status: String,
    pub item_count: u32,
    pub total_cost: f64,
}

/// Admin product form result: the stored product or the reasons it was refused
#[derive(Debug, Serialize)]
pub struct ProductMessageView {
    pub messages: Vec<String>,
    pub alert_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
}

impl ProductMessageView {
    fn stored(product: Product, message: String) -> Self {
        Self {
            messages: vec![message],
            alert_type: "success".to_string(),
            product: Some(product),
        }
    }

    fn refused(err: &CartError) -> Self {
        Self {
            messages: vec![err.user_message()],
            alert_type: err.alert_type().to_string(),
            product: None,
        }
    }
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn status_of(err: &CartError) -> StatusCode {
    StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn cart_error_to_response(err: CartError) -> ApiError {
    let code = err.status_code();
    (status_of(&err), Json(ErrorResponse::new(err.to_string(), code)))
}

fn parse_id(raw: &str, kind: &str) -> Result<Uuid, ApiError> {
    raw.parse().map_err(|_| {
        cart_error_to_response(CartError::Validation(format!("Invalid {kind} ID")))
    })
}

fn product_form_response(result: Result<(StatusCode, Product, String), CartError>) -> Response {
    match result {
        Ok((status, product, message)) => {
            (status, Json(ProductMessageView::stored(product, message))).into_response()
        }
        Err(err) => {
            warn!("Product form refused: {}", err);
            (status_of(&err), Json(ProductMessageView::refused(&err))).into_response()
        }
    }
}

async fn simulate_latency(state: &AppState) {
    if !state.config.simulated_latency.is_zero() {
        tokio::time::sleep(state.config.simulated_latency).await;
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "storefront",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Products shown on the storefront (only those with an image)
pub async fn shop_items(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    simulate_latency(&state).await;

    let products = state
        .catalog
        .find(&ProductFilter::with_image())
        .await
        .map_err(cart_error_to_response)?;

    Ok(Json(serde_json::json!({
        "products": products,
        "count": products.len()
    })))
}

/// Current cart
pub async fn cart_view(State(state): State<AppState>) -> Json<CartView> {
    Json(CartView::new(&state.cart.snapshot(), "", ""))
}

/// Add a product to the cart
#[instrument(skip(state))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Response, ApiError> {
    let product_id = parse_id(&product_id, "product")?;

    match state.cart.add_item(product_id).await {
        Ok(line) => {
            let message = format!("{} successfully added", line.product.name);
            let view = CartView::new(&state.cart.snapshot(), message, "success");
            Ok(Json(view).into_response())
        }
        Err(err @ CartError::Conflict { .. }) => {
            info!("{}", err);
            let view = CartView::new(&state.cart.snapshot(), err.to_string(), err.alert_type());
            Ok((status_of(&err), Json(view)).into_response())
        }
        Err(err) => {
            warn!("Add to cart failed: {}", err);
            Err(cart_error_to_response(err))
        }
    }
}

/// Change the quantity of a cart line
#[instrument(skip(state))]
pub async fn update_quantity(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Query(params): Query<UpdateParams>,
) -> Result<Response, ApiError> {
    let product_id = parse_id(&product_id, "product")?;
    let raw_action = params.action.unwrap_or_default();

    let action = match raw_action.parse::<CartAction>() {
        Ok(action) => action,
        Err(err) => {
            let view = QuantityUpdateView {
                cart: CartView::new(&state.cart.snapshot(), "Invalid Action", err.alert_type()),
                action: raw_action,
                refresh_cart_items: false,
            };
            return Ok((status_of(&err), Json(view)).into_response());
        }
    };

    let update = state
        .cart
        .update_quantity(product_id, action)
        .await
        .map_err(cart_error_to_response)?;

    let message = match &update {
        LineUpdate::Removed(line) => format!("{} removed from cart", line.product.name),
        LineUpdate::Changed(line) => format!("{} quantity: {}", line.product.name, line.quantity),
    };

    let view = QuantityUpdateView {
        cart: CartView::new(&state.cart.snapshot(), message, "info"),
        action: raw_action,
        refresh_cart_items: update.is_removed(),
    };
    Ok(Json(view).into_response())
}

/// Place an order from the cart
#[instrument(skip(state))]
pub async fn place_order(State(state): State<AppState>) -> Result<Json<CheckoutView>, ApiError> {
    let confirmation = state.checkout.place_order().await.map_err(|e| {
        error!("Checkout failed: {}", e);
        cart_error_to_response(e)
    })?;

    Ok(Json(CheckoutView::from(confirmation)))
}

/// Paginated product table
pub async fn admin_list_products(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let listing = list_products(state.catalog.as_ref(), params.page_request())
        .await
        .map_err(cart_error_to_response)?;
    Ok(Json(listing))
}

/// Single product
pub async fn admin_get_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let product_id = parse_id(&product_id, "product")?;
    let product = state
        .catalog
        .get_by_id(product_id)
        .await
        .map_err(cart_error_to_response)?;
    Ok(Json(product))
}

/// Create a product from the admin form
#[instrument(skip(state, input))]
pub async fn admin_create_product(
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> Response {
    let result = async {
        let draft = input.validate(state.cart.currency())?;
        let product = state.catalog.insert(draft.into_product()).await?;
        info!(product_id = %product.id, "Created product {}", product.name);
        let message = format!("{} created", product.name);
        Ok::<_, CartError>((StatusCode::CREATED, product, message))
    }
    .await;

    simulate_latency(&state).await;
    product_form_response(result)
}

/// Edit a product from the admin form
#[instrument(skip(state, input))]
pub async fn admin_update_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Json(input): Json<ProductInput>,
) -> Result<Response, ApiError> {
    let product_id = parse_id(&product_id, "product")?;

    let result = async {
        let draft = input.validate(state.cart.currency())?;
        let mut product = state.catalog.get_by_id(product_id).await?;
        draft.apply_to(&mut product);
        let product = state.catalog.update(product).await?;
        info!(%product_id, "Updated product {}", product.name);
        let message = format!("{} updated", product.name);
        Ok::<_, CartError>((StatusCode::OK, product, message))
    }
    .await;

    simulate_latency(&state).await;
    Ok(product_form_response(result))
}

/// Delete a product
#[instrument(skip(state))]
pub async fn admin_delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<ProductMessageView>, ApiError> {
    let product_id = parse_id(&product_id, "product")?;
    let product = state
        .catalog
        .delete(product_id)
        .await
        .map_err(cart_error_to_response)?;

    info!(%product_id, "Deleted product {}", product.name);
    simulate_latency(&state).await;

    let message = format!("{} deleted", product.name);
    Ok(Json(ProductMessageView::stored(product, message)))
}

/// Fill the catalog with demo products
#[instrument(skip(state))]
pub async fn admin_seed_products(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let count = seed_catalog(state.catalog.as_ref(), state.cart.currency())
        .await
        .map_err(|e| {
            error!("Seeding failed: {}", e);
            cart_error_to_response(e)
        })?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": format!("Successfully seeded {count} dummy products"),
            "count": count
        })),
    ))
}

/// Paginated order table
pub async fn admin_list_orders(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let listing = list_orders(state.orders.as_ref(), params.page_request())
        .await
        .map_err(cart_error_to_response)?;
    Ok(Json(listing))
}

/// Single order with its total
pub async fn admin_get_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<OrderDetailView>, ApiError> {
    let order_id = parse_id(&order_id, "order")?;
    let order = state
        .orders
        .get_order(order_id)
        .await
        .map_err(cart_error_to_response)?;

    let total_cost = order.total(state.cart.currency()).as_decimal();
    Ok(Json(OrderDetailView {
        status: order.status.label(),
        item_count: order.item_count(),
        total_cost,
        order,
    }))
}
