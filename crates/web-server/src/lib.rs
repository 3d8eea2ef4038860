use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};
use database::{
    AdminRepository, CustomerRepository, CustomizationRepository, DashboardRepository,
    OrderRepository, ProductRepository, SqlitePool,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;
pub mod response;

/// The shared application state that all handlers can access: one
/// repository per entity, each holding a clone of the same pool.
#[derive(Clone)]
pub struct AppState {
    pub customers: CustomerRepository,
    pub products: ProductRepository,
    pub customizations: CustomizationRepository,
    pub orders: OrderRepository,
    pub admins: AdminRepository,
    pub dashboard: DashboardRepository,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            customers: CustomerRepository::new(pool.clone()),
            products: ProductRepository::new(pool.clone()),
            customizations: CustomizationRepository::new(pool.clone()),
            orders: OrderRepository::new(pool.clone()),
            admins: AdminRepository::new(pool.clone()),
            dashboard: DashboardRepository::new(pool),
        }
    }
}

/// Builds the full application router. Split out of [`run_server`] so tests
/// can drive it with `tower::ServiceExt::oneshot`.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/health", get(handlers::health))
        // --- Customers ---
        .route(
            "/api/customer",
            post(handlers::customers::create_customer).get(handlers::customers::list_customers),
        )
        .route(
            "/api/customer/:id",
            get(handlers::customers::get_customer)
                .put(handlers::customers::update_customer)
                .delete(handlers::customers::delete_customer),
        )
        // --- Products ---
        .route(
            "/api/product",
            post(handlers::products::create_product).get(handlers::products::list_products),
        )
        .route(
            "/api/product/:id",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        )
        // --- Customizations ---
        .route(
            "/api/customizations",
            post(handlers::customizations::create_customization)
                .get(handlers::customizations::list_customizations),
        )
        .route(
            "/api/customizations/:id",
            get(handlers::customizations::get_customization)
                .put(handlers::customizations::update_customization)
                .delete(handlers::customizations::delete_customization),
        )
        // --- Orders ---
        .route(
            "/api/order",
            post(handlers::orders::create_order).get(handlers::orders::list_current_month_orders),
        )
        .route(
            "/api/order/:id",
            get(handlers::orders::list_customer_orders)
                .put(handlers::orders::update_order)
                .delete(handlers::orders::delete_order),
        )
        // --- Admin: login plus full-read mirrors of the public CRUD
        //     (edit/delete only, no create). ---
        .route("/api/admin/login", post(handlers::admin::login))
        .route("/api/admin/customer", get(handlers::customers::list_customers))
        .route(
            "/api/admin/customer/:id",
            put(handlers::customers::update_customer).delete(handlers::customers::delete_customer),
        )
        .route("/api/admin/order", get(handlers::orders::list_all_orders))
        .route(
            "/api/admin/order/:id",
            put(handlers::orders::update_order).delete(handlers::orders::delete_order),
        )
        // --- Dashboard ---
        .route("/api/dashboard/stats", get(handlers::dashboard::get_stats))
        .route(
            "/api/dashboard/pending-payments",
            get(handlers::dashboard::list_pending_payments),
        )
        .route(
            "/api/dashboard/pending-payments/:customerId",
            get(handlers::dashboard::get_customer_pending_payments),
        )
        .route(
            "/api/dashboard/pending-payments/:customerId/paid",
            put(handlers::dashboard::mark_all_payments_paid),
        )
        .route(
            "/api/dashboard/pending-payments/:customerId/month/paid",
            put(handlers::dashboard::mark_month_paid),
        )
        .route(
            "/api/dashboard/pending-payments/:customerId/month/unpaid",
            put(handlers::dashboard::mark_month_unpaid),
        )
        .with_state(state)
        .layer(cors)
        // This middleware logs information about every incoming request.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024 * 2)) // 2MB body limit
}

/// The main function to configure and run the web server.
pub async fn run_server(addr: SocketAddr) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let db_pool = database::connect().await?;
    database::run_migrations(&db_pool).await?;

    let app_state = Arc::new(AppState::new(db_pool));
    let app = build_router(app_state);

    tracing::info!("Web server listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
