// --- File: crates/services/slotbook_backend/src/app.rs ---
use axum::{routing::get, Router};
use slotbook_gcal::booking::BookingCoordinator;
use slotbook_gcal::routes as booking_routes;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Assembles the public router: everything lives under `/api`.
pub fn build_router(coordinator: Arc<BookingCoordinator>) -> Router {
    let api_router = Router::new()
        .route("/", get(|| async { "Welcome to the Slotbook API!" }))
        .merge(booking_routes::routes(coordinator));

    #[allow(unused_mut)] // only mutated with the openapi feature
    let mut app = Router::new().nest("/api", api_router);

    #[cfg(feature = "openapi")]
    {
        use slotbook_gcal::doc::BookingApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Slotbook API",
                version = "0.1.0",
                description = "Appointment availability and booking",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            servers((url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(BookingApiDoc::openapi());
        tracing::info!("Adding Swagger UI at /api/docs");

        app = app.merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc));
    }

    app.layer(TraceLayer::new_for_http())
}
