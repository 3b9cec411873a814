// File: services/cantacal_backend/src/main.rs
use axum::{routing::get, Router};
use cantacal_cantamen::routes as cantamen_routes;
use cantacal_config::load_config;
use std::error::Error;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    cantacal_common::logging::init();

    let config = Arc::new(load_config()?);
    info!("Loaded config: {:?}", config);

    let cantamen_router = cantamen_routes(config.clone())?;

    // The feed is served at the root for existing calendar subscriptions and under /api
    let api_router = Router::new()
        .route("/", get(|| async { "Welcome to cantacal!" }))
        .merge(cantamen_router.clone());

    #[allow(unused_mut)] // for the features it needs to be mutable
    let mut app = Router::new()
        .merge(api_router)
        .nest("/api", cantamen_router);

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        use cantacal_cantamen::doc::CantamenApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "cantacal API",
                version = "0.1.0",
                description = "Cantamen bookings as iCalendar feed",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            servers((url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(CantamenApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");

        let swagger_ui =
            SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc);
        app = app.merge(swagger_ui);
    }

    let app = app.layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Starting server at http://{}", addr);
    info!("Feed available at http://{}/cantamen_to_ical?user=<encoded login>", addr);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
