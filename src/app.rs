use axum::{
    Router,
    http::{HeaderValue, header},
    routing::get,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api;
use crate::config::Config;
use crate::error::{GalleryError, GalleryResult};
use crate::scripts;
use crate::store::RecordStore;

/// State shared by every handler
pub struct AppState {
    /// Flat-file store every CRUD handler reads and rewrites
    pub store: RecordStore,

    /// Outbound client used by the widget script relay
    pub http: reqwest::Client,

    /// Origin the widget scripts are fetched from, without a trailing slash
    pub desmos_base_url: String,
}

impl AppState {
    /// Build handler state from the server configuration
    ///
    /// # Arguments
    /// * `config` - Supplies the data file location and the script upstream
    ///
    /// # Returns
    /// * `GalleryResult<Self>` - The state, or a config error if the HTTP client cannot be built
    pub fn new(config: &Config) -> GalleryResult<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| GalleryError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(AppState {
            store: RecordStore::new(config.data_file.clone()),
            http,
            desmos_base_url: config.desmos_base_url.clone(),
        })
    }
}

/// Build the gallery router: JSON API, script relay, then static files.
pub fn router(state: Arc<AppState>, static_dir: &Path) -> Router {
    Router::new()
        .route("/api/graphs", get(api::list_graphs).post(api::create_graph))
        .route(
            "/api/graphs/:id",
            get(api::get_graph)
                .put(api::update_graph)
                .delete(api::delete_graph),
        )
        .route("/api/tags", get(api::list_tags))
        .route(
            &format!("/api/{}/:script", scripts::DESMOS_API_VERSION),
            get(scripts::desmos_script),
        )
        .fallback_service(ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_XSS_PROTECTION,
            HeaderValue::from_static("1; mode=block"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state)
}

pub async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config.socket_addr().await?;
    let app_state = Arc::new(AppState::new(&config)?);
    let app = router(app_state, &config.static_dir);

    let listener = TcpListener::bind(addr).await?;
    log::info!("Graph gallery running at http://{}", addr);
    log::info!("Data storage: {}", config.data_file.display());
    axum::serve(listener, app).await?;

    Ok(())
}
