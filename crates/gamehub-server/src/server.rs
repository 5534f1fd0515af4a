use axum::{
    Router,
    body::Body,
    extract::{DefaultBodyLimit, Multipart, Path, Request, State, multipart::MultipartRejection},
    http::{HeaderValue, header},
    response::{Redirect, Response},
    routing::{get, post},
};
use gamehub_config::Config;
use gamehub_core::Error;
use gamehub_storage::Storage;
use maud::Markup;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::error::AppError;
use crate::form::{PARSE_FORM_ERROR, UploadForm};
use crate::ingest::IngestPipeline;
use crate::retrieve::RetrievalPipeline;
use crate::views::{self, Site};

type HandlerResult<T> = Result<T, AppError>;

/// Shared handler state. Every dependency is injected at construction.
#[derive(Clone)]
pub struct AppState {
    pub storage: Storage,
    pub ingest: IngestPipeline,
    pub retrieval: RetrievalPipeline,
    pub site: Arc<Site>,
}

impl AppState {
    pub fn new(storage: Storage, config: &Config) -> Self {
        Self {
            ingest: IngestPipeline::new(storage.clone()),
            retrieval: RetrievalPipeline::new(storage.clone(), config.downloads.root.clone()),
            storage,
            site: Arc::new(Site {
                title: config.title.clone(),
                base_url: config.base_path(),
            }),
        }
    }
}

pub struct GameHubServer;

impl GameHubServer {
    /// Build the router with every route mounted under the configured base URL
    pub fn router(storage: Storage, config: &Config) -> Router {
        let state = AppState::new(storage, config);
        let base = state.site.base_url.clone();

        let mut app = Router::new();
        if base.is_empty() {
            app = app.route("/", get(home));
        } else {
            app = app
                .route(&base, get(home))
                .route(&format!("{}/", base), get(home));
        }

        app.route(&format!("{}/game/:id", base), get(game_detail))
            .route(&format!("{}/upload", base), get(upload_form))
            .route(
                &format!("{}/upload-game", base),
                post(upload_game).fallback(method_not_allowed),
            )
            .route(&format!("{}/edit/:id", base), get(edit_form))
            .route(
                &format!("{}/update-game/:id", base),
                post(update_game).fallback(method_not_allowed),
            )
            .route(
                &format!("{}/delete/:id", base),
                post(delete_game).fallback(method_not_allowed),
            )
            .route(&format!("{}/download/:id", base), get(download))
            .nest_service(
                &format!("{}/static", base),
                ServeDir::new(&config.server.static_dir),
            )
            .layer(DefaultBodyLimit::max(config.server.max_upload_bytes))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    pub async fn serve(storage: Storage, config: &Config) -> anyhow::Result<()> {
        let app = Self::router(storage, config);

        let addr = format!("{}:{}", config.server.host, config.server.port);
        let listener = TcpListener::bind(&addr).await?;

        info!(
            "gamehub listening on {} with base URL '{}'",
            addr,
            config.base_path()
        );

        axum::serve(listener, app).await?;

        Ok(())
    }
}

/// GET {base}/ - Catalog listing
async fn home(State(state): State<AppState>) -> HandlerResult<Markup> {
    let games = state.retrieval.renderable_list().await?;
    Ok(views::index(&state.site, &games))
}

/// GET {base}/game/:id - Entry detail page
async fn game_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<Markup> {
    let game = state.retrieval.renderable_entry(&id).await?;
    Ok(views::game(&state.site, &game))
}

/// GET {base}/upload - Empty upload form
async fn upload_form(State(state): State<AppState>) -> Markup {
    views::upload(&state.site)
}

/// POST {base}/upload-game - Create an entry
async fn upload_game(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> HandlerResult<Redirect> {
    let form = read_form(multipart).await?;
    state.ingest.ingest(&form).await?;
    Ok(Redirect::to(&state.site.root()))
}

/// GET {base}/edit/:id - Edit form pre-filled with scalar fields
async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<Markup> {
    let details = state.retrieval.entry_details(&id).await?;
    Ok(views::edit(&state.site, &details))
}

/// POST {base}/update-game/:id - Overwrite an entry
async fn update_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> HandlerResult<Redirect> {
    let form = read_form(multipart).await?;
    state.ingest.reingest(&id, &form).await?;
    let id = utf8_percent_encode(&id, NON_ALPHANUMERIC);
    Ok(Redirect::to(&state.site.url(&format!("/game/{}", id))))
}

/// POST {base}/delete/:id - Delete an entry and its screenshots
async fn delete_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<Redirect> {
    let deleted = state
        .storage
        .delete_entry(&id)
        .await
        .map_err(crate::error::store_error)?;

    info!(id = %id, deleted, "deleted entry");
    Ok(Redirect::to(&state.site.root()))
}

/// GET {base}/download/:id - Serve the file behind an entry's download path.
///
/// `ServeFile` handles content type, length, ranges and conditional requests.
async fn download(
    State(state): State<AppState>,
    Path(id): Path<String>,
    request: Request,
) -> HandlerResult<Response> {
    let download = state.retrieval.download(&id).await?;

    let disposition = HeaderValue::from_bytes(download.content_disposition().as_bytes())
        .map_err(|_| Error::internal("Invalid download filename"))?;

    let mut response = match ServeFile::new(&download.path).oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    };
    response
        .headers_mut()
        .insert(header::CONTENT_DISPOSITION, disposition);

    Ok(response)
}

async fn method_not_allowed() -> AppError {
    AppError(Error::MethodNotAllowed)
}

async fn read_form(multipart: Result<Multipart, MultipartRejection>) -> Result<UploadForm, Error> {
    let multipart = multipart.map_err(|rejection| {
        debug!(error = %rejection, "multipart extraction rejected");
        Error::bad_request(PARSE_FORM_ERROR)
    })?;
    UploadForm::from_multipart(multipart).await
}
