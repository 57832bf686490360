//! Development server
//!
//! Pages are rendered per request from the content store, so edits to
//! article files show up on the next reload without regenerating.

use anyhow::Result;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::content::{ArticleRecord, Category, ContentError};
use crate::generator::Generator;
use crate::KloptDat;

/// Server state
struct ServerState {
    generator: Generator,
    static_dir: PathBuf,
}

/// Single-article API payload: the record fields plus the raw body
#[derive(Serialize)]
struct ArticlePayload<'a> {
    #[serde(flatten)]
    record: &'a ArticleRecord,
    content: &'a str,
}

/// Build the application router
pub fn router(site: &KloptDat) -> Result<Router> {
    let state = Arc::new(ServerState {
        generator: Generator::new(site)?,
        static_dir: site.static_dir.clone(),
    });

    Ok(Router::new()
        .route("/", get(index_handler))
        .route("/articles/:slug", get(article_handler))
        .route("/articles/:slug/", get(article_handler))
        .route("/topics/:category", get(topic_handler))
        .route("/topics/:category/", get(topic_handler))
        .route("/api/articles", get(api_list_handler))
        .route("/api/articles/:slug", get(api_article_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Start the development server
pub async fn start(site: &KloptDat, ip: &str, port: u16, open: bool) -> Result<()> {
    let app = router(site)?;

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Run store reads and rendering off the async workers
async fn blocking<F>(state: &Arc<ServerState>, f: F) -> Response
where
    F: FnOnce(&Generator) -> Response + Send + 'static,
{
    let state = Arc::clone(state);
    match tokio::task::spawn_blocking(move || f(&state.generator)).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("Request task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

fn html_response(page: Result<String>) -> Response {
    match page {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Render failed: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

fn not_found_page(generator: &Generator) -> Response {
    match generator.render_not_found_page() {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Render failed: {:#}", e);
            (StatusCode::NOT_FOUND, "Artikel niet gevonden").into_response()
        }
    }
}

fn api_error(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

async fn index_handler(State(state): State<Arc<ServerState>>) -> Response {
    blocking(&state, |generator| {
        let articles = generator.store().list_articles();
        html_response(generator.render_index_page(&articles))
    })
    .await
}

async fn article_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Response {
    blocking(&state, move |generator| {
        match generator.store().load_article(&slug) {
            Ok(article) => {
                let articles = generator.store().list_articles();
                html_response(generator.render_article_page(&article, &articles))
            }
            Err(ContentError::ArticleNotFound(_)) => not_found_page(generator),
            Err(e) => {
                tracing::warn!("Failed to load {}: {}", slug, e);
                not_found_page(generator)
            }
        }
    })
    .await
}

async fn topic_handler(
    State(state): State<Arc<ServerState>>,
    Path(category): Path<String>,
) -> Response {
    blocking(&state, move |generator| match category.parse::<Category>() {
        Ok(category) => {
            let articles = generator.store().list_articles();
            html_response(generator.render_topic_page(category, &articles))
        }
        Err(_) => not_found_page(generator),
    })
    .await
}

async fn api_list_handler(State(state): State<Arc<ServerState>>) -> Response {
    blocking(&state, |generator| {
        Json(generator.store().list_articles()).into_response()
    })
    .await
}

async fn api_article_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Response {
    blocking(&state, move |generator| {
        match generator.store().load_article(&slug) {
            Ok(article) => Json(ArticlePayload {
                record: &article.record,
                content: &article.body,
            })
            .into_response(),
            Err(ContentError::ArticleNotFound(_)) => {
                api_error(StatusCode::NOT_FOUND, "Artikel niet gevonden")
            }
            Err(e) => {
                tracing::warn!("Failed to load {}: {}", slug, e);
                api_error(StatusCode::NOT_FOUND, "Artikel niet gevonden")
            }
        }
    })
    .await
}

/// Fallback handler that serves the static directory
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    if request.uri().path().starts_with("/api/") {
        return api_error(StatusCode::NOT_FOUND, "Niet gevonden");
    }

    let mut service = ServeDir::new(&state.static_dir).append_index_html_on_directories(true);
    match service.try_call(request).await {
        Ok(response) if response.status() != StatusCode::NOT_FOUND => response.into_response(),
        Ok(_) => blocking(&state, not_found_page).await,
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
    }
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}
