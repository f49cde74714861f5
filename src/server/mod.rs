//! Blog server - renders pages on demand over axum
//!
//! Every request re-reads the content directory, so handlers share nothing
//! mutable and published edits are visible on the next reload.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use tera::Context;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::config::SiteConfig;
use crate::content::{ContentError, ContentLoader};
use crate::templates::{PostContext, SiteContext, TemplateRenderer};
use crate::Blog;

/// Shared state for request handlers
pub struct ServerState {
    config: SiteConfig,
    loader: ContentLoader,
    templates: TemplateRenderer,
}

impl ServerState {
    /// Build the handler state for a blog
    pub fn new(blog: &Blog) -> Result<Self> {
        Ok(Self {
            config: blog.config.clone(),
            loader: ContentLoader::new(&blog.content_dir),
            templates: TemplateRenderer::new()?,
        })
    }
}

/// Build the application router
///
/// Unmatched paths fall back to static files out of the public directory.
pub fn build_router(blog: &Blog) -> Result<Router> {
    let state = Arc::new(ServerState::new(blog)?);

    Ok(Router::new()
        .route("/", get(index))
        .route("/blog", get(blog_index))
        .route("/blog/:slug", get(blog_post))
        .fallback_service(ServeDir::new(&blog.public_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Start the blog server
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    let app = build_router(blog)?;

    // Handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn index(State(state): State<Arc<ServerState>>) -> Response {
    let title = state.config.title.clone();
    render_listing(&state, "index.html", &title)
}

async fn blog_index(State(state): State<Arc<ServerState>>) -> Response {
    render_listing(&state, "blog.html", "All Blog Posts")
}

async fn blog_post(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Response {
    let post = match state.loader.find_by_slug(&slug) {
        Ok(post) => post,
        Err(ContentError::NotFound(_)) => {
            return (StatusCode::NOT_FOUND, "Blog post not found").into_response();
        }
        Err(e) => {
            tracing::error!("failed to look up post '{}': {}", slug, e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Error loading blog posts")
                .into_response();
        }
    };

    let mut context = Context::new();
    context.insert("title", &post.title);
    context.insert("site", &SiteContext::from(&state.config));
    context.insert("post", &PostContext::from(&post));

    render_page(state.as_ref(), "post.html", &context)
}

/// Render one of the two listing pages
fn render_listing(state: &ServerState, template: &str, title: &str) -> Response {
    let posts = match state.loader.load_posts() {
        Ok(posts) => posts,
        Err(e) => {
            tracing::error!("failed to load posts: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Error loading blog posts")
                .into_response();
        }
    };
    tracing::info!(count = posts.len(), "loaded posts");

    let posts: Vec<PostContext> = posts.iter().map(PostContext::from).collect();

    let mut context = Context::new();
    context.insert("title", title);
    context.insert("site", &SiteContext::from(&state.config));
    context.insert("posts", &posts);

    render_page(state, template, &context)
}

fn render_page(state: &ServerState, template: &str, context: &Context) -> Response {
    match state.templates.render(template, context) {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            tracing::error!("template render error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template render error").into_response()
        }
    }
}
