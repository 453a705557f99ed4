//! HTTP search page and JSON API

use std::{fmt::Write, path::Path, sync::Arc};

use axum::{
    Json, Router,
    extract::{Query, State},
    response::Html,
    routing::get,
};
use hcsindex_core::{FrameworkConfig, LinkBuilder, SectionRecord};
use hcsindex_search::{MatchKind, SectionIndex};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, services::ServeDir};

/// Shared, read-only server state.
#[derive(Debug)]
pub struct AppState {
    /// The loaded section index.
    pub index: SectionIndex,

    /// Builds the links shown with each result.
    pub links: LinkBuilder,

    /// Result limit when the request names none.
    pub limit: usize,

    /// Framework table for style and year lookups.
    pub frameworks: Vec<FrameworkConfig>,
}

/// Query-string parameters of both search routes.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// The query; absent means empty.
    #[serde(default)]
    pub q: String,

    /// Maximum number of results.
    pub limit: Option<usize>,
}

/// Query-string parameters of `/api/resolve`.
#[derive(Debug, Deserialize)]
pub struct ResolveParams {
    pub style: String,
    pub year: i32,
}

/// JSON body of `/api/resolve`; `section` is null when nothing matches.
#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub style: String,
    pub year: i32,
    pub period: Option<String>,
    pub section: Option<SectionRecord>,
    pub url: Option<String>,
}

/// One search result as shown to users.
#[derive(Debug, Clone, Serialize)]
pub struct Hit {
    pub document_id: String,
    pub page_number: u32,
    pub style: String,
    pub theme: String,
    pub raw_label: String,
    pub heading: String,
    pub kind: MatchKind,
    pub score: u32,
    /// Viewer link; absent when the viewer configuration is malformed.
    pub url: Option<String>,
}

/// JSON body of `/api/search`.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub count: usize,
    pub results: Vec<Hit>,
}

impl Hit {
    fn new(record: &SectionRecord, kind: MatchKind, score: u32, links: &LinkBuilder) -> Self {
        Self {
            document_id: record.document_id.clone(),
            page_number: record.page_number,
            style: record.style.clone(),
            theme: record.theme.clone(),
            raw_label: record.raw_label.clone(),
            heading: record.heading(),
            kind,
            score,
            url: links.viewer_url(&record.document_id, record.page_number).ok(),
        }
    }
}

/// Search and attach viewer links.
pub fn hits(index: &SectionIndex, links: &LinkBuilder, query: &str, limit: usize) -> Vec<Hit> {
    index
        .search_limited(query, limit)
        .into_iter()
        .map(|result| Hit::new(result.record, result.kind, result.score, links))
        .collect()
}

/// Create the search router. With `pdf_dir`, the local PDFs are served under
/// `/pdfs`.
pub fn create_router(state: Arc<AppState>, pdf_dir: Option<&Path>) -> Router {
    let mut router = Router::new()
        .route("/", get(search_page))
        .route("/api/search", get(search_api))
        .route("/api/resolve", get(resolve_api));

    if let Some(dir) = pdf_dir {
        router = router.nest_service("/pdfs", ServeDir::new(dir));
    }

    router.layer(CorsLayer::permissive()).with_state(state)
}

async fn search_api(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResponse> {
    let limit = params.limit.unwrap_or(state.limit);
    let results = hits(&state.index, &state.links, &params.q, limit);
    tracing::debug!(query = %params.q, count = results.len(), "api search");

    Json(SearchResponse {
        query: params.q,
        count: results.len(),
        results,
    })
}

async fn resolve_api(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ResolveParams>,
) -> Json<ResolveResponse> {
    let found = state
        .index
        .resolve(&state.frameworks, &params.style, params.year);
    tracing::debug!(style = %params.style, year = params.year, found = found.is_some(), "api resolve");

    Json(ResolveResponse {
        period: found.and_then(|f| f.framework.period.clone()),
        section: found.map(|f| f.record.clone()),
        url: found.and_then(|f| {
            state
                .links
                .viewer_url(&f.record.document_id, f.record.page_number)
                .ok()
        }),
        style: params.style,
        year: params.year,
    })
}

async fn search_page(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Html<String> {
    let limit = params.limit.unwrap_or(state.limit);
    let results = hits(&state.index, &state.links, &params.q, limit);
    Html(render_page(&params.q, &results))
}

/// Render the search page.
pub fn render_page(query: &str, results: &[Hit]) -> String {
    let mut html = String::from(PAGE_HEAD);
    let _ = write!(
        html,
        r#"<form action="/" method="get"><input type="search" name="q" value="{}" placeholder="Art Deco, Queen Anne, Evaluation Criteria..." autofocus> <button type="submit">Search</button></form>"#,
        escape_html(query)
    );

    if query.trim().is_empty() {
        html.push_str(r#"<p class="hint">Type a style or theme to find its section.</p>"#);
    } else if results.is_empty() {
        let _ = write!(
            html,
            r#"<p class="hint">No results for &quot;{}&quot;.</p>"#,
            escape_html(query.trim())
        );
    } else {
        html.push_str("<ol>");
        for hit in results {
            let heading = escape_html(&hit.heading);
            let title = match &hit.url {
                Some(url) => format!(
                    r#"<a href="{}" target="_blank" rel="noopener">{heading}</a>"#,
                    escape_html(url)
                ),
                None => heading,
            };
            let _ = write!(
                html,
                r#"<li>{title}<div class="meta">{} &middot; page {} &middot; {}</div></li>"#,
                escape_html(&hit.document_id),
                hit.page_number,
                escape_html(&hit.raw_label)
            );
        }
        html.push_str("</ol>");
    }

    html.push_str("</main></body></html>");
    html
}

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>HCS Section Finder</title>
<style>
body { font-family: system-ui, sans-serif; margin: 0; background: #faf8f5; color: #222; }
main { max-width: 48rem; margin: 2rem auto; padding: 0 1rem; }
input[type=search] { width: 70%; padding: .5rem; font-size: 1rem; }
button { padding: .5rem 1rem; font-size: 1rem; }
ol { padding-left: 1.5rem; }
li { margin: .75rem 0; }
.meta, .hint { color: #666; font-size: .9rem; }
</style>
</head>
<body><main>
<h1>HCS Section Finder</h1>
"#;
