//! Static-file serving with single-page-app fallback.
//!
//! # Responsibilities
//! - Serve files from a configured directory for any path no route matched
//! - Serve the root document for paths the file service cannot resolve
//! - Enforce the dotfile policy and extension fallbacks in front of the
//!   file service
//!
//! # Design Decisions
//! - tower-http `ServeDir` does the file IO; policy checks and the
//!   directory redirect run as a middleware in front of it
//! - `etag` is accepted for option-surface compatibility only; the file
//!   service emits Last-Modified rather than ETags

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::Request;
use axum::http::{header, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::set_header::SetResponseHeaderLayer;

/// Static serving configuration passed through `ListenOptions`.
#[derive(Debug, Clone)]
pub struct ServeStatic {
    pub dir_path: PathBuf,
    pub options: Option<ServeStaticOptions>,
}

impl ServeStatic {
    pub fn new(dir_path: impl Into<PathBuf>) -> Self {
        Self {
            dir_path: dir_path.into(),
            options: None,
        }
    }

    pub fn with_options(mut self, options: ServeStaticOptions) -> Self {
        self.options = Some(options);
        self
    }
}

/// How requests for dotfiles are answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotfilePolicy {
    /// Serve them like any other file.
    Allow,
    /// Respond 403.
    Deny,
    /// Respond 404, as if the file did not exist.
    Ignore,
}

#[derive(Debug, Clone)]
pub struct ServeStaticOptions {
    pub dotfiles: DotfilePolicy,
    /// Has no effect; the file service sends Last-Modified and does not
    /// compute ETags. Kept so option sets carry over unchanged.
    pub etag: bool,
    /// Extensions tried, in order, when a bare path does not resolve to a
    /// file on disk (`/about` to `/about.html`).
    pub extensions: Vec<String>,
    /// Serve `index.html` for directory requests.
    pub index: bool,
    /// Cache-Control max-age applied to served files.
    pub max_age: Duration,
    /// Redirect directory requests missing a trailing slash (301).
    pub redirect: bool,
}

impl Default for ServeStaticOptions {
    fn default() -> Self {
        Self {
            dotfiles: DotfilePolicy::Ignore,
            etag: false,
            extensions: ["html", "js", "scss", "css", "woff2", "svg", "png"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            index: false,
            max_age: Duration::from_secs(365 * 24 * 60 * 60),
            redirect: true,
        }
    }
}

#[derive(Debug)]
struct StaticPolicy {
    root: PathBuf,
    dotfiles: DotfilePolicy,
    extensions: Vec<String>,
    redirect: bool,
}

/// Build the fallback router that serves files for unmatched paths.
pub(crate) fn router(config: ServeStatic) -> axum::Router {
    let options = config.options.unwrap_or_default();
    let root = config.dir_path;

    // anything the file service cannot resolve falls back to the root
    // document, so client-side routed apps deep-link correctly
    let files = ServeDir::new(&root)
        .append_index_html_on_directories(options.index)
        .fallback(ServeFile::new(root.join("index.html")));

    let cache_control =
        HeaderValue::from_str(&format!("public, max-age={}", options.max_age.as_secs()))
            .unwrap_or_else(|_| HeaderValue::from_static("public, max-age=31536000"));

    let policy = Arc::new(StaticPolicy {
        root,
        dotfiles: options.dotfiles,
        extensions: options.extensions,
        redirect: options.redirect,
    });

    axum::Router::new()
        .fallback_service(files)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            cache_control,
        ))
        .layer(axum::middleware::from_fn(
            move |request: Request, next: Next| {
                let policy = policy.clone();
                async move { apply_policy(policy, request, next).await }
            },
        ))
}

async fn apply_policy(policy: Arc<StaticPolicy>, mut request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();

    if policy.dotfiles != DotfilePolicy::Allow && path.split('/').any(is_dotfile_segment) {
        let status = match policy.dotfiles {
            DotfilePolicy::Deny => StatusCode::FORBIDDEN,
            _ => StatusCode::NOT_FOUND,
        };
        return status.into_response();
    }

    if let Some(location) = directory_redirect(&policy, &path).await {
        let location = match request.uri().query() {
            Some(query) => format!("{location}?{query}"),
            None => location,
        };
        return match HeaderValue::from_str(&location) {
            Ok(value) => {
                (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, value)]).into_response()
            }
            Err(_) => StatusCode::NOT_FOUND.into_response(),
        };
    }

    if let Some(rewritten) = extension_fallback(&policy, &path).await {
        let target = match request.uri().query() {
            Some(query) => format!("{rewritten}?{query}"),
            None => rewritten,
        };
        if let Ok(uri) = target.parse() {
            *request.uri_mut() = uri;
        }
    }

    next.run(request).await
}

/// When the path names a directory on disk and carries no trailing slash,
/// the canonical `/dir/` location to redirect to.
async fn directory_redirect(policy: &StaticPolicy, path: &str) -> Option<String> {
    if !policy.redirect || path.ends_with('/') {
        return None;
    }

    let relative = path.trim_start_matches('/');
    if relative.is_empty() || relative.split('/').any(|segment| segment == "..") {
        return None;
    }

    let metadata = tokio::fs::metadata(policy.root.join(relative)).await.ok()?;
    if metadata.is_dir() {
        Some(format!("{path}/"))
    } else {
        None
    }
}

fn is_dotfile_segment(segment: &str) -> bool {
    segment.starts_with('.') && segment.len() > 1
}

/// Resolve `/about` to `/about.html` (first configured extension that exists
/// on disk) when the bare path itself does not.
async fn extension_fallback(policy: &StaticPolicy, path: &str) -> Option<String> {
    if policy.extensions.is_empty() {
        return None;
    }

    let relative = path.trim_start_matches('/');
    if relative.is_empty() || relative.split('/').any(|segment| segment == "..") {
        return None;
    }

    let file_name = relative.rsplit('/').next()?;
    if file_name.contains('.') {
        return None;
    }

    if tokio::fs::try_exists(policy.root.join(relative))
        .await
        .unwrap_or(false)
    {
        return None;
    }

    for extension in &policy.extensions {
        let candidate = format!("{relative}.{extension}");
        if tokio::fs::try_exists(policy.root.join(&candidate))
            .await
            .unwrap_or(false)
        {
            return Some(format!("/{candidate}"));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotfile_segments_are_detected() {
        assert!(is_dotfile_segment(".env"));
        assert!(is_dotfile_segment(".."));
        assert!(!is_dotfile_segment("app.js"));
        assert!(!is_dotfile_segment(""));
        assert!(!is_dotfile_segment("."));
    }

    #[test]
    fn default_options_match_the_documented_defaults() {
        let options = ServeStaticOptions::default();

        assert_eq!(options.dotfiles, DotfilePolicy::Ignore);
        assert!(!options.etag);
        assert_eq!(options.extensions[0], "html");
        assert_eq!(options.extensions.len(), 7);
        assert!(!options.index);
        assert_eq!(options.max_age, Duration::from_secs(31_536_000));
        assert!(options.redirect);
    }
}
