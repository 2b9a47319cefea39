//! Request routing — map HTTP methods and URL patterns to handlers.
//!
//! | Pattern       | Example match              | Captured params                    |
//! |---------------|----------------------------|------------------------------------|
//! | `/api/files`  | `/api/files`               | *(none)*                           |
//! | `/maps/*`     | `/maps/prague/index.html`  | `wildcard → "/prague/index.html"`  |
//! | `/*`          | any path                   | `wildcard → <whole path>`          |
//!
//! Trailing slashes are ignored when matching exact patterns. Routes are
//! tried in registration order and the first match wins; if none matches the
//! fallback handler runs.

use std::pin::Pin;
use std::sync::Arc;

use crate::context::{Context, PathParams};
use crate::{Method, Request, Response, StatusCode};

/// Type-erased async handler stored by the router.
pub type Handler =
    Arc<dyn Fn(Context) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send + Sync + 'static>;

/// Conversion trait for async handler functions.
///
/// Implemented for every `Fn(Context) -> impl Future<Output = Response> + Send`
/// that is `Send + Sync + 'static`.
pub trait IntoHandler: Send + Sync + 'static {
    fn call(&self, ctx: Context) -> Pin<Box<dyn Future<Output = Response> + Send>>;
}

impl<T, F> IntoHandler for T
where
    T: Fn(Context) -> F + Send + Sync + 'static,
    F: Future<Output = Response> + Send + 'static,
{
    fn call(&self, ctx: Context) -> Pin<Box<dyn Future<Output = Response> + Send>> {
        Box::pin((self)(ctx))
    }
}

#[derive(Debug, Clone)]
enum Pattern {
    Exact(String),
    // Matches any path starting with the prefix; `/*` has an empty prefix.
    Wildcard(String),
}

impl Pattern {
    fn parse(pattern: &str) -> Self {
        if let Some(prefix) = pattern.strip_suffix("/*") {
            return Pattern::Wildcard(prefix.to_string());
        }
        Pattern::Exact(trim_trailing_slash(pattern).to_string())
    }

    fn matches(&self, path: &str) -> Option<PathParams> {
        match self {
            Pattern::Exact(p) => (p == trim_trailing_slash(path)).then(PathParams::new),
            Pattern::Wildcard(prefix) => {
                let suffix = path.strip_prefix(prefix.as_str())?;
                if !prefix.is_empty() && !suffix.is_empty() && !suffix.starts_with('/') {
                    // `/maps/*` must not match `/mapsfoo`.
                    return None;
                }
                let mut params = PathParams::new();
                params.insert("wildcard".to_string(), suffix.to_string());
                Some(params)
            }
        }
    }
}

fn trim_trailing_slash(path: &str) -> &str {
    if path != "/" && path.ends_with('/') {
        &path[..path.len() - 1]
    } else {
        path
    }
}

struct Route {
    method: Method,
    pattern: Pattern,
    handler: Handler,
}

impl Route {
    fn matches(&self, method: &Method, path: &str) -> Option<PathParams> {
        if &self.method == method {
            self.pattern.matches(path)
        } else {
            None
        }
    }
}

/// Dispatches requests to the first route whose method and pattern match.
///
/// # Examples
///
/// ```rust,no_run
/// use mapserve::{Router, Response, StatusCode};
/// use mapserve::context::Context;
///
/// let mut router = Router::new();
/// router.get("/api/files", |_ctx| async { Response::new(StatusCode::Ok) });
/// router.get("/*", |ctx: Context| async move {
///     let path = ctx.params().get("wildcard").unwrap_or("/").to_owned();
///     Response::new(StatusCode::Ok).body(path)
/// });
/// router.fallback(|_ctx| async {
///     Response::new(StatusCode::NotFound).body("Endpoint not found")
/// });
/// ```
pub struct Router {
    routes: Vec<Route>,
    fallback: Option<Handler>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            fallback: None,
        }
    }

    /// Registers a `GET` route.
    pub fn get(&mut self, path: &str, handler: impl IntoHandler) {
        self.add_route(Method::Get, path, handler);
    }

    /// Registers a `HEAD` route.
    pub fn head(&mut self, path: &str, handler: impl IntoHandler) {
        self.add_route(Method::Head, path, handler);
    }

    /// Registers a `POST` route.
    pub fn post(&mut self, path: &str, handler: impl IntoHandler) {
        self.add_route(Method::Post, path, handler);
    }

    /// Sets the handler used when no route matches.
    ///
    /// Without one, unmatched requests get an empty `404 Not Found`.
    pub fn fallback(&mut self, handler: impl IntoHandler) {
        self.fallback = Some(erase(handler));
    }

    fn add_route(&mut self, method: Method, path: &str, handler: impl IntoHandler) {
        self.routes.push(Route {
            method,
            pattern: Pattern::parse(path),
            handler: erase(handler),
        });
    }

    /// Dispatches `request` to the first matching route, or to the fallback.
    pub async fn route(&self, request: Request) -> Response {
        let matched = self
            .routes
            .iter()
            .find_map(|route| Some((route, route.matches(request.method(), request.path())?)));

        match matched {
            Some((route, params)) => (route.handler)(Context::with_params(request, params)).await,
            None => match &self.fallback {
                Some(fallback) => fallback(Context::new(request)).await,
                None => Response::new(StatusCode::NotFound),
            },
        }
    }
}

fn erase(handler: impl IntoHandler) -> Handler {
    Arc::new(move |ctx| handler.call(ctx))
}
