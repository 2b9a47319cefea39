//! Per-request context handed to route handlers and middleware.

use std::collections::HashMap;

use crate::Request;

/// Values captured by the matched route pattern.
///
/// Wildcard routes (`/*`) store the matched remainder under `"wildcard"`.
#[derive(Default, Debug, Clone)]
pub struct PathParams {
    map: HashMap<String, String>,
}

impl PathParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: String, value: String) {
        self.map.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(String::as_str)
    }
}

/// A request together with the parameters its route captured.
pub struct Context {
    request: Request,
    params: PathParams,
}

impl Context {
    pub fn new(request: Request) -> Self {
        Self::with_params(request, PathParams::new())
    }

    pub fn with_params(request: Request, params: PathParams) -> Self {
        Self { request, params }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn params(&self) -> &PathParams {
        &self.params
    }

    /// Gives the request back, dropping any captured parameters.
    pub fn into_request(self) -> Request {
        self.request
    }

    /// Deserializes the request body as JSON.
    pub fn json<T>(&self) -> Result<T, serde_json::Error>
    where
        T: serde::de::DeserializeOwned,
    {
        serde_json::from_slice(self.request.body())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_body_is_deserialized() {
        let raw = b"POST /api/chat HTTP/1.1\r\nContent-Length: 16\r\n\r\n{\"prompt\":\"hej\"}";
        let (req, _) = Request::parse(raw).unwrap();
        let ctx = Context::new(req);
        let value: serde_json::Value = ctx.json().unwrap();
        assert_eq!(value["prompt"], "hej");
    }

    #[test]
    fn params_round_through() {
        let (req, _) = Request::parse(b"GET /maps/a.html HTTP/1.1\r\n\r\n").unwrap();
        let mut params = PathParams::new();
        params.insert("wildcard".to_owned(), "/maps/a.html".to_owned());
        let ctx = Context::with_params(req, params);
        assert_eq!(ctx.params().get("wildcard"), Some("/maps/a.html"));
        assert_eq!(ctx.into_request().path(), "/maps/a.html");
    }
}
