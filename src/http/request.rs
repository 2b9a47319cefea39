//! HTTP/1.1 request parsing using the [`httparse`] crate.

use bytes::Bytes;
use thiserror::Error;

use super::{Headers, Method};

/// Errors that can occur while parsing an HTTP/1.1 request head.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("request is incomplete — more data needed")]
    Incomplete,

    #[error("HTTP parse error: {0}")]
    Parse(#[from] httparse::Error),

    #[error("missing required field: {field}")]
    MissingField { field: &'static str },
}

/// A parsed HTTP/1.1 request.
///
/// The body holds at most `Content-Length` bytes; anything after that in the
/// read buffer belongs to the next request on the connection.
///
/// # Examples
///
/// ```
/// use mapserve::http::request::Request;
///
/// let raw = b"POST /api/chat HTTP/1.1\r\nContent-Length: 2\r\n\r\n{}GET / HTTP/1.1\r\n";
/// let (request, offset) = Request::parse(raw).unwrap();
///
/// assert_eq!(request.path(), "/api/chat");
/// assert_eq!(request.content_length(), Some(2));
/// assert_eq!(&request.body()[..], b"{}");
/// assert_eq!(&raw[offset..offset + 2], b"{}");
/// ```
#[derive(Debug)]
pub struct Request {
    method: Method,
    path: String,
    /// HTTP minor version: 0 for HTTP/1.0, 1 for HTTP/1.1.
    version: u8,
    headers: Headers,
    query: Option<String>,
    body: Bytes,
}

impl Request {
    /// Maximum number of headers we support per request.
    const MAX_HEADERS: usize = 64;

    /// Parses a request from `buf`.
    ///
    /// Returns the request and the offset at which its body begins. The body
    /// is whatever part of the `Content-Length` bytes is already in `buf`; the
    /// caller decides whether to wait for the rest.
    ///
    /// # Errors
    ///
    /// - [`RequestError::Incomplete`] — the header block is not complete yet.
    /// - [`RequestError::Parse`] — the head is malformed.
    /// - [`RequestError::MissingField`] — method, path or version is absent.
    pub fn parse(buf: &[u8]) -> Result<(Self, usize), RequestError> {
        let mut headers = [httparse::EMPTY_HEADER; Self::MAX_HEADERS];
        let mut raw_req = httparse::Request::new(&mut headers);

        let body_offset = match raw_req.parse(buf)? {
            httparse::Status::Complete(offset) => offset,
            httparse::Status::Partial => return Err(RequestError::Incomplete),
        };

        let Ok(method) = raw_req
            .method
            .ok_or(RequestError::MissingField { field: "method" })?
            .parse::<Method>();

        let raw_path = raw_req
            .path
            .ok_or(RequestError::MissingField { field: "path" })?;

        let (path, query) = match raw_path.split_once('?') {
            Some((path, query)) => (path.to_owned(), Some(query.to_owned())),
            None => (raw_path.to_owned(), None),
        };

        let version = raw_req
            .version
            .ok_or(RequestError::MissingField { field: "version" })?;

        let mut header_map = Headers::with_capacity(raw_req.headers.len());
        for header in raw_req.headers.iter() {
            if let Ok(value) = std::str::from_utf8(header.value) {
                header_map.insert(header.name, value);
            }
        }

        let mut request = Self {
            method,
            path,
            version,
            headers: header_map,
            query,
            body: Bytes::new(),
        };

        let body_end = buf
            .len()
            .min(body_offset.saturating_add(request.content_length().unwrap_or(0)));
        request.body = Bytes::copy_from_slice(&buf[body_offset..body_end]);

        Ok((request, body_offset))
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request path (without the query string), still percent-encoded.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the HTTP minor version number (0 = HTTP/1.0, 1 = HTTP/1.1).
    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns the raw query string (without the leading `?`), if any.
    pub fn query_string(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns `true` if the connection should be kept alive after this request.
    ///
    /// HTTP/1.1 defaults to keep-alive; HTTP/1.0 only with an explicit
    /// `Connection: keep-alive`.
    pub fn is_keep_alive(&self) -> bool {
        match self.headers.get("connection") {
            Some(conn) => conn.eq_ignore_ascii_case("keep-alive"),
            None => self.version == 1,
        }
    }

    /// Returns the `Content-Length` header parsed as a `usize`, if present and valid.
    pub fn content_length(&self) -> Option<usize> {
        self.headers.get("content-length")?.trim().parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_listing_request() {
        let raw = b"GET /api/files HTTP/1.1\r\nHost: localhost:8000\r\n\r\n";
        let (req, offset) = Request::parse(raw).unwrap();
        assert_eq!(req.method(), &Method::Get);
        assert_eq!(req.path(), "/api/files");
        assert_eq!(req.version(), 1);
        assert_eq!(req.headers().get("host"), Some("localhost:8000"));
        assert!(req.body().is_empty());
        assert_eq!(offset, raw.len());
    }

    #[test]
    fn query_string_is_split_off() {
        let raw = b"GET /index.html?debug=true&lang=cs HTTP/1.1\r\n\r\n";
        let (req, _) = Request::parse(raw).unwrap();
        assert_eq!(req.path(), "/index.html");
        assert_eq!(req.query_string(), Some("debug=true&lang=cs"));
    }

    #[test]
    fn incomplete_head() {
        let raw = b"POST /api/chat HTTP/1.1\r\nContent-Le";
        assert!(matches!(Request::parse(raw), Err(RequestError::Incomplete)));
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let raw = b"\x00\x01\x02 nope\r\n\r\n";
        assert!(matches!(Request::parse(raw), Err(RequestError::Parse(_))));
    }

    #[test]
    fn body_is_bounded_by_content_length() {
        let raw = b"POST /api/chat HTTP/1.1\r\nContent-Length: 5\r\n\r\nhelloGET / HTTP/1.1\r\n\r\n";
        let (req, _) = Request::parse(raw).unwrap();
        assert_eq!(&req.body()[..], b"hello");
    }

    #[test]
    fn partial_body_is_what_has_arrived() {
        let raw = b"POST /api/chat HTTP/1.1\r\nContent-Length: 10\r\n\r\nhel";
        let (req, offset) = Request::parse(raw).unwrap();
        assert_eq!(&req.body()[..], b"hel");
        assert!(raw.len() < offset + req.content_length().unwrap());
    }

    #[test]
    fn huge_content_length_does_not_overflow() {
        let raw = b"POST /api/chat HTTP/1.1\r\nContent-Length: 18446744073709551615\r\n\r\n{}";
        let (req, _) = Request::parse(raw).unwrap();
        assert_eq!(req.content_length(), Some(usize::MAX));
        assert_eq!(&req.body()[..], b"{}");
    }

    #[test]
    fn missing_content_length_means_no_body() {
        let raw = b"POST /api/chat HTTP/1.1\r\n\r\n{\"prompt\":\"x\"}";
        let (req, _) = Request::parse(raw).unwrap();
        assert_eq!(req.content_length(), None);
        assert!(req.body().is_empty());
    }

    #[test]
    fn keep_alive_rules() {
        let (req, _) = Request::parse(b"GET / HTTP/1.1\r\n\r\n").unwrap();
        assert!(req.is_keep_alive());

        let (req, _) = Request::parse(b"GET / HTTP/1.1\r\nConnection: close\r\n\r\n").unwrap();
        assert!(!req.is_keep_alive());

        let (req, _) = Request::parse(b"GET / HTTP/1.0\r\n\r\n").unwrap();
        assert!(!req.is_keep_alive());
    }
}
