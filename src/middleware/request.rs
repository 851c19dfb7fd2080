//! Inbound request abstraction.

/// The parts of an HTTP request the middleware reads.
pub trait Request {
    /// Request target as received, possibly with a query string.
    fn path(&self) -> &str;

    /// Value of the first header named `name` (case-insensitive).
    fn header(&self, name: &str) -> Option<&str>;
}

impl<R: Request + ?Sized> Request for &R {
    fn path(&self) -> &str {
        (**self).path()
    }

    fn header(&self, name: &str) -> Option<&str> {
        (**self).header(name)
    }
}

/// Owned request for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct SimpleRequest {
    path: String,
    headers: Vec<(String, String)>,
}

impl SimpleRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

impl Request for SimpleRequest {
    fn path(&self) -> &str {
        &self.path
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
