//! Query-string building for list/filter endpoints.

use smallvec::SmallVec;
use url::form_urlencoded;

/// Ordered query parameters. Unset values are dropped, so an empty query
/// leaves the path untouched.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pairs: SmallVec<[(&'static str, String); 6]>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opt<V: ToString>(mut self, key: &'static str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.pairs.push((key, value.to_string()));
        }
        self
    }

    /// Like [`Query::opt`] for borrowed strings.
    pub fn opt_str(mut self, key: &'static str, value: Option<&str>) -> Self {
        if let Some(value) = value {
            self.pairs.push((key, value.to_owned()));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.pairs {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }

    /// `path` with `?query` appended when there is anything to append.
    pub fn apply(&self, path: &str) -> String {
        if self.is_empty() {
            path.to_string()
        } else {
            format!("{path}?{}", self.encode())
        }
    }
}
