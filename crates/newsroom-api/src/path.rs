//! API path parsing

/// Prefix every API path is served under
pub const API_PREFIX: &str = "/api/";

/// A request path split into its routing segments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiPath<'a> {
    /// First segment; empty when the path has none
    pub resource: &'a str,

    /// Second segment (item id, filename, or upload label)
    pub id: Option<&'a str>,

    /// Third segment. Parsed but not used for routing.
    pub sub_resource: Option<&'a str>,
}

impl<'a> ApiPath<'a> {
    /// Strip the `/api/` prefix and one trailing slash, then split on `/`.
    ///
    /// Segments are passed through untouched. Empty `id`/`sub_resource`
    /// segments are treated as absent.
    pub fn parse(path: &'a str) -> Self {
        let clean = path.strip_prefix(API_PREFIX).unwrap_or(path);
        let clean = clean.strip_suffix('/').unwrap_or(clean);

        let mut parts = clean.split('/');
        let resource = parts.next().unwrap_or("");
        let id = parts.next().filter(|s| !s.is_empty());
        let sub_resource = parts.next().filter(|s| !s.is_empty());

        Self {
            resource,
            id,
            sub_resource,
        }
    }
}
