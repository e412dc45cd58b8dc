//! Path classification. The gateway has exactly four disjoint dispositions,
//! so routing is a fixed, ordered rule table rather than a pattern registry.

pub const DEFAULT_ASSET_PREFIX: &str = "/static/";

pub const DEFAULT_ASSET_EXTENSIONS: &[&str] = &[
    ".html", ".css", ".js", ".ico", ".png", ".jpg", ".jpeg", ".svg",
];

pub const DEFAULT_API_PREFIXES: &[&str] = &[
    "/download",
    "/progress",
    "/download_file/",
    "/delete/",
    "/send_feedback",
];

/// Mutually exclusive category a request path is assigned to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteClass {
    /// Serve from the static-asset origin.
    Asset,
    /// Forward to the backend API with the destination host rewritten.
    ApiProxy,
    /// The site root; served by the asset origin like any other asset.
    Root,
    /// Nothing matched; the gateway synthesizes a 404 itself.
    NotFound,
}

impl RouteClass {
    pub fn as_str(self) -> &'static str {
        match self {
            RouteClass::Asset => "asset",
            RouteClass::ApiProxy => "api-proxy",
            RouteClass::Root => "root",
            RouteClass::NotFound => "not-found",
        }
    }
}

/// Ordered classification rules, evaluated first match wins. The order is
/// load-bearing: extension matches must win over API prefixes so asset
/// files under any path reach the asset origin, and the root check must
/// run before the fallback.
#[derive(Clone, Debug)]
pub struct RouteTable {
    asset_prefix: String,
    asset_extensions: Vec<String>,
    api_prefixes: Vec<String>,
}

impl RouteTable {
    pub fn new(
        asset_prefix: impl Into<String>,
        asset_extensions: Vec<String>,
        api_prefixes: Vec<String>,
    ) -> Self {
        Self {
            asset_prefix: asset_prefix.into(),
            asset_extensions,
            api_prefixes,
        }
    }

    /// Classify a request path. Pure function of the path string; query
    /// strings are not part of the input and must be stripped by the caller
    /// (the router passes `uri.path()`).
    pub fn classify(&self, path: &str) -> RouteClass {
        if path.starts_with(self.asset_prefix.as_str())
            || self
                .asset_extensions
                .iter()
                .any(|ext| path.ends_with(ext.as_str()))
        {
            return RouteClass::Asset;
        }

        if self
            .api_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
        {
            return RouteClass::ApiProxy;
        }

        if path == "/" || path.is_empty() {
            return RouteClass::Root;
        }

        RouteClass::NotFound
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(
            DEFAULT_ASSET_PREFIX,
            DEFAULT_ASSET_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_string())
                .collect(),
            DEFAULT_API_PREFIXES
                .iter()
                .map(|prefix| (*prefix).to_string())
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_prefix_is_an_asset() {
        let table = RouteTable::default();
        assert_eq!(table.classify("/static/app.wasm"), RouteClass::Asset);
        assert_eq!(table.classify("/static/css/site.css"), RouteClass::Asset);
    }

    #[test]
    fn every_default_extension_is_an_asset() {
        let table = RouteTable::default();
        for ext in DEFAULT_ASSET_EXTENSIONS {
            let path = format!("/anything/file{ext}");
            assert_eq!(table.classify(&path), RouteClass::Asset, "{path}");
        }
    }

    #[test]
    fn extension_match_wins_over_api_prefix() {
        // /download/report.html carries an API prefix but must still reach
        // the asset origin; the asset rule runs first.
        let table = RouteTable::default();
        assert_eq!(table.classify("/download/report.html"), RouteClass::Asset);
        assert_eq!(table.classify("/delete/icon.svg"), RouteClass::Asset);
    }

    #[test]
    fn api_prefixes_classify_as_proxy() {
        let table = RouteTable::default();
        for prefix in DEFAULT_API_PREFIXES {
            assert_eq!(table.classify(prefix), RouteClass::ApiProxy, "{prefix}");
        }
        // Plain prefix match, so sibling spellings are proxied too.
        assert_eq!(table.classify("/downloads"), RouteClass::ApiProxy);
        assert_eq!(table.classify("/progress/123"), RouteClass::ApiProxy);
        assert_eq!(
            table.classify("/download_file/abc123"),
            RouteClass::ApiProxy
        );
    }

    #[test]
    fn root_and_empty_paths_go_to_the_asset_origin() {
        let table = RouteTable::default();
        assert_eq!(table.classify("/"), RouteClass::Root);
        assert_eq!(table.classify(""), RouteClass::Root);
    }

    #[test]
    fn unmatched_paths_fall_through() {
        let table = RouteTable::default();
        assert_eq!(table.classify("/unknown/xyz"), RouteClass::NotFound);
        assert_eq!(table.classify("/downloa"), RouteClass::NotFound);
        assert_eq!(table.classify("/api/download"), RouteClass::NotFound);
    }

    #[test]
    fn classification_is_deterministic() {
        let table = RouteTable::default();
        for path in ["/", "", "/static/x", "/download", "/unknown/xyz", "/a.png"] {
            assert_eq!(table.classify(path), table.classify(path), "{path}");
        }
    }

    #[test]
    fn custom_tables_replace_the_defaults() {
        let table = RouteTable::new(
            "/assets/".to_string(),
            vec![".webp".to_string()],
            vec!["/v2/".to_string()],
        );
        assert_eq!(table.classify("/assets/logo"), RouteClass::Asset);
        assert_eq!(table.classify("/pics/logo.webp"), RouteClass::Asset);
        assert_eq!(table.classify("/v2/download"), RouteClass::ApiProxy);
        assert_eq!(table.classify("/static/app.css"), RouteClass::NotFound);
        assert_eq!(table.classify("/download"), RouteClass::NotFound);
    }

    #[test]
    fn route_class_labels_are_stable() {
        assert_eq!(RouteClass::Asset.as_str(), "asset");
        assert_eq!(RouteClass::ApiProxy.as_str(), "api-proxy");
        assert_eq!(RouteClass::Root.as_str(), "root");
        assert_eq!(RouteClass::NotFound.as_str(), "not-found");
    }
}
