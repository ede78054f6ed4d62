use once_cell::sync::Lazy;
use regex::Regex;

/// Which flavor of metadata file a contents-API descriptor points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    Topic,
    Activity,
}

impl ManifestKind {
    fn name_suffix(self) -> &'static Regex {
        // Anchored through end of string to tolerate template-engine
        // extensions (`.ejs`) appended after the canonical suffix.
        static TOPIC: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"\.topic\.metadata\.json.*$").expect("static regex"));
        static ACTIVITY: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"\.metadata\.json.*$").expect("static regex"));
        match self {
            ManifestKind::Topic => &TOPIC,
            ManifestKind::Activity => &ACTIVITY,
        }
    }

    fn url_suffix_pattern(self, app_name: &str) -> String {
        let escaped = regex::escape(app_name);
        match self {
            ManifestKind::Topic => {
                format!(r"(assets|src)/{escaped}\.topic\.metadata\.json.*$")
            }
            ManifestKind::Activity => {
                format!(r"(assets|src)/{escaped}\.metadata\.json.*$")
            }
        }
    }
}

/// An application's identity derived from a contents-API file descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppIdentity {
    /// File name with the metadata suffix stripped, e.g. `dbp-cabinet`.
    pub app_name: String,
    /// Repository content-API base URL, suitable for prefixing with `src/`
    /// or `assets/` to locate sibling files.
    pub app_git_url: String,
}

/// Derive the owning application's name and content-API base URL from the
/// envelope's `name` and `url`.
///
/// The URL match runs greedily to the end of string so query suffixes the
/// API appends to `url` but not to `name` (`?ref=main`) are stripped with
/// the file segment. If the pattern does not match, `url` is returned
/// unchanged; downstream fetches against it then fail through the normal
/// 404 path.
pub fn resolve_app_identity(name: &str, url: &str, kind: ManifestKind) -> AppIdentity {
    let app_name = kind.name_suffix().replace(name, "").into_owned();

    let app_git_url = match Regex::new(&kind.url_suffix_pattern(&app_name)) {
        Ok(suffix) => suffix.replace(url, "").into_owned(),
        Err(_) => url.to_string(),
    };

    AppIdentity {
        app_name,
        app_git_url,
    }
}

/// Resolve a module source path against the URL of the metadata file it came
/// from. Absolute inputs pass through; unparsable bases fall back to the
/// relative path itself.
pub fn resolve_relative_url(base: &str, relative: &str) -> String {
    match reqwest::Url::parse(base).and_then(|base| base.join(relative)) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => relative.to_string(),
    }
}
