/// Prefix under which the application lives, e.g. `/app`.
///
/// Matching respects segment boundaries: `/app` owns `/app` and `/app/foo`,
/// not `/application`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasePath(Option<String>);

impl BasePath {
    /// Accepts `app`, `/app`, `/app/`; an empty prefix or `/` is the root.
    pub fn new(prefix: &str) -> Self {
        let trimmed = prefix.trim().trim_matches('/');
        if trimmed.is_empty() {
            BasePath(None)
        } else {
            BasePath(Some(format!("/{trimmed}")))
        }
    }

    /// The prefix without trailing slash, `""` for the root.
    pub fn as_str(&self) -> &str {
        self.0.as_deref().unwrap_or("")
    }

    /// Route path of `location`, or `None` when it lies outside the prefix.
    pub fn strip(&self, location: &str) -> Option<String> {
        let rest = match &self.0 {
            None => location,
            Some(base) => {
                let rest = location.strip_prefix(base.as_str())?;
                if !rest.is_empty() && !rest.starts_with('/') {
                    return None;
                }
                rest
            }
        };
        if rest.starts_with('/') {
            Some(rest.to_string())
        } else {
            Some(format!("/{rest}"))
        }
    }

    /// Location for the route `path`.
    pub fn join(&self, path: &str) -> String {
        format!("{}/{}", self.as_str(), path.trim_start_matches('/'))
    }
}
