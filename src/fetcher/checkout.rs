//! Mapping a package page to its canonical source repository URL.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

static ANCHOR_HREF: LazyLock<Regex> = LazyLock::new(|| {
    // The attribute name must follow whitespace so `data-href` never matches.
    Regex::new(r#"(?is)<a\s(?:[^>]*?\s)?href\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .unwrap()
});

/// Finds and canonicalizes source repository links for one source host.
#[derive(Debug, Clone)]
pub struct SourceLinks {
    host: String,
    org: String,
    redirect: Regex,
}

impl SourceLinks {
    /// Creates a resolver for links to `host`, rewriting index redirects of
    /// the form `/r/<name>/github-<org>-<suffix>` to `https://<host>/<org>/<name>.git`.
    ///
    /// # Errors
    ///
    /// Returns an error if the redirect pattern cannot be built from `org`.
    pub fn new(host: &str, org: &str) -> Result<Self, regex::Error> {
        let redirect =
            Regex::new(&format!(r"^/r/(?P<name>[^/]+)/github-{}-[^/]+/?$", regex::escape(org)))?;
        Ok(Self { host: host.to_string(), org: org.to_string(), redirect })
    }

    /// Returns the first anchor target on the page that mentions the host or
    /// is an index redirect, resolved against the page URL.
    #[must_use]
    pub fn find_link(&self, html: &str, page_url: &Url) -> Option<Url> {
        ANCHOR_HREF
            .captures_iter(html)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
            .map(|m| m.as_str().trim().replace("&amp;", "&"))
            .find_map(|href| {
                let link = page_url.join(&href).ok()?;
                (href.contains(&self.host) || self.redirect.is_match(link.path())).then_some(link)
            })
    }

    /// Maps a link to a clonable repository URL.
    ///
    /// Links already on `https://<host>` pass through unchanged, index
    /// redirects are rewritten, anything else is unresolvable.
    #[must_use]
    pub fn canonicalize(&self, link: &Url) -> Option<String> {
        if link.scheme() == "https" && link.host_str() == Some(self.host.as_str()) {
            return Some(link.to_string());
        }
        let caps = self.redirect.captures(link.path())?;
        Some(format!("https://{}/{}/{}.git", self.host, self.org, &caps["name"]))
    }

    /// Resolves a page to its repository URL, if it has a usable link.
    #[must_use]
    pub fn repo_url(&self, html: &str, page_url: &Url) -> Option<String> {
        let Some(link) = self.find_link(html, page_url) else {
            log::info!("no {} link found on {page_url}", self.host);
            return None;
        };
        log::debug!("found checkout link {link} on {page_url}");
        let repo = self.canonicalize(&link);
        if repo.is_none() {
            log::warn!("unexpected checkout link format: {link}");
        }
        repo
    }
}

/// Local directory name for a repository URL: the last path segment with
/// any `.git` suffix removed.
#[must_use]
pub fn checkout_dir_name(repo_url: &str) -> Option<String> {
    let last = repo_url.trim_end_matches('/').rsplit('/').next()?;
    let name = last.strip_suffix(".git").unwrap_or(last);
    (!name.is_empty()).then(|| name.to_string())
}
