//! Link target resolution against the site the menu belongs to.

use url::Url;

/// The "current document" origin that rendered links are compared against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteOrigin {
    base: Url,
}

impl SiteOrigin {
    pub fn parse(site_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            base: Url::parse(site_url.trim())?,
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn host(&self) -> Option<&str> {
        self.base.host_str()
    }

    /// Resolve `href` relative to the site URL.
    pub fn resolve(&self, href: &str) -> Option<Url> {
        self.base.join(href.trim()).ok()
    }

    /// A link is external when its resolved hostname differs from the
    /// site's. Scheme and port are ignored. Unparseable targets count as
    /// internal.
    pub fn is_external(&self, href: &str) -> bool {
        self.resolve(href)
            .is_some_and(|target| target.host_str() != self.base.host_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteOrigin {
        SiteOrigin::parse("https://example.com/wp-admin/").unwrap()
    }

    #[test]
    fn relative_links_are_internal() {
        let site = site();
        assert!(!site.is_external("edit.php"));
        assert!(!site.is_external("/wp-admin/options-general.php"));
        assert!(!site.is_external("#"));
        assert_eq!(
            site.resolve("edit.php").unwrap().as_str(),
            "https://example.com/wp-admin/edit.php"
        );
    }

    #[test]
    fn other_hosts_are_external() {
        let site = site();
        assert!(site.is_external("https://wordpress.org/support/"));
        assert!(!site.is_external("http://example.com/"));
    }

    #[test]
    fn same_host_on_another_port_is_internal() {
        let site = site();
        assert!(!site.is_external("https://example.com:8443/wp-admin/"));
        assert!(site.is_external("https://shop.example.com/"));
    }

    #[test]
    fn unparseable_target_is_internal() {
        let site = site();
        assert!(!site.is_external("http://[::1"));
    }
}
