use std::fmt;

use headers::HeaderMapExt;
use http::header::{HeaderMap, HeaderValue, SET_COOKIE};

use super::errors::CookieError;

/// Same-site policy for the session cookie.
///
/// `None` is deliberately not offered: the session cookie must never ride
/// along on cross-site requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    #[default]
    Lax,
    Strict,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SameSite::Lax => f.write_str("Lax"),
            SameSite::Strict => f.write_str("Strict"),
        }
    }
}

/// Attributes applied to every `Set-Cookie` for the session cookie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieAttributes {
    name: String,
    path: String,
    domain: Option<String>,
    max_age: u64,
    secure: bool,
    same_site: SameSite,
}

impl CookieAttributes {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        domain: Option<String>,
        max_age: u64,
        secure: bool,
        same_site: SameSite,
    ) -> Result<Self, CookieError> {
        let name = name.into();
        let path = path.into();

        if name.is_empty()
            || !name
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b"-_.".contains(&b))
        {
            return Err(CookieError::Attribute(format!("invalid cookie name '{name}'")));
        }
        if !path.starts_with('/') || path.contains(';') || path.contains(char::is_control) {
            return Err(CookieError::Attribute(format!("invalid cookie path '{path}'")));
        }
        if let Some(domain) = &domain {
            if domain.is_empty()
                || domain.contains(';')
                || domain.contains(char::is_whitespace)
                || domain.contains(char::is_control)
            {
                return Err(CookieError::Attribute(format!(
                    "invalid cookie domain '{domain}'"
                )));
            }
        }

        Ok(Self {
            name,
            path,
            domain,
            max_age,
            secure,
            same_site,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn max_age(&self) -> u64 {
        self.max_age
    }

    pub fn secure(&self) -> bool {
        self.secure
    }

    /// Always true; scripts never see the session cookie.
    pub fn http_only(&self) -> bool {
        true
    }

    pub fn same_site(&self) -> SameSite {
        self.same_site
    }

    fn render(&self, value: &str, max_age: u64) -> String {
        let mut cookie = format!(
            "{}={value}; SameSite={}; HttpOnly; Path={}; Max-Age={max_age}",
            self.name, self.same_site, self.path
        );
        if let Some(domain) = &self.domain {
            cookie.push_str(&format!("; Domain={domain}"));
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    pub fn set_cookie_value(&self, value: &str) -> String {
        self.render(value, self.max_age)
    }

    pub fn clear_cookie_value(&self) -> String {
        let mut cookie = self.render("", 0);
        cookie.push_str("; Expires=Thu, 01 Jan 1970 00:00:00 GMT");
        cookie
    }

    pub fn set_cookie_header(&self, headers: &mut HeaderMap, value: &str) -> Result<(), CookieError> {
        append_set_cookie(headers, self.set_cookie_value(value))
    }

    pub fn clear_cookie_header(&self, headers: &mut HeaderMap) -> Result<(), CookieError> {
        append_set_cookie(headers, self.clear_cookie_value())
    }

    /// Raw value of this cookie in the request's `Cookie` header(s), if any
    pub fn read_from(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .typed_get::<headers::Cookie>()
            .and_then(|cookies| cookies.get(&self.name).map(str::to_string))
    }
}

fn append_set_cookie(headers: &mut HeaderMap, cookie: String) -> Result<(), CookieError> {
    let value = HeaderValue::from_str(&cookie)
        .map_err(|_| CookieError::Header("Failed to build Set-Cookie header".to_string()))?;
    headers.append(SET_COOKIE, value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::COOKIE;

    fn attributes(domain: Option<&str>, secure: bool) -> CookieAttributes {
        CookieAttributes::new(
            "aars",
            "/",
            domain.map(str::to_string),
            3600,
            secure,
            SameSite::Lax,
        )
        .unwrap()
    }

    #[test]
    fn test_set_cookie_value_includes_all_attributes() {
        let attrs = attributes(Some("example.com"), true);
        let cookie = attrs.set_cookie_value("abc.def");
        assert_eq!(
            cookie,
            "aars=abc.def; SameSite=Lax; HttpOnly; Path=/; Max-Age=3600; Domain=example.com; Secure"
        );
    }

    #[test]
    fn test_secure_is_optional() {
        let attrs = attributes(None, false);
        let cookie = attrs.set_cookie_value("v");
        assert!(!cookie.contains("Secure"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(attrs.http_only());
    }

    #[test]
    fn test_clear_cookie_value_expires_immediately() {
        let attrs = attributes(None, true);
        let cookie = attrs.clear_cookie_value();
        assert!(cookie.starts_with("aars=; "));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("Expires=Thu, 01 Jan 1970 00:00:00 GMT"));
    }

    #[test]
    fn test_strict_same_site() {
        let attrs = CookieAttributes::new("aars", "/", None, 60, true, SameSite::Strict).unwrap();
        assert!(attrs.set_cookie_value("v").contains("SameSite=Strict"));
    }

    #[test]
    fn test_invalid_attributes_are_rejected() {
        assert!(CookieAttributes::new("", "/", None, 60, true, SameSite::Lax).is_err());
        assert!(CookieAttributes::new("a b", "/", None, 60, true, SameSite::Lax).is_err());
        assert!(CookieAttributes::new("aars", "relative", None, 60, true, SameSite::Lax).is_err());
        assert!(
            CookieAttributes::new(
                "aars",
                "/",
                Some("evil.com; Path=/x".to_string()),
                60,
                true,
                SameSite::Lax
            )
            .is_err()
        );
    }

    #[test]
    fn test_control_characters_are_rejected_up_front() {
        // Given a domain and a path carrying control bytes
        let domain = CookieAttributes::new(
            "aars",
            "/",
            Some("example.com\u{7f}".to_string()),
            60,
            true,
            SameSite::Lax,
        );
        let path = CookieAttributes::new("aars", "/a\u{1}b", None, 60, true, SameSite::Lax);

        // Then construction fails instead of every Set-Cookie later on
        assert!(matches!(domain, Err(CookieError::Attribute(_))));
        assert!(matches!(path, Err(CookieError::Attribute(_))));
    }

    #[test]
    fn test_set_cookie_header_appends() {
        let attrs = attributes(None, true);
        let mut headers = HeaderMap::new();
        attrs.set_cookie_header(&mut headers, "one").unwrap();
        attrs.clear_cookie_header(&mut headers).unwrap();
        assert_eq!(headers.get_all(SET_COOKIE).iter().count(), 2);
    }

    #[test]
    fn test_read_from_finds_named_cookie() {
        let attrs = attributes(None, true);
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, "theme=dark; aars=abc.def; other=1".parse().unwrap());
        assert_eq!(attrs.read_from(&headers).as_deref(), Some("abc.def"));
    }

    #[test]
    fn test_read_from_without_cookie() {
        let attrs = attributes(None, true);
        let mut headers = HeaderMap::new();
        assert_eq!(attrs.read_from(&headers), None);

        headers.insert(COOKIE, "theme=dark".parse().unwrap());
        assert_eq!(attrs.read_from(&headers), None);
    }
}
