//! Cookie file loading. Accepts the JSON array produced by puppeteer's
//! `page.cookies()` or a raw CDP `Network.getCookies` dump.

use crate::domain::DomainError;
use chromiumoxide::cdp::browser_protocol::network::{CookieParam, TimeSinceEpoch};
use serde::Deserialize;
use std::path::Path;

/// One exported cookie. Unknown fields (size, session, priority...) are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub http_only: bool,
    /// Seconds since epoch; -1 (or absent) for session cookies.
    #[serde(default)]
    pub expires: Option<f64>,
}

impl SessionCookie {
    /// Convert to the CDP parameter. Cookies without a domain are bound to `fallback_url`.
    pub fn to_param(&self, fallback_url: &str) -> Result<CookieParam, DomainError> {
        let mut b = CookieParam::builder()
            .name(self.name.clone())
            .value(self.value.clone())
            .secure(self.secure)
            .http_only(self.http_only);
        match (&self.domain, &self.url) {
            (Some(domain), _) => b = b.domain(domain.clone()),
            (None, Some(url)) => b = b.url(url.clone()),
            (None, None) => b = b.url(fallback_url.to_string()),
        }
        if let Some(path) = &self.path {
            b = b.path(path.clone());
        }
        if let Some(exp) = self.expires.filter(|e| *e > 0.0) {
            b = b.expires(TimeSinceEpoch::new(exp));
        }
        b.build()
            .map_err(|e| DomainError::Browser(format!("invalid cookie '{}': {}", self.name, e)))
    }
}

pub fn parse_cookies(raw: &str) -> Result<Vec<SessionCookie>, DomainError> {
    serde_json::from_str(raw)
        .map_err(|e| DomainError::Browser(format!("cookie file is not a JSON cookie array: {}", e)))
}

/// Read and parse the cookie file. Missing file is an error with a hint.
pub async fn load_cookie_file(path: &Path) -> Result<Vec<SessionCookie>, DomainError> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        DomainError::Browser(format!(
            "{} not found or unreadable ({}). Log in once on a local machine, export the cookies, and copy the file to the server",
            path.display(),
            e
        ))
    })?;
    parse_cookies(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUPPETEER_EXPORT: &str = r#"[
      {"name":"c_user","value":"100","domain":".facebook.com","path":"/","expires":1790000000.5,
       "size":10,"httpOnly":false,"secure":true,"session":false,"sameSite":"None","priority":"Medium"},
      {"name":"presence","value":"x","domain":".facebook.com","path":"/","expires":-1,
       "httpOnly":true,"secure":true,"session":true}
    ]"#;

    #[test]
    fn test_parse_puppeteer_export() {
        let cookies = parse_cookies(PUPPETEER_EXPORT).unwrap();
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies[0].name, "c_user");
        assert_eq!(cookies[0].domain.as_deref(), Some(".facebook.com"));
        assert!(cookies[0].secure);
        assert!(!cookies[0].http_only);
        assert!(cookies[1].http_only);
        assert_eq!(cookies[1].expires, Some(-1.0));
    }

    #[test]
    fn test_to_param_session_cookie_has_no_expiry() {
        let cookies = parse_cookies(PUPPETEER_EXPORT).unwrap();
        let param = cookies[1].to_param("https://www.facebook.com").unwrap();
        assert_eq!(param.name, "presence");
        assert!(param.expires.is_none());
        assert_eq!(param.domain.as_deref(), Some(".facebook.com"));
    }

    #[test]
    fn test_to_param_without_domain_uses_fallback_url() {
        let cookies = parse_cookies(r#"[{"name":"a","value":"b"}]"#).unwrap();
        let param = cookies[0].to_param("https://www.facebook.com").unwrap();
        assert_eq!(param.url.as_deref(), Some("https://www.facebook.com"));
    }

    #[test]
    fn test_parse_rejects_non_array() {
        assert!(parse_cookies(r#"{"name":"a"}"#).is_err());
    }

    #[tokio::test]
    async fn test_missing_file_mentions_path() {
        let err = load_cookie_file(Path::new("/nonexistent/fb-cookies.json"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("fb-cookies.json"));
    }
}
