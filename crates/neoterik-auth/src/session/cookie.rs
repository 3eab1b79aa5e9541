//! Session cookie transport.
//!
//! The token travels in a single cookie. These functions take the request's
//! cookie jar and hand back the jar to send with the response; nothing here
//! validates the token.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use neoterik_core::config::Environment;

use crate::jwt::SESSION_TTL_SECONDS;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE_NAME: &str = "auth-session";

/// Binds session tokens to HTTP cookies.
#[derive(Debug, Clone, Copy)]
pub struct SessionCookie {
    /// Whether to set the `Secure` attribute.
    secure: bool,
}

impl SessionCookie {
    /// Creates a transport with an explicit `Secure` flag.
    pub fn new(secure: bool) -> Self {
        Self { secure }
    }

    /// `Secure` cookies in production, plain ones in development.
    pub fn for_environment(environment: Environment) -> Self {
        Self::new(environment == Environment::Production)
    }

    /// Whether cookies are restricted to encrypted transport.
    pub fn is_secure(&self) -> bool {
        self.secure
    }

    /// Stores `token` in the session cookie.
    pub fn attach(&self, jar: CookieJar, token: String) -> CookieJar {
        let mut cookie = self.base(token);
        cookie.set_max_age(time::Duration::seconds(SESSION_TTL_SECONDS));
        jar.add(cookie)
    }

    /// Returns the raw token, if the request carried one.
    pub fn read(&self, jar: &CookieJar) -> Option<String> {
        jar.get(SESSION_COOKIE_NAME)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    }

    /// Tells the client to drop the session cookie immediately.
    ///
    /// Always emits a removal cookie, whether or not the request had one.
    pub fn clear(&self, jar: CookieJar) -> CookieJar {
        let mut cookie = self.base(String::new());
        cookie.make_removal();
        jar.add(cookie)
    }

    fn base(&self, value: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE_NAME, value))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderMap;
    use http::header::COOKIE;

    fn jar_with(cookie_header: &str) -> CookieJar {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, cookie_header.parse().unwrap());
        CookieJar::from_headers(&headers)
    }

    #[test]
    fn test_attach_sets_security_attributes() {
        let jar = SessionCookie::new(false).attach(CookieJar::new(), "token-value".to_string());
        let cookie = jar.get(SESSION_COOKIE_NAME).unwrap();

        assert_eq!(cookie.value(), "token-value");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.secure(), Some(false));
        assert_eq!(
            cookie.max_age(),
            Some(time::Duration::seconds(7 * 24 * 60 * 60))
        );
    }

    #[test]
    fn test_production_cookie_is_secure() {
        let transport = SessionCookie::for_environment(Environment::Production);
        assert!(transport.is_secure());

        let jar = transport.attach(CookieJar::new(), "t".to_string());
        assert_eq!(jar.get(SESSION_COOKIE_NAME).unwrap().secure(), Some(true));

        assert!(!SessionCookie::for_environment(Environment::Development).is_secure());
    }

    #[test]
    fn test_read_extracts_token_from_request() {
        let transport = SessionCookie::new(false);

        let jar = jar_with("theme=dark; auth-session=abc.def.ghi");
        assert_eq!(transport.read(&jar).as_deref(), Some("abc.def.ghi"));

        assert_eq!(transport.read(&jar_with("theme=dark")), None);
        assert_eq!(transport.read(&jar_with("auth-session=")), None);
        assert_eq!(transport.read(&CookieJar::new()), None);
    }

    #[test]
    fn test_clear_emits_removal_cookie() {
        let transport = SessionCookie::new(true);
        let jar = transport.clear(jar_with("auth-session=abc.def.ghi"));

        let removal = jar.get(SESSION_COOKIE_NAME).unwrap();
        assert_eq!(removal.value(), "");
        assert_eq!(removal.max_age(), Some(time::Duration::ZERO));
        assert_eq!(removal.path(), Some("/"));
        assert_eq!(transport.read(&jar), None);
    }

    #[test]
    fn test_clear_is_idempotent_without_cookie() {
        let transport = SessionCookie::new(false);
        let once = transport.clear(CookieJar::new());
        let twice = transport.clear(once);

        let removal = twice.get(SESSION_COOKIE_NAME).unwrap();
        assert_eq!(removal.max_age(), Some(time::Duration::ZERO));
        assert_eq!(twice.iter().count(), 1);
    }
}
