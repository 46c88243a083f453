use axum::http::{header, HeaderMap, HeaderValue};

/// Cookie carrying the session token. The name is part of the client
/// contract and the only transport the middleware accepts.
pub const AUTH_COOKIE: &str = "w_auth";

/// Pull the session token out of the request's Cookie header.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|part| {
        let (name, value) = part.trim().split_once('=')?;
        if name == AUTH_COOKIE {
            Some(value.to_string())
        } else {
            None
        }
    })
}

/// Build the Set-Cookie value for a freshly issued token.
pub fn session_cookie(token: &str, secure: bool) -> HeaderValue {
    let mut cookie = format!("{}={}; HttpOnly; SameSite=Strict; Path=/", AUTH_COOKIE, token);
    if secure {
        cookie.push_str("; Secure");
    }
    // Token alphabet is base64url, always a valid header value.
    HeaderValue::from_str(&cookie).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn finds_the_token_among_other_cookies() {
        let headers = headers_with_cookie("theme=dark; w_auth=tok-123; _ga=GA1.1");
        assert_eq!(token_from_headers(&headers).as_deref(), Some("tok-123"));
    }

    #[test]
    fn missing_cookie_header_yields_none() {
        assert!(token_from_headers(&HeaderMap::new()).is_none());
    }

    #[test]
    fn similarly_named_cookies_do_not_match() {
        let headers = headers_with_cookie("w_authx=nope; auth=nope");
        assert!(token_from_headers(&headers).is_none());
    }

    #[test]
    fn session_cookie_sets_scope_attributes() {
        let plain = session_cookie("tok-123", false);
        let value = plain.to_str().unwrap();
        assert!(value.starts_with("w_auth=tok-123"));
        assert!(value.contains("HttpOnly"));
        assert!(value.contains("Path=/"));
        assert!(!value.contains("Secure"));

        let secure = session_cookie("tok-123", true);
        assert!(secure.to_str().unwrap().contains("Secure"));
    }
}
