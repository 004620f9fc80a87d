/// Validates a `returnTo` path before it is echoed into a login redirect.
///
/// Returns `Some(url)` if the URL is a valid relative path, `None` otherwise.
///
/// # Security
///
/// Accepted URLs:
/// - Start with a single `/` (relative path)
/// - Do not start with `//` (protocol-relative URLs like `//evil.com`)
/// - Do not contain control characters
/// - Do not contain `://`
///
/// # Examples
///
/// ```
/// use storecredit_core::auth::validate_return_to;
///
/// assert_eq!(validate_return_to("/account/store-credit"), Some("/account/store-credit"));
/// assert_eq!(validate_return_to("//evil.com"), None);
/// assert_eq!(validate_return_to("https://evil.com"), None);
/// ```
pub fn validate_return_to(url: &str) -> Option<&str> {
    if !url.starts_with('/') {
        return None;
    }

    if url.starts_with("//") {
        return None;
    }

    if url.chars().any(|c| c.is_control()) {
        return None;
    }

    if url.contains("://") {
        return None;
    }

    Some(url)
}

/// Builds the login redirect target, carrying the page to come back to.
///
/// An invalid `return_to` is dropped rather than forwarded.
pub fn login_redirect_target(login_path: &str, return_to: &str) -> String {
    match validate_return_to(return_to) {
        Some(path) => format!("{login_path}?redirectTo={}", urlencoding::encode(path)),
        None => login_path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_simple_relative_path() {
        assert_eq!(
            validate_return_to("/account/store-credit"),
            Some("/account/store-credit")
        );
    }

    #[test]
    fn accepts_path_with_query_string() {
        assert_eq!(validate_return_to("/search?q=test"), Some("/search?q=test"));
    }

    #[test]
    fn rejects_absolute_urls() {
        assert_eq!(validate_return_to("https://evil.com"), None);
        assert_eq!(validate_return_to("http://evil.com/path"), None);
    }

    #[test]
    fn rejects_url_without_leading_slash() {
        assert_eq!(validate_return_to("account"), None);
        assert_eq!(validate_return_to(""), None);
    }

    #[test]
    fn rejects_protocol_relative_url() {
        assert_eq!(validate_return_to("//evil.com/path"), None);
    }

    #[test]
    fn rejects_javascript_url() {
        assert_eq!(validate_return_to("javascript:alert(1)"), None);
    }

    #[test]
    fn rejects_control_characters() {
        assert_eq!(validate_return_to("/path\n/evil"), None);
        assert_eq!(validate_return_to("/path\0/evil"), None);
    }

    #[test]
    fn rejects_scheme_embedded_in_path() {
        assert_eq!(validate_return_to("/redirect?url=https://evil.com"), None);
    }

    #[test]
    fn login_redirect_target_encodes_return_path() {
        assert_eq!(
            login_redirect_target("/account/login", "/account/store-credit"),
            "/account/login?redirectTo=%2Faccount%2Fstore-credit"
        );
        assert_eq!(
            login_redirect_target("/account/login", "/a?b=c"),
            "/account/login?redirectTo=%2Fa%3Fb%3Dc"
        );
    }

    #[test]
    fn login_redirect_target_drops_invalid_return_path() {
        assert_eq!(
            login_redirect_target("/account/login", "//evil.com"),
            "/account/login"
        );
    }
}
