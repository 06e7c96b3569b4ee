//! Cache key builders.

/// Key under which the session for `token` is stored.
///
/// External services read these keys directly, so the layout is fixed:
/// the prefix immediately followed by the raw token.
pub fn session(prefix: &str, token: &str) -> String {
    format!("{prefix}{token}")
}
