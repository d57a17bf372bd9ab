//! Authorization retention policy.
//!
//! The policy decides, per (method, pathname), whether the parser keeps the
//! bearer token a client sent. It performs no credential verification; that
//! belongs to the dispatcher. Requests to paths outside the table never carry
//! an authorization value, even when the client sent one.

use crate::parser::Method;

/// How a rule matches a request pathname.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathMatch {
    /// The pathname equals the pattern.
    Exact(&'static str),
    /// The pathname starts with the pattern (the pattern itself included).
    Prefix(&'static str),
}

impl PathMatch {
    fn matches(&self, pathname: &str) -> bool {
        match *self {
            PathMatch::Exact(pattern) => pathname == pattern,
            PathMatch::Prefix(pattern) => pathname.starts_with(pattern),
        }
    }
}

/// A single entry of the policy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub method: Method,
    pub path: PathMatch,
}

impl Rule {
    pub const fn exact(method: Method, path: &'static str) -> Self {
        Self { method, path: PathMatch::Exact(path) }
    }

    pub const fn prefix(method: Method, path: &'static str) -> Self {
        Self { method, path: PathMatch::Prefix(path) }
    }
}

/// Routes of the card game API that expect a bearer token.
pub const CARD_GAME_RULES: &[Rule] = &[
    Rule::exact(Method::GET, "/users"),
    Rule::prefix(Method::GET, "/users/"),
    Rule::exact(Method::GET, "/cards"),
    Rule::exact(Method::GET, "/deck"),
    Rule::exact(Method::GET, "/stats"),
    Rule::exact(Method::GET, "/scoreboard"),
    Rule::exact(Method::GET, "/tradings"),
    Rule::exact(Method::POST, "/users"),
    Rule::exact(Method::POST, "/sessions"),
    Rule::exact(Method::POST, "/logout"),
    Rule::exact(Method::POST, "/packages"),
    Rule::exact(Method::POST, "/transactions/packages"),
    Rule::exact(Method::POST, "/tradings"),
    Rule::exact(Method::POST, "/battles"),
    Rule::prefix(Method::POST, "/tradings/"),
    Rule::prefix(Method::PUT, "/users"),
    Rule::exact(Method::PUT, "/deck"),
    Rule::prefix(Method::DELETE, "/users/"),
    Rule::prefix(Method::DELETE, "/tradings/"),
];

/// Immutable (method, pathname) lookup table.
///
/// The table is `'static` and the policy is `Copy`, so every connection task
/// can hold its own copy without synchronization.
#[derive(Debug, Clone, Copy)]
pub struct AuthorizationPolicy {
    rules: &'static [Rule],
}

impl AuthorizationPolicy {
    /// Create a policy over a custom rule table.
    pub const fn new(rules: &'static [Rule]) -> Self {
        Self { rules }
    }

    /// Whether an Authorization value sent with this request is retained.
    pub fn requires_authorization(&self, method: Method, pathname: &str) -> bool {
        self.rules
            .iter()
            .any(|rule| rule.method == method && rule.path.matches(pathname))
    }

    pub fn rules(&self) -> &'static [Rule] {
        self.rules
    }
}

impl Default for AuthorizationPolicy {
    fn default() -> Self {
        Self::new(CARD_GAME_RULES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requires(method: Method, pathname: &str) -> bool {
        AuthorizationPolicy::default().requires_authorization(method, pathname)
    }

    #[test]
    fn test_get_routes() {
        assert!(requires(Method::GET, "/users"));
        assert!(requires(Method::GET, "/users/kienboec"));
        assert!(requires(Method::GET, "/cards"));
        assert!(requires(Method::GET, "/deck"));
        assert!(requires(Method::GET, "/stats"));
        assert!(requires(Method::GET, "/scoreboard"));
        assert!(requires(Method::GET, "/tradings"));

        assert!(!requires(Method::GET, "/usersX"));
        assert!(!requires(Method::GET, "/deck/plain"));
        assert!(!requires(Method::GET, "/tradings/abc"));
        assert!(!requires(Method::GET, "/health"));
    }

    #[test]
    fn test_post_routes() {
        for path in [
            "/users",
            "/sessions",
            "/logout",
            "/packages",
            "/transactions/packages",
            "/tradings",
            "/battles",
            "/tradings/6cd85277-4590-49d4-b0cf-ba0a921faad0",
        ] {
            assert!(requires(Method::POST, path), "POST {path} should require authorization");
        }

        assert!(!requires(Method::POST, "/users/kienboec"));
        assert!(!requires(Method::POST, "/transactions"));
        assert!(!requires(Method::POST, "/cards"));
    }

    #[test]
    fn test_put_routes() {
        assert!(requires(Method::PUT, "/users"));
        assert!(requires(Method::PUT, "/users/altenhof"));
        // Plain prefix match, no segment boundary
        assert!(requires(Method::PUT, "/usersettings"));
        assert!(requires(Method::PUT, "/deck"));

        assert!(!requires(Method::PUT, "/deck/1"));
        assert!(!requires(Method::PUT, "/tradings"));
    }

    #[test]
    fn test_delete_routes() {
        assert!(requires(Method::DELETE, "/users/kienboec"));
        assert!(requires(Method::DELETE, "/tradings/abc"));

        assert!(!requires(Method::DELETE, "/users"));
        assert!(!requires(Method::DELETE, "/tradings"));
    }

    #[test]
    fn test_unlisted_methods_never_require_authorization() {
        for method in [Method::PATCH, Method::HEAD, Method::OPTIONS] {
            assert!(!requires(method, "/users"));
            assert!(!requires(method, "/users/kienboec"));
            assert!(!requires(method, "/deck"));
        }
    }

    #[test]
    fn test_custom_table() {
        const RULES: &[Rule] = &[Rule::exact(Method::PATCH, "/admin")];
        let policy = AuthorizationPolicy::new(RULES);

        assert!(policy.requires_authorization(Method::PATCH, "/admin"));
        assert!(!policy.requires_authorization(Method::GET, "/users"));
        assert_eq!(policy.rules().len(), 1);
    }
}
