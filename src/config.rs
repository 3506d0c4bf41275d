//! Runtime settings read from the environment
//!
//! Commit identity is not part of this struct: it follows git's own
//! `GIT_AUTHOR_*`/`GIT_COMMITTER_*` convention and is loaded by
//! [`Author::load_from_env`](crate::artifacts::objects::commit::Author::load_from_env)
//! only by the commands that create commits.

use std::time::Duration;

pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_MAX_TREE_DEPTH: usize = 256;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Branch HEAD points at after `init`, and the fallback branch for `clone`
    pub default_branch: String,
    /// User agent sent by the HTTP transport
    pub user_agent: String,
    /// Timeout applied to every HTTP request
    pub http_timeout: Duration,
    /// Deepest directory nesting the tree serializer accepts
    pub max_tree_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_branch: DEFAULT_BRANCH.to_string(),
            user_agent: format!("bit/{}", env!("CARGO_PKG_VERSION")),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            max_tree_depth: DEFAULT_MAX_TREE_DEPTH,
        }
    }
}

impl Config {
    pub fn load_from_env() -> Self {
        Self::load_from(|key| std::env::var(key).ok())
    }

    fn load_from(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Config::default();

        let default_branch = lookup("BIT_DEFAULT_BRANCH")
            .map(|branch| branch.trim().to_string())
            .filter(|branch| !branch.is_empty())
            .unwrap_or(defaults.default_branch);
        let user_agent = lookup("BIT_USER_AGENT")
            .filter(|agent| !agent.is_empty())
            .unwrap_or(defaults.user_agent);
        let http_timeout = lookup("BIT_HTTP_TIMEOUT_SECS")
            .and_then(|secs| secs.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.http_timeout);
        let max_tree_depth = lookup("BIT_MAX_TREE_DEPTH")
            .and_then(|depth| depth.trim().parse::<usize>().ok())
            .filter(|depth| *depth > 0)
            .unwrap_or(defaults.max_tree_depth);

        Config {
            default_branch,
            user_agent,
            http_timeout,
            max_tree_depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn falls_back_to_defaults_when_unset() {
        let config = Config::load_from(lookup_in(&[]));
        pretty_assertions::assert_eq!(config, Config::default());
    }

    #[test]
    fn reads_overrides_and_ignores_garbage() {
        let config = Config::load_from(lookup_in(&[
            ("BIT_DEFAULT_BRANCH", "trunk"),
            ("BIT_HTTP_TIMEOUT_SECS", "5"),
            ("BIT_MAX_TREE_DEPTH", "not-a-number"),
        ]));

        assert_eq!(config.default_branch, "trunk");
        assert_eq!(config.http_timeout, Duration::from_secs(5));
        assert_eq!(config.max_tree_depth, DEFAULT_MAX_TREE_DEPTH);
    }
}
