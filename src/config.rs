use crate::cascade::PostCascadeScope;
use anyhow::Context;
use serde::Deserialize;

/// Config, read from the TOML file named on the command line.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// <address>:<port> to serve userfacing endpoints
    pub userfacing_listen_address: String,

    /// <address>:<port> to serve metrics on
    pub metrics_address: String,

    /// By default, output JSON logs. Only if this flag is set to true, output colourful human-friendly logs
    pub human_logs: bool,

    /// Max HTTP body size the API accepts
    #[serde(default = "max_body_size")]
    pub max_body_size: usize,

    /// DSN (including password) to connect to database.
    pub db_dsn: String,

    /// maximum number of connections maintained by PostgresStore
    pub db_pool_size: u32,

    /// maximum seconds waiting for a database connection
    pub db_connection_timeout: u64,

    /// HMAC secret that bearer tokens are signed with.
    pub jwt_secret: String,

    /// What deleting a single tuit takes down with it.
    #[serde(default)]
    pub post_cascade_scope: PostCascadeScope,
}

impl Config {
    pub fn from_file(filepath: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(filepath)
            .with_context(|| format!("couldn't read config file {}", filepath))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        toml::from_str(contents).context("couldn't parse config file")
    }
}

fn max_body_size() -> usize {
    65536
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        userfacing_listen_address = "127.0.0.1:4000"
        metrics_address = "127.0.0.1:9090"
        human_logs = true
        db_dsn = "postgres://tuiter@localhost/tuiter"
        db_pool_size = 4
        db_connection_timeout = 5
        jwt_secret = "dev-only"
    "#;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml(MINIMAL).unwrap();
        assert_eq!(config.max_body_size, 65536);
        assert_eq!(config.post_cascade_scope, PostCascadeScope::SinglePost);
    }

    #[test]
    fn test_author_wide_scope() {
        let contents = format!("{}\npost_cascade_scope = \"author_wide\"", MINIMAL);
        let config = Config::from_toml(&contents).unwrap();
        assert_eq!(config.post_cascade_scope, PostCascadeScope::AuthorWide);
    }

    #[test]
    fn test_missing_secret_is_rejected() {
        let contents = MINIMAL.replace("jwt_secret = \"dev-only\"", "");
        assert!(Config::from_toml(&contents).is_err());
    }
}
