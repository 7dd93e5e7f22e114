//! MongoDB connection settings and the client/database pair owned by a facade

use bson::doc;
use collection_facade_common::{FacadeError, Result};
use mongodb::{
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client, Database,
};
use std::time::Duration;
use tracing::info;

/// Default server address used when no URI is configured
pub const DEFAULT_URI: &str = "mongodb://127.0.0.1:27017";

/// Database selected by `connect(None)` unless configured otherwise
pub const DEFAULT_DATABASE: &str = "undefined";

/// Driver pool settings, forwarded as-is to `ClientOptions`
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Minimum number of connections in the pool (driver default when `None`)
    pub min_pool_size: Option<u32>,
    /// Maximum number of connections in the pool (driver default when `None`)
    pub max_pool_size: Option<u32>,
    /// Maximum time a connection can remain idle before being closed
    pub max_idle_time: Option<Duration>,
    /// Connection timeout (default: 10s)
    pub connect_timeout: Option<Duration>,
    /// Server selection timeout (default: 30s)
    pub server_selection_timeout: Option<Duration>,
    /// Application name for server logs
    pub app_name: Option<String>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            min_pool_size: None,
            max_pool_size: None,
            max_idle_time: None,
            connect_timeout: Some(Duration::from_secs(10)),
            server_selection_timeout: Some(Duration::from_secs(30)),
            app_name: Some("collection-facade".to_string()),
        }
    }
}

impl PoolConfig {
    fn apply(self, client_options: &mut ClientOptions) {
        if let Some(min) = self.min_pool_size {
            client_options.min_pool_size = Some(min);
        }
        if let Some(max) = self.max_pool_size {
            client_options.max_pool_size = Some(max);
        }
        if let Some(idle) = self.max_idle_time {
            client_options.max_idle_time = Some(idle);
        }
        if let Some(connect) = self.connect_timeout {
            client_options.connect_timeout = Some(connect);
        }
        if let Some(server_sel) = self.server_selection_timeout {
            client_options.server_selection_timeout = Some(server_sel);
        }
        if let Some(app) = self.app_name {
            client_options.app_name = Some(app);
        }
    }
}

/// Facade configuration: where to connect and which database to pick by default
#[derive(Debug, Clone)]
pub struct FacadeConfig {
    pub uri: String,
    pub default_database: String,
    pub pool: PoolConfig,
}

impl Default for FacadeConfig {
    fn default() -> Self {
        Self {
            uri: DEFAULT_URI.to_string(),
            default_database: DEFAULT_DATABASE.to_string(),
            pool: PoolConfig::default(),
        }
    }
}

impl FacadeConfig {
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = uri.into();
        self
    }

    pub fn with_default_database(mut self, name: impl Into<String>) -> Self {
        self.default_database = name.into();
        self
    }

    pub fn with_pool(mut self, pool: PoolConfig) -> Self {
        self.pool = pool;
        self
    }
}

/// The selected database; its handle keeps the client alive.
///
/// The driver connects lazily, so an unreachable server shows up on the first
/// operation (or on [`Connection::ping`]), not here.
pub struct Connection {
    database: Database,
}

impl Connection {
    /// Build a client from `config` and select `db_name`, falling back to the
    /// configured default database.
    pub async fn open(config: &FacadeConfig, db_name: Option<&str>) -> Result<Self> {
        let mut client_options = ClientOptions::parse(config.uri.as_str())
            .await
            .map_err(|e| FacadeError::Connection(e.to_string()))?;

        config.pool.clone().apply(&mut client_options);

        // Set stable API version for compatibility
        let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
        client_options.server_api = Some(server_api);

        let client =
            Client::with_options(client_options).map_err(|e| FacadeError::Connection(e.to_string()))?;

        let name = db_name.unwrap_or(config.default_database.as_str());
        let database = client.database(name);
        info!(database = name, "MongoDB client created");

        Ok(Self { database })
    }

    /// Get a reference to the database
    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Get the database name
    pub fn database_name(&self) -> &str {
        self.database.name()
    }

    /// Check if the connection is healthy by pinging the server
    pub async fn ping(&self) -> Result<bool> {
        match self.database.run_command(doc! { "ping": 1 }).await {
            Ok(_) => Ok(true),
            Err(e) => Err(FacadeError::Connection(format!("Ping failed: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pool_config() {
        let config = PoolConfig::default();
        assert_eq!(config.min_pool_size, None);
        assert_eq!(config.connect_timeout, Some(Duration::from_secs(10)));
        assert_eq!(config.app_name, Some("collection-facade".to_string()));
    }

    #[test]
    fn test_default_facade_config() {
        let config = FacadeConfig::default();
        assert_eq!(config.uri, "mongodb://127.0.0.1:27017");
        assert_eq!(config.default_database, "undefined");
    }

    #[tokio::test]
    async fn test_pool_config_applies_to_client_options() {
        let mut options = ClientOptions::parse(DEFAULT_URI).await.unwrap();
        PoolConfig {
            min_pool_size: Some(2),
            max_pool_size: Some(8),
            max_idle_time: Some(Duration::from_secs(60)),
            connect_timeout: None,
            server_selection_timeout: Some(Duration::from_secs(1)),
            app_name: Some("reports".to_string()),
        }
        .apply(&mut options);

        assert_eq!(options.min_pool_size, Some(2));
        assert_eq!(options.max_pool_size, Some(8));
        assert_eq!(options.max_idle_time, Some(Duration::from_secs(60)));
        assert_eq!(options.connect_timeout, None);
        assert_eq!(options.server_selection_timeout, Some(Duration::from_secs(1)));
        assert_eq!(options.app_name.as_deref(), Some("reports"));
    }

    #[tokio::test]
    async fn test_open_selects_default_database() {
        let config = FacadeConfig::default().with_default_database("inventory");
        let conn = Connection::open(&config, None).await.unwrap();
        assert_eq!(conn.database_name(), "inventory");
    }

    #[tokio::test]
    async fn test_open_selects_named_database() {
        let conn = Connection::open(&FacadeConfig::default(), Some("orders"))
            .await
            .unwrap();
        assert_eq!(conn.database_name(), "orders");
    }

    #[tokio::test]
    async fn test_open_rejects_malformed_uri() {
        let config = FacadeConfig::default().with_uri("not-a-uri");
        let err = Connection::open(&config, None).await.err().unwrap();
        assert!(matches!(err, FacadeError::Connection(_)));
    }
}
