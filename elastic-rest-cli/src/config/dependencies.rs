//! Dependency initialization and wiring for the CLI.

use std::env;

use elastic_rest_client::{ClientConfig, ClusterInfo, ElasticRestClient};
use tracing::info;

use crate::cli::ConnectionArgs;
use crate::CliError;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// Client connected to the engine.
    pub client: ElasticRestClient,
    /// Cluster identification returned by the connectivity check.
    pub cluster: ClusterInfo,
}

impl Dependencies {
    /// Build the client from environment variables and flags, then verify
    /// that the engine is reachable.
    ///
    /// # Environment Variables
    ///
    /// - `ELASTIC_URL`: engine URL (default: http://localhost:9200)
    /// - `ELASTIC_USERNAME` / `ELASTIC_PASSWORD`: basic-auth credentials (optional)
    /// - `ELASTIC_TIMEOUT_SECS`: request timeout in seconds (default: 30)
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(CliError)` - If the configuration is invalid or the engine is unreachable
    pub async fn new(args: &ConnectionArgs) -> Result<Self, CliError> {
        let config = client_config(args, |key| env::var(key).ok())?;

        info!(
            url = %config.url,
            authenticated = config.username.is_some(),
            "Initializing dependencies"
        );

        let client = ElasticRestClient::new(&config)
            .map_err(|e| CliError::config(format!("Failed to create client: {}", e)))?;

        Self::connect(client).await
    }

    /// Verify connectivity of an already built client.
    pub async fn connect(client: ElasticRestClient) -> Result<Self, CliError> {
        let cluster = client.ping().await?;

        info!(
            cluster = %cluster.cluster_name,
            version = %cluster.version.number,
            "Engine connection verified"
        );

        Ok(Self { client, cluster })
    }
}

/// Resolve the client configuration: flags first, then the variables seen
/// through `lookup`, then defaults.
pub fn client_config<F>(args: &ConnectionArgs, lookup: F) -> Result<ClientConfig, CliError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = ClientConfig::from_lookup(lookup)?;

    if let Some(url) = &args.url {
        config.url = url.clone();
    }
    match (&args.username, &args.password) {
        (Some(username), Some(password)) => {
            config = config.with_basic_auth(username.clone(), password.clone());
        }
        (None, None) => {}
        _ => {
            return Err(CliError::config(
                "--username and --password must be given together",
            ))
        }
    }

    config.validate()?;
    Ok(config)
}
