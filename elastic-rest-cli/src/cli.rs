//! Command-line arguments.

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Default page size of the `scroll` command.
pub const DEFAULT_SCROLL_PAGE_SIZE: usize = 500;

#[derive(Debug, Parser)]
#[command(name = "elastic-rest")]
#[command(about = "Query and administer an Elasticsearch-compatible engine", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,
}

/// Connection flags. Unset flags fall back to the environment.
#[derive(Debug, Clone, Default, Args)]
pub struct ConnectionArgs {
    /// Engine URL (overrides ELASTIC_URL)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Basic-auth user name (overrides ELASTIC_USERNAME)
    #[arg(long, global = true)]
    pub username: Option<String>,

    /// Basic-auth password (overrides ELASTIC_PASSWORD)
    #[arg(long, global = true)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Check connectivity and print cluster information
    Ping,
    /// Fetch a document by id
    Get {
        index: String,
        id: String,
    },
    /// Run a query-string search
    Search {
        index: String,
        query: String,
        /// Maximum number of documents returned
        #[arg(long, default_value_t = elastic_rest_client::DEFAULT_SEARCH_SIZE)]
        size: usize,
    },
    /// Count documents matching a query
    Count {
        index: String,
        query: String,
    },
    /// Stream every document matching a query, one JSON object per line
    Scroll {
        index: String,
        query: String,
        /// Documents fetched per request
        #[arg(long, default_value_t = DEFAULT_SCROLL_PAGE_SIZE)]
        page_size: usize,
    },
    /// Create an index
    CreateIndex {
        index: String,
        /// Number of primary shards
        #[arg(long)]
        shards: Option<u32>,
        /// Number of replicas
        #[arg(long)]
        replicas: Option<u32>,
    },
    /// Delete an index
    DeleteIndex {
        index: String,
    },
    /// Index a JSON document
    Index {
        index: String,
        /// Document JSON, e.g. '{"string": "value"}'
        document: String,
        /// Document id; generated by the engine when omitted
        #[arg(long)]
        id: Option<String>,
    },
}
