use clap::Parser;

#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "model-library",
    about = "Serves a searchable, comparable catalog of AI models with their pricing and limits",
    version
)]
pub struct Cli {
    /// Host address to bind to (overrides the config file)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides the config file)
    #[arg(long)]
    pub port: Option<u16>,

    /// URL of the upstream model feed
    #[arg(long, env = "MODEL_LIBRARY_UPSTREAM_URL")]
    pub upstream_url: Option<String>,

    /// Public origin used in the sitemap
    #[arg(long, env = "MODEL_LIBRARY_BASE_URL")]
    pub base_url: Option<String>,

    /// Path to the configuration file (TOML, or JSON with a .json extension)
    #[arg(long, default_value = "model-library.toml")]
    pub config: String,

    /// Write a default configuration file to --config and exit
    #[arg(long)]
    pub create_config: bool,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Write logs to a file instead of stderr
    #[arg(long)]
    pub log_to_file: bool,

    /// Show every provider instead of the whitelisted ones
    #[arg(long)]
    pub no_whitelist: bool,

    /// Log every incoming request
    #[arg(long)]
    pub debug: bool,
}
