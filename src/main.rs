//! pantry-proxy: HTTP proxy for the Pantry Pal assistant
//!
//! A Rust proxy that sits between chat clients and the Gemini
//! generateContent API and provides:
//! - Fixed persona prefix injection ahead of every conversation
//! - API-key or service-account credential handling
//! - Verbatim relay of upstream responses and errors

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

use pantry_proxy::{
    auth::{provider_from_config, CredentialProvider},
    config::{AppConfig, AuthMode},
    persona::PersonaProfile,
    run_server,
};

#[derive(Parser)]
#[command(name = "pantry-proxy")]
#[command(version = "0.1.0")]
#[command(about = "HTTP proxy for the Pantry Pal assistant")]
#[command(long_about = "
pantry-proxy fronts the Gemini generateContent API for the Pantry Pal
assistant:
  - Injects the fixed persona prefix ahead of every conversation
  - Handles API-key or service-account credentials
  - Relays upstream responses and errors verbatim

Example usage:
  pantry-proxy run --config config.yaml
  pantry-proxy show-persona
")]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, default_value = "config.yaml")]
    config: PathBuf,

    /// Set logging level (trace, debug, info, warn, error)
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the proxy server
    Run {
        /// Override listen port
        #[arg(short, long)]
        port: Option<u16>,
        /// Override upstream model identifier
        #[arg(long)]
        model: Option<String>,
    },

    /// Validate configuration file
    CheckConfig,

    /// Test credentials and connectivity against the upstream API
    TestUpstream,

    /// Print the active persona profile
    ShowPersona,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level_filter = if let Some(level) = cli.log_level {
        level.to_string()
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
            .to_string()
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&level_filter))
        .init();

    match cli.command {
        Commands::Run { port, model } => {
            run_proxy(cli.config, port, model).await?;
        }
        Commands::CheckConfig => {
            check_config(cli.config)?;
        }
        Commands::TestUpstream => {
            test_upstream(cli.config).await?;
        }
        Commands::ShowPersona => {
            show_persona(cli.config)?;
        }
    }

    Ok(())
}

/// Run the proxy server
async fn run_proxy(
    config_path: PathBuf,
    port_override: Option<u16>,
    model_override: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config_or_exit(&config_path);

    // Apply CLI overrides
    if let Some(port) = port_override {
        config.server.port = port;
    }
    if let Some(model) = model_override {
        config.upstream.model = model;
    }

    tracing::info!("Loading configuration from {:?}", config_path);

    let persona = match PersonaProfile::from_config(&config.persona) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Persona configuration error: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!(
        persona = %persona.name,
        version = %persona.version,
        "Persona profile loaded"
    );

    let credentials = provider_from_config(&config.auth);
    tracing::info!(strategy = credentials.strategy(), "Credential strategy configured");

    run_server(config, persona, credentials).await?;

    Ok(())
}

/// Validate configuration file
fn check_config(config_path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    match AppConfig::from_file(&config_path) {
        Ok(config) => {
            println!("✓ Configuration file is valid\n");
            println!("Server:");
            println!("  Listen: {}:{}", config.server.host, config.server.port);
            println!("\nUpstream:");
            println!("  Base URL: {}", config.upstream.base_url());
            println!("  Model: {}", config.upstream.model);
            println!("  Timeout: {}s", config.upstream.timeout_seconds);
            println!("\nAuth:");
            match config.auth.mode {
                AuthMode::ApiKey => {
                    println!("  Strategy: api_key");
                    if config.auth.api_key.is_some() {
                        println!("  Key: <inline, redacted>");
                    } else {
                        println!("  Key env: {}", config.auth.api_key_env);
                    }
                }
                AuthMode::ServiceAccount => {
                    println!("  Strategy: service_account");
                    match &config.auth.credentials_path {
                        Some(path) => println!("  Credentials file: {}", path),
                        None => println!("  Credentials env: {}", config.auth.credentials_env),
                    }
                }
            }
            println!("\nPersona:");
            println!("  Profile: {}", config.persona.profile);
            if let Some(ref file) = config.persona.file {
                println!("  File override: {}", file);
            }
            println!("\nStats:");
            println!("  Enabled: {}", config.stats.enabled);
            println!("  Format: {:?}", config.stats.format);
            Ok(())
        }
        Err(e) => {
            eprintln!("✗ Configuration error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Resolve credentials and probe the upstream model endpoint
async fn test_upstream(config_path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config_or_exit(&config_path);
    let credentials = provider_from_config(&config.auth);

    println!("Resolving credentials ({})...", credentials.strategy());
    let creds = match credentials.resolve().await {
        Ok(c) => {
            println!("✓ Credentials resolved");
            c
        }
        Err(e) => {
            eprintln!("✗ Credential resolution failed: {}", e);
            std::process::exit(1);
        }
    };

    let model_url = config.upstream.model_url();
    println!("Testing upstream model endpoint: {}", model_url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()?;

    match creds.apply(client.get(&model_url)).send().await {
        Ok(resp) => {
            if resp.status().is_success() {
                println!("✓ Upstream is reachable");
                println!("  Status: {}", resp.status());
                if let Ok(body) = resp.text().await {
                    if let Ok(json) = serde_json::from_str::<serde_json::Value>(&body) {
                        if let Some(name) = json.get("displayName").and_then(|n| n.as_str()) {
                            println!("  Model: {}", name);
                        }
                    }
                }
            } else {
                println!("✗ Upstream returned error status: {}", resp.status());
                if let Ok(body) = resp.text().await {
                    println!("  Response: {}", body.trim());
                }
            }
        }
        Err(e) => {
            println!("✗ Failed to connect to upstream: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Print the active persona profile
fn show_persona(config_path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config_or_exit(&config_path);

    match PersonaProfile::from_config(&config.persona) {
        Ok(persona) => {
            println!("Persona: {} (version {})\n", persona.name, persona.version);
            println!("── System prompt ──────────────────────────────────");
            println!("{}\n", persona.system_prompt);
            println!("── Acknowledgment turn ────────────────────────────");
            println!("{}", persona.acknowledgment);
            Ok(())
        }
        Err(e) => {
            eprintln!("✗ Persona configuration error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Load configuration or exit with error
fn load_config_or_exit(config_path: &PathBuf) -> AppConfig {
    match AppConfig::from_file(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            eprintln!("\nMake sure you have a config.yaml file.");
            eprintln!("You can copy config.yaml.default and modify it:");
            eprintln!("  cp config.yaml.default config.yaml");
            std::process::exit(1);
        }
    }
}
