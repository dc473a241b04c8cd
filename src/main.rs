use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use wwjd::{config::ProviderConfig, constants, guidance, web_server, AnthropicClient};

// Define the command-line interface structure using clap
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

// Define the available subcommands
#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Start the guidance and prayer wall web server.
    Serve {
        #[arg(long, env = "WWJD_HOST", default_value = constants::DEFAULT_HOST, help = "Address to listen on.")]
        host: String,
        #[arg(long, env = "PORT", default_value_t = constants::DEFAULT_PORT, help = "Port for the web server.")]
        port: u16,
        #[command(flatten)]
        provider: ProviderConfig,
    },
    /// Ask a single question and print the scripture-based answer as JSON.
    Ask {
        #[arg(help = "The question or situation to seek guidance on.")]
        question: String,
        #[command(flatten)]
        provider: ProviderConfig,
    },
}

// The main entry point of the application, using tokio's async runtime
#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (for ANTHROPIC_API_KEY and friends)
    dotenvy::dotenv().ok();

    // Reads log level from RUST_LOG environment variable (e.g., RUST_LOG=info,wwjd=debug)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port, provider } => {
            info!("Starting WWJD on {}:{}...", host, port);
            web_server::start_web_server(&host, port, provider).await?;
            info!("Shutdown complete.");
        }
        Commands::Ask { question, provider } => {
            provider.validate().context("Invalid provider configuration")?;
            let client = AnthropicClient::new(provider).context("Failed to build Anthropic client")?;
            let scripture = guidance::ask_guidance(&client, Some(&question))
                .await
                .context("Failed to get guidance")?;
            println!("{}", serde_json::to_string_pretty(&scripture)?);
        }
    }

    Ok(())
}
