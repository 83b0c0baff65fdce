use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sahpaathi_core::{DEFAULT_INSTRUCTION, env_string_with_default};
use sahpaathi_http::{AppState, create_router};
use sahpaathi_llm::LlmClient;
use sahpaathi_store::ChatStore;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sahpaathi")]
#[command(about = "Backend for the SAHPAATHI tutoring assistant", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        #[arg(short, long, default_value = "5001")]
        port: u16,
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,
    },
    /// List stored sessions, most recently active first
    Sessions,
    /// Print stored history, optionally for one session
    History {
        session_id: Option<String>,
    },
    /// List teacher personas
    Teachers,
}

fn get_database_url() -> Option<String> {
    std::env::var("SAHPAATHI_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")).ok()
}

fn get_api_key() -> Option<String> {
    std::env::var("SAHPAATHI_API_KEY").or_else(|_| std::env::var("GOOGLE_API_KEY")).ok()
}

fn get_base_url() -> String {
    env_string_with_default(
        "SAHPAATHI_API_URL",
        "https://generativelanguage.googleapis.com/v1beta/openai",
    )
}

async fn build_store() -> ChatStore {
    match get_database_url() {
        Some(url) => ChatStore::connect(&url).await,
        None => {
            tracing::warn!(
                "SAHPAATHI_DATABASE_URL not set, chat history will not survive restarts"
            );
            ChatStore::degraded()
        },
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();
    let store = build_store().await;

    match cli.command {
        Commands::Serve { port, host } => {
            let llm = match get_api_key() {
                Some(key) => Some(Arc::new(LlmClient::new(key, get_base_url())?)),
                None => {
                    tracing::warn!("no LLM API key configured, chat endpoints will report 503");
                    None
                },
            };
            let instruction =
                env_string_with_default("SAHPAATHI_INSTRUCTION", DEFAULT_INSTRUCTION);
            let state = Arc::new(AppState { store: Arc::new(store), llm, instruction });
            let router = create_router(state);
            let addr = format!("{host}:{port}");
            tracing::info!("Starting HTTP server on {addr}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            axum::serve(listener, router).await?;
        },
        Commands::Sessions => {
            println!("{}", serde_json::to_string_pretty(&store.list_sessions().await)?);
        },
        Commands::History { session_id } => {
            let history = store.get_history(session_id.as_deref()).await;
            println!("{}", serde_json::to_string_pretty(&history)?);
        },
        Commands::Teachers => {
            println!("{}", serde_json::to_string_pretty(&store.list_teachers().await)?);
        },
    }

    Ok(())
}
