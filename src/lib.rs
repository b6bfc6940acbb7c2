pub mod agent;
pub mod cli;
pub mod history;
pub mod languages;
pub mod llm;
pub mod models;
pub mod prompt;
pub mod server;
pub mod translate;

use agent::ChatAgent;
use cli::Args;
use log::info;
use server::Server;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Chat Model: {}", args.chat_model.as_deref().unwrap_or("default"));
    info!("Generation Credential Configured: {}", !args.chat_api_key.trim().is_empty());
    info!("History Store Type: {}", args.history_type);
    if args.history_type.eq_ignore_ascii_case("redis") {
        info!("History Store Host: {}", args.history_host);
    }
    info!("History Window: {}", args.history_window);
    info!("Request Timeout: {}s", args.request_timeout_secs);
    info!("TLS Enabled: {}", args.enable_tls);
    info!("-------------------------");

    let agent = Arc::new(ChatAgent::new(&args)?);
    let addr = args.server_addr.clone();
    info!("Starting server on: {}", addr);
    let server = Server::new(addr, agent, args);
    server.run().await?;

    Ok(())
}
