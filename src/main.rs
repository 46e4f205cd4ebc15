use std::sync::Arc;

use mcp_guide_server::catalog;
use mcp_guide_server::config::ServerConfig;
use mcp_guide_server::context::AppContext;
use mcp_guide_server::registry::Registry;
use mcp_guide_server::server::McpServer;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // stdout is the protocol channel; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = match ServerConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("mcp-guide-server: configuration error: {e}");
            std::process::exit(1);
        }
    };

    let store = catalog::guide_store();
    let mut registry = Registry::new();
    if let Err(e) = catalog::register_all(&mut registry, &store) {
        eprintln!("mcp-guide-server: registration error: {e}");
        std::process::exit(1);
    }

    let context = Arc::new(AppContext::new(store));
    let mut server = McpServer::new(config, Arc::new(registry), context);
    if let Err(e) = server.run().await {
        eprintln!("mcp-guide-server: fatal error: {e}");
        std::process::exit(1);
    }
}
