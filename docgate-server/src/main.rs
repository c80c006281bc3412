//! docgate server - generic JSON document collections over HTTP

use server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load()?;

    server::start_server(config).await?;

    Ok(())
}
