//! Run the relay server on 127.0.0.1:3000.

use proxy_config_board::{server, RelayServerConfig};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = RelayServerConfig::default();
    let listener = TcpListener::bind(config.listen).await?;
    server::serve(listener, &config).await
}
