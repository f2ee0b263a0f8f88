//! `kiln serve`.

use std::sync::Arc;

use kiln_config::Config;

use crate::error::Result;
use crate::server::DevServer;

pub async fn execute(config: Arc<Config>) -> Result<()> {
    DevServer::bind(&config).await?.serve().await
}
