use std::sync::Arc;

use miru_config::Config;
use tokio::sync::RwLock;

use crate::status::MonitorStatus;

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    pub status: Arc<MonitorStatus>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            status: Arc::new(MonitorStatus::default()),
        }
    }
}
