use std::sync::Arc;

use translite_config::Config;
use translite_translator::Resolver;

pub struct AppState {
    pub config: Config,
    pub resolver: Arc<Resolver>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let resolver = Resolver::from_config(&config)?;

        Ok(Self {
            config,
            resolver: Arc::new(resolver),
        })
    }

    pub fn with_resolver(config: Config, resolver: Resolver) -> Self {
        Self {
            config,
            resolver: Arc::new(resolver),
        }
    }
}
