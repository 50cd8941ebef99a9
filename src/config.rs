use clap::Parser;
use std::{net::SocketAddr, path::PathBuf, time::Duration};

#[derive(Parser, Debug, Clone)]
#[command(name = "delivery_time_service", about = "Delivery analytics dashboard and delivery-time prediction API")]
pub struct ServerConfig {
    /// Historical delivery records (comma-separated, Latin-1)
    #[arg(long = "dataset", env = "DATASET_PATH", default_value = "dataset/processed_data.csv")]
    pub dataset_path: PathBuf,

    /// Model bundle: estimator plus its ordered feature names
    #[arg(long = "model", env = "MODEL_PATH", default_value = "model/lgbm_best.json")]
    pub model_path: PathBuf,

    #[arg(long = "bind", env = "BIND_ADDR", default_value = "0.0.0.0")]
    pub bind_addr: std::net::IpAddr,

    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Idle seconds before a session is dropped; 0 keeps sessions until deleted
    #[arg(long, env = "SESSION_TTL_SECS", default_value_t = 3600)]
    pub session_ttl_secs: u64,

    /// Load dataset and model on first request instead of at startup
    #[arg(long)]
    pub no_warmup: bool,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    pub fn session_ttl(&self) -> Option<Duration> {
        (self.session_ttl_secs > 0).then(|| Duration::from_secs(self.session_ttl_secs))
    }

    pub fn new(dataset_path: impl Into<PathBuf>, model_path: impl Into<PathBuf>) -> Self {
        Self {
            dataset_path: dataset_path.into(),
            model_path: model_path.into(),
            bind_addr: std::net::IpAddr::from([0, 0, 0, 0]),
            port: 8080,
            session_ttl_secs: 3600,
            no_warmup: false,
        }
    }
}
