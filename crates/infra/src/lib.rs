mod config;
mod gateway;
mod repos;
mod system;

pub use config::Config;
pub use gateway::{HttpPushGateway, IPushGateway, PushMessage, RecordingPushGateway};
pub use repos::Repos;
pub use repos::{IApprovalRepo, IAttendanceRepo, IReviewCycleRepo, IReviewRepo, IStaffRepo};
use std::sync::Arc;
pub use system::ISys;
use system::RealSys;

#[derive(Clone)]
pub struct StaffpilotContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub gateway: Arc<dyn IPushGateway>,
}

struct ContextParams {
    pub mongodb_connection_string: String,
    pub mongodb_db_name: String,
}

impl StaffpilotContext {
    async fn create(params: ContextParams) -> Self {
        let repos = Repos::create_mongodb(
            &params.mongodb_connection_string,
            &params.mongodb_db_name,
        )
        .await
        .expect("Mongodb credentials must be set and valid");
        let config = Config::new();
        let gateway_url = config
            .push_gateway_url
            .clone()
            .unwrap_or_else(|| panic!("{} env var to be present.", "PUSH_GATEWAY_URL"));
        let gateway = HttpPushGateway::new(gateway_url, config.push_gateway_key.clone());
        Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            gateway: Arc::new(gateway),
        }
    }

    /// Context backed by inmemory repos, a fixed config and the given
    /// gateway double. Used in tests.
    pub fn create_inmemory(gateway: Arc<dyn IPushGateway>) -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::fixed(),
            sys: Arc::new(RealSys {}),
            gateway,
        }
    }
}

/// Will setup the infrastructure context given the environment.
/// A store that cannot be reached is fatal: the process should exit and
/// let the supervisor restart it.
pub async fn setup_context() -> StaffpilotContext {
    StaffpilotContext::create(ContextParams {
        mongodb_connection_string: get_mongodb_connection_string(),
        mongodb_db_name: get_mongodb_db_name(),
    })
    .await
}

fn get_mongodb_connection_string() -> String {
    const MONGODB_CONNECTION_STRING: &str = "MONGODB_CONNECTION_STRING";

    std::env::var(MONGODB_CONNECTION_STRING)
        .unwrap_or_else(|_| panic!("{} env var to be present.", MONGODB_CONNECTION_STRING))
}

fn get_mongodb_db_name() -> String {
    std::env::var("MONGODB_NAME").unwrap_or_else(|_| "staffpilot".into())
}
