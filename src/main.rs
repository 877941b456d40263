mod telemetry;

use staffpilot_dispatcher::run_dispatcher;
use staffpilot_infra::setup_context;
use telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() {
    openssl_probe::init_ssl_cert_env_vars();

    let subscriber = get_subscriber("staffpilot_notifier".into(), "info".into());
    init_subscriber(subscriber);

    let context = setup_context().await;

    run_dispatcher(context).await;
}
