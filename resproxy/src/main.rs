use rp_api_rest::{context::ApiRestCtx, ApiRestServer};
use rp_backend::BackendClient;
use rp_descriptor::DescriptorStore;
use rp_mirror::{DocumentForwarder, SchemaMirror};

mod config_path;

#[tokio::main]
async fn main() {
    let config_path = config_path::get();
    let config = match rp_config::from_path(&config_path) {
        Ok(config) => config,
        Err(err) => rp_log::panic(None, format!("[resproxy] Invalid config {config_path}: {err}")),
    };

    rp_log::init(config.log().display_level(), config.log().level_filter());

    rp_log::info(Some("🚀"), "[resproxy] Starting");

    let resources_path = config.resources().path();
    if let Err(err) = tokio::fs::create_dir_all(resources_path).await {
        rp_log::panic(
            None,
            format!("[resproxy] Resources directory {resources_path} is unusable: {err}"),
        );
    }

    let backend = match BackendClient::new(
        &config.backend().base_url(),
        config.backend().admin_key(),
        config.backend().timeout(),
    ) {
        Ok(backend) => backend,
        Err(err) => rp_log::panic(None, format!("[resproxy] {err}")),
    };
    rp_log::info(
        Some("🔗"),
        format!("[resproxy] Forwarding to backend at {}", backend.base_url()),
    );

    let api_rest_server = ApiRestServer::new(
        config.api().rest().host(),
        config.api().rest().port(),
        ApiRestCtx::new(
            SchemaMirror::new(DescriptorStore::new(resources_path), backend.clone()),
            DocumentForwarder::new(backend),
        ),
    );

    match api_rest_server.run().await {
        Ok(_) => rp_log::info(Some("👋"), "[resproxy] Turned off"),
        Err(err) => rp_log::warn(
            Some("👋"),
            format!("[resproxy] Turned off with error: {err}"),
        ),
    }
}
