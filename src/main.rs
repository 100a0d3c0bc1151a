mod config;
mod proxy;
mod routes;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::Config::from_env().expect("invalid configuration");
    let proxy = proxy::Proxy::new(&config).expect("http client init failed");
    tracing::info!(backend = proxy.backend_url(), timeout_secs = config.proxy_timeout.as_secs(), "api proxy configured");

    let app = routes::leptos_app(proxy).expect("leptos app init failed");
    let port = config.port;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "wafboard listening");
    axum::serve(listener, app).await.expect("server failed");
}
