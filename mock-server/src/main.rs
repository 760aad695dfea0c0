use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let username = std::env::var("MOCK_DIGIFLAZZ_USERNAME").unwrap_or_else(|_| "user1".to_string());
    let key = std::env::var("MOCK_DIGIFLAZZ_KEY").unwrap_or_else(|_| "key1".to_string());

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    mock_server::run(listener, mock_server::Account::new(username, key)).await
}
