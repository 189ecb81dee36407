#[tokio::main]
async fn main() -> std::io::Result<()> {
    flightdeck::run_with_config().await
}
