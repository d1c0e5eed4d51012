#[tokio::main]
async fn main() -> std::io::Result<()> {
    idle_miner::run_with_config().await
}
