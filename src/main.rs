#[tokio::main]
async fn main() -> anyhow::Result<()> {
    hoplite_observer::run().await
}
