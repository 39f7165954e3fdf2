#[tokio::main]
async fn main() -> anyhow::Result<()> {
    booth_showcase_lib::run().await
}
