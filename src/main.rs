use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    listingbot::run().await
}
