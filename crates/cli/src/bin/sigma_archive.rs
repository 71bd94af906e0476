use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    sigma_cli::main_entry().await
}
