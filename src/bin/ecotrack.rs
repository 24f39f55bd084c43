use anyhow::Result;
use ecotrack::cli;

// Main function
#[tokio::main]
async fn main() -> Result<()> {
    let (action, globals) = cli::start()?;

    action.execute(&globals).await?;

    Ok(())
}
