use anyhow::Result;

use super::Context;

pub async fn show_status(ctx: &Context, index: &str, endpoint: &str) -> Result<()> {
    let inspection = ctx.provisioner().inspect(index, endpoint).await?;

    println!("\n📊 Anchorage Status\n");
    println!("  Project:  {}", ctx.client.project());
    println!("  Location: {}", ctx.client.location());
    println!("{inspection}");

    if !inspection.is_complete() {
        println!(
            "\n  Run `anchorage up --index {} --dimensions <N> --endpoint {}` to finish provisioning",
            index, endpoint
        );
    }

    Ok(())
}
