use anyhow::Context as _;
use tracing::info;

use ninjabot_infra::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let settings = Settings::load().context("loading settings")?;
    ninjabot_observability::init(&settings.logging.level, settings.logging.json);
    info!(prefix = %settings.command_prefix, guild_id = %settings.guild.guild_id, "starting ninjabot");

    ninjabot::app::run(settings).await
}
