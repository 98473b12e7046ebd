//! Process wiring: store, game controller and the Discord client.

use std::sync::{Arc, OnceLock};

use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use tracing::{info, warn};

use ninjabot_auth::StaffPolicy;
use ninjabot_core::EmojiId;
use ninjabot_events::{ChatEvent, EventBus, InMemoryEventBus};
use ninjabot_game::{GameConfig, GameController, GuildReadiness};
use ninjabot_infra::{GameStore, Resources, Settings};

use crate::commands;
use crate::context::Data;
use crate::discord::events::handle_event;
use crate::discord::platform::SerenityPlatform;
use crate::discord::{to_serenity_guild, user_id};
use crate::errors::on_error;

/// Run the bot until the gateway closes or a shutdown signal arrives.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let store = open_store(&settings).await?;
    let resources = Resources::load(&settings).context("loading resources")?;
    let config = GameConfig::from_settings(&settings, resources).context("building game config")?;

    let bus: Arc<InMemoryEventBus<ChatEvent>> = Arc::new(InMemoryEventBus::new());
    let readiness = GuildReadiness::new();
    let guild = &settings.guild;
    let policy = StaffPolicy::new(
        guild.admins_id,
        guild.moderators_id,
        guild.bypass_roles.iter().copied(),
        guild.commands_channels.iter().copied(),
    );

    let follower = readiness.clone();
    let guild_events = bus.subscribe();
    let guild_id = settings.guild.guild_id;
    tokio::spawn(async move { follower.follow(guild_events, guild_id).await });

    // Filled once the gateway is ready; read by the shutdown task.
    let controller_slot: Arc<OnceLock<GameController>> = Arc::new(OnceLock::new());

    let data = PendingData {
        config,
        permissions: settings.permissions.clone(),
        store,
        bus,
        readiness,
        policy,
        prefix: settings.command_prefix.clone(),
        ninja_emoji: guild.emoji_full.clone(),
        emoji_confirm: EmojiId::new(guild.emoji_confirm),
        emoji_deny: EmojiId::new(guild.emoji_deny),
    };

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all(),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(settings.command_prefix.clone()),
                ..Default::default()
            },
            on_error: |error| Box::pin(on_error(error)),
            event_handler: |ctx, event, framework, data| Box::pin(handle_event(ctx, event, framework, data)),
            allowed_mentions: Some(serenity::CreateAllowedMentions::new()),
            ..Default::default()
        })
        .setup({
            let controller_slot = Arc::clone(&controller_slot);
            move |ctx, ready, _framework| {
                Box::pin(async move {
                    info!(user = %ready.user.name, guilds = ready.guilds.len(), "connected to discord");
                    let data = data.into_data(ctx, user_id(ready.user.id));
                    if controller_slot.set(data.controller.clone()).is_err() {
                        warn!("game controller was already initialised");
                    }
                    Ok(data)
                })
            }
        })
        .build();

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT
        | serenity::GatewayIntents::GUILD_MESSAGE_REACTIONS
        | serenity::GatewayIntents::GUILD_EMOJIS_AND_STICKERS;

    let mut client = serenity::ClientBuilder::new(settings.token.expose(), intents)
        .framework(framework)
        .await
        .context("building discord client")?;

    let shard_manager = Arc::clone(&client.shard_manager);
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("shutdown signal received");
        if let Some(controller) = controller_slot.get() {
            controller.shutdown().await;
        }
        shard_manager.shutdown_all().await;
    });

    client.start().await.context("discord client stopped")?;
    info!("ninjabot has shut down");
    Ok(())
}

/// Everything [`Data`] needs except what only exists once the gateway is up.
struct PendingData {
    config: GameConfig,
    permissions: ninjabot_core::Permissions,
    store: Arc<dyn GameStore>,
    bus: Arc<InMemoryEventBus<ChatEvent>>,
    readiness: GuildReadiness,
    policy: StaffPolicy,
    prefix: String,
    ninja_emoji: String,
    emoji_confirm: EmojiId,
    emoji_deny: EmojiId,
}

impl PendingData {
    fn into_data(self, ctx: &serenity::Context, bot_user: ninjabot_core::UserId) -> Data {
        let guild_id = self.config.guild_id;
        let platform = Arc::new(SerenityPlatform::new(ctx.http.clone(), guild_id, bot_user));
        let controller = GameController::new(
            self.config,
            self.permissions,
            Arc::clone(&self.store),
            platform,
            self.bus.clone(),
            self.readiness.clone(),
        );
        controller.spawn();

        // The guild may already be cached if it arrived before setup finished.
        let cached = ctx
            .cache
            .guild(to_serenity_guild(guild_id))
            .is_some_and(|guild| !guild.roles.is_empty() && !guild.channels.is_empty());
        if cached {
            self.readiness.set_ready();
        }

        Data {
            controller,
            store: self.store,
            bus: self.bus,
            policy: self.policy,
            guild_id,
            prefix: self.prefix,
            ninja_emoji: self.ninja_emoji,
            emoji_confirm: self.emoji_confirm,
            emoji_deny: self.emoji_deny,
        }
    }
}

#[cfg(feature = "redis")]
async fn open_store(settings: &Settings) -> anyhow::Result<Arc<dyn GameStore>> {
    let redis = &settings.redis;
    let conn = ninjabot_infra::connect_with_retry(&redis.url, redis.connect_attempts, redis.connect_backoff())
        .await
        .context("connecting to redis")?;
    info!(namespace = %redis.namespace, "connected to redis");
    Ok(Arc::new(ninjabot_infra::RedisGameStore::new(conn, &redis.namespace)))
}

#[cfg(not(feature = "redis"))]
async fn open_store(_settings: &Settings) -> anyhow::Result<Arc<dyn GameStore>> {
    warn!("built without redis support, scores will not survive a restart");
    Ok(Arc::new(ninjabot_infra::InMemoryGameStore::new()))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

