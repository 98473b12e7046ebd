use std::collections::HashMap;
use std::time::Duration;

use ninjabot_core::{ChannelId, GuildId, NinjaEmoji};
use ninjabot_infra::{ConfigError, Resources, Settings};

/// Round parameters, resolved once from settings and resources.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub guild_id: GuildId,
    pub public_only: bool,
    pub cooldown: Duration,
    /// Upper bound of the extra random sleep, in whole seconds.
    pub max_time_jitter: u64,
    pub probability_multiplier: f64,
    pub channel_scalars: HashMap<ChannelId, f64>,
    pub max_points: u32,
    pub reaction_timeout: Duration,
    pub auto_start: bool,
    pub fallback_emoji: NinjaEmoji,
    pub summary_channel: ChannelId,
    pub ninja_names: Vec<String>,
    pub ninja_image: Option<Vec<u8>>,
}

impl GameConfig {
    pub fn from_settings(settings: &Settings, resources: Resources) -> Result<Self, ConfigError> {
        let game = &settings.game;
        Ok(Self {
            guild_id: settings.guild.guild_id,
            public_only: game.public_only,
            cooldown: game.cooldown(),
            max_time_jitter: game.max_time_jitter,
            probability_multiplier: game.probability_multiplier,
            channel_scalars: game.channel_scalars()?,
            max_points: game.max_points,
            reaction_timeout: game.reaction_timeout(),
            auto_start: game.auto_start,
            fallback_emoji: settings.guild.fallback_emoji()?,
            summary_channel: settings.guild.summary_channel,
            ninja_names: resources.ninja_names,
            ninja_image: resources.ninja_image,
        })
    }

    /// Probability scale factor for a channel (1.0 unless configured).
    pub fn channel_scalar(&self, channel: ChannelId) -> f64 {
        self.channel_scalars.get(&channel).copied().unwrap_or(1.0)
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> GameConfig {
    use ninjabot_core::EmojiId;

    GameConfig {
        guild_id: GuildId::new(1000),
        public_only: false,
        cooldown: Duration::from_secs(60),
        max_time_jitter: 0,
        probability_multiplier: 1.0,
        channel_scalars: HashMap::new(),
        max_points: 10,
        reaction_timeout: Duration::from_secs(30),
        auto_start: true,
        fallback_emoji: NinjaEmoji::new(EmojiId::new(637923502535606293), "ninjaduck"),
        summary_channel: ChannelId::new(9000),
        ninja_names: vec!["ShadowDuck".to_string()],
        ninja_image: Some(vec![0x89, b'P', b'N', b'G']),
    }
}
