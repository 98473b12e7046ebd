/// Phase the game loop is currently in.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum GameState {
    #[default]
    NotRunning,
    Sleeping,
    Hunting,
    ActiveReaction,
}

impl GameState {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameState::NotRunning => "not_running",
            GameState::Sleeping => "sleeping",
            GameState::Hunting => "hunting",
            GameState::ActiveReaction => "active_reaction",
        }
    }
}

impl core::fmt::Display for GameState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
