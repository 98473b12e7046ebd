//! Score ranking and leaderboard rendering.

use std::collections::HashMap;

use crate::id::UserId;

/// A member's position on the leaderboard.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub user_id: UserId,
    pub rank: usize,
    pub score: i64,
    /// Whether at least one other member has the same score.
    pub tied: bool,
}

/// Scores ranked with competition ranking (1, 1, 3, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Rank raw scores. Highest score first; equal scores share a rank and
    /// are listed by ascending user id.
    pub fn from_scores(scores: &HashMap<UserId, i64>) -> Self {
        let mut sorted: Vec<(UserId, i64)> = scores.iter().map(|(u, s)| (*u, *s)).collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        let mut entries = Vec::with_capacity(sorted.len());
        let mut rank = 1;

        for group in sorted.chunk_by(|a, b| a.1 == b.1) {
            let tied = group.len() > 1;
            for (user_id, score) in group {
                entries.push(LeaderboardEntry {
                    user_id: *user_id,
                    rank,
                    score: *score,
                    tied,
                });
            }
            rank += group.len();
        }

        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn get(&self, user_id: UserId) -> Option<&LeaderboardEntry> {
        self.entries.iter().find(|e| e.user_id == user_id)
    }

    pub fn top(&self, n: usize) -> &[LeaderboardEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// Render the top `n` as a monospace table (`Rank | Score | Member`).
    pub fn render_table(&self, n: usize) -> String {
        let mut out = String::from("`Rank | Score |` Member");
        for entry in self.top(n) {
            out.push('\n');
            out.push_str(&format!(
                "`{:>4} |  {:>4} |` {}",
                ordinal(entry.rank),
                entry.score,
                entry.user_id.mention()
            ));
        }
        out
    }
}

/// English ordinal for a rank: `1st`, `2nd`, `3rd`, `4th`, `11th`, `21st`.
pub fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}
