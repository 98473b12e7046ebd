//! Allow/deny lists deciding where the ninja may appear.
//!
//! A list is either a set of snowflakes or the wildcard `*`, which matches
//! everything (including "no category"). Lists are persisted as comma-joined
//! strings so staff can edit them at runtime.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{DomainError, DomainResult};
use crate::id::{CategoryId, ChannelId};

const WILDCARD: &str = "*";

/// A set of snowflakes, or the wildcard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<RawEntry>")]
pub struct AllowDenySet {
    wildcard: bool,
    ids: BTreeSet<u64>,
}

/// Configuration-file entry: an integer id or the literal `"*"`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Id(u64),
    Text(String),
}

impl TryFrom<Vec<RawEntry>> for AllowDenySet {
    type Error = DomainError;

    fn try_from(entries: Vec<RawEntry>) -> Result<Self, Self::Error> {
        let mut set = AllowDenySet::empty();
        for entry in entries {
            match entry {
                RawEntry::Id(id) => {
                    set.ids.insert(id);
                }
                RawEntry::Text(text) if text == WILDCARD => set.wildcard = true,
                RawEntry::Text(text) => {
                    return Err(DomainError::validation(format!(
                        "elements of an allow/deny list must be integers or a single '*', got {text:?}"
                    )));
                }
            }
        }
        Ok(set)
    }
}

impl AllowDenySet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn wildcard() -> Self {
        Self {
            wildcard: true,
            ids: BTreeSet::new(),
        }
    }

    pub fn from_ids(ids: impl IntoIterator<Item = u64>) -> Self {
        Self {
            wildcard: false,
            ids: ids.into_iter().collect(),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    pub fn is_empty(&self) -> bool {
        !self.wildcard && self.ids.is_empty()
    }

    pub fn contains(&self, id: impl Into<u64>) -> bool {
        self.wildcard || self.ids.contains(&id.into())
    }

    /// Membership test for an optional id; only the wildcard matches `None`.
    pub fn contains_opt(&self, id: Option<impl Into<u64>>) -> bool {
        match id {
            Some(id) => self.contains(id),
            None => self.wildcard,
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.ids.iter().copied()
    }

    /// Parse the persisted comma-joined form. Empty segments are ignored.
    pub fn parse_stored(raw: &str) -> DomainResult<Self> {
        let mut set = Self::empty();
        for segment in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            set.insert_token(segment)?;
        }
        Ok(set)
    }

    /// Persisted comma-joined form (`*` first when wildcard).
    pub fn to_stored(&self) -> String {
        let wildcard = self.wildcard.then(|| WILDCARD.to_string());
        wildcard
            .into_iter()
            .chain(self.ids.iter().map(u64::to_string))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Insert a raw token (`*` or a decimal snowflake).
    pub fn insert_token(&mut self, token: &str) -> DomainResult<()> {
        if token == WILDCARD {
            self.wildcard = true;
            return Ok(());
        }
        let id = u64::from_str(token)
            .map_err(|_| DomainError::invalid_id(format!("invalid snowflake id: {token:?}")))?;
        self.ids.insert(id);
        Ok(())
    }

    /// Remove a raw token (`*` or a decimal snowflake). Unknown tokens are a no-op.
    pub fn remove_token(&mut self, token: &str) {
        if token == WILDCARD {
            self.wildcard = false;
        } else if let Ok(id) = u64::from_str(token) {
            self.ids.remove(&id);
        }
    }
}

impl core::fmt::Display for AllowDenySet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.to_stored())
    }
}

/// Allow and deny sets for one kind of location (channels or categories).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AllowDenyGroup {
    #[serde(default = "AllowDenySet::wildcard")]
    pub allow: AllowDenySet,
    #[serde(default)]
    pub deny: AllowDenySet,
}

impl Default for AllowDenyGroup {
    fn default() -> Self {
        Self {
            allow: AllowDenySet::wildcard(),
            deny: AllowDenySet::empty(),
        }
    }
}

/// Where the ninja is allowed to hunt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Permissions {
    #[serde(default)]
    pub categories: AllowDenyGroup,
    #[serde(default)]
    pub channels: AllowDenyGroup,
}

impl Permissions {
    /// Decide whether a channel (with its optional category) is eligible.
    ///
    /// Channel rules win over category rules; deny wins over allow at the same
    /// level; anything unmatched is rejected.
    pub fn admits(&self, channel: ChannelId, category: Option<CategoryId>) -> bool {
        if self.channels.deny.contains(channel) {
            return false;
        }
        if self.channels.allow.contains(channel) {
            return true;
        }
        if self.categories.deny.contains_opt(category) {
            return false;
        }
        if self.categories.allow.contains_opt(category) {
            return true;
        }
        false
    }

    pub fn list(&self, list_type: ListType) -> &AllowDenySet {
        match list_type {
            ListType::CategoriesAllow => &self.categories.allow,
            ListType::CategoriesDeny => &self.categories.deny,
            ListType::ChannelsAllow => &self.channels.allow,
            ListType::ChannelsDeny => &self.channels.deny,
        }
    }

    pub fn list_mut(&mut self, list_type: ListType) -> &mut AllowDenySet {
        match list_type {
            ListType::CategoriesAllow => &mut self.categories.allow,
            ListType::CategoriesDeny => &mut self.categories.deny,
            ListType::ChannelsAllow => &mut self.channels.allow,
            ListType::ChannelsDeny => &mut self.channels.deny,
        }
    }
}

/// One of the four editable permission lists.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ListType {
    CategoriesAllow,
    CategoriesDeny,
    ChannelsAllow,
    ChannelsDeny,
}

impl ListType {
    pub const ALL: [ListType; 4] = [
        ListType::CategoriesAllow,
        ListType::CategoriesDeny,
        ListType::ChannelsAllow,
        ListType::ChannelsDeny,
    ];

    /// Name used in commands and as the storage key.
    pub fn as_str(&self) -> &'static str {
        match self {
            ListType::CategoriesAllow => "categories_allow",
            ListType::CategoriesDeny => "categories_deny",
            ListType::ChannelsAllow => "channels_allow",
            ListType::ChannelsDeny => "channels_deny",
        }
    }
}

impl core::fmt::Display for ListType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ListType::ALL
            .into_iter()
            .find(|lt| lt.as_str() == s)
            .ok_or_else(|| DomainError::InvalidListType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(id: u64) -> ChannelId {
        ChannelId::new(id)
    }

    fn category(id: u64) -> Option<CategoryId> {
        Some(CategoryId::new(id))
    }

    #[test]
    fn wildcard_contains_everything() {
        let set = AllowDenySet::wildcard();
        assert!(set.contains(1u64));
        assert!(set.contains(u64::MAX));
        assert!(set.contains_opt(None::<u64>));
    }

    #[test]
    fn explicit_set_does_not_match_missing_category() {
        let set = AllowDenySet::from_ids([5]);
        assert!(set.contains(5u64));
        assert!(!set.contains(6u64));
        assert!(!set.contains_opt(None::<u64>));
    }

    #[test]
    fn stored_form_round_trips_wildcard_and_ids() {
        assert_eq!(AllowDenySet::wildcard().to_stored(), "*");
        assert_eq!(AllowDenySet::empty().to_stored(), "");

        let parsed = AllowDenySet::parse_stored(",12,,*,3").unwrap();
        assert!(parsed.is_wildcard());
        assert_eq!(parsed.ids().collect::<Vec<_>>(), vec![3, 12]);
        assert_eq!(parsed.to_stored(), "*,3,12");
    }

    #[test]
    fn stored_form_rejects_garbage() {
        let err = AllowDenySet::parse_stored("1,two").unwrap_err();
        assert!(matches!(err, DomainError::InvalidId(_)));
    }

    #[test]
    fn remove_token_handles_wildcard_and_unknown() {
        let mut set = AllowDenySet::parse_stored("*,1").unwrap();
        set.remove_token("*");
        set.remove_token("not-a-number");
        assert!(!set.is_wildcard());
        assert_eq!(set.to_stored(), "1");
    }

    #[test]
    fn deserializes_from_yaml_lists() {
        let group: AllowDenyGroup = serde_yaml::from_str("allow: ['*']\ndeny: [1, 2]").unwrap();
        assert!(group.allow.is_wildcard());
        assert_eq!(group.deny.to_stored(), "1,2");

        let err = serde_yaml::from_str::<AllowDenyGroup>("allow: ['nope']");
        assert!(err.is_err());
    }

    #[test]
    fn default_permissions_admit_everything() {
        let perms = Permissions::default();
        assert!(perms.admits(channel(1), category(2)));
        assert!(perms.admits(channel(1), None));
    }

    #[test]
    fn channel_rules_take_precedence_over_category_rules() {
        let mut perms = Permissions::default();
        perms.categories.deny = AllowDenySet::from_ids([10]);
        perms.channels.allow = AllowDenySet::from_ids([1]);

        // allowed channel inside a denied category
        assert!(perms.admits(channel(1), category(10)));
        // any other channel in the denied category
        assert!(!perms.admits(channel(2), category(10)));

        perms.channels.deny = AllowDenySet::from_ids([1]);
        assert!(!perms.admits(channel(1), category(10)));
    }

    #[test]
    fn unmatched_channels_are_rejected() {
        let perms = Permissions {
            categories: AllowDenyGroup {
                allow: AllowDenySet::from_ids([10]),
                deny: AllowDenySet::empty(),
            },
            channels: AllowDenyGroup {
                allow: AllowDenySet::empty(),
                deny: AllowDenySet::empty(),
            },
        };
        assert!(perms.admits(channel(1), category(10)));
        assert!(!perms.admits(channel(1), category(11)));
        assert!(!perms.admits(channel(1), None));
    }

    #[test]
    fn list_types_parse_from_command_names() {
        for lt in ListType::ALL {
            assert_eq!(lt.as_str().parse::<ListType>().unwrap(), lt);
        }
        assert_eq!(
            "channels".parse::<ListType>().unwrap_err(),
            DomainError::InvalidListType("channels".to_string())
        );
    }
}
