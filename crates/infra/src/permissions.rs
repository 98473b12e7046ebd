//! Keeps the in-process allow/deny lists and the stored copies in step.
//!
//! The store wins when it holds a value; otherwise the configured value is
//! written through, so a fresh deployment is seeded from `config.yaml`.

use ninjabot_core::{AllowDenySet, ListType, Permissions};

use crate::store::{GameStore, StoreError, StoreResult};

/// Reconcile every list with the store.
pub async fn sync_permissions<S>(store: &S, permissions: &mut Permissions) -> StoreResult<()>
where
    S: GameStore + ?Sized,
{
    for list_type in ListType::ALL {
        let key = list_type.as_str();
        match store.config_get(key).await? {
            Some(raw) => {
                let stored = AllowDenySet::parse_stored(&raw)
                    .map_err(|e| StoreError::corrupt(key, e.to_string()))?;
                *permissions.list_mut(list_type) = stored;
            }
            None => {
                store
                    .config_set(key, &permissions.list(list_type).to_stored())
                    .await?;
            }
        }
    }
    Ok(())
}

/// Error from editing a stored list.
#[derive(Debug, thiserror::Error)]
pub enum ListEditError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Invalid(#[from] ninjabot_core::DomainError),
}

/// Add a token (`*` or a snowflake) to a list and persist it.
pub async fn add_to_list<S>(
    store: &S,
    permissions: &mut Permissions,
    list_type: ListType,
    token: &str,
) -> Result<(), ListEditError>
where
    S: GameStore + ?Sized,
{
    let token = validate_token(token)?;
    sync_permissions(store, permissions).await?;

    let mut list = permissions.list(list_type).clone();
    list.insert_token(token)?;
    store.config_set(list_type.as_str(), &list.to_stored()).await?;

    sync_permissions(store, permissions).await?;
    tracing::info!(list = %list_type, token, "added to permission list");
    Ok(())
}

/// Remove a token (`*` or a snowflake) from a list and persist it.
pub async fn remove_from_list<S>(
    store: &S,
    permissions: &mut Permissions,
    list_type: ListType,
    token: &str,
) -> Result<(), ListEditError>
where
    S: GameStore + ?Sized,
{
    let token = validate_token(token)?;
    sync_permissions(store, permissions).await?;

    let mut list = permissions.list(list_type).clone();
    list.remove_token(token);
    store.config_set(list_type.as_str(), &list.to_stored()).await?;

    sync_permissions(store, permissions).await?;
    tracing::info!(list = %list_type, token, "removed from permission list");
    Ok(())
}

/// Trimmed token, if it is `*` or a snowflake.
fn validate_token(token: &str) -> Result<&str, ninjabot_core::DomainError> {
    let token = token.trim();
    AllowDenySet::empty().insert_token(token)?;
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryGameStore;
    use ninjabot_core::{CategoryId, ChannelId};

    #[tokio::test]
    async fn empty_store_is_seeded_from_config() {
        let store = InMemoryGameStore::new();
        let mut permissions = Permissions::default();
        permissions.channels.deny = AllowDenySet::from_ids([7, 3]);

        sync_permissions(&store, &mut permissions).await.unwrap();

        assert_eq!(store.config_get("channels_deny").await.unwrap().as_deref(), Some("3,7"));
        assert_eq!(store.config_get("channels_allow").await.unwrap().as_deref(), Some("*"));
        assert_eq!(store.config_get("categories_deny").await.unwrap().as_deref(), Some(""));
    }

    #[tokio::test]
    async fn stored_values_override_config() {
        let store = InMemoryGameStore::new();
        store.config_set("channels_allow", "10,20").await.unwrap();
        store.config_set("categories_deny", "50").await.unwrap();
        let mut permissions = Permissions::default();

        sync_permissions(&store, &mut permissions).await.unwrap();

        assert!(!permissions.channels.allow.is_wildcard());
        assert!(permissions.admits(ChannelId::new(10), Some(CategoryId::new(50))));
        assert!(!permissions.admits(ChannelId::new(30), Some(CategoryId::new(50))));
        // The wildcard category allow still admits unlisted, uncategorised channels.
        assert!(permissions.admits(ChannelId::new(30), None::<CategoryId>));
    }

    #[tokio::test]
    async fn stored_wildcard_survives_a_sync() {
        let store = InMemoryGameStore::new();
        let mut permissions = Permissions::default();
        sync_permissions(&store, &mut permissions).await.unwrap();
        sync_permissions(&store, &mut permissions).await.unwrap();
        assert!(permissions.categories.allow.is_wildcard());
    }

    #[tokio::test]
    async fn corrupt_stored_list_is_an_error() {
        let store = InMemoryGameStore::new();
        store.config_set("categories_allow", "abc").await.unwrap();
        let mut permissions = Permissions::default();

        let err = sync_permissions(&store, &mut permissions).await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { key, .. } if key == "categories_allow"));
    }

    #[tokio::test]
    async fn add_is_idempotent_and_remove_persists() {
        let store = InMemoryGameStore::new();
        let mut permissions = Permissions::default();

        add_to_list(&store, &mut permissions, ListType::ChannelsDeny, "42").await.unwrap();
        add_to_list(&store, &mut permissions, ListType::ChannelsDeny, "42").await.unwrap();
        assert_eq!(store.config_get("channels_deny").await.unwrap().as_deref(), Some("42"));
        assert!(permissions.channels.deny.contains(42u64));

        remove_from_list(&store, &mut permissions, ListType::ChannelsDeny, "42").await.unwrap();
        assert_eq!(store.config_get("channels_deny").await.unwrap().as_deref(), Some(""));
        assert!(!permissions.channels.deny.contains(42u64));
    }

    #[tokio::test]
    async fn removing_the_wildcard_leaves_ids() {
        let store = InMemoryGameStore::new();
        let mut permissions = Permissions::default();

        add_to_list(&store, &mut permissions, ListType::CategoriesAllow, "5").await.unwrap();
        remove_from_list(&store, &mut permissions, ListType::CategoriesAllow, "*").await.unwrap();

        assert_eq!(store.config_get("categories_allow").await.unwrap().as_deref(), Some("5"));
    }

    #[tokio::test]
    async fn invalid_tokens_are_rejected_before_writing() {
        let store = InMemoryGameStore::new();
        let mut permissions = Permissions::default();

        assert!(matches!(
            add_to_list(&store, &mut permissions, ListType::ChannelsAllow, "general").await,
            Err(ListEditError::Invalid(_))
        ));
        assert!(matches!(
            remove_from_list(&store, &mut permissions, ListType::ChannelsAllow, "-1").await,
            Err(ListEditError::Invalid(_))
        ));
        assert_eq!(store.config_get("channels_allow").await.unwrap(), None);
    }
}
