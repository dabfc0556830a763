use anyhow::{Context, Result, anyhow};
use log::info;
use std::collections::HashMap;

use crate::api::slack::SlackApi;
use crate::models::slack::User;

/// Slack user id to display name, built once per run.
#[derive(Debug, Clone, Default)]
pub struct IdentityMap {
    names: HashMap<String, String>,
}

impl IdentityMap {
    pub fn from_users(users: &[User]) -> Self {
        users
            .iter()
            .map(|user| (user.id.clone(), user.display_name().to_string()))
            .collect()
    }

    pub fn display_name(&self, author_id: &str) -> Result<&str> {
        self.names
            .get(author_id)
            .map(String::as_str)
            .ok_or_else(|| anyhow!("unknown author '{}', not in the user directory", author_id))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<(String, String)> for IdentityMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

pub async fn resolve_identities(api: &impl SlackApi) -> Result<IdentityMap> {
    let users = api
        .list_users()
        .await
        .context("cannot fetch the Slack user directory")?;

    let identities = IdentityMap::from_users(&users);
    info!("resolved {} identities", identities.len());

    Ok(identities)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> Vec<User> {
        serde_json::from_value(serde_json::json!([
            {"id": "U1", "name": "alice", "profile": {"real_name": "Alice Liddell"}},
            {"id": "U2", "name": "bob", "profile": {"real_name": ""}},
        ]))
        .unwrap()
    }

    #[test]
    fn test_from_users_resolves_display_names() {
        let identities = IdentityMap::from_users(&users());
        assert_eq!(identities.len(), 2);
        assert_eq!(identities.display_name("U1").unwrap(), "Alice Liddell");
        assert_eq!(identities.display_name("U2").unwrap(), "bob");
    }

    #[test]
    fn test_unknown_author_is_an_error() {
        let identities = IdentityMap::from_users(&users());
        let err = identities.display_name("U404").unwrap_err();
        assert!(err.to_string().contains("U404"));
    }

    #[test]
    fn test_empty_directory() {
        let identities = IdentityMap::default();
        assert!(identities.is_empty());
        assert!(identities.display_name("").is_err());
    }
}
