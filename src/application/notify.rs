//! Recipient selection for alerts.

use crate::domain::id::UserId;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::store::Store;

/// Users who should receive a match alert.
///
/// Owners come first in configuration order, followed by ordinary admins
/// unless `notify.owners_only` is set. Anyone who turned alerts off with
/// `/notify off` is skipped.
///
/// # Errors
/// Returns an error if the admin list or a preference cannot be read.
pub async fn match_recipients<S: Store>(store: &S, config: &Config) -> Result<Vec<UserId>> {
    let mut candidates: Vec<UserId> = Vec::new();
    for owner in config.owners() {
        if !candidates.contains(owner) {
            candidates.push(*owner);
        }
    }
    if !config.notify.owners_only {
        for admin in store.list_admins().await? {
            if !candidates.contains(&admin.id) {
                candidates.push(admin.id);
            }
        }
    }

    let mut recipients = Vec::with_capacity(candidates.len());
    for user in candidates {
        if store.notify_enabled(user).await? {
            recipients.push(user);
        }
    }
    Ok(recipients)
}

/// Owners who should hear about membership changes.
#[must_use]
pub fn owner_recipients(config: &Config) -> Vec<UserId> {
    let mut owners: Vec<UserId> = Vec::with_capacity(config.owners().len());
    for owner in config.owners() {
        if !owners.contains(owner) {
            owners.push(*owner);
        }
    }
    owners
}
