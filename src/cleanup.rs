use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cvp::types::{current_status, user_status, user_type};
use crate::cvp::{CvpApi, User};

/// Tuning for one cleanup pass.
#[derive(Debug, Clone, Copy)]
pub struct CleanupOptions {
    /// Seconds since last access before a session counts as stale
    pub max_idle_secs: i64,
    /// Report matches without issuing any deletes
    pub dry_run: bool,
}

/// Epoch seconds right now.
pub fn epoch_now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// A user is stale when it authenticates through an external AAA system
/// (anything but Local), is enabled, shows as online, and has been idle
/// for longer than the limit.
pub fn is_stale(user: &User, now: i64, max_idle_secs: i64) -> bool {
    user.user_type != user_type::LOCAL
        && user.user_status == user_status::ENABLED
        && user.current_status == current_status::ONLINE
        && now - user.last_accessed > max_idle_secs
}

/// Scan every user on the server and kick the stale ones. Returns the
/// number of users kicked (or that would have been, in dry-run mode).
pub async fn scan<C: CvpApi + ?Sized>(cvp: &C, opts: &CleanupOptions) -> Result<u64> {
    let page = cvp.get_users().await.context("Failed to fetch users")?;
    debug!("Fetched {} user records", page.users.len());

    let now = epoch_now();
    let mut kicked = 0u64;
    for user in &page.users {
        if is_stale(user, now, opts.max_idle_secs) {
            debug!(
                "User {} was last seen online {} seconds ago",
                user.user_id,
                now - user.last_accessed
            );
            if !opts.dry_run {
                cvp.delete_user(&user.user_id)
                    .await
                    .with_context(|| format!("Failed to delete user {}", user.user_id))?;
            }
            info!("Kicking user: {}", user.user_id);
            kicked += 1;
        } else {
            debug!("Not deleting user {}", user.user_id);
            debug!("{:?}", user);
        }
    }
    Ok(kicked)
}

/// Targeted mode: examine exactly one account. Local accounts are never
/// deleted. Returns 1 when the user was kicked (or would have been).
pub async fn delete_target<C: CvpApi + ?Sized>(
    cvp: &C,
    user_id: &str,
    dry_run: bool,
) -> Result<u64> {
    let user = cvp
        .get_user(user_id)
        .await
        .with_context(|| format!("Failed to look up user {}", user_id))?;

    if user.user_type == user_type::LOCAL {
        info!("User {} is a Local account, skipping", user_id);
        return Ok(0);
    }

    debug!("Deleting the following user record:");
    debug!("{:?}", user);
    if !dry_run {
        cvp.delete_user(user_id)
            .await
            .with_context(|| format!("Failed to delete user {}", user_id))?;
    }
    info!("Kicking user: {}", user_id);
    Ok(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cvp::mock::MockCvp;

    const DAY_SECS: i64 = 86400;

    fn user(id: &str, user_type: &str, status: &str, current: &str, last_accessed: i64) -> User {
        User {
            user_id: id.to_string(),
            user_type: user_type.to_string(),
            user_status: status.to_string(),
            current_status: current.to_string(),
            last_accessed,
            first_name: None,
            last_name: None,
            email: None,
        }
    }

    #[test]
    fn stale_needs_every_predicate() {
        let now = 1_700_000_000;
        let cases = [
            // (user, expected)
            (user("bob", "Tacacs", "Enabled", "Online", now - 90000), true),
            (user("bob", "Tacacs", "Enabled", "Online", now - 1000), false),
            (user("admin", "Local", "Enabled", "Online", now - 90000), false),
            (user("carol", "RADIUS", "Disabled", "Online", now - 90000), false),
            (user("dave", "Tacacs", "Enabled", "Offline", now - 90000), false),
        ];
        for (user, expected) in &cases {
            assert_eq!(
                is_stale(user, now, DAY_SECS),
                *expected,
                "user {}",
                user.user_id
            );
        }
    }

    #[test]
    fn idle_exactly_at_limit_is_kept() {
        let now = 1_700_000_000;
        let borderline = user("eve", "Tacacs", "Enabled", "Online", now - DAY_SECS);
        assert!(!is_stale(&borderline, now, DAY_SECS));
        let over = user("eve", "Tacacs", "Enabled", "Online", now - DAY_SECS - 1);
        assert!(is_stale(&over, now, DAY_SECS));
    }

    fn mixed_population() -> Vec<User> {
        let now = epoch_now();
        vec![
            user("bob", "Tacacs", "Enabled", "Online", now - 90000),
            user("admin", "Local", "Enabled", "Online", now - 90000),
            user("carol", "RADIUS", "Disabled", "Online", now - 90000),
            user("dave", "Tacacs", "Enabled", "Offline", now - 90000),
            user("fresh", "Tacacs", "Enabled", "Online", now - 1000),
        ]
    }

    #[tokio::test]
    async fn scan_kicks_only_stale_remote_users() {
        let cvp = MockCvp {
            users: mixed_population(),
            ..Default::default()
        };
        let opts = CleanupOptions {
            max_idle_secs: DAY_SECS,
            dry_run: false,
        };

        let kicked = scan(&cvp, &opts).await.unwrap();
        assert_eq!(kicked, 1);
        assert_eq!(*cvp.deleted_users.lock().unwrap(), vec!["bob".to_string()]);
    }

    #[tokio::test]
    async fn dry_run_counts_matches_without_deleting() {
        let cvp = MockCvp {
            users: mixed_population(),
            ..Default::default()
        };
        let opts = CleanupOptions {
            max_idle_secs: DAY_SECS,
            dry_run: true,
        };

        let kicked = scan(&cvp, &opts).await.unwrap();
        assert_eq!(kicked, 1);
        assert!(cvp.deleted_users.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn targeted_mode_kicks_a_remote_user() {
        let now = epoch_now();
        let cvp = MockCvp {
            users: vec![user("bob", "Tacacs", "Enabled", "Online", now - 90000)],
            ..Default::default()
        };

        let kicked = delete_target(&cvp, "bob", false).await.unwrap();
        assert_eq!(kicked, 1);
        assert_eq!(*cvp.deleted_users.lock().unwrap(), vec!["bob".to_string()]);
    }

    #[tokio::test]
    async fn targeted_mode_refuses_local_accounts() {
        let now = epoch_now();
        let cvp = MockCvp {
            users: vec![user("admin", "Local", "Enabled", "Online", now - 90000)],
            ..Default::default()
        };

        let kicked = delete_target(&cvp, "admin", false).await.unwrap();
        assert_eq!(kicked, 0);
        assert!(cvp.deleted_users.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn targeted_mode_honors_dry_run() {
        let now = epoch_now();
        let cvp = MockCvp {
            users: vec![user("bob", "Tacacs", "Enabled", "Online", now - 90000)],
            ..Default::default()
        };

        let kicked = delete_target(&cvp, "bob", true).await.unwrap();
        assert_eq!(kicked, 1);
        assert!(cvp.deleted_users.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn targeted_mode_fails_on_unknown_user() {
        let cvp = MockCvp::default();
        assert!(delete_target(&cvp, "ghost", false).await.is_err());
        assert!(cvp.deleted_users.lock().unwrap().is_empty());
    }
}
