use crate::model::employee::Employee;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

const ROSTER_KEY: &str = "roster";

/// How long a fetched employee roster may be reused by a view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RosterPolicy {
    /// Fetch once when the view mounts, reuse until it unmounts.
    #[default]
    OncePerMount,
    /// Refetch on the next load after the roster is this old.
    MaxAge(Duration),
    /// Refetch on every load.
    Always,
}

impl RosterPolicy {
    /// `0` means no reuse at all.
    pub fn from_max_age_secs(secs: u64) -> Self {
        if secs == 0 {
            Self::Always
        } else {
            Self::MaxAge(Duration::from_secs(secs))
        }
    }
}

/// Per-view employee roster, expiring according to a `RosterPolicy`.
pub struct RosterCache {
    policy: RosterPolicy,
    cache: Cache<&'static str, Arc<Vec<Employee>>>,
}

impl RosterCache {
    pub fn new(policy: RosterPolicy) -> Self {
        let mut builder = Cache::builder();
        if let RosterPolicy::MaxAge(ttl) = policy {
            builder = builder.time_to_live(ttl);
        }

        Self {
            policy,
            cache: builder.build(),
        }
    }

    pub fn policy(&self) -> RosterPolicy {
        self.policy
    }

    /// The cached roster if it is still fresh.
    pub async fn fresh(&self) -> Option<Arc<Vec<Employee>>> {
        if self.policy == RosterPolicy::Always {
            return None;
        }
        self.cache.get(&ROSTER_KEY).await
    }

    pub async fn store(&self, roster: Vec<Employee>) -> Arc<Vec<Employee>> {
        let roster = Arc::new(roster);
        if self.policy != RosterPolicy::Always {
            self.cache.insert(ROSTER_KEY, Arc::clone(&roster)).await;
        }
        roster
    }

    pub async fn invalidate(&self) {
        self.cache.invalidate(&ROSTER_KEY).await;
    }
}
