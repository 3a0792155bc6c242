//! Credits balance lookup.

use std::collections::HashMap;

use serde::Serialize;

use crate::config::CreditAccount;

pub const DEFAULT_CREDITS: u64 = 100;
pub const DEFAULT_PLAN: &str = "free";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credits {
    pub credits_remaining: u64,
    pub credits_total: u64,
    pub credits_used: u64,
    pub plan: String,
}

impl Default for Credits {
    fn default() -> Self {
        Self {
            credits_remaining: DEFAULT_CREDITS,
            credits_total: DEFAULT_CREDITS,
            credits_used: 0,
            plan: DEFAULT_PLAN.to_string(),
        }
    }
}

impl From<&CreditAccount> for Credits {
    fn from(account: &CreditAccount) -> Self {
        Self {
            credits_remaining: account.remaining,
            credits_total: account.total,
            credits_used: account.total.saturating_sub(account.remaining),
            plan: account.plan.clone(),
        }
    }
}

pub struct CreditsService {
    accounts: HashMap<String, Credits>,
}

impl CreditsService {
    pub fn new(accounts: &[CreditAccount]) -> Self {
        Self {
            accounts: accounts
                .iter()
                .map(|a| (a.user_id.clone(), Credits::from(a)))
                .collect(),
        }
    }

    /// Unknown or anonymous users get the free-plan default.
    pub fn lookup(&self, user_id: Option<&str>) -> Credits {
        let found = user_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .and_then(|id| self.accounts.get(id));
        match found {
            Some(credits) => credits.clone(),
            None => {
                tracing::debug!("no credits account for {:?}, using default", user_id);
                Credits::default()
            }
        }
    }
}
