//! Vote credit ledger: a JSON object mapping user id to unspent credits.

use std::collections::BTreeMap;
use std::path::PathBuf;

use super::document::JsonDocument;
use crate::errors::AppError;

pub type Balances = BTreeMap<String, u64>;

/// Per-user balances of purchased vote credits.
pub struct CreditLedger {
    pub(super) document: JsonDocument<Balances>,
}

impl CreditLedger {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let document: JsonDocument<Balances> = JsonDocument::open(path).await?;
        tracing::debug!("Opened credit ledger document at {}", document.path().display());
        Ok(Self { document })
    }

    /// Number of users with a ledger entry.
    pub async fn account_count(&self) -> Result<usize, AppError> {
        Ok(self.document.read().await?.len())
    }

    /// Current balance; unknown users have zero credits.
    pub async fn get_balance(&self, user: &str) -> Result<u64, AppError> {
        let balances = self.document.read().await?;
        Ok(balance_of(&balances, user.trim()))
    }

    /// Credit a purchase to `user` and return the new balance.
    pub async fn add_credits(&self, user: &str, amount: u64) -> Result<u64, AppError> {
        let user = require_user(user)?;
        if amount == 0 {
            return Err(AppError::Validation(
                "Credit amount must be greater than zero".to_string(),
            ));
        }

        let guard = self.document.lock().await;
        let mut balances = guard.load().await?;
        let balance = balances.entry(user.to_string()).or_insert(0);
        *balance = balance.checked_add(amount).ok_or_else(|| {
            AppError::Validation(format!("Credit balance overflow for {}", user))
        })?;
        let new_balance = *balance;
        guard.save(&balances).await?;

        tracing::info!("Added {} vote credits to {} (balance {})", amount, user, new_balance);
        Ok(new_balance)
    }

    /// Consume one credit and return the remaining balance.
    pub async fn spend_one_credit(&self, user: &str) -> Result<u64, AppError> {
        let user = require_user(user)?;
        let guard = self.document.lock().await;
        let mut balances = guard.load().await?;
        let remaining = debit(&mut balances, user)?;
        guard.save(&balances).await?;
        Ok(remaining)
    }
}

pub(super) fn balance_of(balances: &Balances, user: &str) -> u64 {
    balances.get(user).copied().unwrap_or(0)
}

/// Remove exactly one credit, refusing to go below zero.
pub(super) fn debit(balances: &mut Balances, user: &str) -> Result<u64, AppError> {
    match balances.get_mut(user) {
        Some(balance) if *balance >= 1 => {
            *balance -= 1;
            Ok(*balance)
        }
        other => Err(AppError::InsufficientCredits {
            user: user.to_string(),
            balance: other.map(|b| *b).unwrap_or(0),
        }),
    }
}

pub(super) fn require_user(user: &str) -> Result<&str, AppError> {
    let user = user.trim();
    if user.is_empty() {
        return Err(AppError::Validation("User is required".to_string()));
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn open_ledger(dir: &TempDir) -> CreditLedger {
        CreditLedger::open(dir.path().join("vote_credits.json"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_unknown_user_has_zero_balance() {
        let dir = TempDir::new().unwrap();
        let ledger = open_ledger(&dir).await;

        assert_eq!(ledger.get_balance("nobody@x.com").await.unwrap(), 0);
        assert_eq!(ledger.get_balance("nobody@x.com").await.unwrap(), 0);
        assert_eq!(ledger.account_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_add_credits_accumulates() {
        let dir = TempDir::new().unwrap();
        let ledger = open_ledger(&dir).await;

        assert_eq!(ledger.add_credits("bob@x.com", 5).await.unwrap(), 5);
        assert_eq!(ledger.add_credits(" bob@x.com ", 3).await.unwrap(), 8);
        assert_eq!(ledger.get_balance("bob@x.com").await.unwrap(), 8);
        assert_eq!(ledger.account_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_add_credits_rejects_zero_and_blank_user() {
        let dir = TempDir::new().unwrap();
        let ledger = open_ledger(&dir).await;

        assert!(matches!(
            ledger.add_credits("bob@x.com", 0).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            ledger.add_credits("  ", 5).await,
            Err(AppError::Validation(_))
        ));
        assert_eq!(ledger.account_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_spend_until_empty() {
        let dir = TempDir::new().unwrap();
        let ledger = open_ledger(&dir).await;
        ledger.add_credits("bob@x.com", 2).await.unwrap();

        assert_eq!(ledger.spend_one_credit("bob@x.com").await.unwrap(), 1);
        assert_eq!(ledger.spend_one_credit("bob@x.com").await.unwrap(), 0);
        assert_eq!(
            ledger.spend_one_credit("bob@x.com").await,
            Err(AppError::InsufficientCredits {
                user: "bob@x.com".into(),
                balance: 0
            })
        );
        assert_eq!(ledger.get_balance("bob@x.com").await.unwrap(), 0);
    }

    #[test]
    fn test_debit_unknown_user() {
        let mut balances = Balances::new();
        assert!(matches!(
            debit(&mut balances, "ghost"),
            Err(AppError::InsufficientCredits { balance: 0, .. })
        ));
        assert!(balances.is_empty());
    }
}
