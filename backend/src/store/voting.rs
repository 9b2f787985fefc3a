//! Spending a vote credit on a story, the one operation that spans both documents.

use std::sync::Arc;

use super::ledger::{balance_of, debit, require_user};
use super::stories::add_votes;
use super::{CreditLedger, StoryStore};
use crate::errors::AppError;
use crate::models::VoteReceipt;

/// Community votes granted for each credit spent.
pub const VOTES_PER_CREDIT: u64 = 5;

/// Coordinates the credit ledger and the story store.
///
/// Locks are always taken ledger first, then stories.
#[derive(Clone)]
pub struct VoteService {
    stories: Arc<StoryStore>,
    ledger: Arc<CreditLedger>,
}

impl VoteService {
    pub fn new(stories: Arc<StoryStore>, ledger: Arc<CreditLedger>) -> Self {
        Self { stories, ledger }
    }

    /// Trade one of `user`'s credits for `VOTES_PER_CREDIT` votes on a story.
    ///
    /// Nothing is persisted unless the balance covers the spend and the story exists.
    /// The story document is written before the ledger; if the ledger write fails the
    /// story document is restored, so a credit is never consumed without its votes.
    pub async fn spend_vote_credit(
        &self,
        user: &str,
        story_id: i64,
    ) -> Result<VoteReceipt, AppError> {
        let user = require_user(user)?;

        let ledger = self.ledger.document.lock().await;
        let stories = self.stories.document.lock().await;

        let mut balances = ledger.load().await?;
        let balance = balance_of(&balances, user);
        if balance < 1 {
            return Err(AppError::InsufficientCredits {
                user: user.to_string(),
                balance,
            });
        }

        let original = stories.load().await?;
        let mut updated = original.clone();
        let new_vote_count = add_votes(&mut updated, story_id, VOTES_PER_CREDIT)?;
        let remaining_credits = debit(&mut balances, user)?;

        stories.save(&updated).await?;
        if let Err(err) = ledger.save(&balances).await {
            tracing::error!(
                "Ledger write failed after voting on story {}: {}; restoring story document",
                story_id,
                err
            );
            if let Err(rollback) = stories.save(&original).await {
                tracing::error!(
                    "Failed to restore story {} after ledger failure, {} votes kept without a spent credit: {}",
                    story_id,
                    VOTES_PER_CREDIT,
                    rollback
                );
            }
            return Err(err);
        }

        tracing::info!(
            "{} spent a vote credit on story {} ({} votes, {} credits left)",
            user,
            story_id,
            new_vote_count,
            remaining_credits
        );
        Ok(VoteReceipt {
            remaining_credits,
            new_vote_count,
        })
    }
}
