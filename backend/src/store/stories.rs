//! Story store backed by a single JSON array, most recent story first.

use std::path::PathBuf;

use chrono::Utc;

use super::document::JsonDocument;
use crate::errors::AppError;
use crate::models::{Story, SubmitStoryRequest};

/// Ordered collection of submitted stories.
pub struct StoryStore {
    pub(super) document: JsonDocument<Vec<Story>>,
}

impl StoryStore {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let document: JsonDocument<Vec<Story>> = JsonDocument::open(path).await?;
        tracing::debug!("Opened story document at {}", document.path().display());
        Ok(Self { document })
    }

    /// List all stories, most recently submitted first.
    pub async fn list_stories(&self) -> Result<Vec<Story>, AppError> {
        self.document.read().await
    }

    /// Get a story by ID.
    pub async fn get_story(&self, id: i64) -> Result<Story, AppError> {
        self.document
            .read()
            .await?
            .into_iter()
            .find(|story| story.id == id)
            .ok_or_else(|| story_not_found(id))
    }

    /// Validate and insert a new story at the head of the collection.
    pub async fn submit_story(&self, request: &SubmitStoryRequest) -> Result<Story, AppError> {
        let missing = request.missing_fields();
        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        let guard = self.document.lock().await;
        let mut stories = guard.load().await?;

        let now = Utc::now();
        let story = Story {
            id: next_story_id(&stories, now.timestamp_millis()),
            title: request.title.trim().to_string(),
            author_name: request.author_name.trim().to_string(),
            author_email: request.author_email.trim().to_string(),
            body: request.body.clone(),
            is_priority: request.priority.unwrap_or(false),
            community_votes: 0,
            created_at: Some(now.to_rfc3339()),
        };

        stories.insert(0, story.clone());
        guard.save(&stories).await?;

        tracing::info!(
            "Story {} submitted by {} (priority: {})",
            story.id,
            story.author_email,
            story.is_priority
        );
        Ok(story)
    }

    /// Add `amount` community votes to a story and return its new count.
    pub async fn increment_votes(&self, story_id: i64, amount: u64) -> Result<u64, AppError> {
        let guard = self.document.lock().await;
        let mut stories = guard.load().await?;
        let votes = add_votes(&mut stories, story_id, amount)?;
        guard.save(&stories).await?;
        Ok(votes)
    }
}

/// Time-based id, bumped past every existing id so it stays unique and ordered.
fn next_story_id(stories: &[Story], now_millis: i64) -> i64 {
    let highest = stories.iter().map(|story| story.id).max().unwrap_or(0);
    now_millis.max(highest.saturating_add(1))
}

pub(super) fn add_votes(stories: &mut [Story], story_id: i64, amount: u64) -> Result<u64, AppError> {
    let story = stories
        .iter_mut()
        .find(|story| story.id == story_id)
        .ok_or_else(|| story_not_found(story_id))?;

    story.community_votes = story
        .community_votes
        .checked_add(amount)
        .ok_or_else(|| AppError::Internal(format!("Vote count overflow on story {}", story_id)))?;
    Ok(story.community_votes)
}

fn story_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Story {} not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn submission(title: &str) -> SubmitStoryRequest {
        SubmitStoryRequest {
            title: title.into(),
            author_name: "Bob".into(),
            author_email: "b@x.com".into(),
            body: "text".into(),
            priority: None,
        }
    }

    async fn open_store(dir: &TempDir) -> StoryStore {
        StoryStore::open(dir.path().join("stories.json"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_submit_inserts_at_head() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        let first = store.submit_story(&submission("First")).await.unwrap();
        let second = store.submit_story(&submission("Second")).await.unwrap();

        let stories = store.list_stories().await.unwrap();
        assert_eq!(stories, vec![second.clone(), first.clone()]);
        assert!(second.id > first.id);
        assert_eq!(second.community_votes, 0);
        assert!(!second.is_priority);
        assert!(second.created_at.is_some());
    }

    #[tokio::test]
    async fn test_rapid_submissions_get_unique_ids() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        for i in 0..20 {
            store
                .submit_story(&submission(&format!("Story {}", i)))
                .await
                .unwrap();
        }

        let ids: Vec<i64> = store
            .list_stories()
            .await
            .unwrap()
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids.len(), 20);
        assert!(ids.windows(2).all(|pair| pair[0] > pair[1]));
    }

    #[tokio::test]
    async fn test_priority_flag_is_kept() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        let mut request = submission("Boosted");
        request.priority = Some(true);
        let story = store.submit_story(&request).await.unwrap();

        assert!(story.is_priority);
        assert!(store.get_story(story.id).await.unwrap().is_priority);
    }

    #[tokio::test]
    async fn test_submit_requires_all_fields() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        let mut request = submission("No author");
        request.author_email = String::new();

        match store.submit_story(&request).await {
            Err(AppError::Validation(msg)) => assert!(msg.contains("authorEmail")),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(store.list_stories().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submit_does_not_overwrite_corrupt_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stories.json");
        std::fs::write(&path, "[{\"id\": ").unwrap();
        let store = StoryStore::open(&path).await.unwrap();

        assert!(matches!(
            store.submit_story(&submission("Lost")).await,
            Err(AppError::Storage(_))
        ));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[{\"id\": ");
    }

    #[tokio::test]
    async fn test_reads_and_extends_first_generation_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stories.json");
        std::fs::write(
            &path,
            r#"[{"name":"Bob","email":"b@x.com","title":"A","story":"text","id":1700000000000}]"#,
        )
        .unwrap();
        let store = StoryStore::open(&path).await.unwrap();

        let stories = store.list_stories().await.unwrap();
        assert_eq!(stories.len(), 1);
        assert_eq!(stories[0].author_name, "Bob");
        assert_eq!(stories[0].body, "text");

        assert_eq!(store.increment_votes(1_700_000_000_000, 5).await.unwrap(), 5);
        let fresh = store.submit_story(&submission("Newer")).await.unwrap();
        let stories = store.list_stories().await.unwrap();
        assert_eq!(stories[0].id, fresh.id);
        assert_eq!(stories[1].author_email, "b@x.com");
        assert_eq!(stories[1].community_votes, 5);
    }

    #[tokio::test]
    async fn test_increment_votes() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;
        let story = store.submit_story(&submission("Votes")).await.unwrap();

        assert_eq!(store.increment_votes(story.id, 5).await.unwrap(), 5);
        assert_eq!(store.increment_votes(story.id, 5).await.unwrap(), 10);
        assert_eq!(store.get_story(story.id).await.unwrap().community_votes, 10);
    }

    #[tokio::test]
    async fn test_increment_votes_unknown_story() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        assert!(matches!(
            store.increment_votes(42, 5).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            store.get_story(42).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_next_story_id_moves_past_existing_ids() {
        let existing = Story {
            id: 2_000,
            title: "T".into(),
            author_name: "A".into(),
            author_email: "a@x.com".into(),
            body: "B".into(),
            is_priority: false,
            community_votes: 0,
            created_at: None,
        };

        assert_eq!(next_story_id(&[], 1_000), 1_000);
        assert_eq!(next_story_id(&[existing.clone()], 1_000), 2_001);
        assert_eq!(next_story_id(&[existing], 5_000), 5_000);
    }
}
