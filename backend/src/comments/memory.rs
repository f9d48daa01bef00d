//! In-process comment store.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::CommentStore;
use crate::error::CommentResult;
use crate::models::{Comment, CommentId, NewComment};

/// Comments kept in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    comments: RwLock<Vec<Comment>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn insert(&self, comment: NewComment) -> CommentResult<Comment> {
        let stored = Comment {
            id: CommentId::new_v4(),
            name: comment.name,
            email: comment.email,
            message: comment.message,
            created_at: Utc::now(),
        };
        self.comments.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn list(&self) -> CommentResult<Vec<Comment>> {
        let mut comments = self.comments.read().await.clone();
        // Insertion order breaks timestamp ties
        comments.reverse();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(comments)
    }
}
