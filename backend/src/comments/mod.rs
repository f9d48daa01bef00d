//! Community comments.
//!
//! Comments live in an external store. The backend only needs two calls,
//! insert and list, behind the [`CommentStore`] trait:
//!
//! - [`SupabaseStore`] - the managed Postgres REST endpoint used in production
//! - [`MemoryStore`] - in-process fallback when no remote store is configured

pub mod memory;
pub mod supabase;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{CommentError, CommentResult};
use crate::models::{Comment, NewComment};

pub use memory::MemoryStore;
pub use supabase::SupabaseStore;

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email pattern"));

impl NewComment {
    /// Trim every field and check the form rules.
    ///
    /// All problems are reported at once.
    pub fn validate(self) -> CommentResult<NewComment> {
        let comment = NewComment {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            message: self.message.trim().to_string(),
        };

        let mut problems = Vec::new();
        if comment.name.is_empty() {
            problems.push("name is required".to_string());
        }
        if comment.email.is_empty() {
            problems.push("email is required".to_string());
        } else if !EMAIL.is_match(&comment.email) {
            problems.push("email is not a valid address".to_string());
        }
        if comment.message.is_empty() {
            problems.push("message is required".to_string());
        }

        if problems.is_empty() {
            Ok(comment)
        } else {
            Err(CommentError::Invalid(problems))
        }
    }
}

/// Where comments are persisted.
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Store an already validated comment.
    async fn insert(&self, comment: NewComment) -> CommentResult<Comment>;

    /// All comments, newest first.
    async fn list(&self) -> CommentResult<Vec<Comment>>;

    /// Validate then store.
    async fn submit(&self, comment: NewComment) -> CommentResult<Comment> {
        let comment = comment.validate()?;
        self.insert(comment).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str, message: &str) -> NewComment {
        NewComment {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    #[test]
    fn test_valid_comment_is_trimmed() {
        let c = form(" Ana ", "ana@unal.edu.co ", " Great campaign ").validate().unwrap();

        assert_eq!(c.name, "Ana");
        assert_eq!(c.email, "ana@unal.edu.co");
        assert_eq!(c.message, "Great campaign");
    }

    #[test]
    fn test_missing_fields_all_reported() {
        let err = form("", " ", "").validate().unwrap_err();
        match err {
            CommentError::Invalid(problems) => {
                assert_eq!(problems.len(), 3);
                assert!(problems.contains(&"email is required".to_string()));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_bad_email() {
        let err = form("Ana", "not-an-email", "hi").validate().unwrap_err();
        assert!(err.to_string().contains("email is not a valid address"));
    }

    #[tokio::test]
    async fn test_submit_rejects_before_insert() {
        let store = MemoryStore::new();
        let result = store.submit(form("", "a@b.co", "hi")).await;

        assert!(matches!(result, Err(CommentError::Invalid(_))));
        assert!(store.list().await.unwrap().is_empty());
    }
}
