use chrono::Utc;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::models::{Comment, CommentId};
use crate::score;
use crate::store::{DocumentStore, StoreError};

pub const MAX_TEXT_CHARS: usize = 1000;
pub const MAX_ATTACHMENT_BYTES: usize = 10 * 1024 * 1024;
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";
const EVALUATION_DISLIKE: &str = "dislike";

#[derive(Debug, Error)]
pub enum CommentError {
    #[error("empty comment")]
    Empty,
    #[error("attachment exceeds 10 MiB")]
    AttachmentTooLarge,
    #[error("wrong deletion password")]
    WrongPassword,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Comment submission as received from the transport layer.
#[derive(Debug, Clone, Default)]
pub struct NewComment {
    pub text: Option<String>,
    pub author: Option<String>,
    pub anonymous: bool,
    pub attachment: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct CreatedComment {
    pub comment: Comment,
    pub score: i64,
}

/// Escape the HTML-significant characters and cap the length. `&` is
/// deliberately left alone, and truncation counts escaped characters.
pub fn sanitize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            other => out.push(other),
        }
    }
    if out.chars().count() > MAX_TEXT_CHARS {
        out.chars().take(MAX_TEXT_CHARS).collect()
    } else {
        out
    }
}

// The attachment is opaque except for its `dados` payload, whose encoded
// size gates acceptance.
fn attachment_data_len(attachment: &Value) -> usize {
    attachment
        .get("dados")
        .and_then(Value::as_str)
        .map(str::len)
        .unwrap_or(0)
}

/// Validate, sanitize and record a new comment, bumping the danger score by
/// the configured per-evaluation points.
pub async fn create_comment(
    store: &dyn DocumentStore,
    new: NewComment,
) -> Result<CreatedComment, CommentError> {
    let has_text = new.text.as_deref().is_some_and(|t| !t.is_empty());
    if !has_text && new.attachment.is_none() {
        return Err(CommentError::Empty);
    }
    if let Some(attachment) = &new.attachment {
        if attachment_data_len(attachment) > MAX_ATTACHMENT_BYTES {
            return Err(CommentError::AttachmentTooLarge);
        }
    }

    let mut doc = store.load().await;

    let now = Utc::now();
    let sanitized_author = sanitize(new.author.as_deref().unwrap_or(""));
    let author = if new.anonymous || sanitized_author.is_empty() {
        ANONYMOUS_AUTHOR.to_string()
    } else {
        sanitized_author
    };
    let comment = Comment {
        id: now.timestamp_millis(),
        text: sanitize(new.text.as_deref().unwrap_or("")),
        author,
        anonymous: new.anonymous,
        evaluation_type: EVALUATION_DISLIKE.to_string(),
        created_at: now.format("%d/%m/%Y %H:%M:%S").to_string(),
        timestamp: now.timestamp_millis(),
        attachment: new.attachment,
    };

    // Newest first.
    doc.evaluations.comments.insert(0, comment.clone());
    doc.refresh_totals();
    let new_score = score::apply_delta(
        doc.settings.current_score,
        doc.settings.points_per_evaluation,
    );
    doc.set_score(new_score);

    store.save(&mut doc).await?;
    info!(id = comment.id, score = new_score, "comment recorded");
    Ok(CreatedComment {
        comment,
        score: new_score,
    })
}

/// Remove the comment with the given id after verifying the shared deletion
/// password. Removing an absent id is not an error; the score only moves
/// when a comment actually existed.
pub async fn delete_comment(
    store: &dyn DocumentStore,
    id: CommentId,
    password: &str,
) -> Result<i64, CommentError> {
    let mut doc = store.load().await;

    if password != doc.settings.deletion_password {
        return Err(CommentError::WrongPassword);
    }

    let existed = doc.evaluations.comments.iter().any(|c| c.id == id);
    doc.evaluations.comments.retain(|c| c.id != id);

    if existed {
        doc.refresh_totals();
        let new_score = score::apply_delta(
            doc.settings.current_score,
            -doc.settings.points_per_evaluation,
        );
        doc.set_score(new_score);
    }

    store.save(&mut doc).await?;
    info!(id, existed, score = doc.settings.current_score, "comment deletion handled");
    Ok(doc.settings.current_score)
}
