use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value; // attachment payload is opaque JSON
use utoipa::ToSchema;

use crate::score::{self, DangerClass};

pub type CommentId = i64;

/// The single persisted state blob: score, settings and the comment log.
/// Wholly rewritten on every mutation, never patched in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub version: String,
    pub last_updated: DateTime<Utc>,
    pub settings: Settings,
    pub evaluations: Evaluations,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub current_score: i64,
    pub points_per_evaluation: i64,
    pub deletion_password: String,
    pub danger_level: DangerLevel,
    // Consumed by the frontend only; carried through load/save untouched.
    #[serde(default = "default_true")]
    pub visual_alert_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DangerLevel {
    pub value: i64,
    pub classification: DangerClass,
    #[serde(default)]
    pub thresholds: Thresholds,
}

/// Informational copy of the tier boundaries kept in the document for
/// frontend display. Classification always uses the engine constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thresholds {
    pub low: i64,
    pub medium: i64,
    pub high: i64,
    pub critical: i64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            low: score::MEDIUM_FROM,
            medium: score::HIGH_FROM,
            high: score::CRITICAL_FROM,
            critical: score::CRITICAL_FROM,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluations {
    pub total_comments: usize,
    pub total_likes: usize,
    pub total_dislikes: usize,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Epoch milliseconds at creation; doubles as the unique key.
    pub id: CommentId,
    pub text: String,
    pub author: String,
    pub anonymous: bool,
    pub evaluation_type: String,
    pub created_at: String,
    pub timestamp: i64,
    #[schema(value_type = Option<Object>)]
    pub attachment: Option<Value>,
}

impl Document {
    pub fn new(deletion_password: String) -> Self {
        Self {
            version: "1.0.0".into(),
            last_updated: Utc::now(),
            settings: Settings {
                current_score: 0,
                points_per_evaluation: 10,
                deletion_password,
                danger_level: DangerLevel {
                    value: 0,
                    classification: DangerClass::Low,
                    thresholds: Thresholds::default(),
                },
                visual_alert_active: true,
            },
            evaluations: Evaluations::default(),
        }
    }

    /// Recompute the cached counts from the comment sequence. Only dislike
    /// comments are ever produced, so `total_likes` stays where it is.
    pub fn refresh_totals(&mut self) {
        self.evaluations.total_comments = self.evaluations.comments.len();
        self.evaluations.total_dislikes = self.evaluations.comments.len();
    }

    /// Set the score and keep the mirrored danger level in sync.
    pub fn set_score(&mut self, new_score: i64) {
        self.settings.current_score = new_score;
        self.settings.danger_level.value = new_score;
        self.settings.danger_level.classification = score::classify(new_score);
    }
}

fn default_true() -> bool {
    true
}
