//! Task domain model.
//!
//! A [`Task`] is the single managed record. New tasks enter the system as a
//! validated [`NewTask`]; edits arrive as a validated [`TaskChanges`] patch.
//! Both constructors apply the task schema, so a store only ever receives
//! writes that satisfy it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::validation::ValidationError;

// =============================================================================
// Value Objects - Newtypes
// =============================================================================

/// Unique identifier for a task.
///
/// This is a newtype wrapper around UUID to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a `TaskId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Generates a new `TaskId` with a time-ordered UUID (v7).
    ///
    /// **Note**: This is an impure function (side effect: time + random).
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    /// Parses a `TaskId` from its textual form.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTaskId`] if `value` is not a well-formed UUID.
    pub fn parse(value: &str) -> Result<Self, InvalidTaskId> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|source| InvalidTaskId {
                value: value.to_string(),
                source,
            })
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// A path identifier that could not be cast to a [`TaskId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cast to TaskId failed for value \"{value}\" at path \"id\"")]
pub struct InvalidTaskId {
    /// The raw identifier as received.
    pub value: String,
    #[source]
    source: uuid::Error,
}

/// A timestamp wrapper for `DateTime<Utc>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a `Timestamp` from a `DateTime<Utc>`.
    #[must_use]
    pub const fn from_datetime(datetime: DateTime<Utc>) -> Self {
        Self(datetime)
    }

    /// Returns the inner `DateTime<Utc>`.
    #[must_use]
    pub const fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns the current time as a `Timestamp`.
    ///
    /// **Note**: This is an impure function (side effect: system clock).
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }
}

// =============================================================================
// Task
// =============================================================================

/// A persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Store-assigned identifier.
    pub id: TaskId,
    /// Title, never empty.
    pub title: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Completion flag.
    pub completed: bool,
    /// Creation timestamp, set once by the store.
    pub created_at: Timestamp,
    /// Last modification timestamp, refreshed by the store on update.
    pub updated_at: Timestamp,
}

impl Task {
    /// Materializes a new task from validated input and store-assigned fields.
    #[must_use]
    pub fn from_new(id: TaskId, new_task: NewTask, created_at: Timestamp) -> Self {
        Self {
            id,
            title: new_task.title,
            description: new_task.description,
            completed: new_task.completed,
            created_at,
            updated_at: created_at,
        }
    }

    /// Returns a copy of this task with `changes` merged in.
    ///
    /// Fields absent from `changes` keep their current values; `updated_at`
    /// is always refreshed.
    #[must_use]
    pub fn apply(&self, changes: &TaskChanges, updated_at: Timestamp) -> Self {
        Self {
            id: self.id,
            title: changes.title.clone().unwrap_or_else(|| self.title.clone()),
            description: changes
                .description
                .clone()
                .or_else(|| self.description.clone()),
            completed: changes.completed.unwrap_or(self.completed),
            created_at: self.created_at,
            updated_at,
        }
    }
}

// =============================================================================
// Write Inputs
// =============================================================================

/// Validated input for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    title: String,
    description: Option<String>,
    completed: bool,
}

impl NewTask {
    /// Validates raw creation fields against the task schema.
    ///
    /// `completed` defaults to `false` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `title` is missing or blank.
    pub fn new(
        title: Option<String>,
        description: Option<String>,
        completed: Option<bool>,
    ) -> Result<Self, ValidationError> {
        let title = title.as_deref().map(str::trim).unwrap_or_default();
        if title.is_empty() {
            return Err(title_required());
        }

        Ok(Self {
            title: title.to_string(),
            description,
            completed: completed.unwrap_or(false),
        })
    }

    /// Returns the validated title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the completion flag.
    #[must_use]
    pub const fn completed(&self) -> bool {
        self.completed
    }
}

/// Validated partial update for a task.
///
/// `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    completed: Option<bool>,
}

impl TaskChanges {
    /// Validates raw update fields against the task schema.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `title` is supplied but blank.
    pub fn new(
        title: Option<String>,
        description: Option<String>,
        completed: Option<bool>,
    ) -> Result<Self, ValidationError> {
        let title = match title {
            Some(title) if title.trim().is_empty() => return Err(title_required()),
            Some(title) => Some(title.trim().to_string()),
            None => None,
        };

        Ok(Self {
            title,
            description,
            completed,
        })
    }
}

fn title_required() -> ValidationError {
    ValidationError::single("title", "Title is required")
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    // -------------------------------------------------------------------------
    // TaskId Tests
    // -------------------------------------------------------------------------

    #[rstest]
    fn test_task_id_generate_unique() {
        assert_ne!(TaskId::generate(), TaskId::generate());
    }

    #[rstest]
    fn test_task_id_parse_round_trips_display() {
        let task_id = TaskId::generate();
        let parsed = TaskId::parse(&task_id.to_string()).unwrap();
        assert_eq!(parsed, task_id);
    }

    #[rstest]
    #[case("not-a-uuid")]
    #[case("")]
    #[case("123")]
    fn test_task_id_parse_malformed(#[case] input: &str) {
        let error = TaskId::parse(input).unwrap_err();
        assert_eq!(error.value, input);
        assert_eq!(
            error.to_string(),
            format!("Cast to TaskId failed for value \"{input}\" at path \"id\"")
        );
    }

    // -------------------------------------------------------------------------
    // NewTask Tests
    // -------------------------------------------------------------------------

    #[rstest]
    fn test_new_task_defaults_completed_to_false() {
        let new_task = NewTask::new(Some("Buy milk".to_string()), None, None).unwrap();
        assert_eq!(new_task.title(), "Buy milk");
        assert_eq!(new_task.description(), None);
        assert!(!new_task.completed());
    }

    #[rstest]
    fn test_new_task_trims_title() {
        let new_task = NewTask::new(Some("  Buy milk  ".to_string()), None, Some(true)).unwrap();
        assert_eq!(new_task.title(), "Buy milk");
        assert!(new_task.completed());
    }

    #[rstest]
    #[case(None)]
    #[case(Some(String::new()))]
    #[case(Some("   ".to_string()))]
    fn test_new_task_requires_title(#[case] title: Option<String>) {
        let error = NewTask::new(title, Some("desc".to_string()), None).unwrap_err();
        assert_eq!(error, ValidationError::single("title", "Title is required"));
    }

    // -------------------------------------------------------------------------
    // TaskChanges Tests
    // -------------------------------------------------------------------------

    #[rstest]
    fn test_task_changes_empty_serializes_as_empty_patch() {
        let changes = TaskChanges::new(None, None, None).unwrap();
        let value = serde_json::to_value(&changes).unwrap();
        assert_eq!(value, serde_json::json!({}));
    }

    #[rstest]
    fn test_task_changes_trims_title() {
        let changes = TaskChanges::new(Some("  New title ".to_string()), None, None).unwrap();
        let value = serde_json::to_value(&changes).unwrap();
        assert_eq!(value, serde_json::json!({ "title": "New title" }));
    }

    #[rstest]
    fn test_task_changes_rejects_blank_title() {
        assert!(TaskChanges::new(Some("  ".to_string()), None, None).is_err());
    }

    #[rstest]
    fn test_task_changes_serializes_only_supplied_fields() {
        let changes = TaskChanges::new(None, None, Some(true)).unwrap();
        let value = serde_json::to_value(&changes).unwrap();
        assert_eq!(value, serde_json::json!({ "completed": true }));
    }

    // -------------------------------------------------------------------------
    // Task Tests
    // -------------------------------------------------------------------------

    fn sample_task() -> Task {
        let new_task = NewTask::new(
            Some("Write report".to_string()),
            Some("Quarterly numbers".to_string()),
            None,
        )
        .unwrap();
        Task::from_new(TaskId::generate(), new_task, Timestamp::now())
    }

    #[rstest]
    fn test_task_from_new_sets_both_timestamps() {
        let task = sample_task();
        assert_eq!(task.created_at, task.updated_at);
        assert!(!task.completed);
    }

    #[rstest]
    fn test_task_apply_keeps_omitted_fields() {
        let task = sample_task();
        let changes = TaskChanges::new(None, None, Some(true)).unwrap();
        let later = Timestamp::from_datetime(
            *task.created_at.as_datetime() + chrono::Duration::seconds(5),
        );

        let updated = task.apply(&changes, later);

        assert_eq!(updated.id, task.id);
        assert_eq!(updated.title, "Write report");
        assert_eq!(updated.description, Some("Quarterly numbers".to_string()));
        assert!(updated.completed);
        assert_eq!(updated.created_at, task.created_at);
        assert_eq!(updated.updated_at, later);
    }

    #[rstest]
    fn test_task_apply_replaces_supplied_fields() {
        let task = sample_task();
        let changes = TaskChanges::new(
            Some("Rewrite report".to_string()),
            Some("Annual numbers".to_string()),
            Some(false),
        )
        .unwrap();

        let updated = task.apply(&changes, Timestamp::now());

        assert_eq!(updated.title, "Rewrite report");
        assert_eq!(updated.description, Some("Annual numbers".to_string()));
        assert!(!updated.completed);
    }
}
