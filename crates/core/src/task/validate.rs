//! Payload validation
//!
//! Incoming payloads keep every field optional at the serde level so that
//! missing or malformed values surface as field violations rather than
//! transport-level rejections. Validation collects all violations before
//! failing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::model::TaskStatus;
use crate::error::Violation;
use crate::{Error, Result};

const TITLE_MAX_CHARS: usize = 255;

/// Candidate fields for creating a task
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

/// Partial update payload; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

/// Validated create fields
#[derive(Debug)]
pub(crate) struct CreateFields {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub due_date: DateTime<Utc>,
}

/// Validated patch fields
#[derive(Debug)]
pub(crate) struct PatchFields {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<DateTime<Utc>>,
}

fn check_title(title: &str, violations: &mut Vec<Violation>) {
    if title.trim().is_empty() {
        violations.push(Violation::new("title", "Title is required"));
    } else if title.chars().count() > TITLE_MAX_CHARS {
        violations.push(Violation::new("title", "Title too long"));
    }
}

fn parse_status(raw: &str, violations: &mut Vec<Violation>) -> Option<TaskStatus> {
    let status = TaskStatus::parse(raw);
    if status.is_none() {
        violations.push(Violation::new("status", format!("Invalid status: {raw}")));
    }
    status
}

fn parse_due_date(raw: &str, violations: &mut Vec<Violation>) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(_) => {
            violations.push(Violation::new("dueDate", "Invalid date format"));
            None
        }
    }
}

impl NewTask {
    pub(crate) fn validate(&self) -> Result<CreateFields> {
        let mut violations = Vec::new();

        match &self.title {
            Some(title) => check_title(title, &mut violations),
            None => violations.push(Violation::new("title", "Title is required")),
        }

        let status = match &self.status {
            Some(raw) => parse_status(raw, &mut violations).unwrap_or_default(),
            None => TaskStatus::default(),
        };

        let due_date = match &self.due_date {
            Some(raw) => parse_due_date(raw, &mut violations),
            None => {
                violations.push(Violation::new("dueDate", "Due date is required"));
                None
            }
        };

        if !violations.is_empty() {
            return Err(Error::Validation(violations));
        }

        // No violations left, so title and due_date are present and valid
        Ok(CreateFields {
            title: self.title.clone().unwrap_or_default(),
            description: self.description.clone(),
            status,
            due_date: due_date.unwrap_or_default(),
        })
    }
}

impl TaskPatch {
    pub(crate) fn validate(&self) -> Result<PatchFields> {
        let mut violations = Vec::new();

        if let Some(title) = &self.title {
            check_title(title, &mut violations);
        }

        let status = self
            .status
            .as_deref()
            .and_then(|raw| parse_status(raw, &mut violations));

        let due_date = self
            .due_date
            .as_deref()
            .and_then(|raw| parse_due_date(raw, &mut violations));

        if !violations.is_empty() {
            return Err(Error::Validation(violations));
        }

        Ok(PatchFields {
            title: self.title.clone(),
            description: self.description.clone(),
            status,
            due_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_new() -> NewTask {
        NewTask {
            title: Some("Write report".to_string()),
            due_date: Some("2030-01-01T00:00:00Z".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_create_defaults_to_pending() {
        let fields = valid_new().validate().unwrap();
        assert_eq!(fields.title, "Write report");
        assert_eq!(fields.status, TaskStatus::Pending);
    }

    #[test]
    fn test_empty_title_rejected() {
        let mut payload = valid_new();
        payload.title = Some("".to_string());
        let err = payload.validate().unwrap_err();
        match err {
            Error::Validation(violations) => {
                assert_eq!(violations.len(), 1);
                assert_eq!(violations[0].field, "title");
            }
            e => panic!("Expected Validation error, got: {:?}", e),
        }
    }

    #[test]
    fn test_whitespace_title_rejected() {
        let mut payload = valid_new();
        payload.title = Some("   ".to_string());
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_overlong_title_rejected() {
        let mut payload = valid_new();
        payload.title = Some("x".repeat(256));
        let err = payload.validate().unwrap_err();
        match err {
            Error::Validation(violations) => {
                assert_eq!(violations[0].field, "title");
                assert_eq!(violations[0].message, "Title too long");
            }
            e => panic!("Expected Validation error, got: {:?}", e),
        }
    }

    #[test]
    fn test_title_at_limit_accepted() {
        let mut payload = valid_new();
        payload.title = Some("x".repeat(255));
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_missing_fields_collected_together() {
        let payload = NewTask::default();
        let err = payload.validate().unwrap_err();
        match err {
            Error::Validation(violations) => {
                let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
                assert!(fields.contains(&"title"));
                assert!(fields.contains(&"dueDate"));
            }
            e => panic!("Expected Validation error, got: {:?}", e),
        }
    }

    #[test]
    fn test_bad_date_and_empty_title_both_reported() {
        let payload = NewTask {
            title: Some("".to_string()),
            due_date: Some("invalid-date".to_string()),
            ..Default::default()
        };
        let err = payload.validate().unwrap_err();
        match err {
            Error::Validation(violations) => {
                assert_eq!(violations.len(), 2);
                let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
                assert!(fields.contains(&"title"));
                assert!(fields.contains(&"dueDate"));
            }
            e => panic!("Expected Validation error, got: {:?}", e),
        }
    }

    #[test]
    fn test_invalid_status_rejected_in_payload() {
        let mut payload = valid_new();
        payload.status = Some("BOGUS".to_string());
        let err = payload.validate().unwrap_err();
        match err {
            Error::Validation(violations) => {
                assert_eq!(violations[0].field, "status");
            }
            e => panic!("Expected Validation error, got: {:?}", e),
        }
    }

    #[test]
    fn test_empty_patch_is_valid() {
        let fields = TaskPatch::default().validate().unwrap();
        assert!(fields.title.is_none());
        assert!(fields.status.is_none());
        assert!(fields.due_date.is_none());
    }

    #[test]
    fn test_patch_validates_supplied_fields_only() {
        let patch = TaskPatch {
            status: Some("COMPLETED".to_string()),
            ..Default::default()
        };
        let fields = patch.validate().unwrap();
        assert_eq!(fields.status, Some(TaskStatus::Completed));

        let patch = TaskPatch {
            due_date: Some("not-a-date".to_string()),
            ..Default::default()
        };
        let err = patch.validate().unwrap_err();
        match err {
            Error::Validation(violations) => assert_eq!(violations[0].field, "dueDate"),
            e => panic!("Expected Validation error, got: {:?}", e),
        }
    }

    #[test]
    fn test_due_date_offset_normalized_to_utc() {
        let mut payload = valid_new();
        payload.due_date = Some("2030-01-01T02:00:00+02:00".to_string());
        let fields = payload.validate().unwrap();
        assert_eq!(fields.due_date.to_rfc3339(), "2030-01-01T00:00:00+00:00");
    }
}
