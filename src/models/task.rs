use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// A single to-do item as stored in the `tasks` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i64,
    pub text: String,
    /// Always a UTC instant; `null` in JSON when the task has no due date.
    pub due_date: Option<DateTime<Utc>>,
    pub completed: bool,
}

/// Body of `POST /api/tasks`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, rename = "dueDate")]
    pub due_date: Option<String>,
}

/// Body of `PATCH /api/tasks`.
///
/// `text` and `due_date` keep "sent as null" apart from "not sent": either one
/// being present selects the field update, even when its value is null.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub text: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub due_date: Option<Option<String>>,
    #[serde(default)]
    pub completed: Option<Value>,
}

impl UpdateTaskRequest {
    /// The target id. Any JSON number without a fractional part counts, so
    /// `1.0` addresses task 1; strings and `1.5` do not.
    pub fn task_id(&self) -> Option<i64> {
        let Value::Number(number) = self.id.as_ref()? else {
            return None;
        };
        number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|id| id.fract() == 0.0 && id.abs() <= i64::MAX as f64)
                .map(|id| id as i64)
        })
    }
}

/// Query string of `GET /api/tasks`.
#[derive(Debug, Default, Deserialize)]
pub struct ListTasksQuery {
    pub sort: Option<String>,
}

/// Query string of `DELETE /api/tasks`.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteTaskQuery {
    pub id: Option<String>,
}

/// Response body of the bulk delete.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteCompletedResponse {
    pub message: String,
    pub count: usize,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Orders tasks by due date, earliest first. Tasks without a due date go last;
/// ties keep their existing relative order.
pub fn sort_by_due_date(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| match (a.due_date, b.due_date) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Parses a due date sent by a client into a UTC instant.
///
/// Accepts RFC 3339 timestamps, `YYYY-MM-DDTHH:MM[:SS]` (taken as UTC) and
/// bare dates (UTC midnight). Returns `None` for anything else.
pub fn parse_due_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn task(id: i64, due_date: Option<DateTime<Utc>>) -> Task {
        Task {
            id,
            text: format!("task {}", id),
            due_date,
            completed: false,
        }
    }

    #[test]
    fn undated_tasks_sort_last() {
        let early = Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let mut tasks = vec![task(1, None), task(2, Some(late)), task(3, None), task(4, Some(early))];

        sort_by_due_date(&mut tasks);

        let ids: Vec<i64> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![4, 2, 1, 3]);
    }

    #[test]
    fn parses_supported_due_date_forms() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 14, 30, 0).unwrap();
        assert_eq!(parse_due_date("2024-05-01T14:30:00Z"), Some(expected));
        assert_eq!(parse_due_date("2024-05-01T16:30:00+02:00"), Some(expected));
        assert_eq!(parse_due_date("2024-05-01T14:30"), Some(expected));
        assert_eq!(
            parse_due_date("2024-05-01"),
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_due_date("next tuesday"), None);
        assert_eq!(parse_due_date(""), None);
    }

    #[test]
    fn update_request_tells_null_from_missing() {
        let req: UpdateTaskRequest =
            serde_json::from_str(r#"{"id": 3, "text": "walk dog", "due_date": null}"#).unwrap();
        assert_eq!(req.task_id(), Some(3));
        assert_eq!(req.text, Some(Some("walk dog".to_string())));
        assert_eq!(req.due_date, Some(None));

        let req: UpdateTaskRequest = serde_json::from_str(r#"{"id": 3, "completed": true}"#).unwrap();
        assert_eq!(req.text, None);
        assert_eq!(req.due_date, None);
        assert_eq!(req.completed, Some(Value::Bool(true)));
    }

    #[test]
    fn update_request_accepts_whole_number_ids_only() {
        let parse = |body: &str| serde_json::from_str::<UpdateTaskRequest>(body).unwrap().task_id();
        assert_eq!(parse(r#"{"id": 1.0, "completed": true}"#), Some(1));
        assert_eq!(parse(r#"{"id": 1.5, "completed": true}"#), None);
        assert_eq!(parse(r#"{"id": "1", "completed": true}"#), None);
        assert_eq!(parse(r#"{"id": null, "completed": true}"#), None);
        assert_eq!(parse(r#"{"completed": true}"#), None);
    }

    #[test]
    fn task_serializes_with_null_due_date() {
        let json = serde_json::to_value(task(1, None)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 1, "text": "task 1", "due_date": null, "completed": false})
        );
    }
}
