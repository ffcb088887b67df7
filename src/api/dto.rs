//! Request and response bodies of the HTTP API

use crate::core::Status;
use crate::error::{Result, TicketDeskError};
use crate::service::{DEFAULT_LIMIT, DateFilter, ListQuery};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/tickets`
///
/// Fields are optional here so that a missing field is reported with the
/// same message as an empty one.
#[derive(Debug, Default, Deserialize)]
pub struct CreateTicketRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl CreateTicketRequest {
    /// Returns `(title, content)` when both are present and non-empty
    pub fn into_fields(self) -> Result<(String, String)> {
        match (self.title, self.content) {
            (Some(title), Some(content)) if !title.is_empty() && !content.is_empty() => {
                Ok((title, content))
            },
            _ => Err(TicketDeskError::validation("title and content are required")),
        }
    }
}

/// Body of the complete/cancel/cancel-all endpoints
#[derive(Debug, Default, Deserialize)]
pub struct CommentRequest {
    pub comment: Option<String>,
}

impl CommentRequest {
    /// Returns the comment when present and non-empty
    pub fn into_comment(self) -> Result<String> {
        self.comment
            .filter(|comment| !comment.is_empty())
            .ok_or_else(|| TicketDeskError::validation("comment is required"))
    }
}

/// Query string of `GET /api/tickets`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<String>,
}

impl ListParams {
    /// Validates the parameters and builds the service query
    pub fn into_query(self) -> Result<ListQuery> {
        let dates = match (self.date, self.start_date, self.end_date) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => {
                return Err(TicketDeskError::validation(
                    "date cannot be combined with startDate or endDate",
                ));
            },
            (Some(day), None, None) => DateFilter::Day(day),
            (None, None, None) => DateFilter::Any,
            (None, start, end) => DateFilter::Range { start, end },
        };

        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        if limit == 0 {
            return Err(TicketDeskError::validation("limit must be a positive integer"));
        }

        let status = self.status.as_deref().map(str::parse::<Status>).transpose()?;

        Ok(ListQuery {
            limit,
            offset: self.offset.unwrap_or(0),
            dates,
            status,
        })
    }
}

/// Outcome marker of the response envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Response envelope shared by every endpoint
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            data: Some(data),
            message: None,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ApiResponse<()> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Payload of a successful `PUT /api/tickets/cancel-all`
#[derive(Debug, Serialize)]
pub struct CancelAllResponse {
    pub cancelled: u64,
}

/// Payload of `GET /health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub service: &'static str,
    pub version: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
    }

    #[test]
    fn test_list_params_defaults() {
        let query = ListParams::default().into_query().unwrap();
        assert_eq!(query, ListQuery::default());
    }

    #[test]
    fn test_date_conflicts_with_range() {
        for params in [
            ListParams {
                date: Some(date(1)),
                start_date: Some(date(2)),
                ..ListParams::default()
            },
            ListParams {
                date: Some(date(1)),
                end_date: Some(date(2)),
                ..ListParams::default()
            },
        ] {
            let err = params.into_query().unwrap_err();
            assert!(matches!(err, TicketDeskError::Validation(_)));
        }
    }

    #[test]
    fn test_range_and_status() {
        let query = ListParams {
            limit: Some(5),
            offset: Some(20),
            end_date: Some(date(9)),
            status: Some("in_progress".to_string()),
            ..ListParams::default()
        }
        .into_query()
        .unwrap();

        assert_eq!(query.limit, 5);
        assert_eq!(query.offset, 20);
        assert_eq!(
            query.dates,
            DateFilter::Range {
                start: None,
                end: Some(date(9))
            }
        );
        assert_eq!(query.status, Some(Status::InProgress));
    }

    #[test]
    fn test_zero_limit_is_rejected() {
        let params = ListParams {
            limit: Some(0),
            ..ListParams::default()
        };
        assert!(params.into_query().is_err());
    }

    #[test]
    fn test_create_request_requires_both_fields() {
        let missing = CreateTicketRequest {
            title: Some("t".to_string()),
            content: None,
        };
        assert!(missing.into_fields().is_err());

        let empty = CreateTicketRequest {
            title: Some(String::new()),
            content: Some("c".to_string()),
        };
        assert!(empty.into_fields().is_err());
    }

    #[test]
    fn test_envelope_shapes() {
        let ok = serde_json::to_value(ApiResponse::success(1)).unwrap();
        assert_eq!(ok, serde_json::json!({"status": "success", "data": 1}));

        let err = serde_json::to_value(ApiResponse::error("nope")).unwrap();
        assert_eq!(err, serde_json::json!({"status": "error", "message": "nope"}));
    }
}
