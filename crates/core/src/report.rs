use reqwest::StatusCode;
use serde::Serialize;

use crate::client::ApiResponse;

/// Result of a single endpoint assertion: one request, one expected status.
/// The response body is retained only on mismatch, for diagnosis.
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub name: String,
    pub expected: u16,
    pub actual: u16,
    pub body: Option<String>,
}

impl CheckOutcome {
    pub fn from_response(name: &str, expected: StatusCode, response: &ApiResponse) -> Self {
        let passed = response.status == expected;
        Self {
            name: name.to_string(),
            expected: expected.as_u16(),
            actual: response.status.as_u16(),
            body: (!passed).then(|| response.body.clone()),
        }
    }

    /// A check whose request never produced a response. `actual` is 0,
    /// which no HTTP status can equal, so the check reads as failed.
    pub fn transport_failure(name: &str, expected: StatusCode, error: &str) -> Self {
        Self {
            name: name.to_string(),
            expected: expected.as_u16(),
            actual: 0,
            body: Some(error.to_string()),
        }
    }

    pub fn passed(&self) -> bool {
        self.expected == self.actual
    }
}

/// Aggregated outcomes of one smoke run, in execution order.
#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    pub checks: Vec<CheckOutcome>,
}

impl RunReport {
    pub fn record(&mut self, outcome: CheckOutcome) {
        self.checks.push(outcome);
    }

    pub fn total(&self) -> usize {
        self.checks.len()
    }

    pub fn failed_count(&self) -> usize {
        self.checks.iter().filter(|c| !c.passed()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.checks.iter().filter(|c| !c.passed())
    }

    pub fn all_passed(&self) -> bool {
        self.failed_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: StatusCode, body: &str) -> ApiResponse {
        ApiResponse {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_outcome_passed_drops_body() {
        let outcome = CheckOutcome::from_response(
            "get user info",
            StatusCode::OK,
            &response(StatusCode::OK, "{\"id\": \"u-1\"}"),
        );
        assert!(outcome.passed());
        assert_eq!(outcome.body, None);
    }

    #[test]
    fn test_outcome_failed_keeps_body() {
        let outcome = CheckOutcome::from_response(
            "get user info",
            StatusCode::OK,
            &response(StatusCode::INTERNAL_SERVER_ERROR, "db down"),
        );
        assert!(!outcome.passed());
        assert_eq!(outcome.expected, 200);
        assert_eq!(outcome.actual, 500);
        assert_eq!(outcome.body.as_deref(), Some("db down"));
    }

    #[test]
    fn test_report_aggregation() {
        let mut report = RunReport::default();
        report.record(CheckOutcome::from_response(
            "a",
            StatusCode::OK,
            &response(StatusCode::OK, ""),
        ));
        report.record(CheckOutcome::from_response(
            "b",
            StatusCode::OK,
            &response(StatusCode::NOT_FOUND, "missing"),
        ));

        assert_eq!(report.total(), 2);
        assert_eq!(report.failed_count(), 1);
        assert!(!report.all_passed());
        let failed: Vec<_> = report.failures().map(|c| c.name.as_str()).collect();
        assert_eq!(failed, vec!["b"]);
    }

    #[test]
    fn test_transport_failure_counts_as_failed() {
        let outcome =
            CheckOutcome::transport_failure("send text message", StatusCode::OK, "connection refused");
        assert!(!outcome.passed());
        assert_eq!(outcome.actual, 0);
        assert_eq!(outcome.body.as_deref(), Some("connection refused"));
    }

    #[test]
    fn test_empty_report_passes() {
        let report = RunReport::default();
        assert!(report.all_passed());
        assert_eq!(report.total(), 0);
    }
}
