use super::client::CloudClient;
use super::{ErrorReporter, TransportError};
use crate::domain::ErrorReport;
use serde::Serialize;

/// Identifies the reporting service in Error Reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceContext {
    pub service: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportedErrorEvent<'a> {
    event_time: String,
    service_context: &'a ServiceContext,
    message: &'a str,
    context: ErrorContext<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorContext<'a> {
    report_location: SourceLocation<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SourceLocation<'a> {
    file_path: &'a str,
    line_number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_name: Option<&'a str>,
}

/// Client for the Error Reporting `events:report` API.
#[derive(Debug, Clone)]
pub struct ErrorReportingClient {
    client: CloudClient,
    service: ServiceContext,
    report_url: String,
}

impl ErrorReportingClient {
    pub fn new(client: CloudClient, service: ServiceContext) -> Self {
        let report_url = format!(
            "{}/v1beta1/projects/{}/events:report",
            client
                .config()
                .error_reporting_endpoint
                .trim_end_matches('/'),
            client.project_id()
        );
        Self {
            client,
            service,
            report_url,
        }
    }
}

impl ErrorReporter for ErrorReportingClient {
    fn report_exception(&self, report: &ErrorReport) -> Result<(), TransportError> {
        let event = ReportedErrorEvent {
            event_time: report.event_time.to_rfc3339(),
            service_context: &self.service,
            message: &report.message,
            context: ErrorContext {
                report_location: SourceLocation {
                    file_path: &report.location.file_path,
                    line_number: report.location.line_number,
                    // Caller locations carry no function name.
                    function_name: None,
                },
            },
        };

        self.client.post_json(&self.report_url, &event)
    }
}
