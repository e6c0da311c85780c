//! Session log and export handlers

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};

use super::dto::{LogsQuery, SessionLogDto, SessionLogListResponse};
use crate::application::ReportService;
use crate::domain::{DomainError, SessionRecord};
use crate::interfaces::http::common::{error_response, ApiError, ApiResponse};

const CSV_HEADER: [&str; 9] = [
    "ID",
    "Name",
    "Vehicle No",
    "Slot",
    "Entry Time",
    "Exit Time",
    "Duration (min)",
    "Fee",
    "Status",
];

const MISSING: &str = "N/A";

fn csv_time(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Render session rows as CSV; absent values become `N/A`, an absent fee `0`.
pub fn render_sessions_csv(records: &[SessionRecord]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for r in records {
        writer.write_record([
            r.id.to_string(),
            r.vehicle_name.clone().unwrap_or_else(|| MISSING.to_string()),
            r.vehicle_no.clone(),
            r.slot_number.clone().unwrap_or_else(|| MISSING.to_string()),
            csv_time(r.entry_time),
            r.exit_time.map(csv_time).unwrap_or_else(|| MISSING.to_string()),
            r.duration_minutes
                .map(|m| m.to_string())
                .unwrap_or_else(|| MISSING.to_string()),
            format!("{:.2}", r.fee.unwrap_or(0.0)),
            r.status.to_string(),
        ])?;
    }

    writer.into_inner().map_err(|e| e.into_error().into())
}

#[utoipa::path(
    get,
    path = "/api/logs",
    tag = "Reports",
    params(LogsQuery),
    responses(
        (status = 200, description = "Latest parking sessions", body = ApiResponse<SessionLogListResponse>)
    )
)]
pub async fn list_logs(
    State(reports): State<Arc<ReportService>>,
    Query(query): Query<LogsQuery>,
) -> Result<Json<ApiResponse<SessionLogListResponse>>, ApiError> {
    let records = reports
        .recent_sessions(query.limit)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(SessionLogListResponse {
        logs: records.into_iter().map(SessionLogDto::from).collect(),
    })))
}

#[utoipa::path(
    get,
    path = "/api/export",
    tag = "Reports",
    responses(
        (status = 200, description = "Every session as a CSV attachment", body = String, content_type = "text/csv")
    )
)]
pub async fn export_logs(State(reports): State<Arc<ReportService>>) -> Result<Response, ApiError> {
    let records = reports.export_sessions().await.map_err(error_response)?;
    let body = render_sessions_csv(&records)
        .map_err(|e| error_response(DomainError::Storage(format!("CSV export failed: {}", e))))?;

    let disposition = format!(
        "attachment; filename=parking_logs_{}.csv",
        Utc::now().format("%Y%m%d")
    );
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SessionStatus;
    use chrono::TimeZone;

    fn record(fee: Option<f64>, name: Option<&str>) -> SessionRecord {
        let entry = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        SessionRecord {
            id: 7,
            vehicle_name: name.map(str::to_string),
            vehicle_no: "KA-01-1234".into(),
            slot_id: 1,
            slot_number: Some("SLOT-001".into()),
            entry_time: entry,
            exit_time: fee.map(|_| entry + chrono::Duration::minutes(45)),
            duration_minutes: fee.map(|_| 45),
            fee,
            status: if fee.is_some() {
                SessionStatus::Completed
            } else {
                SessionStatus::Active
            },
        }
    }

    #[test]
    fn csv_has_header_and_rows() {
        let bytes =
            render_sessions_csv(&[record(Some(30.0), Some("Alice")), record(None, None)]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(
            lines[0],
            "ID,Name,Vehicle No,Slot,Entry Time,Exit Time,Duration (min),Fee,Status"
        );
        assert_eq!(
            lines[1],
            "7,Alice,KA-01-1234,SLOT-001,2024-03-01 09:00:00,2024-03-01 09:45:00,45,30.00,completed"
        );
        assert_eq!(
            lines[2],
            "7,N/A,KA-01-1234,SLOT-001,2024-03-01 09:00:00,N/A,N/A,0.00,active"
        );
    }

    #[test]
    fn empty_export_is_header_only() {
        let text = String::from_utf8(render_sessions_csv(&[]).unwrap()).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
