use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::models::{AppointmentStatus, PaymentMethod, PaymentStatus};
use reporting_cell::models::{PaymentRecord, ReportingError};
use reporting_cell::services::dashboard::DashboardService;
use reporting_cell::services::payments::{summarize, PaymentsReportService};
use shared_config::AppConfig;

const TOKEN: &str = "test-token";

fn test_config(base_url: &str) -> AppConfig {
    AppConfig {
        supabase_url: base_url.to_string(),
        supabase_anon_key: "test-anon-key".to_string(),
        supabase_jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
    }
}

fn record(
    fee: Option<f64>,
    payment_status: Option<PaymentStatus>,
    payment_method: Option<PaymentMethod>,
) -> PaymentRecord {
    PaymentRecord {
        id: Uuid::new_v4(),
        patient_id: Uuid::new_v4(),
        doctor_id: 1,
        scheduled_start: "2026-08-10T09:00:00Z".parse().unwrap(),
        status: AppointmentStatus::Completed,
        fee,
        payment_status,
        payment_method,
    }
}

#[test]
fn summarize_splits_billed_and_collected() {
    let rows = vec![
        record(Some(50.0), Some(PaymentStatus::Paid), Some(PaymentMethod::Cash)),
        record(Some(80.0), Some(PaymentStatus::Paid), Some(PaymentMethod::Card)),
        record(Some(40.0), Some(PaymentStatus::Pending), None),
        record(Some(60.0), Some(PaymentStatus::Waived), None),
        record(None, None, None),
    ];

    let summary = summarize(&rows);

    assert_eq!(summary.total_billed, 230.0);
    assert_eq!(summary.total_collected, 130.0);
    assert_eq!(summary.paid_count, 2);
    assert_eq!(summary.pending_count, 1);
    assert_eq!(summary.waived_count, 1);
    assert_eq!(summary.cash_total, 50.0);
    assert_eq!(summary.card_total, 80.0);
    assert_eq!(summary.insurance_total, 0.0);
}

#[test]
fn summarize_handles_empty_range() {
    let summary = summarize(&[]);
    assert_eq!(summary.total_billed, 0.0);
    assert_eq!(summary.paid_count, 0);
}

#[tokio::test]
async fn payments_report_fetches_rows_and_totals() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": Uuid::new_v4(),
                "patient_id": Uuid::new_v4(),
                "doctor_id": 1,
                "scheduled_start": "2026-08-03T09:00:00Z",
                "status": "completed",
                "fee": 75.0,
                "payment_status": "paid",
                "payment_method": "insurance"
            },
            {
                "id": Uuid::new_v4(),
                "patient_id": Uuid::new_v4(),
                "doctor_id": 2,
                "scheduled_start": "2026-08-04T10:00:00Z",
                "status": "scheduled",
                "fee": 50.0,
                "payment_status": "pending",
                "payment_method": null
            }
        ])))
        .mount(&server)
        .await;

    let service = PaymentsReportService::new(&test_config(&server.uri()));
    let from = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
    let to = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();

    let report = service.payments_report(from, to, TOKEN).await.unwrap();

    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.summary.total_billed, 125.0);
    assert_eq!(report.summary.total_collected, 75.0);
    assert_eq!(report.summary.insurance_total, 75.0);
    assert_eq!(report.summary.pending_count, 1);
}

#[tokio::test]
async fn payments_report_rejects_inverted_range() {
    let server = MockServer::start().await;
    let service = PaymentsReportService::new(&test_config(&server.uri()));

    let from = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
    let to = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();

    match service.payments_report(from, to, TOKEN).await {
        Err(ReportingError::InvalidDateRange) => {}
        other => panic!("expected invalid range, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn dashboard_summary_counts_each_source() {
    let server = MockServer::start().await;

    // The scheduled-backlog query carries a status filter, the today query
    // does not; mount the specific mock first.
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("status", "eq.scheduled"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": Uuid::new_v4()}, {"id": Uuid::new_v4()}, {"id": Uuid::new_v4()}
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": Uuid::new_v4()}, {"id": Uuid::new_v4()}
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": Uuid::new_v4()}, {"id": Uuid::new_v4()}, {"id": Uuid::new_v4()},
            {"id": Uuid::new_v4()}, {"id": Uuid::new_v4()}
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1}, {"id": 2}
        ])))
        .mount(&server)
        .await;

    let service = DashboardService::new(&test_config(&server.uri()));
    let today = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();

    let summary = service.dashboard_summary(today, TOKEN).await.unwrap();

    assert_eq!(summary.appointments_today, 2);
    assert_eq!(summary.scheduled_appointments, 3);
    assert_eq!(summary.total_patients, 5);
    assert_eq!(summary.active_doctors, 2);
}
