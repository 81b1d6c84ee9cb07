use chrono::NaiveDate;
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use appointment_cell::models::{PaymentMethod, PaymentStatus};

use crate::models::{PaymentRecord, PaymentsReport, PaymentsSummary, ReportingError};

/// Fold the report rows into the totals shown above the table. Billed
/// covers every fee in the range; collected only what was actually paid,
/// broken down by settlement method.
pub fn summarize(rows: &[PaymentRecord]) -> PaymentsSummary {
    let mut summary = PaymentsSummary::default();

    for row in rows {
        let fee = row.fee.unwrap_or(0.0);
        summary.total_billed += fee;

        match row.payment_status {
            Some(PaymentStatus::Paid) => {
                summary.paid_count += 1;
                summary.total_collected += fee;
                match row.payment_method {
                    Some(PaymentMethod::Cash) => summary.cash_total += fee,
                    Some(PaymentMethod::Card) => summary.card_total += fee,
                    Some(PaymentMethod::Insurance) => summary.insurance_total += fee,
                    None => {}
                }
            }
            Some(PaymentStatus::Pending) => summary.pending_count += 1,
            Some(PaymentStatus::Waived) => summary.waived_count += 1,
            None => {}
        }
    }

    summary
}

pub struct PaymentsReportService {
    supabase: SupabaseClient,
}

impl PaymentsReportService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn payments_report(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        auth_token: &str,
    ) -> Result<PaymentsReport, ReportingError> {
        if from > to {
            return Err(ReportingError::InvalidDateRange);
        }

        debug!("Building payments report from {} to {}", from, to);

        let range_start = from.and_hms_opt(0, 0, 0).unwrap().and_utc();
        let range_end = to.and_hms_opt(23, 59, 59).unwrap().and_utc();

        let path = format!(
            "/rest/v1/appointments?select=id,patient_id,doctor_id,scheduled_start,status,fee,payment_status,payment_method&scheduled_start=gte.{}&scheduled_start=lte.{}&order=scheduled_start.asc",
            range_start.to_rfc3339(),
            range_end.to_rfc3339()
        );

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| ReportingError::DatabaseError(e.to_string()))?;

        let rows = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<PaymentRecord>, _>>()
            .map_err(|e| ReportingError::DatabaseError(format!("Failed to parse rows: {}", e)))?;

        let summary = summarize(&rows);
        debug!(
            "Payments report: {} rows, {} billed, {} collected",
            rows.len(),
            summary.total_billed,
            summary.total_collected
        );

        Ok(PaymentsReport {
            from,
            to,
            rows,
            summary,
        })
    }
}
