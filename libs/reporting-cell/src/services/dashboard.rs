use chrono::NaiveDate;
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{DashboardSummary, ReportingError};

pub struct DashboardService {
    supabase: SupabaseClient,
}

impl DashboardService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Headline counters for the landing page: today's load, the upcoming
    /// scheduled backlog, and registry sizes.
    pub async fn dashboard_summary(
        &self,
        today: NaiveDate,
        auth_token: &str,
    ) -> Result<DashboardSummary, ReportingError> {
        debug!("Building dashboard summary for {}", today);

        let start_of_day = today.and_hms_opt(0, 0, 0).unwrap().and_utc();
        let end_of_day = today.and_hms_opt(23, 59, 59).unwrap().and_utc();

        let todays_path = format!(
            "/rest/v1/appointments?select=id&scheduled_start=gte.{}&scheduled_start=lte.{}",
            start_of_day.to_rfc3339(),
            end_of_day.to_rfc3339()
        );
        let scheduled_path = format!(
            "/rest/v1/appointments?select=id&status=eq.scheduled&scheduled_start=gte.{}",
            start_of_day.to_rfc3339()
        );

        let appointments_today = self.count_rows(&todays_path, auth_token).await?;
        let scheduled_appointments = self.count_rows(&scheduled_path, auth_token).await?;
        let total_patients = self
            .count_rows("/rest/v1/patients?select=id", auth_token)
            .await?;
        let active_doctors = self
            .count_rows("/rest/v1/doctors?select=id&is_active=eq.true", auth_token)
            .await?;

        Ok(DashboardSummary {
            appointments_today,
            scheduled_appointments,
            total_patients,
            active_doctors,
        })
    }

    async fn count_rows(&self, path: &str, auth_token: &str) -> Result<usize, ReportingError> {
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, path, Some(auth_token), None)
            .await
            .map_err(|e| ReportingError::DatabaseError(e.to_string()))?;

        Ok(result.len())
    }
}
