use anyhow::{anyhow, Result};
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::Doctor;

pub struct DoctorService {
    supabase: SupabaseClient,
}

impl DoctorService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// List doctors for the dashboard dropdowns, active only by default.
    pub async fn list_doctors(
        &self,
        include_inactive: bool,
        auth_token: Option<&str>,
    ) -> Result<Vec<Doctor>> {
        debug!("Listing doctors (include_inactive: {})", include_inactive);

        let mut path = "/rest/v1/doctors?order=last_name.asc,first_name.asc".to_string();
        if !include_inactive {
            path.push_str("&is_active=eq.true");
        }

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, auth_token, None)
            .await?;

        let doctors = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Doctor>, _>>()?;

        Ok(doctors)
    }

    pub async fn get_doctor(&self, doctor_id: i64, auth_token: Option<&str>) -> Result<Doctor> {
        debug!("Fetching doctor: {}", doctor_id);

        let path = format!("/rest/v1/doctors?id=eq.{}", doctor_id);
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, auth_token, None)
            .await?;

        if result.is_empty() {
            return Err(anyhow!("Doctor not found"));
        }

        let doctor: Doctor = serde_json::from_value(result[0].clone())?;
        Ok(doctor)
    }
}
