use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use patient_cell::models::{CreatePatientRequest, PatientError, PatientSearchQuery};
use patient_cell::services::patient::PatientService;
use shared_config::AppConfig;

const TOKEN: &str = "test-token";

fn test_config(base_url: &str) -> AppConfig {
    AppConfig {
        supabase_url: base_url.to_string(),
        supabase_anon_key: "test-anon-key".to_string(),
        supabase_jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
    }
}

fn patient_row(id: Uuid, email: &str) -> serde_json::Value {
    json!({
        "id": id,
        "first_name": "Amina",
        "last_name": "Diallo",
        "email": email,
        "phone_number": "+22501020304",
        "address": "12 Rue des Jardins",
        "date_of_birth": "1990-04-12",
        "gender": "female",
        "national_id": "CI-1234567",
        "fingerprint_template": null,
        "document_image_url": null,
        "created_at": "2026-08-01T08:00:00Z",
        "updated_at": "2026-08-01T08:00:00Z"
    })
}

fn create_request(email: &str) -> CreatePatientRequest {
    CreatePatientRequest {
        first_name: "Amina".to_string(),
        last_name: "Diallo".to_string(),
        email: email.to_string(),
        phone_number: "+22501020304".to_string(),
        address: "12 Rue des Jardins".to_string(),
        date_of_birth: "1990-04-12".parse().unwrap(),
        gender: "female".to_string(),
        national_id: Some("CI-1234567".to_string()),
        fingerprint_template: None,
    }
}

#[tokio::test]
async fn create_patient_persists_new_record() {
    let server = MockServer::start().await;
    let created_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/patients"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!([patient_row(created_id, "amina@example.com")])),
        )
        .mount(&server)
        .await;

    let service = PatientService::new(&test_config(&server.uri()));
    let patient = service
        .create_patient(create_request("amina@example.com"), TOKEN)
        .await
        .unwrap();

    assert_eq!(patient.id, created_id);
    assert_eq!(patient.full_name(), "Amina Diallo");
}

#[tokio::test]
async fn create_patient_rejects_duplicate_email() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": Uuid::new_v4() }
        ])))
        .mount(&server)
        .await;

    let service = PatientService::new(&test_config(&server.uri()));
    let result = service
        .create_patient(create_request("amina@example.com"), TOKEN)
        .await;

    match result {
        Err(PatientError::EmailAlreadyExists { email }) => {
            assert_eq!(email, "amina@example.com");
        }
        other => panic!("expected duplicate email, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn get_unknown_patient_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let service = PatientService::new(&test_config(&server.uri()));
    let result = service.get_patient(Uuid::new_v4(), TOKEN).await;

    match result {
        Err(PatientError::NotFound) => {}
        other => panic!("expected not found, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn search_builds_name_filter_and_parses_rows() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            patient_row(Uuid::new_v4(), "amina@example.com")
        ])))
        .mount(&server)
        .await;

    let service = PatientService::new(&test_config(&server.uri()));
    let query = PatientSearchQuery {
        name: Some("Diallo".to_string()),
        phone: None,
        national_id: None,
        limit: Some(10),
        offset: None,
    };

    let patients = service.search_patients(query, TOKEN).await.unwrap();
    assert_eq!(patients.len(), 1);
    assert_eq!(patients[0].last_name, "Diallo");
}
