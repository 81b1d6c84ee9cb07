use assert_matches::assert_matches;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use patient_cell::models::{BiometricError, CaptureOutcome, ScannerFrame};
use patient_cell::services::biometric::{parse_frame, BiometricService};
use shared_config::AppConfig;

const TOKEN: &str = "test-token";

fn test_config(base_url: &str) -> AppConfig {
    AppConfig {
        supabase_url: base_url.to_string(),
        supabase_anon_key: "test-anon-key".to_string(),
        supabase_jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
    }
}

#[test]
fn parses_enrollment_frames() {
    let template = STANDARD.encode(b"template-bytes");
    let frame = parse_frame(&format!("ENROLL:{}", template)).unwrap();

    assert_eq!(frame, ScannerFrame::Enrollment { template });
}

#[test]
fn parses_document_image_frames() {
    let payload = STANDARD.encode(b"\xff\xd8\xff\xe0fake-jpeg");
    let frame = parse_frame(&format!("IMG:{}", payload)).unwrap();

    match frame {
        ScannerFrame::DocumentImage { bytes } => {
            assert!(bytes.starts_with(&[0xff, 0xd8]));
        }
        other => panic!("expected document image, got {:?}", other),
    }
}

#[test]
fn unprefixed_lines_are_status_text() {
    let frame = parse_frame("Place finger on the reader").unwrap();
    assert_eq!(
        frame,
        ScannerFrame::Status("Place finger on the reader".to_string())
    );
}

#[test]
fn rejects_empty_and_blank_frames() {
    assert_eq!(parse_frame(""), Err(BiometricError::EmptyFrame));
    assert_eq!(parse_frame("   "), Err(BiometricError::EmptyFrame));
}

#[test]
fn rejects_malformed_base64_payloads() {
    assert_matches!(
        parse_frame("ENROLL:not-valid-base64!!!"),
        Err(BiometricError::InvalidPayload(_))
    );
    assert_matches!(
        parse_frame("IMG:@@@@"),
        Err(BiometricError::InvalidPayload(_))
    );
}

#[test]
fn rejects_empty_decoded_image() {
    assert_matches!(parse_frame("IMG:"), Err(BiometricError::InvalidPayload(_)));
}

#[tokio::test]
async fn enrollment_frame_is_stored_on_the_patient() {
    let server = MockServer::start().await;
    let patient_id = Uuid::new_v4();

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": patient_id }])))
        .mount(&server)
        .await;

    let service = BiometricService::new(&test_config(&server.uri()));
    let frame = parse_frame(&format!("ENROLL:{}", STANDARD.encode(b"template"))).unwrap();

    let outcome = service.attach_frame(patient_id, frame, TOKEN).await.unwrap();
    assert!(matches!(outcome, CaptureOutcome::Enrolled));
}

#[tokio::test]
async fn document_frame_is_uploaded_then_linked() {
    let server = MockServer::start().await;
    let patient_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path_regex(r"^/storage/v1/object/patient-documents/.*\.jpg$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Key": "ok" })))
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": patient_id }])))
        .mount(&server)
        .await;

    let service = BiometricService::new(&test_config(&server.uri()));
    let frame = parse_frame(&format!("IMG:{}", STANDARD.encode(b"jpeg-bytes"))).unwrap();

    let outcome = service.attach_frame(patient_id, frame, TOKEN).await.unwrap();
    match outcome {
        CaptureOutcome::DocumentStored { document_image_url } => {
            assert!(document_image_url
                .contains("/storage/v1/object/public/patient-documents/"));
        }
        other => panic!("expected stored document, got {:?}", other),
    }
}

#[tokio::test]
async fn status_frames_are_acknowledged_without_storage() {
    let server = MockServer::start().await;
    // No mocks mounted: any store call would error out the test

    let service = BiometricService::new(&test_config(&server.uri()));
    let outcome = service
        .attach_frame(Uuid::new_v4(), ScannerFrame::Status("READY".to_string()), TOKEN)
        .await
        .unwrap();

    match outcome {
        CaptureOutcome::Status { message } => assert_eq!(message, "READY"),
        other => panic!("expected status ack, got {:?}", other),
    }
}
