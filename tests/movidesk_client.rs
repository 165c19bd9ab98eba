//! HTTP-level tests for the ticket fetcher and report submitter.

use fieldwork::config::{Config, OwnerConfig};
use fieldwork::error::ErrorKind;
use fieldwork::models::{AppointmentStatus, NO_ADDRESS, NO_BUSINESS_NAME, NO_SERVICE};
use fieldwork::movidesk_client::MovideskClient;
use fieldwork::report::{Resolution, WorkReport};
use fieldwork::session::{Session, TechnicianCategory};
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "9f1c2d7e-test-token";

fn client_for(server: &MockServer) -> MovideskClient {
    MovideskClient::new(&Config::new(server.uri(), TOKEN)).expect("client")
}

fn session() -> Session {
    Session::new(TechnicianCategory::new("Joao Lima").unwrap())
}

fn report() -> WorkReport {
    WorkReport {
        ticket_id: "4521".to_string(),
        work_performed: "Replaced power supply".to_string(),
        notes: "Old unit left with customer".to_string(),
        resolution: Resolution::Completed,
        time_in: "08:00".to_string(),
        time_out: "17:00".to_string(),
    }
}

#[tokio::test]
async fn fetch_sends_filter_projection_and_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tickets"))
        .and(query_param("token", TOKEN))
        .and(query_param("$expand", "clients"))
        .and(query_param(
            "$select",
            "id,protocol,serviceFull,slaSolutionDate,category",
        ))
        .and(query_param(
            "$filter",
            "justification eq 'Novo Agendado' and category eq 'Joao Lima'",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let appointments = assert_ok!(client_for(&server).fetch_tickets("Joao Lima").await);
    assert!(appointments.is_empty());
}

#[tokio::test]
async fn fetch_maps_tickets_to_pending_appointments() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tickets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 4521,
                "protocol": "20261019-4521",
                "serviceFull": ["Field service", "Printer"],
                "slaSolutionDate": "2026-10-20T12:00:00",
                "category": "Joao Lima",
                "clients": [{
                    "businessName": "Farmacia Central",
                    "address": "Rua das Flores",
                    "addressNumber": "88",
                    "neighborhood": "Centro",
                    "city": "Fortaleza",
                    "state": "CE"
                }]
            },
            {
                "id": 4522,
                "category": "Joao Lima",
                "clients": [{ "businessName": "Oficina Sul" }]
            },
            { "id": 4523 }
        ])))
        .mount(&server)
        .await;

    let appointments = client_for(&server).fetch_for_session(&session()).await.unwrap();

    assert_eq!(appointments.len(), 3);
    assert!(appointments
        .iter()
        .all(|a| a.status == AppointmentStatus::Pending));

    let full = &appointments[0];
    assert_eq!(full.id, "4521");
    assert_eq!(full.protocol, "20261019-4521");
    assert_eq!(full.service_description, "Field service > Printer");
    assert_eq!(
        full.client.full_address(),
        "Rua das Flores, 88 - Centro, Fortaleza/CE"
    );

    let partial = &appointments[1];
    assert_eq!(partial.client.business_name, "Oficina Sul");
    assert_eq!(partial.client.address, NO_ADDRESS);
    assert_eq!(partial.service_description, NO_SERVICE);

    let bare = &appointments[2];
    assert_eq!(bare.client.business_name, NO_BUSINESS_NAME);
    assert_eq!(bare.client.city, "City not provided/UF");
}

#[tokio::test]
async fn fetch_with_blank_category_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let err = assert_err!(client_for(&server).fetch_tickets("").await);
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[tokio::test]
async fn fetch_non_success_status_is_remote_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tickets"))
        .respond_with(ResponseTemplate::new(500).set_body_string(format!("token {} broke", TOKEN)))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_tickets("Joao Lima").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Remote);
    assert!(err.to_string().contains("500"));
    assert!(!err.to_string().contains(TOKEN));
}

#[tokio::test]
async fn fetch_unexpected_body_is_remote_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tickets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "nope" })))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_tickets("Joao Lima").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Remote);
}

#[tokio::test]
async fn submit_patches_ticket_with_action() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/tickets"))
        .and(query_param("token", TOKEN))
        .and(query_param("id", "4521"))
        .and(body_json(json!({
            "type": 2,
            "actions": [{
                "type": 2,
                "origin": 2,
                "description": "Work performed: Replaced power supply.\nNotes: Old unit left with customer.\nService status: Completed.\nService time: 9 HOURS\n",
                "status": "Resolvido",
                "tags": []
            }]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    assert_ok!(client_for(&server).submit_report(&session(), &report()).await);
}

#[tokio::test]
async fn submit_includes_configured_owner() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/tickets"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = Config::new(server.uri(), TOKEN);
    config.owner = Some(OwnerConfig {
        id: "1001".to_string(),
        person_type: 1,
        profile_type: 3,
        business_name: "Field Lead".to_string(),
        email: "lead@example.com".to_string(),
        phone: String::new(),
    });
    config.owner_team = Some("Field Support".to_string());
    config.action_status = "Em atendimento".to_string();

    let mut overnight = report();
    overnight.time_in = "22:00".to_string();
    overnight.time_out = "02:00".to_string();

    let client = MovideskClient::new(&config).unwrap();
    client.submit_report(&session(), &overnight).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["owner"]["id"], "1001");
    assert_eq!(body["ownerTeam"], "Field Support");
    assert_eq!(body["actions"][0]["status"], "Em atendimento");
    assert!(body["actions"][0]["description"]
        .as_str()
        .unwrap()
        .contains("Service time: 4 HOURS"));
}

#[tokio::test]
async fn submit_with_empty_notes_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut invalid = report();
    invalid.notes = String::new();

    let err = assert_err!(client_for(&server).submit_report(&session(), &invalid).await);
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.to_string(), "validation error: missing required fields");
}

#[tokio::test]
async fn submit_with_missing_time_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut invalid = report();
    invalid.time_in = String::new();

    let err = client_for(&server)
        .submit_report(&session(), &invalid)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "validation error: missing time range");
}

#[tokio::test]
async fn submit_non_success_status_is_remote_error() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/tickets"))
        .respond_with(ResponseTemplate::new(404).set_body_string("ticket not found"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .submit_report(&session(), &report())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Remote);
    assert!(err.to_string().contains("ticket not found"));
}
