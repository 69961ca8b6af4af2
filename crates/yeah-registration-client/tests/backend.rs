//! Registration client tests against a mocked backend.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use yeah_registration_client::{
    ClientError, ClientOptions, ContinueRegistrationRequest, RegistrationClient,
};
use yeah_registration_core::{FormField, PaymentMethodId, PriceId, RegistrationFormData};

fn filled_form() -> RegistrationFormData {
    let mut form = RegistrationFormData::new();
    for (field, value) in [
        (FormField::Email, "a@b.com"),
        (FormField::CompanyName, "Acme"),
        (FormField::FirstName, "A"),
        (FormField::LastName, "B"),
        (FormField::Phone, "555"),
        (FormField::Activity, "x"),
        (FormField::Industry, "y"),
        (FormField::NumberOfClients, "3"),
    ] {
        form.set(field, value);
    }
    form
}

fn registration_request() -> ContinueRegistrationRequest {
    ContinueRegistrationRequest {
        form: filled_form(),
        payment_method_id: PaymentMethodId::new("pm_123").unwrap(),
        price_id: PriceId::new("price_test").unwrap(),
    }
}

#[tokio::test]
async fn create_setup_intent_posts_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/create-setup-intent"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "clientSecret": "seti_1_secret_2" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = RegistrationClient::new(server.uri()).unwrap();
    let handle = client.create_setup_intent().await.unwrap();

    assert_eq!(handle.expose_secret(), "seti_1_secret_2");
}

#[tokio::test]
async fn create_setup_intent_without_secret() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/create-setup-intent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "nope" })))
        .mount(&server)
        .await;

    let client = RegistrationClient::new(server.uri()).unwrap();
    let err = client.create_setup_intent().await.unwrap_err();

    assert!(matches!(err, ClientError::MissingClientSecret));
}

#[tokio::test]
async fn create_setup_intent_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/create-setup-intent"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = RegistrationClient::new(server.uri()).unwrap();
    let err = client.create_setup_intent().await.unwrap_err();

    assert!(matches!(err, ClientError::Serialization(_)));
}

#[tokio::test]
async fn create_setup_intent_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/create-setup-intent"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "message": "stripe unavailable" })),
        )
        .mount(&server)
        .await;

    let client = RegistrationClient::new(server.uri()).unwrap();
    let err = client.create_setup_intent().await.unwrap_err();

    assert!(matches!(err, ClientError::Api { status: 500, .. }));
    assert_eq!(err.backend_message(), Some("stripe unavailable"));
}

#[tokio::test]
async fn continue_registration_sends_exact_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/continue-registration"))
        .and(body_json(json!({
            "email": "a@b.com",
            "companyName": "Acme",
            "firstName": "A",
            "lastName": "B",
            "phone": "555",
            "activity": "x",
            "industry": "y",
            "numberOfClients": "3",
            "paymentMethodId": "pm_123",
            "priceId": "price_test",
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "message": "welcome", "userId": 7 })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = RegistrationClient::new(server.uri()).unwrap();
    let response = client
        .continue_registration(&registration_request())
        .await
        .unwrap();

    assert_eq!(response.message.as_deref(), Some("welcome"));
    assert_eq!(response.extra.get("userId"), Some(&json!(7)));
}

#[tokio::test]
async fn continue_registration_accepts_empty_success_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/continue-registration"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = RegistrationClient::new(server.uri()).unwrap();
    let response = client
        .continue_registration(&registration_request())
        .await
        .unwrap();

    assert!(response.message.is_none());
}

#[tokio::test]
async fn continue_registration_reports_backend_message() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/continue-registration"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "message": "Email already registered" })),
        )
        .mount(&server)
        .await;

    let client = RegistrationClient::new(server.uri()).unwrap();
    let err = client
        .continue_registration(&registration_request())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Api { status: 409, .. }));
    assert_eq!(err.backend_message(), Some("Email already registered"));
}

#[tokio::test]
async fn bearer_token_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/create-setup-intent"))
        .and(header("authorization", "Bearer test-jwt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "clientSecret": "seti_1_secret_2" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let options = ClientOptions::default().with_bearer_token("test-jwt");
    let client = RegistrationClient::with_options(server.uri(), options).unwrap();

    client.create_setup_intent().await.unwrap();
}

#[tokio::test]
async fn unreachable_backend_is_http_error() {
    let client = RegistrationClient::new("http://127.0.0.1:1").unwrap();
    let err = client.create_setup_intent().await.unwrap_err();

    assert!(matches!(err, ClientError::Http(_)));
}
