use std::sync::Arc;
use std::time::Duration;

use cleanquote::mail::{relay_router, HttpRelayTransport, LogMailTransport, OutboundEmail};
use cleanquote::quotes::{
    format_admin_body, format_customer_body, NotificationDispatcher, NotificationKind,
    QuoteService, QuoteServiceError, QuoteSubmission,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ADMIN: &str = "admin@cleanquote.com";

fn office_submission() -> QuoteSubmission {
    QuoteSubmission {
        client_name: "Acme Corp".to_string(),
        email: "facilities@acme.test".to_string(),
        address: "123 Main St".to_string(),
        city: "Queens".to_string(),
        property_size: 5000.0,
        cleaning_type: "basic".to_string(),
        service_frequency: "weekly".to_string(),
        additional_services: Some(vec!["windows".to_string(), "carpet".to_string()]),
    }
}

fn relay_service(server: &MockServer) -> QuoteService {
    let transport = HttpRelayTransport::new(
        format!("{}/api/send-email", server.uri()),
        Duration::from_secs(2),
    )
    .expect("relay transport builds");
    QuoteService::new(NotificationDispatcher::new(Arc::new(transport), ADMIN))
}

#[tokio::test]
async fn submission_posts_both_emails_to_relay() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/send-email"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "Email sent successfully"})),
        )
        .expect(2)
        .mount(&server)
        .await;

    let service = relay_service(&server);
    let receipt = service
        .submit_quote(office_submission())
        .await
        .expect("quote confirmed");
    assert!((receipt.breakdown.total_cost() - 1027.5).abs() < 1e-9);

    let requests = server.received_requests().await.expect("recording enabled");
    let mut emails: Vec<OutboundEmail> = requests
        .iter()
        .map(|request| request.body_json().expect("relay payload"))
        .collect();
    emails.sort_by(|left, right| left.to.cmp(&right.to));

    let request = office_submission().validate().expect("valid submission");
    assert_eq!(emails[0].to, ADMIN);
    assert_eq!(emails[0].subject, "New Cleaning Quote Request - Acme Corp");
    assert_eq!(
        emails[0].text,
        format_admin_body(&request, &receipt.breakdown)
    );
    assert!(emails[0].text.contains("Additional Services: windows, carpet"));

    assert_eq!(emails[1].to, "facilities@acme.test");
    assert_eq!(emails[1].subject, "Your CleanQuote Cleaning Service Quote");
    assert_eq!(
        emails[1].text,
        format_customer_body(&request, &receipt.breakdown)
    );
}

#[tokio::test]
async fn relay_rejection_of_admin_email_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/send-email"))
        .and(body_partial_json(json!({ "to": ADMIN })))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({"message": "Failed to send email: mailbox full"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/send-email"))
        .and(body_partial_json(json!({ "to": "facilities@acme.test" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let service = relay_service(&server);
    let error = service
        .submit_quote(office_submission())
        .await
        .expect_err("admin email rejected");

    let breakdown = error.breakdown().copied().expect("priced before dispatch");
    assert!((breakdown.total_cost() - 1027.5).abs() < 1e-9);
    match error {
        QuoteServiceError::Notification { error, .. } => {
            assert_eq!(error.failed_kinds(), vec![NotificationKind::Admin]);
            assert!(!error.transport_unavailable());
            assert!(error.to_string().contains("mailbox full"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_relay_fails_both_notifications() {
    let transport = HttpRelayTransport::new(
        "http://127.0.0.1:9/api/send-email",
        Duration::from_millis(500),
    )
    .expect("relay transport builds");
    let service = QuoteService::new(NotificationDispatcher::new(Arc::new(transport), ADMIN));

    let error = service
        .submit_quote(office_submission())
        .await
        .expect_err("relay unreachable");

    match error {
        QuoteServiceError::Notification { error, .. } => {
            assert_eq!(error.failures().len(), 2);
            assert!(error.transport_unavailable());
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn quote_service_can_target_the_local_relay_endpoint() {
    let relay = relay_router(Arc::new(LogMailTransport));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind local relay");
    let address = listener.local_addr().expect("local address");
    let server = tokio::spawn(async move {
        axum::serve(listener, relay).await.expect("relay serves");
    });

    let transport = HttpRelayTransport::new(
        format!("http://{address}/api/send-email"),
        Duration::from_secs(2),
    )
    .expect("relay transport builds");
    let service = QuoteService::new(NotificationDispatcher::new(Arc::new(transport), ADMIN));

    let receipt = service
        .submit_quote(office_submission())
        .await
        .expect("local relay accepts both emails");
    assert_eq!(receipt.breakdown.travel_cost(), 50.0);

    server.abort();
}
