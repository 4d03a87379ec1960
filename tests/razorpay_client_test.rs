use httpmock::prelude::*;
use race_registration::core::PaymentGateway;
use race_registration::{GatewayError, RazorpayClient};
use serde_json::json;

// base64("rzp_test_key:rzp_test_secret")
const BASIC_AUTH: &str = "Basic cnpwX3Rlc3Rfa2V5OnJ6cF90ZXN0X3NlY3JldA==";

fn client(server: &MockServer) -> RazorpayClient {
    RazorpayClient::with_base_url(server.base_url(), "rzp_test_key", "rzp_test_secret")
}

#[tokio::test]
async fn test_create_order_sends_amount_currency_and_receipt() {
    let server = MockServer::start_async().await;

    let order_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/orders")
                .header("authorization", BASIC_AUTH)
                .json_body(json!({
                    "amount": 49900,
                    "currency": "INR",
                    "receipt": "order_rcptid_1700000000000"
                }));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({
                    "id": "order_EKwxwAgItmmXdp",
                    "entity": "order",
                    "amount": 49900,
                    "amount_paid": 0,
                    "amount_due": 49900,
                    "currency": "INR",
                    "receipt": "order_rcptid_1700000000000",
                    "status": "created",
                    "attempts": 0,
                    "created_at": 1700000000
                }));
        })
        .await;

    let order = client(&server)
        .create_order(49900, "INR", "order_rcptid_1700000000000")
        .await
        .unwrap();

    order_mock.assert_async().await;
    assert_eq!(order.id, "order_EKwxwAgItmmXdp");
    assert_eq!(order.amount, 49900);
    assert_eq!(order.currency, "INR");
    assert_eq!(order.status, "created");
    assert_eq!(order.extra.get("amount_due"), Some(&json!(49900)));
}

#[tokio::test]
async fn test_create_order_surfaces_provider_error_description() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/orders");
            then.status(401)
                .header("Content-Type", "application/json")
                .json_body(json!({
                    "error": {
                        "code": "BAD_REQUEST_ERROR",
                        "description": "Authentication failed"
                    }
                }));
        })
        .await;

    let err = client(&server)
        .create_order(49900, "INR", "order_rcptid_1")
        .await
        .unwrap_err();

    match err {
        GatewayError::Rejected {
            status,
            code,
            description,
        } => {
            assert_eq!(status, 401);
            assert_eq!(code.as_deref(), Some("BAD_REQUEST_ERROR"));
            assert_eq!(description, "Authentication failed");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_captured_payment() {
    let server = MockServer::start_async().await;

    let payment_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/payments/pay_29QQoUBi66xm2f")
                .header("authorization", BASIC_AUTH);
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({
                    "id": "pay_29QQoUBi66xm2f",
                    "entity": "payment",
                    "amount": 49900,
                    "currency": "INR",
                    "status": "captured",
                    "order_id": "order_EKwxwAgItmmXdp",
                    "method": "upi",
                    "captured": true
                }));
        })
        .await;

    let payment = client(&server)
        .fetch_payment("pay_29QQoUBi66xm2f")
        .await
        .unwrap();

    payment_mock.assert_async().await;
    assert!(payment.is_captured());
    assert_eq!(payment.order_id.as_deref(), Some("order_EKwxwAgItmmXdp"));
    assert_eq!(payment.extra.get("method"), Some(&json!("upi")));
}

#[tokio::test]
async fn test_fetch_unknown_payment_is_not_found() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/payments/pay_missing");
            then.status(400)
                .header("Content-Type", "application/json")
                .json_body(json!({
                    "error": {
                        "code": "BAD_REQUEST_ERROR",
                        "description": "The id provided does not exist"
                    }
                }));
        })
        .await;

    let err = client(&server).fetch_payment("pay_missing").await.unwrap_err();
    assert!(matches!(err, GatewayError::PaymentNotFound(ref id) if id == "pay_missing"));
}

#[tokio::test]
async fn test_fetch_payment_server_error_is_rejected() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/payments/pay_1");
            then.status(502).body("upstream unavailable");
        })
        .await;

    let err = client(&server).fetch_payment("pay_1").await.unwrap_err();
    match err {
        GatewayError::Rejected {
            status, description, ..
        } => {
            assert_eq!(status, 502);
            assert_eq!(description, "upstream unavailable");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_payment_body_is_invalid_response() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/payments/pay_1");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({ "unexpected": true }));
        })
        .await;

    let err = client(&server).fetch_payment("pay_1").await.unwrap_err();
    assert!(matches!(err, GatewayError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_unreachable_provider_is_http_error() {
    // Nothing listens on port 1
    let client = RazorpayClient::with_base_url("http://127.0.0.1:1", "k", "s");
    let err = client.fetch_payment("pay_1").await.unwrap_err();
    assert!(matches!(err, GatewayError::Http(_)));
}
