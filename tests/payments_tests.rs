// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{FakeTransport, client, signed_in};
use lendclip::commands::sell;
use lendclip::models::SellShare;
use lendclip::payments::{AWAITING_CONFIRMATION, CONFIRM_PAYMENT, PAYMENT_CONFIRMED, PaymentBoard};
use reqwest::Method;
use serde_json::{Value, json};

fn share(id: i64, matured_investor: bool, payment_status: &str) -> Value {
    json!({
        "id": id,
        "user_name": "brian",
        "user_phone": "0722000000",
        "amount": "1100.00",
        "date": "2025-08-01 10:00:00",
        "status": "paired",
        "payment_status": payment_status,
        "is_matured_investor": matured_investor,
    })
}

fn rows(values: Vec<Value>) -> Vec<SellShare> {
    serde_json::from_value(Value::Array(values)).unwrap()
}

#[test]
fn actions_follow_role_and_payment_state() {
    let board = PaymentBoard::new(rows(vec![
        share(1, true, "pending"),
        share(2, false, "pending"),
        share(3, true, "paid"),
    ]));
    let labels: Vec<_> = board.rows().iter().map(|r| board.action(r)).collect();
    assert_eq!(labels, [CONFIRM_PAYMENT, AWAITING_CONFIRMATION, PAYMENT_CONFIRMED]);
    assert!(board.can_confirm(1));
    assert!(!board.can_confirm(2));
    assert!(!board.can_confirm(3));
    assert!(!board.can_confirm(99));
}

#[test]
fn local_confirmation_relabels_until_reconcile() {
    let mut board = PaymentBoard::new(rows(vec![share(1, true, "pending")]));
    board.mark_confirmed(1);
    let row = board.get(1).unwrap();
    assert_eq!(board.action(row), PAYMENT_CONFIRMED);
    assert_eq!(row.payment_status.as_deref(), Some("pending"));
    assert!(board.is_pending_sync(1));
    assert!(!board.can_confirm(1));

    // The server has not caught up yet: its view wins.
    board.reconcile(rows(vec![share(1, true, "pending")]));
    assert!(!board.is_pending_sync(1));
    assert_eq!(board.action(board.get(1).unwrap()), CONFIRM_PAYMENT);
}

#[test]
fn confirm_flow_refetches_and_reconciles() {
    let transport = FakeTransport::new()
        .route(
            Method::GET,
            "/api/sell-shares/",
            200,
            json!({"data": [share(4, true, "pending")]}),
        )
        .route(
            Method::POST,
            "/api/confirm-payment/4/",
            200,
            json!({"success": true, "message": "Payment confirmed"}),
        );
    let client = client(transport, signed_in("tok", json!({"username": "amina"})));

    let board = sell::confirm(&client, 4).unwrap();
    // The fixture still reports the row unpaid, so the refetch wins over the local mark.
    assert!(!board.is_pending_sync(4));
    assert!(!board.get(4).unwrap().is_paid());

    let paths: Vec<_> = client
        .transport()
        .calls
        .lock()
        .unwrap()
        .iter()
        .map(|c| (c.method.clone(), c.path.clone()))
        .collect();
    assert_eq!(
        paths,
        vec![
            (Method::GET, "/api/sell-shares/".to_string()),
            (Method::POST, "/api/confirm-payment/4/".to_string()),
            (Method::GET, "/api/sell-shares/".to_string()),
        ]
    );
}

#[test]
fn failed_refetch_keeps_the_local_confirmation() {
    let transport = FakeTransport::new()
        .route(
            Method::GET,
            "/api/sell-shares/",
            200,
            json!({"data": [share(4, true, "pending")]}),
        )
        .fail_after(Method::GET, "/api/sell-shares/", 1)
        .route(
            Method::POST,
            "/api/confirm-payment/4/",
            200,
            json!({"success": true, "message": "Payment confirmed"}),
        );
    let client = client(transport, signed_in("tok", json!({"username": "amina"})));

    let board = sell::confirm(&client, 4).unwrap();
    assert!(board.is_pending_sync(4));
    let row = board.get(4).unwrap();
    assert_eq!(board.action(row), PAYMENT_CONFIRMED);
    assert_eq!(row.payment_status.as_deref(), Some("pending"));
    assert_eq!(client.transport().call_count(), 3);
}

#[test]
fn confirm_is_refused_for_the_waiting_side() {
    let transport = FakeTransport::new().route(
        Method::GET,
        "/api/sell-shares/",
        200,
        json!({"data": [share(4, false, "pending")]}),
    );
    let client = client(transport, signed_in("tok", json!({"username": "amina"})));
    assert!(sell::confirm(&client, 4).is_err());
    assert_eq!(client.transport().call_count(), 1);
}
