//! In-process fakes for the outbound seams, shared by service and router tests.

use crate::models::order::OrderPayload;
use crate::models::pix::NewTransaction;
use crate::services::gateway_client::{GatewayError, PaymentGateway};
use crate::services::order_notifier::{NotifyError, OrderNotifier};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub fn pending_record(id: &str) -> Value {
    json!({
        "id": id,
        "amount": 1000,
        "status": "waiting_payment",
        "paymentMethod": "pix",
        "createdAt": "2024-01-15T10:30:00.000Z",
        "paidAt": null,
        "customer": {
            "name": "Maria Silva",
            "email": "maria@example.com",
            "document": { "number": "12345678909", "type": "cpf" },
            "ip": "189.6.10.20"
        },
        "items": [{ "title": "Ebook", "unitPrice": 1000, "quantity": 1, "tangible": false }],
        "pix": { "qrcode": "00020101021226850014br.gov.bcb.pix", "expirationDate": "2024-01-17" }
    })
}

pub fn paid_record(id: &str) -> Value {
    let mut record = pending_record(id);
    record["status"] = json!("paid");
    record["paidAt"] = json!("2024-01-15T10:35:12.481Z");
    record["fee"] = json!({ "fixedAmount": 149 });
    record
}

#[derive(Default)]
pub struct FakeGateway {
    created: Option<Value>,
    fetched: Option<Value>,
    rejection: Option<(u16, Value)>,
    calls: AtomicUsize,
    created_requests: Mutex<Vec<Value>>,
    fetched_ids: Mutex<Vec<String>>,
}

impl FakeGateway {
    pub fn with_created(record: Value) -> Self {
        Self {
            created: Some(record),
            ..Default::default()
        }
    }

    pub fn with_fetched(record: Value) -> Self {
        Self {
            fetched: Some(record),
            ..Default::default()
        }
    }

    pub fn with_records(created: Value, fetched: Value) -> Self {
        Self {
            created: Some(created),
            fetched: Some(fetched),
            ..Default::default()
        }
    }

    pub fn rejecting(status: u16, body: Value) -> Self {
        Self {
            rejection: Some((status, body)),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn created_requests(&self) -> Vec<Value> {
        self.created_requests.lock().unwrap().clone()
    }

    pub fn fetched_ids(&self) -> Vec<String> {
        self.fetched_ids.lock().unwrap().clone()
    }

    fn answer(&self, record: &Option<Value>) -> Result<Value, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some((status, body)) = &self.rejection {
            return Err(GatewayError::Upstream {
                status: *status,
                body: body.clone(),
            });
        }
        record.clone().ok_or(GatewayError::Upstream {
            status: 404,
            body: json!({ "message": "Transaction not found" }),
        })
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_transaction(&self, request: &NewTransaction) -> Result<Value, GatewayError> {
        self.created_requests
            .lock()
            .unwrap()
            .push(serde_json::to_value(request).unwrap());
        self.answer(&self.created)
    }

    async fn get_transaction(&self, id: &str) -> Result<Value, GatewayError> {
        self.fetched_ids.lock().unwrap().push(id.to_string());
        self.answer(&self.fetched)
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    fail: bool,
    attempts: AtomicUsize,
    orders: Mutex<Vec<OrderPayload>>,
}

impl RecordingNotifier {
    /// Every send fails as if the consumer were unreachable.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn orders(&self) -> Vec<OrderPayload> {
        self.orders.lock().unwrap().clone()
    }
}

#[async_trait]
impl OrderNotifier for RecordingNotifier {
    async fn send_order(&self, payload: &OrderPayload) -> Result<(), NotifyError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(NotifyError::Rejected {
                status: 502,
                body: "connection reset by peer".to_string(),
            });
        }
        self.orders.lock().unwrap().push(payload.clone());
        Ok(())
    }
}
