//! Scripted in-process gateway for unit tests

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};

use super::{
    CheckoutData, GatewayEnvelope, GatewayError, InitializeRequest, PaymentGateway, VerifyData,
};

/// Canned answer for one endpoint
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Body(Value),
    Http(u16, String),
    Timeout,
}

impl Reply {
    fn produce<T: serde::de::DeserializeOwned>(&self) -> Result<GatewayEnvelope<T>, GatewayError> {
        match self {
            Reply::Body(v) => Ok(GatewayEnvelope::from_value(v.clone())),
            Reply::Http(status, message) => Err(GatewayError::Http {
                status: *status,
                message: message.clone(),
            }),
            Reply::Timeout => Err(GatewayError::Timeout),
        }
    }
}

pub(crate) struct ScriptedGateway {
    init_reply: Mutex<Reply>,
    verify_reply: Mutex<Reply>,
    pub init_calls: AtomicUsize,
    pub verify_calls: AtomicUsize,
    pub last_init: Mutex<Option<InitializeRequest>>,
}

impl ScriptedGateway {
    /// Checkout succeeds; verify confirms a payment of `amount`
    pub fn happy(amount: u32) -> Self {
        Self {
            init_reply: Mutex::new(Reply::Body(json!({
                "status": "success",
                "message": "Hosted Link",
                "data": { "checkout_url": "https://checkout.test/pay" }
            }))),
            verify_reply: Mutex::new(Reply::Body(json!({
                "status": "success",
                "message": "Payment details",
                "data": { "status": "success", "amount": amount, "currency": "ETB" }
            }))),
            init_calls: AtomicUsize::new(0),
            verify_calls: AtomicUsize::new(0),
            last_init: Mutex::new(None),
        }
    }

    pub fn set_init(&self, reply: Reply) {
        *self.init_reply.lock().unwrap() = reply;
    }

    pub fn set_verify(&self, reply: Reply) {
        *self.verify_reply.lock().unwrap() = reply;
    }

    pub fn init_count(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }

    pub fn verify_count(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for ScriptedGateway {
    fn name(&self) -> &'static str {
        "chapa"
    }

    async fn initialize(
        &self,
        request: &InitializeRequest,
    ) -> Result<GatewayEnvelope<CheckoutData>, GatewayError> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_init.lock().unwrap() = Some(request.clone());
        let reply = self.init_reply.lock().unwrap().clone();
        reply.produce()
    }

    async fn verify(&self, _tx_ref: &str) -> Result<GatewayEnvelope<VerifyData>, GatewayError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.verify_reply.lock().unwrap().clone();
        // Let concurrent verifiers interleave
        tokio::task::yield_now().await;
        reply.produce()
    }
}
