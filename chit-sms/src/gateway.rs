//! Gateway adapters for sending SMS
//!
//! Supports:
//! - Simulated gateway (in-process, configurable failures)
//!
//! Real carrier integrations implement [`SmsGateway`] the same way.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::encoding::{SmsEncoding, detect_encoding, segment_count};
use crate::error::{SmsError, SmsResult};

/// One outgoing text message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsMessage {
    /// Destination number (10 digits, already normalized by the caller)
    pub to: String,
    /// Registered sender header, e.g. `CHITFD`
    pub sender_id: String,
    pub body: String,
}

impl SmsMessage {
    pub fn new(to: impl Into<String>, sender_id: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            sender_id: sender_id.into(),
            body: body.into(),
        }
    }
}

/// Gateway acknowledgement for an accepted message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    pub message_id: String,
    pub to: String,
    pub encoding: SmsEncoding,
    pub segments: u16,
}

/// Trait for SMS gateway adapters
#[async_trait]
pub trait SmsGateway: Send + Sync + std::fmt::Debug {
    /// Hand one message to the carrier.
    async fn send(&self, message: &SmsMessage) -> SmsResult<DeliveryReceipt>;

    /// Check if the gateway is reachable
    async fn is_online(&self) -> bool {
        true
    }
}

/// In-process gateway standing in for a carrier
///
/// Every message is accepted except those addressed to numbers marked
/// unreachable. Accepted messages are kept in an outbox for inspection.
#[derive(Debug, Default)]
pub struct SimulatedGateway {
    unreachable: HashSet<String>,
    latency: Duration,
    offline: bool,
    next_id: AtomicU64,
    outbox: Mutex<Vec<SmsMessage>>,
}

impl SimulatedGateway {
    /// Create a gateway that accepts every message immediately
    pub fn new() -> Self {
        Self::default()
    }

    /// Numbers the simulated carrier reports as undeliverable
    pub fn with_unreachable<I, S>(mut self, numbers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unreachable.extend(numbers.into_iter().map(Into::into));
        self
    }

    /// Delay before each message is acknowledged
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Make every send fail with [`SmsError::Unavailable`]
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    /// Messages accepted so far, in send order
    pub fn outbox(&self) -> Vec<SmsMessage> {
        self.outbox.lock().clone()
    }
}

#[async_trait]
impl SmsGateway for SimulatedGateway {
    #[instrument(skip(self, message), fields(to = %message.to, body_len = message.body.len()))]
    async fn send(&self, message: &SmsMessage) -> SmsResult<DeliveryReceipt> {
        if self.offline {
            warn!("Simulated gateway offline");
            return Err(SmsError::Unavailable("simulated gateway offline".into()));
        }
        if message.to.is_empty() || !message.to.chars().all(|c| c.is_ascii_digit()) {
            return Err(SmsError::InvalidNumber(message.to.clone()));
        }

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if self.unreachable.contains(&message.to) {
            warn!("Handset unreachable");
            return Err(SmsError::Undeliverable(message.to.clone()));
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let receipt = DeliveryReceipt {
            message_id: format!("SIM-{:06}", id),
            to: message.to.clone(),
            encoding: detect_encoding(&message.body),
            segments: segment_count(&message.body),
        };
        self.outbox.lock().push(message.clone());

        info!(message_id = %receipt.message_id, segments = receipt.segments, "SMS accepted");
        Ok(receipt)
    }

    async fn is_online(&self) -> bool {
        !self.offline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_simulated_accepts_and_records() {
        let gateway = SimulatedGateway::new();
        let receipt = gateway
            .send(&SmsMessage::new("9876543210", "CHITFD", "Dear Ravi"))
            .await
            .unwrap();
        assert_eq!(receipt.message_id, "SIM-000001");
        assert_eq!(receipt.segments, 1);
        assert_eq!(receipt.encoding, SmsEncoding::Gsm7);
        assert_eq!(gateway.outbox().len(), 1);
        assert!(gateway.is_online().await);
    }

    #[tokio::test]
    async fn test_simulated_unreachable_number() {
        let gateway = SimulatedGateway::new().with_unreachable(["9876543210"]);
        let err = gateway
            .send(&SmsMessage::new("9876543210", "CHITFD", "hi"))
            .await
            .unwrap_err();
        assert_eq!(err, SmsError::Undeliverable("9876543210".into()));
        assert!(!err.is_gateway_wide());
        assert!(gateway.outbox().is_empty());
    }

    #[tokio::test]
    async fn test_simulated_rejects_malformed_number() {
        let gateway = SimulatedGateway::new();
        let err = gateway
            .send(&SmsMessage::new("98-76", "CHITFD", "hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, SmsError::InvalidNumber(_)));
    }

    #[tokio::test]
    async fn test_simulated_offline() {
        let gateway = SimulatedGateway::new().offline();
        assert!(!gateway.is_online().await);
        let err = gateway
            .send(&SmsMessage::new("9876543210", "CHITFD", "hi"))
            .await
            .unwrap_err();
        assert!(err.is_gateway_wide());
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_latency() {
        let gateway = SimulatedGateway::new().with_latency(Duration::from_millis(250));
        let start = tokio::time::Instant::now();
        gateway
            .send(&SmsMessage::new("9876543210", "CHITFD", "hi"))
            .await
            .unwrap();
        assert!(start.elapsed() >= Duration::from_millis(250));
    }

    #[test]
    fn test_receipt_serializes() {
        let receipt = DeliveryReceipt {
            message_id: "SIM-000001".into(),
            to: "9876543210".into(),
            encoding: SmsEncoding::Ucs2,
            segments: 2,
        };
        let json = serde_json::to_value(&receipt).unwrap();
        assert_eq!(json["encoding"], "ucs2");
    }
}
