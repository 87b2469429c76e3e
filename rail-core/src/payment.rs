use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rail_shared::PaymentMethod;
use serde::{Deserialize, Serialize};

use crate::repository::RepoError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChargeStatus {
    RequiresPaymentMethod,
    Processing,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String, // Provider's ID (e.g., pi_123)
    pub reference: String,
    pub amount: i32,
    pub currency: String,
    pub method: PaymentMethod,
    pub status: ChargeStatus,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait PaymentAdapter: Send + Sync {
    /// Create a payment intent with the provider
    async fn create_intent(
        &self,
        reference: &str,
        amount: i32,
        currency: &str,
        method: PaymentMethod,
    ) -> Result<PaymentIntent, RepoError>;

    /// Charge a previously created intent
    async fn process_payment(&self, intent: &PaymentIntent) -> Result<ChargeStatus, RepoError>;
}
