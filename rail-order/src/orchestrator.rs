use std::sync::Arc;

use rail_core::payment::{ChargeStatus, PaymentAdapter, PaymentIntent};
use rail_core::repository::RepoError;
use rail_shared::PaymentMethod;
use tracing::{error, info};
use uuid::Uuid;

pub const CURRENCY: &str = "INR";
const UPI_PAYEE_ADDRESS: &str = "mockupi@bank";
const UPI_PAYEE_NAME: &str = "RailConnect";

/// Deep link that UPI apps open to pay `amount` rupees to the merchant.
pub fn upi_intent_link(amount: i32) -> String {
    format!(
        "upi://pay?pa={}&pn={}&am={}",
        UPI_PAYEE_ADDRESS, UPI_PAYEE_NAME, amount
    )
}

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("Payment failed. Please try again.")]
    Gateway(#[source] RepoError),

    #[error("Payment was not completed: {0:?}")]
    Declined(ChargeStatus),
}

pub struct PaymentOrchestrator {
    adapter: Arc<dyn PaymentAdapter>,
}

impl PaymentOrchestrator {
    pub fn new(adapter: Arc<dyn PaymentAdapter>) -> Self {
        Self { adapter }
    }

    pub async fn initialize_payment(
        &self,
        reference: &str,
        amount: i32,
        method: PaymentMethod,
    ) -> Result<PaymentIntent, PaymentError> {
        self.adapter
            .create_intent(reference, amount, CURRENCY, method)
            .await
            .map_err(|e| {
                error!("Error creating payment intent for {}: {}", reference, e);
                PaymentError::Gateway(e)
            })
    }

    pub async fn process_payment(&self, intent: &PaymentIntent) -> Result<ChargeStatus, PaymentError> {
        self.adapter.process_payment(intent).await.map_err(|e| {
            error!("Payment {} failed: {}", intent.id, e);
            PaymentError::Gateway(e)
        })
    }

    /// Create and immediately charge an intent. Anything short of `Succeeded` is an error.
    pub async fn charge(
        &self,
        reference: &str,
        amount: i32,
        method: PaymentMethod,
    ) -> Result<PaymentIntent, PaymentError> {
        let mut intent = self.initialize_payment(reference, amount, method).await?;
        let status = self.process_payment(&intent).await?;
        if status != ChargeStatus::Succeeded {
            return Err(PaymentError::Declined(status));
        }
        intent.status = status;
        info!("Payment {} of {} {} via {} succeeded", intent.id, amount, CURRENCY, method);
        Ok(intent)
    }
}

/// Gateway stand-in: every charge succeeds unless the reference is `fail-payment`.
pub struct MockPaymentAdapter;

pub const FAILING_REFERENCE: &str = "fail-payment";

#[async_trait::async_trait]
impl PaymentAdapter for MockPaymentAdapter {
    async fn create_intent(
        &self,
        reference: &str,
        amount: i32,
        currency: &str,
        method: PaymentMethod,
    ) -> Result<PaymentIntent, RepoError> {
        Ok(PaymentIntent {
            id: format!("mock_pi_{}", Uuid::new_v4().simple()),
            reference: reference.to_string(),
            amount,
            currency: currency.to_string(),
            method,
            status: ChargeStatus::RequiresPaymentMethod,
            created_at: chrono::Utc::now(),
        })
    }

    async fn process_payment(&self, intent: &PaymentIntent) -> Result<ChargeStatus, RepoError> {
        if intent.reference == FAILING_REFERENCE {
            return Err("Simulated payment gateway failure".into());
        }
        Ok(ChargeStatus::Succeeded)
    }
}
