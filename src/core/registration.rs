use crate::core::{
    Order, PaymentGateway, Registrant, RegistrantStore, RegistrationFields, VerificationFields,
};
use crate::utils::error::{GatewayError, RegistrationError};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub const FIRST_CHEST_NUMBER: i64 = 1000;
pub const DEFAULT_REGISTRATION_FEE: i64 = 49900;
pub const DEFAULT_CURRENCY: &str = "INR";

/// 號碼布規則；儲存層在寫入的同一個鎖內套用
pub fn next_chest_number(highest: Option<i64>) -> i64 {
    highest.map_or(FIRST_CHEST_NUMBER, |n| n + 1)
}

pub fn receipt_id(now: DateTime<Utc>) -> String {
    format!("order_rcptid_{}", now.timestamp_millis())
}

/// 報名流程：驗證 → 建立訂單 → 確認付款 → 配發號碼布並存檔
///
/// 下單與確認之間沒有伺服器端的 session，確認時使用前端帶回的欄位。
#[derive(Clone)]
pub struct RegistrationService {
    store: Arc<dyn RegistrantStore>,
    gateway: Arc<dyn PaymentGateway>,
    fee: i64,
    currency: String,
}

impl RegistrationService {
    pub fn new(store: Arc<dyn RegistrantStore>, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self::with_fee(store, gateway, DEFAULT_REGISTRATION_FEE, DEFAULT_CURRENCY)
    }

    pub fn with_fee(
        store: Arc<dyn RegistrantStore>,
        gateway: Arc<dyn PaymentGateway>,
        fee: i64,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            store,
            gateway,
            fee,
            currency: currency.into(),
        }
    }

    pub fn fee(&self) -> i64 {
        self.fee
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub async fn initiate_order(&self, fields: &RegistrationFields) -> Result<Order, RegistrationError> {
        let details = fields.validate().map_err(RegistrationError::Validation)?;

        let receipt = receipt_id(Utc::now());
        debug!("Creating order {} for {} ({})", receipt, details.email, details.category);

        let order = self
            .gateway
            .create_order(self.fee, &self.currency, &receipt)
            .await
            .map_err(|e| {
                error!("❌ Error creating order {}: {}", receipt, e);
                e
            })?;

        info!("🛒 Order created: {} ({} {})", order.id, order.amount, order.currency);
        Ok(order)
    }

    pub async fn verify_and_register(
        &self,
        fields: &VerificationFields,
    ) -> Result<Registrant, RegistrationError> {
        let payment_id = fields
            .validate_payment_id()
            .map_err(RegistrationError::Validation)?;

        let payment = match self.gateway.fetch_payment(&payment_id).await {
            Ok(payment) => payment,
            Err(GatewayError::PaymentNotFound(_)) => {
                warn!("Payment {} does not exist", payment_id);
                return Err(RegistrationError::PaymentNotVerified {
                    payment_id,
                    status: None,
                });
            }
            Err(e) => {
                error!("❌ Error fetching payment {}: {}", payment_id, e);
                return Err(e.into());
            }
        };

        if !payment.is_captured() {
            warn!("Payment {} is {}, not captured", payment_id, payment.status);
            return Err(RegistrationError::PaymentNotVerified {
                payment_id,
                status: Some(payment.status),
            });
        }

        if let Some(order_id) = fields.order_id() {
            if payment.order_id.as_deref() != Some(order_id) {
                warn!(
                    "Payment {} belongs to order {:?}, not {}",
                    payment_id, payment.order_id, order_id
                );
                return Err(RegistrationError::PaymentNotVerified {
                    payment_id,
                    status: Some(payment.status),
                });
            }
        }

        let record = fields
            .registrant
            .record_details()?
            .into_new_registrant(payment_id.clone());

        let registrant = self.store.create(record).await.map_err(|e| {
            error!("❌ Error saving registrant for payment {}: {}", payment_id, e);
            e
        })?;

        info!(
            "✅ Registrant saved: #{} chest {} (payment {})",
            registrant.id, registrant.chest_number, registrant.payment_id
        );
        Ok(registrant)
    }
}
