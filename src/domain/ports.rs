use crate::config::StorageBackend;
use crate::domain::model::{NewRegistrant, Order, Payment, Registrant};
use crate::utils::error::{GatewayError, StoreError};
use async_trait::async_trait;

#[async_trait]
pub trait RegistrantStore: Send + Sync {
    /// 目前最大的號碼布編號；沒有任何紀錄時回傳 `None`
    async fn highest_chest_number(&self) -> Result<Option<i64>, StoreError>;

    /// 寫入一筆報名紀錄並配發號碼布（目前最大值 + 1，第一號為 1000）
    ///
    /// 讀取最大值與寫入必須是同一個原子操作，並行寫入不可拿到相同號碼。
    async fn create(&self, record: NewRegistrant) -> Result<Registrant, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(
        &self,
        amount: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<Order, GatewayError>;

    async fn fetch_payment(&self, payment_id: &str) -> Result<Payment, GatewayError>;
}

pub trait ConfigProvider: Send + Sync {
    fn host(&self) -> &str;
    fn port(&self) -> u16;
    fn storage_backend(&self) -> StorageBackend;
    fn database_url(&self) -> Option<&str>;
    fn database_max_connections(&self) -> u32;
    fn razorpay_key_id(&self) -> &str;
    fn razorpay_key_secret(&self) -> &str;
    fn razorpay_base_url(&self) -> &str;
    fn registration_fee(&self) -> i64;
    fn currency(&self) -> &str;
    fn static_dir(&self) -> Option<&str>;
}
