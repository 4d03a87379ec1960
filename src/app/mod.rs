//! Wires configuration, adapters and the HTTP router into a running server.

use crate::adapters::{MemoryRegistrantStore, PostgresRegistrantStore, RazorpayClient};
use crate::api::{create_router, AppState};
use crate::config::StorageBackend;
use crate::core::{ConfigProvider, PaymentGateway, RegistrantStore, RegistrationService};
use crate::utils::error::{AppError, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

/// 依設定建立儲存層
///
/// postgres 在啟動時嘗試建立資料表；資料庫尚未就緒時只記錄錯誤，
/// 伺服器照常啟動（靜態頁面仍可用），第一次存取時再重試。
pub async fn build_store<C: ConfigProvider + ?Sized>(config: &C) -> Result<Arc<dyn RegistrantStore>> {
    match config.storage_backend() {
        StorageBackend::Memory => {
            warn!("Using in-memory storage, registrants are lost on restart");
            Ok(Arc::new(MemoryRegistrantStore::new()))
        }
        StorageBackend::Postgres => {
            let url = config.database_url().ok_or_else(|| AppError::MissingConfigError {
                field: "database.url".to_string(),
            })?;
            let store = PostgresRegistrantStore::connect_lazy(url, config.database_max_connections())?;
            match store.ensure_schema().await {
                Ok(()) => info!("✅ PostgreSQL connected"),
                Err(e) => error!("❌ PostgreSQL not ready, will retry on first use: {}", e),
            }
            Ok(Arc::new(store))
        }
    }
}

pub fn build_gateway<C: ConfigProvider + ?Sized>(config: &C) -> Arc<dyn PaymentGateway> {
    Arc::new(RazorpayClient::with_base_url(
        config.razorpay_base_url(),
        config.razorpay_key_id(),
        config.razorpay_key_secret(),
    ))
}

pub async fn build_service<C: ConfigProvider + ?Sized>(config: &C) -> Result<RegistrationService> {
    let store = build_store(config).await?;
    let gateway = build_gateway(config);
    Ok(RegistrationService::with_fee(
        store,
        gateway,
        config.registration_fee(),
        config.currency(),
    ))
}

pub async fn serve<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    let registration = build_service(config).await?;

    let static_dir = config.static_dir().map(Path::new);
    if let Some(dir) = static_dir {
        if !dir.is_dir() {
            warn!("Static directory {} does not exist", dir.display());
        }
    }

    let router = create_router(AppState { registration }, static_dir);

    let addr = format!("{}:{}", config.host(), config.port());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 Server running on http://{}", addr);
    info!("  POST /api/auth/register        - Validate and create payment order");
    info!("  POST /api/auth/verify-payment  - Verify payment and register");

    axum::serve(listener, router).await?;

    info!("Server stopped");
    Ok(())
}
