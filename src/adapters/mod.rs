// Adapters layer: concrete implementations of the domain ports.

pub mod razorpay;
pub mod storage;

pub use razorpay::RazorpayClient;
pub use storage::{MemoryRegistrantStore, PostgresRegistrantStore};
