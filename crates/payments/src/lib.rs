//! Payment processing: the gateway seam, its HTTP and simulated
//! implementations, and the recorder that owns the payment ledger.

pub mod gateway;
pub mod http;
pub mod recorder;
pub mod simulated;

pub use gateway::{ChargeRequest, ChargeResult, ChargeStatus, GatewayError, PaymentGateway};
pub use http::{GatewayConfig, HttpPaymentGateway};
pub use recorder::PaymentRecorder;
pub use simulated::SimulatedGateway;
