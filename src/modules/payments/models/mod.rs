pub mod payment;

pub use payment::{Payment, PaymentMode, PaymentRequest};
