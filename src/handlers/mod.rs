pub mod client_ip;
pub mod error;
pub mod payment_status;
pub mod pix;
pub mod webhook;
