pub mod order;
pub mod pix;
pub mod transaction;
