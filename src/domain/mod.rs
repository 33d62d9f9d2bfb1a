pub mod payment;
pub mod pool;
pub mod ports;
