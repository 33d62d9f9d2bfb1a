pub mod pool;
pub mod simulated;
