pub mod dataset;
pub mod export;
pub mod percentile;
pub mod persist;
pub mod pool;
pub mod rankings;
pub mod roles;
pub mod sample_data;
pub mod segment;
pub mod state;
