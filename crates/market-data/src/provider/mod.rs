//! Data-source clients and the seams they plug into.

pub mod circuit_breaker;
pub mod justetf;
pub mod traits;
pub mod yahoo;

pub use circuit_breaker::CircuitBreaker;
pub use justetf::JustEtfProvider;
pub use traits::{DiscoveryProvider, PrimaryClient};
pub use yahoo::YahooClient;
