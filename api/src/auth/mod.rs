pub mod extractors;
pub mod guards;
pub mod middleware;

pub use extractors::AdminToken;
