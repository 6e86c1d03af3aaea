// cargo watch -x 'fmt' -x 'run -- -s <subscription-id>'

pub mod azure;
pub mod cli;
pub mod error;
pub mod export;
pub mod models;
pub mod output;

pub use error::Error;
