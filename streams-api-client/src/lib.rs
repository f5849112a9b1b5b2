pub mod api;

#[cfg(test)]
mod tests;

pub use api::{StreamsApiClient, DEFAULT_TIMEOUT, USER_AGENT};
