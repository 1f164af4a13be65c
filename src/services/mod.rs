mod backend;
pub mod export;
#[cfg(test)]
pub mod mock_backend;

pub use backend::BackendClient;
