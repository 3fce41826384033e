pub mod errors;
pub mod header;
pub mod progress;
pub mod result;
pub mod upload;
