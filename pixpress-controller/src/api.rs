use async_trait::async_trait;
use pixpress_types::{CompressParams, CompressResponse};
use std::time::Duration;
use thiserror::Error;

use crate::validation::FileMeta;

/// Failures that prevent a usable response from reaching the controller.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransportError {
    #[error("Failed to build request: {0}")]
    Request(String),
    #[error("Request failed: {0}")]
    Network(String),
    #[error("Invalid response body: {0}")]
    InvalidBody(String),
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

/// A response whose body parsed as a [`CompressResponse`], whatever its status.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressReply {
    pub status: u16,
    pub body: CompressResponse,
}

impl CompressReply {
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The `/api/compress` endpoint as seen by the controller.
///
/// `Payload` is whatever handle the host keeps for file contents: a browser
/// `File` in the frontend, the bytes themselves on the command line.
#[async_trait(?Send)]
pub trait CompressApi {
    type Payload: Clone;

    async fn compress(
        &self,
        file: &FileMeta,
        payload: &Self::Payload,
        params: &CompressParams,
    ) -> Result<CompressReply, TransportError>;
}
