use async_trait::async_trait;
use futures::future::{select, Either};
use gloo::file::File;
use gloo::net::http::Request;
use gloo::timers::future::TimeoutFuture;
use pixpress_controller::{
    CompressApi, CompressParams, CompressReply, CompressResponse, FileMeta, TransportError,
    COMPRESS_PATH, FIELD_IMAGE,
};
use std::time::Duration;
use web_sys::FormData;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, PartialEq)]
pub struct ApiClient {
    pub base_url: String,
    pub timeout: Duration,
}

impl ApiClient {
    pub fn new() -> Self {
        // Empty base URL means same origin
        let base_url = option_env!("PIXPRESS_API_URL")
            .unwrap_or("")
            .trim_end_matches('/')
            .to_string();

        Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    fn form_data(
        file: &FileMeta,
        payload: &File,
        params: &CompressParams,
    ) -> Result<FormData, TransportError> {
        let form_data = FormData::new().map_err(|e| {
            TransportError::Request(format!("Failed to create form data: {:?}", e))
        })?;

        let web_file: &web_sys::File = payload.as_ref();
        form_data
            .append_with_blob_and_filename(FIELD_IMAGE, web_file, &file.name)
            .map_err(|e| TransportError::Request(format!("Failed to append image: {:?}", e)))?;

        for (name, value) in params.form_fields() {
            form_data.append_with_str(name, &value).map_err(|e| {
                TransportError::Request(format!("Failed to append {}: {:?}", name, e))
            })?;
        }

        Ok(form_data)
    }

    async fn post_compress(&self, form_data: FormData) -> Result<CompressReply, TransportError> {
        let url = format!("{}{}", self.base_url, COMPRESS_PATH);

        let response = Request::post(&url)
            .body(form_data)
            .map_err(|e| TransportError::Request(format!("Failed to create request: {:?}", e)))?
            .send()
            .await
            .map_err(|e| TransportError::Network(format!("Request failed: {:?}", e)))?;

        let status = response.status();
        let body: CompressResponse = response
            .json()
            .await
            .map_err(|e| TransportError::InvalidBody(format!("{:?}", e)))?;

        Ok(CompressReply { status, body })
    }
}

#[async_trait(?Send)]
impl CompressApi for ApiClient {
    type Payload = File;

    async fn compress(
        &self,
        file: &FileMeta,
        payload: &File,
        params: &CompressParams,
    ) -> Result<CompressReply, TransportError> {
        let form_data = Self::form_data(file, payload, params)?;

        let request = Box::pin(self.post_compress(form_data));
        let timeout = TimeoutFuture::new(self.timeout.as_millis() as u32);

        match select(request, timeout).await {
            Either::Left((reply, _)) => reply,
            Either::Right(_) => {
                log::warn!("{} timed out after {:?}", COMPRESS_PATH, self.timeout);
                Err(TransportError::Timeout(self.timeout))
            }
        }
    }
}
