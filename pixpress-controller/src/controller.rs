use pixpress_types::{CompressParams, CompressResponse};
use std::cell::RefCell;
use thiserror::Error;

use crate::{
    api::{CompressApi, CompressReply, TransportError},
    format::format_file_size,
    preview::PreviewTicket,
    state::{
        FileInfo, ResultPanel, SubmissionState, View, CONNECTIVITY_FAILURE_MESSAGE,
        GENERIC_FAILURE_MESSAGE,
    },
    validation::{validate_params, FileMeta, Limits, ValidationError},
};

/// The file currently chosen for compression.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectedFile<P> {
    pub meta: FileMeta,
    pub payload: P,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SubmitRejected {
    #[error("No file selected")]
    NoFile,
    #[error("A submission is already in progress")]
    InFlight,
    #[error(transparent)]
    InvalidParams(#[from] ValidationError),
}

/// Snapshot handed to the API for one submission.
#[derive(Clone, Debug)]
pub struct SubmitTicket<P> {
    pub file: FileMeta,
    pub payload: P,
    pub params: CompressParams,
}

/// Owns the page's selection and submission state.
#[derive(Debug)]
pub struct UploadController<P> {
    limits: Limits,
    selected: Option<SelectedFile<P>>,
    preview: Option<String>,
    preview_generation: u64,
    validation_error: Option<String>,
    state: SubmissionState,
    response: Option<CompressResponse>,
}

impl<P: Clone> Default for UploadController<P> {
    fn default() -> Self {
        Self::new(Limits::default())
    }
}

impl<P: Clone> UploadController<P> {
    pub fn new(limits: Limits) -> Self {
        Self {
            limits,
            selected: None,
            preview: None,
            preview_generation: 0,
            validation_error: None,
            state: SubmissionState::Idle,
            response: None,
        }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn selected(&self) -> Option<&SelectedFile<P>> {
        self.selected.as_ref()
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// Body of the last successful compression, as the server sent it.
    pub fn response(&self) -> Option<&CompressResponse> {
        self.response.as_ref()
    }

    pub fn can_submit(&self) -> bool {
        self.selected.is_some() && !self.state.is_submitting()
    }

    /// Accept a new file if it passes validation. The returned ticket must be
    /// presented to [`set_preview`](Self::set_preview) once the preview read finishes.
    pub fn select_file(
        &mut self,
        meta: FileMeta,
        payload: P,
    ) -> Result<PreviewTicket, ValidationError> {
        // The outcome banner of the running submission takes precedence
        if self.state.is_submitting() {
            tracing::debug!("Ignoring {} while a submission is in flight", meta.name);
            return Err(ValidationError::Busy);
        }

        if let Err(err) = self.limits.validate(&meta) {
            tracing::warn!("Rejected {} ({}): {}", meta.name, meta.mime_type, err);
            self.validation_error = Some(err.to_string());
            return Err(err);
        }

        tracing::debug!("Selected {} ({} bytes)", meta.name, meta.size);

        self.selected = Some(SelectedFile { meta, payload });
        self.preview = None;
        self.preview_generation += 1;
        self.validation_error = None;
        self.state = SubmissionState::Idle;
        self.response = None;

        Ok(PreviewTicket {
            generation: self.preview_generation,
        })
    }

    /// Install a finished preview. Returns false when a newer selection has
    /// superseded the ticket.
    pub fn set_preview(&mut self, ticket: PreviewTicket, data_url: String) -> bool {
        if ticket.generation != self.preview_generation || self.selected.is_none() {
            tracing::debug!("Discarding stale preview #{}", ticket.generation);
            return false;
        }

        self.preview = Some(data_url);
        true
    }

    /// Show a locally detected problem without touching the selection.
    pub fn show_validation_error(&mut self, err: &ValidationError) {
        self.validation_error = Some(err.to_string());
    }

    /// Enter `Submitting` and hand out what the request needs.
    pub fn begin_submit(
        &mut self,
        params: CompressParams,
    ) -> Result<SubmitTicket<P>, SubmitRejected> {
        if self.state.is_submitting() {
            return Err(SubmitRejected::InFlight);
        }

        let selected = self.selected.as_ref().ok_or(SubmitRejected::NoFile)?;

        if let Err(err) = validate_params(&params) {
            self.validation_error = Some(err.to_string());
            return Err(err.into());
        }

        let ticket = SubmitTicket {
            file: selected.meta.clone(),
            payload: selected.payload.clone(),
            params,
        };

        tracing::info!("Submitting {} for compression", ticket.file.name);

        self.validation_error = None;
        self.state = SubmissionState::Submitting;
        self.response = None;
        Ok(ticket)
    }

    /// Leave `Submitting` with the outcome of the request.
    pub fn finish_submit(&mut self, outcome: Result<CompressReply, TransportError>) {
        self.validation_error = None;
        self.state = match outcome {
            Ok(reply) if reply.is_ok() && reply.body.success => {
                let panel = ResultPanel::from(&reply.body);
                tracing::info!(
                    "Compressed {} -> {} ({})",
                    panel.original_size,
                    panel.compressed_size,
                    panel.compression_ratio
                );
                self.response = Some(reply.body);
                SubmissionState::Success(panel)
            }
            Ok(reply) => {
                let message = reply
                    .body
                    .error
                    .filter(|message| !message.is_empty())
                    .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());
                tracing::warn!("Compression rejected ({}): {}", reply.status, message);
                SubmissionState::Failed(message)
            }
            Err(err) => {
                tracing::error!("Compression request failed: {}", err);
                SubmissionState::Failed(CONNECTIVITY_FAILURE_MESSAGE.to_string())
            }
        };
    }

    pub fn view(&self) -> View {
        let error = self.validation_error.clone().or_else(|| match &self.state {
            SubmissionState::Failed(message) => Some(message.clone()),
            _ => None,
        });

        let result = match &self.state {
            SubmissionState::Success(panel) => Some(panel.clone()),
            _ => None,
        };

        View {
            file_info: self.selected.as_ref().map(|selected| FileInfo {
                name: selected.meta.name.clone(),
                size: format_file_size(selected.meta.size),
            }),
            preview: self.preview.clone(),
            submit_enabled: self.can_submit(),
            loading: self.state.is_submitting(),
            error,
            result,
        }
    }
}

/// Drive one submission through the API. `on_change` fires after each state
/// transition so the host can re-render.
pub async fn run_submission<A>(
    controller: &RefCell<UploadController<A::Payload>>,
    api: &A,
    params: CompressParams,
    on_change: impl Fn(),
) -> Result<(), SubmitRejected>
where
    A: CompressApi + ?Sized,
{
    let ticket = controller.borrow_mut().begin_submit(params);
    on_change();
    let ticket = ticket?;

    let outcome = api
        .compress(&ticket.file, &ticket.payload, &ticket.params)
        .await;

    controller.borrow_mut().finish_submit(outcome);
    on_change();
    Ok(())
}
