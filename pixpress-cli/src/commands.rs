use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use pixpress_controller::{
    run_submission, CompressApi, CompressParams, CompressResponse, FileMeta, ResultPanel,
    SubmissionState, UploadController,
};
use std::cell::RefCell;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tokio::fs as async_fs;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Summary,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "summary" => Ok(OutputFormat::Summary),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

/// A finished compression: the rendered panel and the body it came from.
#[derive(Clone, Debug)]
pub struct Compressed {
    pub panel: ResultPanel,
    pub response: CompressResponse,
}

/// Describe a local file the way a browser file handle would.
pub async fn file_meta(file_path: &Path) -> Result<FileMeta> {
    let metadata = async_fs::metadata(file_path)
        .await
        .with_context(|| format!("Failed to read file metadata: {}", file_path.display()))?;

    let name = file_path
        .file_name()
        .context("Invalid filename")?
        .to_string_lossy()
        .to_string();

    // Unknown extensions end up as octet-stream and fail validation
    let mime_type = mime_guess::from_path(file_path)
        .first_or_octet_stream()
        .to_string();

    Ok(FileMeta {
        name,
        mime_type,
        size: metadata.len(),
    })
}

/// Validate, submit and wait for one file. Validation and server failures come
/// back as errors carrying the user-facing message.
pub async fn compress_file<A>(
    api: &A,
    file_path: &Path,
    params: CompressParams,
    show_progress: bool,
) -> Result<Compressed>
where
    A: CompressApi<Payload = Vec<u8>>,
{
    let meta = file_meta(file_path).await?;
    let controller = RefCell::new(UploadController::<Vec<u8>>::default());

    // Reject before reading the whole file into memory
    controller.borrow().limits().validate(&meta)?;

    let file_data = async_fs::read(file_path)
        .await
        .with_context(|| format!("Failed to read file: {}", file_path.display()))?;

    let meta = FileMeta {
        size: file_data.len() as u64,
        ..meta
    };
    controller.borrow_mut().select_file(meta, file_data)?;

    let spinner = if show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .context("Failed to set spinner template")?,
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    run_submission(&controller, api, params, || {
        if let Some(pb) = &spinner {
            let view = controller.borrow().view();
            if view.loading {
                if let Some(info) = view.file_info {
                    pb.set_message(format!("Compressing {} ({})...", info.name, info.size));
                }
            }
        }
    })
    .await?;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let controller = controller.into_inner();
    match (controller.state(), controller.response()) {
        (SubmissionState::Success(panel), Some(response)) => Ok(Compressed {
            panel: panel.clone(),
            response: response.clone(),
        }),
        (SubmissionState::Failed(message), _) => Err(anyhow::anyhow!(message.clone())),
        _ => Err(anyhow::anyhow!("Submission did not complete")),
    }
}

/// The server's response body as pretty JSON, with the download URL made absolute.
pub fn render_json(response: &CompressResponse, download_url: Option<&str>) -> Result<String> {
    let response = CompressResponse {
        download_url: download_url
            .map(str::to_string)
            .or_else(|| response.download_url.clone()),
        ..response.clone()
    };
    serde_json::to_string_pretty(&response).context("Failed to serialize result")
}

pub fn print_result(
    result: &Compressed,
    download_url: Option<&str>,
    output: OutputFormat,
) -> Result<()> {
    match output {
        OutputFormat::Json => {
            println!("{}", render_json(&result.response, download_url)?);
        }
        OutputFormat::Summary => {
            let panel = &result.panel;
            println!("✅ Image compressed successfully!");
            println!("📦 Original size:    {}", panel.original_size);
            println!("🗜️  Compressed size:  {}", panel.compressed_size);
            println!("📉 Compression:      {}", panel.compression_ratio);
            println!("📄 Output file:      {}", panel.filename);
            if let Some(time) = &panel.processing_time {
                println!("⏱️  Processing time:  {}", time);
            }
            match download_url {
                Some(url) => println!("🔗 Download URL:     {}", url),
                None => println!("ℹ️  The server did not provide a download link"),
            }
        }
    }

    Ok(())
}
