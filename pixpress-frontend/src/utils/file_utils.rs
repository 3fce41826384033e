use gloo::file::File;
use pixpress_controller::{data_url, FileMeta};
use web_sys::FileList;

pub fn first_file(files: Option<FileList>) -> Option<File> {
    files.and_then(|files| files.get(0)).map(File::from)
}

pub fn file_meta(file: &File) -> FileMeta {
    FileMeta {
        name: file.name(),
        mime_type: file.raw_mime_type(),
        size: file.size(),
    }
}

/// Read the whole file and encode it for an `<img>` preview.
pub async fn read_preview(file: &File) -> Result<String, String> {
    let bytes = gloo::file::futures::read_as_bytes(file)
        .await
        .map_err(|e| format!("Failed to read file: {:?}", e))?;

    Ok(data_url(&file.raw_mime_type(), &bytes))
}
