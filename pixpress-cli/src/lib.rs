pub mod client;
pub mod commands;

pub use client::{build_client, HttpCompressApi};
pub use commands::{compress_file, file_meta, print_result, render_json, Compressed, OutputFormat};
