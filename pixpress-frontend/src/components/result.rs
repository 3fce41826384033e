use pixpress_controller::ResultPanel;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ResultViewProps {
    pub panel: ResultPanel,
}

#[function_component(ResultView)]
pub fn result_view(props: &ResultViewProps) -> Html {
    let panel = &props.panel;

    let row = |label: &str, id: &str, value: &str| {
        html! {
            <div class="flex justify-between py-2 border-b border-gray-200 dark:border-gray-700">
                <span class="text-sm text-gray-500 dark:text-gray-400">{label.to_string()}</span>
                <span id={id.to_string()} class="text-sm font-medium text-gray-900 dark:text-gray-100">{value.to_string()}</span>
            </div>
        }
    };

    html! {
        <div id="result" class="mt-6 space-y-4">
            <div class="p-4 bg-green-50 dark:bg-green-900/50 border border-green-200 dark:border-green-800 rounded-lg">
                <div class="flex items-center">
                    <svg class="w-5 h-5 text-green-400 mr-3" fill="none" stroke="currentColor" viewBox="0 0 24 24">
                        <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M9 12l2 2 4-4m6 2a9 9 0 11-18 0 9 9 0 0118 0z" />
                    </svg>
                    <p class="text-green-800 dark:text-green-300 text-sm">{"Image compressed successfully!"}</p>
                </div>
            </div>

            <div class="bg-gray-50 dark:bg-gray-700 rounded-lg p-4">
                {row("Original size", "originalSize", &panel.original_size)}
                {row("Compressed size", "compressedSize", &panel.compressed_size)}
                {row("Compression ratio", "compressionRatio", &panel.compression_ratio)}
                {row("Output file", "filename", &panel.filename)}
                if let Some(time) = &panel.processing_time {
                    {row("Processing time", "processingTime", time)}
                }
            </div>

            if let Some(url) = &panel.download_url {
                <a
                    id="downloadBtn"
                    href={url.clone()}
                    download={panel.filename.clone()}
                    class="block w-full text-center bg-green-600 text-white py-3 px-6 rounded-lg hover:bg-green-700 transition-colors font-medium"
                >
                    {"Download"}
                </a>
            }
        </div>
    }
}
