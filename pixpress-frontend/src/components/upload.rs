use crate::{
    components::{errors::ErrorBanner, progress::Spinner, result::ResultView},
    services::api::ApiClient,
    utils::file_utils,
};
use gloo::file::File;
use pixpress_controller::{
    format_file_size, parse_params, run_submission, UploadController, MAX_FILE_SIZE,
};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::{DragEvent, Event, HtmlInputElement};
use yew::prelude::*;

type Controller = Rc<RefCell<UploadController<File>>>;

// Validate and store the file, then start its preview read
fn select_file(controller: &Controller, file: File, refresh: &UseForceUpdateHandle) {
    let meta = file_utils::file_meta(&file);
    let ticket = controller.borrow_mut().select_file(meta, file.clone());
    refresh.force_update();

    if let Ok(ticket) = ticket {
        let controller = controller.clone();
        let refresh = refresh.clone();

        wasm_bindgen_futures::spawn_local(async move {
            match file_utils::read_preview(&file).await {
                Ok(url) => {
                    if controller.borrow_mut().set_preview(ticket, url) {
                        refresh.force_update();
                    }
                }
                Err(error) => log::warn!("Preview unavailable for {}: {}", file.name(), error),
            }
        });
    }
}

fn input_value(node: &NodeRef) -> String {
    node.cast::<HtmlInputElement>()
        .map(|input| input.value())
        .unwrap_or_default()
}

#[function_component(Upload)]
pub fn upload() -> Html {
    let file_input_ref = use_node_ref();
    let quality_ref = use_node_ref();
    let width_ref = use_node_ref();
    let height_ref = use_node_ref();
    let controller: Controller = use_mut_ref(UploadController::default);
    let api_client = use_state(ApiClient::new);
    let drag_over = use_state(|| false);
    let refresh = use_force_update();

    let view = controller.borrow().view();
    let is_submitting = view.loading;

    let on_file_select = {
        let controller = controller.clone();
        let refresh = refresh.clone();

        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            if let Some(file) = file_utils::first_file(input.files()) {
                select_file(&controller, file, &refresh);
            }
        })
    };

    let on_drag_over = {
        let drag_over = drag_over.clone();
        Callback::from(move |e: DragEvent| {
            e.prevent_default();
            drag_over.set(true);
        })
    };

    let on_drag_leave = {
        let drag_over = drag_over.clone();
        Callback::from(move |e: DragEvent| {
            e.prevent_default();
            drag_over.set(false);
        })
    };

    let on_drop = {
        let controller = controller.clone();
        let refresh = refresh.clone();
        let drag_over = drag_over.clone();

        Callback::from(move |e: DragEvent| {
            e.prevent_default();
            drag_over.set(false);

            if let Some(file) = file_utils::first_file(e.data_transfer().and_then(|dt| dt.files()))
            {
                select_file(&controller, file, &refresh);
            }
        })
    };

    let trigger_file_input = {
        let file_input_ref = file_input_ref.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(input) = file_input_ref.cast::<HtmlInputElement>() {
                input.click();
            }
        })
    };

    let on_compress = {
        let controller = controller.clone();
        let api_client = api_client.clone();
        let refresh = refresh.clone();
        let quality_ref = quality_ref.clone();
        let width_ref = width_ref.clone();
        let height_ref = height_ref.clone();

        Callback::from(move |_: MouseEvent| {
            let params = match parse_params(
                &input_value(&quality_ref),
                &input_value(&width_ref),
                &input_value(&height_ref),
            ) {
                Ok(params) => params,
                Err(error) => {
                    controller.borrow_mut().show_validation_error(&error);
                    refresh.force_update();
                    return;
                }
            };

            let controller = controller.clone();
            let api_client = (*api_client).clone();
            let refresh = refresh.clone();

            wasm_bindgen_futures::spawn_local(async move {
                let result = run_submission(&*controller, &api_client, params, || {
                    refresh.force_update()
                })
                .await;

                if let Err(rejected) = result {
                    log::debug!("Compression not started: {}", rejected);
                }
            });
        })
    };

    html! {
        <div class="max-w-2xl mx-auto bg-white dark:bg-gray-800 rounded-xl shadow-lg p-8">
            <h2 class="text-2xl font-bold text-gray-900 dark:text-gray-100 mb-8 text-center">{"Compress an image"}</h2>

            // Hidden file input
            <input
                id="fileInput"
                ref={file_input_ref}
                type="file"
                accept="image/png,image/jpeg,image/gif"
                class="hidden"
                onchange={on_file_select}
                disabled={is_submitting}
            />

            // Upload area
            <div
                id="uploadArea"
                class={format!(
                    "relative border-2 border-dashed rounded-xl p-12 text-center transition-all duration-200 cursor-pointer {}",
                    if *drag_over {
                        "border-blue-400 bg-blue-50 dark:bg-blue-900/50"
                    } else if is_submitting {
                        "border-gray-300 dark:border-gray-600 bg-gray-50 dark:bg-gray-700 cursor-not-allowed"
                    } else if view.file_info.is_some() {
                        "has-file border-green-400 bg-green-50 dark:bg-green-900/30"
                    } else {
                        "border-gray-300 dark:border-gray-600 hover:border-blue-400 hover:bg-blue-50 dark:hover:bg-blue-900/50"
                    }
                )}
                ondragover={on_drag_over}
                ondragleave={on_drag_leave}
                ondrop={on_drop}
                onclick={if !is_submitting { trigger_file_input.clone() } else { Callback::noop() }}
            >
                <div id="uploadIcon" class="text-4xl mb-4">
                    {if view.file_info.is_some() { "✅" } else { "📁" }}
                </div>

                if let Some(info) = &view.file_info {
                    <div id="fileInfo" class="space-y-1">
                        <p id="fileName" class="text-sm font-medium text-gray-900 dark:text-gray-100 truncate">{&info.name}</p>
                        <p id="fileSize" class="text-sm text-gray-500 dark:text-gray-400">{&info.size}</p>
                    </div>
                } else {
                    <div id="uploadText" class="space-y-2">
                        <p class="text-lg font-medium text-gray-700 dark:text-gray-300">
                            {"Click to select or drag and drop an image"}
                        </p>
                        <p class="text-sm text-gray-500 dark:text-gray-400">
                            {format!("PNG, JPG, JPEG or GIF (Max. {})", format_file_size(MAX_FILE_SIZE))}
                        </p>
                    </div>
                }
            </div>

            if view.file_info.is_some() {
                <button
                    id="changeFileBtn"
                    class="mt-3 text-sm text-blue-600 dark:text-blue-400 hover:underline disabled:text-gray-400"
                    onclick={trigger_file_input}
                    disabled={is_submitting}
                >
                    {"Choose another file"}
                </button>
            }

            if let Some(src) = &view.preview {
                <img id="preview" src={src.clone()} alt="Preview" class="mt-6 mx-auto max-h-64 rounded-lg" />
            }

            // Compression options
            <div class="mt-8 grid grid-cols-1 md:grid-cols-3 gap-6">
                <div>
                    <label class="block text-sm font-medium text-gray-700 dark:text-gray-300 mb-2">
                        {"Quality (0-100)"}
                    </label>
                    <input
                        id="quality"
                        ref={quality_ref}
                        type="number"
                        min="0"
                        max="100"
                        placeholder="80"
                        class="w-full px-3 py-2 border border-gray-300 dark:border-gray-600 bg-white dark:bg-gray-700 text-gray-900 dark:text-gray-100 rounded-lg focus:outline-none focus:ring-2 focus:ring-blue-500 focus:border-transparent"
                        disabled={is_submitting}
                    />
                </div>
                <div>
                    <label class="block text-sm font-medium text-gray-700 dark:text-gray-300 mb-2">
                        {"Max width (px)"}
                    </label>
                    <input
                        id="width"
                        ref={width_ref}
                        type="number"
                        min="1"
                        placeholder="1920"
                        class="w-full px-3 py-2 border border-gray-300 dark:border-gray-600 bg-white dark:bg-gray-700 text-gray-900 dark:text-gray-100 rounded-lg focus:outline-none focus:ring-2 focus:ring-blue-500 focus:border-transparent"
                        disabled={is_submitting}
                    />
                </div>
                <div>
                    <label class="block text-sm font-medium text-gray-700 dark:text-gray-300 mb-2">
                        {"Max height (px)"}
                    </label>
                    <input
                        id="height"
                        ref={height_ref}
                        type="number"
                        min="1"
                        placeholder="1080"
                        class="w-full px-3 py-2 border border-gray-300 dark:border-gray-600 bg-white dark:bg-gray-700 text-gray-900 dark:text-gray-100 rounded-lg focus:outline-none focus:ring-2 focus:ring-blue-500 focus:border-transparent"
                        disabled={is_submitting}
                    />
                </div>
            </div>

            // Compress button
            <button
                id="compressBtn"
                class="mt-8 w-full bg-blue-600 text-white py-3 px-6 rounded-lg hover:bg-blue-700 disabled:bg-gray-400 disabled:cursor-not-allowed transition-colors font-medium text-lg"
                onclick={on_compress}
                disabled={!view.submit_enabled}
            >
                {if is_submitting { "Compressing..." } else { "Compress" }}
            </button>

            if view.loading {
                <Spinner message={Some("Compressing image...".to_string())} />
            }

            if let Some(message) = &view.error {
                <ErrorBanner message={message.clone()} />
            }

            if let Some(panel) = &view.result {
                <ResultView panel={panel.clone()} />
            }
        </div>
    }
}
