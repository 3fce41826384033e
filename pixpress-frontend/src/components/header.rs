use web_sys::window;
use yew::prelude::*;

const DARK_MODE_KEY: &str = "pixpress-dark-mode";

fn initial_dark_mode() -> bool {
    if let Some(window) = window() {
        if let Ok(Some(storage)) = window.local_storage() {
            if let Ok(Some(stored_mode)) = storage.get_item(DARK_MODE_KEY) {
                return stored_mode == "true";
            }
        }
        // Fallback to system preference
        if let Some(media_query) = window
            .match_media("(prefers-color-scheme: dark)")
            .ok()
            .flatten()
        {
            return media_query.matches();
        }
    }
    false
}

#[function_component(Header)]
pub fn header() -> Html {
    let dark_mode = use_state(initial_dark_mode);

    // Apply dark mode class to document
    {
        let dark_mode = *dark_mode;
        use_effect_with(dark_mode, move |&is_dark| {
            if let Some(window) = window() {
                if let Some(html_element) = window.document().and_then(|d| d.document_element()) {
                    let classes = html_element.class_list();
                    let _ = if is_dark {
                        classes.add_1("dark")
                    } else {
                        classes.remove_1("dark")
                    };
                }
                if let Ok(Some(storage)) = window.local_storage() {
                    let _ = storage.set_item(DARK_MODE_KEY, &is_dark.to_string());
                }
            }
        });
    }

    let toggle_dark_mode = {
        let dark_mode = dark_mode.clone();
        Callback::from(move |_| {
            dark_mode.set(!*dark_mode);
        })
    };

    html! {
        <header class="header">
            <div class="header-content">
                <div class="logo">
                    <h1>{"pixpress"}</h1>
                    <p class="tagline">{"Shrink PNG, JPEG and GIF images in your browser"}</p>
                </div>

                <nav class="nav">
                    <button
                        class="nav-btn theme-toggle"
                        onclick={toggle_dark_mode}
                        title={if *dark_mode { "Switch to light mode" } else { "Switch to dark mode" }}
                    >
                        {if *dark_mode { "☀️" } else { "🌙" }}
                    </button>
                </nav>
            </div>
        </header>
    }
}
