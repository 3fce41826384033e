use yew::prelude::*;

mod components;
mod services;
mod utils;

use components::{header::Header, upload::Upload};

#[function_component(App)]
pub fn app() -> Html {
    html! {
        <div class="app">
            <Header />

            <main class="main-content">
                <Upload />
            </main>
        </div>
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}
