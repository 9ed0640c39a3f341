/// Kutt.it Link Manager - Chrome Extension for Short Links
/// Built with Rust + WASM + Yew

mod api;
mod background;
mod badge;
mod base_url;
mod chrome;
mod error;
mod link_data;
mod operations;
mod ports;
mod settings;
#[cfg(test)]
mod testing;
pub mod ui;

use background::{Orchestrator, Trigger};
use badge::Badge;
use chrome::{
    ChromeBadge, ChromeHttp, ChromeMenus, ChromePage, ChromeSettings, ChromeTabs, ChromeTimer,
};
use link_data::{MenuClick, TabInfo};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Re-export the base URL normalizer for JavaScript access
#[wasm_bindgen]
pub fn normalize_base_url(value: &str) -> String {
    base_url::normalize_base_url(value)
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}

// Start the Yew app for the options page
#[wasm_bindgen]
pub fn start_options() {
    yew::Renderer::<ui::options::OptionsPage>::new().render();
}

// Register the service worker listeners
#[wasm_bindgen]
pub fn start_background() {
    let orchestrator = Rc::new(Orchestrator::new(
        Rc::new(ChromeSettings),
        Rc::new(ChromeHttp),
        Rc::new(ChromeTabs),
        Rc::new(ChromePage),
        Rc::new(ChromeMenus),
        Badge::new(Rc::new(ChromeBadge), Rc::new(ChromeTimer)),
    ));

    let on_installed = {
        let orchestrator = orchestrator.clone();
        move || {
            let orchestrator = orchestrator.clone();
            spawn_local(async move {
                if let Err(e) = orchestrator.install_menus().await {
                    log::error!("Failed to register context menus: {}", e);
                }
            });
        }
    };

    let on_command = {
        let orchestrator = orchestrator.clone();
        move |command: String| {
            let orchestrator = orchestrator.clone();
            spawn_local(async move {
                let outcome = orchestrator.handle(Trigger::Command(command)).await;
                log::debug!("Command finished: {:?}", outcome);
            });
        }
    };

    let on_menu_clicked = move |click: MenuClick, tab: Option<TabInfo>| {
        let orchestrator = orchestrator.clone();
        spawn_local(async move {
            let outcome = orchestrator.handle(Trigger::Menu { click, tab }).await;
            log::debug!("Context menu finished: {:?}", outcome);
        });
    };

    chrome::add_background_listeners(on_installed, on_command, on_menu_clicked);
}
