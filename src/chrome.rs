/// Port implementations backed by the extension APIs (see chrome.js)
use crate::error::{self, ShortenError};
use crate::link_data::{MenuClick, MenuEntry, TabInfo};
use crate::ports::{
    BadgePort, ClipboardPort, DialogPort, HttpPort, HttpRequest, HttpResponse, MenuPort, PagePort,
    SettingsPort, TabsPort, TimerId, TimerPort,
};
use crate::settings::{Settings, SettingsChange, StorageChange, StoredSettings, SETTINGS_KEYS};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use wasm_bindgen::prelude::*;

// Import JS bridge functions
#[wasm_bindgen(module = "/chrome.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn fetchText(request: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getSyncSettings(keys: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setSyncSettings(values: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn removeSyncSettings(keys: JsValue) -> Result<(), JsValue>;

    fn onSyncSettingsChanged(listener: &js_sys::Function);

    #[wasm_bindgen(catch)]
    async fn queryActiveTab() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn createTab(url: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn openOptionsPage() -> Result<(), JsValue>;

    fn setBadgeText(text: &str);

    fn setBadgeColor(color: &str);

    fn setActionTitle(title: &str);

    fn scheduleTimeout(handler: &JsValue, delay_ms: u32) -> i32;

    fn cancelTimeout(id: i32);

    #[wasm_bindgen(catch)]
    async fn copyInTab(tab_id: i32, text: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn writeClipboard(text: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn removeAllContextMenus() -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn createContextMenu(entry: JsValue) -> Result<(), JsValue>;

    fn addBackgroundListeners(
        on_installed: &js_sys::Function,
        on_command: &js_sys::Function,
        on_menu_clicked: &js_sys::Function,
    );
}

fn browser_error(context: &str, e: JsValue) -> ShortenError {
    ShortenError::Browser(format!("{}: {:?}", context, e))
}

fn to_js<T: Serialize>(value: &T) -> error::Result<JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| ShortenError::Browser(format!("Failed to serialize: {:?}", e)))
}

#[derive(Serialize)]
struct FetchRequest<'a> {
    method: &'a str,
    url: &'a str,
    headers: &'a [(String, String)],
    body: Option<&'a str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FetchResponse {
    status: u16,
    #[serde(default)]
    content_type: String,
    #[serde(default)]
    body: String,
}

pub struct ChromeHttp;

#[async_trait(?Send)]
impl HttpPort for ChromeHttp {
    async fn send(&self, request: HttpRequest) -> error::Result<HttpResponse> {
        let request_js = to_js(&FetchRequest {
            method: request.method.as_str(),
            url: &request.url,
            headers: &request.headers,
            body: request.body.as_deref(),
        })?;

        let response_js = fetchText(request_js)
            .await
            .map_err(|e| ShortenError::Transport(format!("{:?}", e)))?;
        let response: FetchResponse = serde_wasm_bindgen::from_value(response_js)
            .map_err(|e| ShortenError::Decode(format!("{:?}", e)))?;

        Ok(HttpResponse {
            status: response.status,
            content_type: response.content_type,
            body: response.body,
        })
    }
}

pub struct ChromeSettings;

#[async_trait(?Send)]
impl SettingsPort for ChromeSettings {
    async fn load(&self) -> error::Result<Settings> {
        let stored_js = getSyncSettings(to_js(&SETTINGS_KEYS)?)
            .await
            .map_err(|e| browser_error("Failed to read settings", e))?;

        let stored: StoredSettings = if stored_js.is_null() || stored_js.is_undefined() {
            StoredSettings::default()
        } else {
            serde_wasm_bindgen::from_value(stored_js)
                .map_err(|e| ShortenError::Decode(format!("Failed to parse settings: {:?}", e)))?
        };

        Ok(stored.into())
    }

    async fn save(&self, settings: &Settings) -> error::Result<()> {
        setSyncSettings(to_js(settings)?)
            .await
            .map_err(|e| browser_error("Failed to save settings", e))
    }

    async fn clear(&self) -> error::Result<()> {
        removeSyncSettings(to_js(&SETTINGS_KEYS)?)
            .await
            .map_err(|e| browser_error("Failed to clear settings", e))
    }

    fn subscribe(&self, listener: Box<dyn Fn(SettingsChange)>) {
        let callback = Closure::wrap(Box::new(move |changes_js: JsValue| {
            match serde_wasm_bindgen::from_value::<HashMap<String, StorageChange>>(changes_js) {
                Ok(changes) => {
                    let change = SettingsChange::from_storage_changes(&changes);
                    if !change.is_empty() {
                        listener(change);
                    }
                }
                Err(e) => log::error!("Unreadable settings change: {:?}", e),
            }
        }) as Box<dyn Fn(JsValue)>);

        onSyncSettingsChanged(callback.as_ref().unchecked_ref());
        // The listener lives as long as the page
        callback.forget();
    }
}

pub struct ChromeTabs;

#[async_trait(?Send)]
impl TabsPort for ChromeTabs {
    async fn active_tab(&self) -> error::Result<Option<TabInfo>> {
        let tab_js = queryActiveTab()
            .await
            .map_err(|e| browser_error("Failed to query tabs", e))?;

        if tab_js.is_null() || tab_js.is_undefined() {
            return Ok(None);
        }

        serde_wasm_bindgen::from_value(tab_js)
            .map(Some)
            .map_err(|e| ShortenError::Decode(format!("Failed to parse tab: {:?}", e)))
    }

    async fn open_tab(&self, url: &str) -> error::Result<()> {
        createTab(url)
            .await
            .map_err(|e| browser_error("Failed to open tab", e))
    }

    async fn open_options_page(&self) -> error::Result<()> {
        openOptionsPage()
            .await
            .map_err(|e| browser_error("Failed to open options", e))
    }
}

pub struct ChromeBadge;

impl BadgePort for ChromeBadge {
    fn set_text(&self, text: &str) {
        setBadgeText(text);
    }

    fn set_color(&self, color: &str) {
        setBadgeColor(color);
    }

    fn set_title(&self, title: &str) {
        setActionTitle(title);
    }
}

pub struct ChromeTimer;

impl TimerPort for ChromeTimer {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TimerId {
        let handler = Closure::once_into_js(move || task());
        TimerId(scheduleTimeout(&handler, delay_ms))
    }

    fn cancel(&self, id: TimerId) {
        cancelTimeout(id.0);
    }
}

/// Clipboard writes executed inside the tab's own page
pub struct ChromePage;

#[async_trait(?Send)]
impl PagePort for ChromePage {
    async fn copy_text(&self, tab_id: i32, text: &str) -> error::Result<bool> {
        let copied = copyInTab(tab_id, text)
            .await
            .map_err(|e| browser_error("Script injection failed", e))?;
        Ok(copied.as_bool().unwrap_or(false))
    }
}

pub struct ChromeClipboard;

#[async_trait(?Send)]
impl ClipboardPort for ChromeClipboard {
    async fn write_text(&self, text: &str) -> error::Result<()> {
        writeClipboard(text)
            .await
            .map_err(|e| browser_error("Clipboard write failed", e))
    }
}

pub struct ChromeMenus;

#[async_trait(?Send)]
impl MenuPort for ChromeMenus {
    async fn remove_all(&self) -> error::Result<()> {
        removeAllContextMenus()
            .await
            .map_err(|e| browser_error("Failed to remove context menus", e))
    }

    async fn create(&self, entry: &MenuEntry) -> error::Result<()> {
        createContextMenu(to_js(entry)?)
            .await
            .map_err(|e| browser_error("Failed to create context menu", e))
    }
}

pub struct WindowDialog;

impl DialogPort for WindowDialog {
    fn confirm(&self, message: &str) -> bool {
        web_sys::window()
            .and_then(|window| window.confirm_with_message(message).ok())
            .unwrap_or(false)
    }
}

/// Wire the service worker events to Rust callbacks
pub fn add_background_listeners(
    on_installed: impl Fn() + 'static,
    on_command: impl Fn(String) + 'static,
    on_menu_clicked: impl Fn(MenuClick, Option<TabInfo>) + 'static,
) {
    let installed = Closure::wrap(Box::new(on_installed) as Box<dyn Fn()>);
    let command = Closure::wrap(Box::new(on_command) as Box<dyn Fn(String)>);
    let menu = Closure::wrap(Box::new(move |info_js: JsValue, tab_js: JsValue| {
        let click = match serde_wasm_bindgen::from_value::<MenuClick>(info_js) {
            Ok(click) => click,
            Err(e) => {
                log::error!("Unreadable context menu event: {:?}", e);
                return;
            }
        };
        let tab = serde_wasm_bindgen::from_value::<TabInfo>(tab_js).ok();
        on_menu_clicked(click, tab);
    }) as Box<dyn Fn(JsValue, JsValue)>);

    addBackgroundListeners(
        installed.as_ref().unchecked_ref(),
        command.as_ref().unchecked_ref(),
        menu.as_ref().unchecked_ref(),
    );

    installed.forget();
    command.forget();
    menu.forget();
}
