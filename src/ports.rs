//! Ports - browser and network collaborators as traits
//!
//! The background worker and the popup only talk to the outside world through
//! these traits. `crate::chrome` implements them on top of the extension APIs;
//! tests use in-memory fakes.

use crate::error::Result;
use crate::link_data::{MenuEntry, TabInfo};
use crate::settings::{Settings, SettingsChange};
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: String,
    pub body: String,
}

#[async_trait(?Send)]
pub trait HttpPort {
    /// Network failures are errors; any HTTP status is a response.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

#[async_trait(?Send)]
pub trait SettingsPort {
    async fn load(&self) -> Result<Settings>;
    async fn save(&self, settings: &Settings) -> Result<()>;
    /// Remove every stored key so the next load yields defaults
    async fn clear(&self) -> Result<()>;
    /// Called once per change of the synced storage area
    fn subscribe(&self, listener: Box<dyn Fn(SettingsChange)>);
}

#[async_trait(?Send)]
pub trait TabsPort {
    async fn active_tab(&self) -> Result<Option<TabInfo>>;
    async fn open_tab(&self, url: &str) -> Result<()>;
    async fn open_options_page(&self) -> Result<()>;
}

/// Toolbar action indicator. Fire-and-forget, failures are only logged.
pub trait BadgePort {
    fn set_text(&self, text: &str);
    fn set_color(&self, color: &str);
    fn set_title(&self, title: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub i32);

pub trait TimerPort {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TimerId;
    fn cancel(&self, id: TimerId);
}

/// Runs code inside a tab's page context, with that page's permissions
#[async_trait(?Send)]
pub trait PagePort {
    /// Returns whether the page managed to write the clipboard
    async fn copy_text(&self, tab_id: i32, text: &str) -> Result<bool>;
}

#[async_trait(?Send)]
pub trait ClipboardPort {
    async fn write_text(&self, text: &str) -> Result<()>;
}

#[async_trait(?Send)]
pub trait MenuPort {
    async fn remove_all(&self) -> Result<()>;
    async fn create(&self, entry: &MenuEntry) -> Result<()>;
}

pub trait DialogPort {
    fn confirm(&self, message: &str) -> bool;
}
