/// Popup operations: shorten the current tab, list, copy, delete, open stats
use crate::api::ApiClient;
use crate::base_url::{is_valid_http_url, link_href, stats_url, strip_query_and_fragment};
use crate::error::{Result, ShortenError};
use crate::link_data::ShortLink;
use crate::ports::{ClipboardPort, HttpPort, TabsPort};
use crate::settings::Settings;
use std::rc::Rc;

pub const LINK_LIST_LIMIT: u32 = 20;

/// Result of shortening the current tab from the popup
#[derive(Debug, Clone, PartialEq)]
pub struct ShortenReport {
    pub link: ShortLink,
    /// Set when query or fragment were stripped from the tab URL
    pub cleaned_url: Option<String>,
    /// `None` when auto-copy is off
    pub copied: Option<bool>,
}

#[derive(Clone)]
pub struct PopupOperations {
    http: Rc<dyn HttpPort>,
    tabs: Rc<dyn TabsPort>,
    clipboard: Rc<dyn ClipboardPort>,
}

impl PartialEq for PopupOperations {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.http, &other.http)
            && Rc::ptr_eq(&self.tabs, &other.tabs)
            && Rc::ptr_eq(&self.clipboard, &other.clipboard)
    }
}

impl PopupOperations {
    pub fn new(
        http: Rc<dyn HttpPort>,
        tabs: Rc<dyn TabsPort>,
        clipboard: Rc<dyn ClipboardPort>,
    ) -> Self {
        PopupOperations { http, tabs, clipboard }
    }

    /// Active tab URL without query and fragment, plus whether anything was cut
    pub async fn current_tab_target(&self) -> Result<(String, bool)> {
        let tab = self.tabs.active_tab().await.map_err(|e| {
            log::error!("Failed to query the active tab: {}", e);
            ShortenError::Browser("Cannot access the current tab.".to_string())
        })?;

        let url = tab.and_then(|t| t.url).unwrap_or_default();
        if !is_valid_http_url(&url) {
            return Err(ShortenError::validation("This tab's URL cannot be shortened."));
        }

        let cleaned = strip_query_and_fragment(&url);
        let changed = cleaned != url;
        Ok((cleaned, changed))
    }

    pub async fn shorten_current_tab(
        &self,
        settings: &Settings,
        custom_slug: &str,
    ) -> Result<ShortenReport> {
        if !settings.has_api_key() {
            return Err(ShortenError::MissingApiKey);
        }

        let (target, changed) = self.current_tab_target().await?;
        let link = ApiClient::new(self.http.as_ref(), settings)
            .create_link(&target, Some(custom_slug))
            .await?;
        log::info!("Created {} for {}", link.link, link.target);

        let copied = if settings.auto_copy && !link.link.is_empty() {
            Some(self.copy(&link.link).await.is_ok())
        } else {
            None
        };

        if settings.auto_open_stats && !link.id.is_empty() {
            if let Err(e) = self.open_stats(settings, &link).await {
                log::error!("Failed to open the stats page: {}", e);
            }
        }

        Ok(ShortenReport {
            link,
            cleaned_url: changed.then_some(target),
            copied,
        })
    }

    pub async fn load_links(&self, settings: &Settings) -> Result<Vec<ShortLink>> {
        ApiClient::new(self.http.as_ref(), settings)
            .list_links(LINK_LIST_LIMIT)
            .await
    }

    pub async fn delete_link(&self, settings: &Settings, id: &str) -> Result<()> {
        ApiClient::new(self.http.as_ref(), settings)
            .delete_link(id)
            .await
            .inspect_err(|e| log::error!("Failed to delete link {}: {}", id, e))
    }

    pub async fn copy(&self, text: &str) -> Result<()> {
        self.clipboard
            .write_text(text)
            .await
            .inspect_err(|e| log::error!("Copy failed: {}", e))
    }

    /// Stats page when the link has an id, otherwise the short link itself
    pub async fn open_stats(&self, settings: &Settings, link: &ShortLink) -> Result<()> {
        if !link.id.is_empty() {
            self.tabs.open_tab(&stats_url(&settings.base_url, &link.id)).await
        } else if !link.link.is_empty() {
            self.tabs.open_tab(&link_href(&link.link)).await
        } else {
            Ok(())
        }
    }

    pub async fn open_options(&self) -> Result<()> {
        self.tabs.open_options_page().await
    }
}
