/// Background worker: keyboard command and context menu handling
use crate::api::ApiClient;
use crate::badge::{Badge, BadgeKind};
use crate::base_url::{is_valid_http_url, stats_url};
use crate::error::{Result, ShortenError};
use crate::link_data::{MenuClick, MenuEntry, ShortLink, TabInfo};
use crate::ports::{HttpPort, MenuPort, PagePort, SettingsPort, TabsPort};
use std::rc::Rc;

pub const COMMAND_SHORTEN_TAB: &str = "shorten-current-tab";
pub const MENU_SHORTEN_PAGE: &str = "shorten-page";
pub const MENU_SHORTEN_LINK: &str = "shorten-link";

const TITLE_CREATING: &str = "Creating short link…";
const TITLE_READY: &str = "Short link ready";
const TITLE_COPY_FAILED: &str = "Short link created (copy failed)";
const TITLE_FAILED: &str = "Shortening failed";

/// Something the user did that may end in a new short link
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    Command(String),
    Menu { click: MenuClick, tab: Option<TabInfo> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Not one of our commands or menu entries
    Ignored,
    InvalidTarget(String),
    /// `copied` is `None` when auto-copy is off
    Shortened { link: ShortLink, copied: Option<bool> },
    Failed(ShortenError),
}

pub fn menu_entries() -> Vec<MenuEntry> {
    vec![
        MenuEntry {
            id: MENU_SHORTEN_PAGE.to_string(),
            title: "Shorten with Kutt.it".to_string(),
            contexts: vec!["page".to_string(), "selection".to_string()],
        },
        MenuEntry {
            id: MENU_SHORTEN_LINK.to_string(),
            title: "Shorten link with Kutt.it".to_string(),
            contexts: vec!["link".to_string()],
        },
    ]
}

pub struct Orchestrator {
    settings: Rc<dyn SettingsPort>,
    http: Rc<dyn HttpPort>,
    tabs: Rc<dyn TabsPort>,
    page: Rc<dyn PagePort>,
    menus: Rc<dyn MenuPort>,
    badge: Badge,
}

impl Orchestrator {
    pub fn new(
        settings: Rc<dyn SettingsPort>,
        http: Rc<dyn HttpPort>,
        tabs: Rc<dyn TabsPort>,
        page: Rc<dyn PagePort>,
        menus: Rc<dyn MenuPort>,
        badge: Badge,
    ) -> Self {
        Orchestrator {
            settings,
            http,
            tabs,
            page,
            menus,
            badge,
        }
    }

    /// Replace whatever menu entries a previous version left behind
    pub async fn install_menus(&self) -> Result<()> {
        if let Err(e) = self.menus.remove_all().await {
            log::error!("Failed to clear context menus: {}", e);
        }

        for entry in menu_entries() {
            self.menus.create(&entry).await?;
        }
        Ok(())
    }

    pub async fn handle(&self, trigger: Trigger) -> Outcome {
        let Some((target, tab)) = self.resolve_target(trigger).await else {
            return Outcome::Ignored;
        };

        if !is_valid_http_url(&target) {
            log::warn!("Refusing to shorten {:?}: not an http(s) URL", target);
            self.badge.show(BadgeKind::Error);
            return Outcome::InvalidTarget(target);
        }

        match self.shorten(tab.as_ref(), &target).await {
            Ok((link, copied)) => {
                if copied == Some(false) {
                    self.badge.show(BadgeKind::Error);
                    self.badge.set_title(Some(TITLE_COPY_FAILED));
                } else {
                    self.badge.show(BadgeKind::Success);
                    self.badge.set_title(Some(TITLE_READY));
                }
                Outcome::Shortened { link, copied }
            }
            Err(e) => {
                log::error!("Failed to create short link: {}", e);
                self.badge.show(BadgeKind::Error);
                self.badge.set_title(Some(TITLE_FAILED));
                Outcome::Failed(e)
            }
        }
    }

    /// Work out which URL a trigger refers to. `None` means the trigger is
    /// not ours; an empty string means ours but with nothing usable.
    async fn resolve_target(&self, trigger: Trigger) -> Option<(String, Option<TabInfo>)> {
        match trigger {
            Trigger::Command(name) if name == COMMAND_SHORTEN_TAB => {
                let tab = self.tabs.active_tab().await.unwrap_or_else(|e| {
                    log::error!("Failed to query the active tab: {}", e);
                    None
                });
                let target = tab.as_ref().and_then(|t| t.url.clone()).unwrap_or_default();
                Some((target, tab))
            }
            Trigger::Command(_) => None,
            Trigger::Menu { click, tab } => {
                let candidates = match click.menu_item_id.as_str() {
                    MENU_SHORTEN_PAGE => vec![
                        click.link_url,
                        click.page_url,
                        tab.as_ref().and_then(|t| t.url.clone()),
                    ],
                    MENU_SHORTEN_LINK => vec![click.link_url, click.selection_text],
                    _ => return None,
                };
                let target = candidates
                    .into_iter()
                    .flatten()
                    .find(|url| !url.is_empty())
                    .unwrap_or_default();
                Some((target, tab))
            }
        }
    }

    async fn shorten(
        &self,
        tab: Option<&TabInfo>,
        target: &str,
    ) -> Result<(ShortLink, Option<bool>)> {
        let settings = self.settings.load().await?;

        if !settings.has_api_key() {
            if let Err(e) = self.tabs.open_options_page().await {
                log::error!("Failed to open the options page: {}", e);
            }
            return Err(ShortenError::MissingApiKey);
        }

        self.badge.set_title(Some(TITLE_CREATING));
        let link = ApiClient::new(self.http.as_ref(), &settings)
            .create_link(target, None)
            .await?;
        log::info!("Created {} for {}", link.link, link.target);

        let copied = if settings.auto_copy && !link.link.is_empty() {
            Some(self.copy_in_tab(tab, &link.link).await)
        } else {
            None
        };

        if settings.auto_open_stats && !link.id.is_empty() {
            if let Err(e) = self.tabs.open_tab(&stats_url(&settings.base_url, &link.id)).await {
                log::error!("Failed to open the stats page: {}", e);
            }
        }

        Ok((link, copied))
    }

    /// Copy failures never fail the whole action
    async fn copy_in_tab(&self, tab: Option<&TabInfo>, text: &str) -> bool {
        let Some(tab_id) = tab.and_then(|t| t.id) else {
            log::warn!("No tab to copy from");
            return false;
        };

        match self.page.copy_text(tab_id, text).await {
            Ok(copied) => copied,
            Err(e) => {
                log::error!("Could not copy through the page: {}", e);
                false
            }
        }
    }
}
