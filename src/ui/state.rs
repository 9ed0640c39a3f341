/// Popup state machine and the view model the popup renders from
use crate::base_url::link_href;
use crate::error::ShortenError;
use crate::link_data::ShortLink;
use crate::operations::ShortenReport;
use crate::settings::{Settings, SettingsChange};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use std::fmt::Display;
use std::rc::Rc;
use yew::prelude::*;

pub const EMPTY_LINKS_MESSAGE: &str = "No links yet. Shorten this page to get started.";
const READY_MESSAGE: &str = "Ready. Add an optional slug and shorten this page.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Neutral,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub message: String,
    pub kind: StatusKind,
}

impl Status {
    pub fn neutral(message: impl Into<String>) -> Self {
        Status {
            message: message.into(),
            kind: StatusKind::Neutral,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Status {
            message: message.into(),
            kind: StatusKind::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Status {
            message: message.into(),
            kind: StatusKind::Error,
        }
    }

    pub fn none() -> Self {
        Status::neutral("")
    }

    pub fn is_empty(&self) -> bool {
        self.message.is_empty()
    }
}

/// Final status line after shortening from the popup
pub fn shorten_status(report: &ShortenReport) -> Status {
    let status = match report.copied {
        Some(true) => Status::success("Short link created and copied to clipboard."),
        Some(false) => Status::error("Short link created, but it could not be copied."),
        None => Status::success("Short link created!"),
    };

    match &report.cleaned_url {
        Some(url) => Status {
            message: format!("{} Query and fragment removed: {}", status.message, url),
            ..status
        },
        None => status,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupView {
    /// Settings not read yet
    Loading,
    Unauthenticated,
    Authenticated,
}

/// One rendered row of the link list
#[derive(Debug, Clone, PartialEq)]
pub struct LinkRow {
    pub link: ShortLink,
    pub href: String,
    pub created: String,
}

impl LinkRow {
    pub fn new<Tz: TimeZone>(link: ShortLink, tz: &Tz) -> Self
    where
        Tz::Offset: Display,
    {
        LinkRow {
            href: link_href(&link.link),
            created: format_created_at(&link.created_at, tz),
            link,
        }
    }
}

/// `YYYY-MM-DD HH:MM` in the given zone; empty when the date can't be read
pub fn format_created_at<Tz: TimeZone>(raw: &str, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|date| date.naive_utc())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"));

    match parsed {
        Ok(naive) => tz
            .from_utc_datetime(&naive)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
        Err(_) => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PopupState {
    pub settings: Settings,
    pub view: PopupView,
    pub status: Status,
    pub rows: Vec<LinkRow>,
    pub links_loaded: bool,
    pub loading_links: bool,
    pub shortening: bool,
    pub deleting: Option<String>,
    /// Row whose copy button currently reads "Copied!"
    pub copied: Option<String>,
    /// Bumped whenever the list must be fetched again
    pub reload_requested: u32,
}

impl Default for PopupState {
    fn default() -> Self {
        PopupState {
            settings: Settings::default(),
            view: PopupView::Loading,
            status: Status::none(),
            rows: Vec::new(),
            links_loaded: false,
            loading_links: false,
            shortening: false,
            deleting: None,
            copied: None,
            reload_requested: 0,
        }
    }
}

impl PopupState {
    /// Placeholder shown instead of an empty list
    pub fn empty_message(&self) -> Option<&'static str> {
        (self.view == PopupView::Authenticated && self.links_loaded && self.rows.is_empty())
            .then_some(EMPTY_LINKS_MESSAGE)
    }

    fn authenticate(&mut self) {
        if self.settings.has_api_key() {
            self.view = PopupView::Authenticated;
            self.status = Status::success(READY_MESSAGE);
        } else {
            self.require_auth();
            self.status = Status::error(ShortenError::MissingApiKey.user_message());
        }
    }

    fn request_reload(&mut self) {
        if self.view == PopupView::Authenticated {
            self.reload_requested += 1;
        }
    }

    fn require_auth(&mut self) {
        self.view = PopupView::Unauthenticated;
        self.rows.clear();
        self.links_loaded = false;
    }

    fn fail(&mut self, error: &ShortenError) {
        if error.requires_auth() {
            self.require_auth();
        }
        self.status = Status::error(error.user_message());
    }
}

pub enum PopupAction {
    SettingsLoaded(Settings),
    SettingsChanged(SettingsChange),
    LinksLoading { silent: bool },
    LinksLoaded { links: Vec<ShortLink>, silent: bool },
    LinksFailed(ShortenError),
    ShortenStarted,
    ShortenFinished(Status),
    DeleteStarted(String),
    DeleteFinished,
    RowCopied(String),
    RowCopyExpired(String),
    Failed(ShortenError),
    SetStatus(Status),
}

impl Reducible for PopupState {
    type Action = PopupAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();

        match action {
            PopupAction::SettingsLoaded(settings) => {
                next.settings = settings;
                next.authenticate();
                next.request_reload();
            }
            PopupAction::SettingsChanged(change) => {
                let effect = next.settings.apply_change(&change);
                if effect.api_key_changed {
                    next.authenticate();
                }
                if effect.api_key_changed || effect.base_url_changed {
                    next.request_reload();
                }
            }
            PopupAction::LinksLoading { silent } => {
                next.loading_links = true;
                if !silent {
                    next.status = Status::neutral("Loading links…");
                }
            }
            PopupAction::LinksLoaded { links, silent } => {
                next.rows = links
                    .into_iter()
                    .map(|link| LinkRow::new(link, &Local))
                    .collect();
                next.links_loaded = true;
                next.loading_links = false;
                if !silent {
                    next.status = Status::success("Links updated.");
                }
            }
            PopupAction::LinksFailed(error) => {
                next.rows.clear();
                next.links_loaded = false;
                next.loading_links = false;
                next.fail(&error);
            }
            PopupAction::ShortenStarted => {
                next.shortening = true;
                next.status = Status::neutral("Creating short link…");
            }
            PopupAction::ShortenFinished(status) => {
                next.shortening = false;
                next.status = status;
            }
            PopupAction::DeleteStarted(id) => {
                next.deleting = Some(id);
            }
            PopupAction::DeleteFinished => {
                next.deleting = None;
            }
            PopupAction::RowCopied(id) => {
                next.copied = Some(id);
            }
            PopupAction::RowCopyExpired(id) => {
                if next.copied.as_deref() == Some(id.as_str()) {
                    next.copied = None;
                }
            }
            PopupAction::Failed(error) => {
                next.shortening = false;
                next.fail(&error);
            }
            PopupAction::SetStatus(status) => {
                next.status = status;
            }
        }

        Rc::new(next)
    }
}
