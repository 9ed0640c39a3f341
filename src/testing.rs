/// In-memory port implementations for unit tests
use crate::error::{Result, ShortenError};
use crate::link_data::{MenuEntry, TabInfo};
use crate::ports::{
    BadgePort, ClipboardPort, HttpPort, HttpRequest, HttpResponse, MenuPort, PagePort,
    SettingsPort, TabsPort, TimerId, TimerPort,
};
use crate::settings::{Settings, SettingsChange};
use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

#[derive(Default)]
pub struct FakeHttp {
    responses: RefCell<VecDeque<Result<HttpResponse>>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl FakeHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: u16, body: &str) {
        self.respond_with(status, "application/json", body);
    }

    pub fn respond_with(&self, status: u16, content_type: &str, body: &str) {
        self.responses.borrow_mut().push_back(Ok(HttpResponse {
            status,
            content_type: content_type.to_string(),
            body: body.to_string(),
        }));
    }

    pub fn fail(&self, message: &str) {
        self.responses
            .borrow_mut()
            .push_back(Err(ShortenError::Transport(message.to_string())));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }
}

#[async_trait(?Send)]
impl HttpPort for FakeHttp {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.borrow_mut().push(request);
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ShortenError::Transport("no response queued".to_string())))
    }
}

#[derive(Default)]
pub struct FakeSettings {
    pub settings: RefCell<Settings>,
}

impl FakeSettings {
    pub fn with(settings: Settings) -> Self {
        FakeSettings {
            settings: RefCell::new(settings),
        }
    }
}

#[async_trait(?Send)]
impl SettingsPort for FakeSettings {
    async fn load(&self) -> Result<Settings> {
        Ok(self.settings.borrow().clone())
    }

    async fn save(&self, settings: &Settings) -> Result<()> {
        *self.settings.borrow_mut() = settings.clone();
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.settings.borrow_mut() = Settings::default();
        Ok(())
    }

    fn subscribe(&self, _listener: Box<dyn Fn(SettingsChange)>) {}
}

#[derive(Default)]
pub struct FakeTabs {
    pub active: RefCell<Option<TabInfo>>,
    pub opened: RefCell<Vec<String>>,
    pub options_opened: Cell<u32>,
    /// Makes `open_tab` fail
    pub broken: Cell<bool>,
}

impl FakeTabs {
    pub fn with_active(url: &str) -> Self {
        let tabs = FakeTabs::default();
        *tabs.active.borrow_mut() = Some(TabInfo {
            id: Some(7),
            url: Some(url.to_string()),
        });
        tabs
    }
}

#[async_trait(?Send)]
impl TabsPort for FakeTabs {
    async fn active_tab(&self) -> Result<Option<TabInfo>> {
        Ok(self.active.borrow().clone())
    }

    async fn open_tab(&self, url: &str) -> Result<()> {
        if self.broken.get() {
            return Err(ShortenError::Browser("tabs.create failed".to_string()));
        }
        self.opened.borrow_mut().push(url.to_string());
        Ok(())
    }

    async fn open_options_page(&self) -> Result<()> {
        self.options_opened.set(self.options_opened.get() + 1);
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeBadge {
    pub text: RefCell<String>,
    pub color: RefCell<String>,
    pub title: RefCell<String>,
    pub titles: RefCell<Vec<String>>,
}

impl BadgePort for FakeBadge {
    fn set_text(&self, text: &str) {
        *self.text.borrow_mut() = text.to_string();
    }

    fn set_color(&self, color: &str) {
        *self.color.borrow_mut() = color.to_string();
    }

    fn set_title(&self, title: &str) {
        *self.title.borrow_mut() = title.to_string();
        self.titles.borrow_mut().push(title.to_string());
    }
}

/// Timers only fire when the test says so
#[derive(Default)]
pub struct FakeTimer {
    next_id: Cell<i32>,
    pending: RefCell<Vec<(TimerId, u32, Box<dyn FnOnce()>)>>,
    pub cancelled: RefCell<Vec<TimerId>>,
}

impl FakeTimer {
    pub fn pending_delays(&self) -> Vec<u32> {
        self.pending.borrow().iter().map(|(_, delay, _)| *delay).collect()
    }

    pub fn fire_all(&self) {
        let tasks: Vec<_> = self.pending.borrow_mut().drain(..).collect();
        for (_, _, task) in tasks {
            task();
        }
    }
}

impl TimerPort for FakeTimer {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TimerId {
        let id = TimerId(self.next_id.get() + 1);
        self.next_id.set(id.0);
        self.pending.borrow_mut().push((id, delay_ms, task));
        id
    }

    fn cancel(&self, id: TimerId) {
        self.pending.borrow_mut().retain(|(pending, _, _)| *pending != id);
        self.cancelled.borrow_mut().push(id);
    }
}

pub struct FakePage {
    pub result: RefCell<Result<bool>>,
    pub copies: RefCell<Vec<(i32, String)>>,
}

impl Default for FakePage {
    fn default() -> Self {
        FakePage {
            result: RefCell::new(Ok(true)),
            copies: RefCell::new(Vec::new()),
        }
    }
}

#[async_trait(?Send)]
impl PagePort for FakePage {
    async fn copy_text(&self, tab_id: i32, text: &str) -> Result<bool> {
        self.copies.borrow_mut().push((tab_id, text.to_string()));
        self.result.borrow().clone()
    }
}

#[derive(Default)]
pub struct FakeClipboard {
    pub broken: Cell<bool>,
    pub writes: RefCell<Vec<String>>,
}

#[async_trait(?Send)]
impl ClipboardPort for FakeClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        if self.broken.get() {
            return Err(ShortenError::Browser("clipboard unavailable".to_string()));
        }
        self.writes.borrow_mut().push(text.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeMenus {
    pub cleared: Cell<u32>,
    pub entries: RefCell<Vec<MenuEntry>>,
}

#[async_trait(?Send)]
impl MenuPort for FakeMenus {
    async fn remove_all(&self) -> Result<()> {
        self.cleared.set(self.cleared.get() + 1);
        self.entries.borrow_mut().clear();
        Ok(())
    }

    async fn create(&self, entry: &MenuEntry) -> Result<()> {
        self.entries.borrow_mut().push(entry.clone());
        Ok(())
    }
}
