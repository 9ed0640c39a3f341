/// Transient toolbar badge with a single auto-clear timer
use crate::ports::{BadgePort, TimerId, TimerPort};
use std::cell::Cell;
use std::rc::Rc;

pub const BADGE_CLEAR_DELAY_MS: u32 = 3000;
pub const DEFAULT_TITLE: &str = "Kutt.it Link Manager";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeKind {
    Success,
    Error,
}

impl BadgeKind {
    pub fn text(&self) -> &'static str {
        match self {
            BadgeKind::Success => "✓",
            BadgeKind::Error => "!",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            BadgeKind::Success => "#22c55e",
            BadgeKind::Error => "#dc2626",
        }
    }
}

pub struct Badge {
    port: Rc<dyn BadgePort>,
    timer: Rc<dyn TimerPort>,
    pending: Rc<Cell<Option<TimerId>>>,
}

impl Badge {
    pub fn new(port: Rc<dyn BadgePort>, timer: Rc<dyn TimerPort>) -> Self {
        Badge {
            port,
            timer,
            pending: Rc::new(Cell::new(None)),
        }
    }

    /// Show the badge and (re)arm the clear timer. At most one clear is ever
    /// pending: showing again cancels the previous one.
    pub fn show(&self, kind: BadgeKind) {
        if let Some(previous) = self.pending.take() {
            self.timer.cancel(previous);
        }

        self.port.set_text(kind.text());
        self.port.set_color(kind.color());

        let port = self.port.clone();
        let pending = self.pending.clone();
        let id = self.timer.schedule(
            BADGE_CLEAR_DELAY_MS,
            Box::new(move || {
                port.set_text("");
                port.set_title(DEFAULT_TITLE);
                pending.set(None);
            }),
        );
        self.pending.set(Some(id));
    }

    /// `None` restores the default title
    pub fn set_title(&self, message: Option<&str>) {
        self.port.set_title(message.unwrap_or(DEFAULT_TITLE));
    }
}
