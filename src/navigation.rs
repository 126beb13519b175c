/// Things that can happen to the mobile navigation menu.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NavEvent {
    ToggleClicked,
    LinkClicked,
    /// A click landed outside both the menu and its toggle button.
    OutsideClicked,
    EscapePressed,
    Resized,
}

/// Open/closed state of the collapsible menu. The menu and its toggle share
/// one `active` flag.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct NavMenu {
    open: bool,
}

impl NavMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Applies `event` and reports whether the open state changed.
    pub fn handle(&mut self, event: NavEvent) -> bool {
        let next = match event {
            NavEvent::ToggleClicked => !self.open,
            NavEvent::LinkClicked
            | NavEvent::OutsideClicked
            | NavEvent::EscapePressed
            | NavEvent::Resized => false,
        };
        let changed = next != self.open;
        if changed {
            tracing::trace!(?event, open = next, "navigation menu toggled");
        }
        self.open = next;
        changed
    }
}

/// Which nav link carries the `active` class. At most one at a time.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ActiveLink {
    current: Option<String>,
}

impl ActiveLink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Returns `true` when a different section became active.
    pub fn set(&mut self, section_id: &str) -> bool {
        if self.current.as_deref() == Some(section_id) {
            return false;
        }
        self.current = Some(section_id.to_string());
        true
    }
}

/// `#about` -> `about`. Links that are not in-page anchors yield `None`.
pub fn anchor_target(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|target| !target.is_empty())
}
