use std::time::{Duration, Instant};

use crate::i18n::I18nManager;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollOptions {
    /// Height of the fixed header, subtracted from smooth-scroll targets.
    pub header_offset: f64,
    /// A section counts as current this many pixels before its top.
    pub section_offset: f64,
    pub back_to_top_threshold: f64,
    pub parallax_rate: f64,
    pub throttle: Duration,
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self {
            header_offset: 70.0,
            section_offset: 100.0,
            back_to_top_threshold: 300.0,
            parallax_rate: -0.5,
            throttle: Duration::from_millis(16),
        }
    }
}

impl ScrollOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header_offset(mut self, value: f64) -> Self {
        self.header_offset = value;
        self
    }

    pub fn section_offset(mut self, value: f64) -> Self {
        self.section_offset = value;
        self
    }

    pub fn back_to_top_threshold(mut self, value: f64) -> Self {
        self.back_to_top_threshold = value;
        self
    }

    pub fn parallax_rate(mut self, value: f64) -> Self {
        self.parallax_rate = value;
        self
    }

    pub fn throttle(mut self, value: Duration) -> Self {
        self.throttle = value;
        self
    }

    /// Page offset to scroll to so the element lands just below the header.
    /// `element_top` is relative to the viewport, `page_offset` is the
    /// current vertical scroll position.
    pub fn scroll_target(&self, element_top: f64, page_offset: f64) -> f64 {
        element_top + page_offset - self.header_offset
    }

    pub fn back_to_top_visible(&self, scroll_y: f64) -> bool {
        scroll_y > self.back_to_top_threshold
    }

    pub fn back_to_top_label(&self, i18n: &I18nManager) -> String {
        i18n.t("nav.back_to_top")
    }

    /// Vertical translation of the hero section.
    pub fn parallax_offset(&self, scroll_y: f64) -> f64 {
        scroll_y * self.parallax_rate
    }

    /// Id of the section the reader is in. When sections overlap the later
    /// one wins.
    pub fn active_section<'a>(&self, sections: &'a [Section], scroll_y: f64) -> Option<&'a str> {
        sections
            .iter()
            .filter(|section| {
                let top = section.top - self.section_offset;
                scroll_y > top && scroll_y <= top + section.height
            })
            .last()
            .map(|section| section.id.as_str())
    }
}

/// Layout of one `section[id]` in page coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl Section {
    pub fn new(id: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }
}

/// Leading-edge throttle: the first event in each window runs, the rest are
/// dropped.
#[derive(Clone, Copy, Debug)]
pub struct ScrollThrottle {
    window: Duration,
    last_run: Option<Instant>,
}

impl ScrollThrottle {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_run: None,
        }
    }

    pub fn should_run(&mut self, now: Instant) -> bool {
        let open = self
            .last_run
            .is_none_or(|last| now.saturating_duration_since(last) >= self.window);
        if open {
            self.last_run = Some(now);
        }
        open
    }
}

/// Everything the page updates on a (throttled) scroll event.
#[derive(Clone, Debug, PartialEq)]
pub struct ScrollFrame {
    pub active_section: Option<String>,
    pub back_to_top_visible: bool,
    pub parallax_offset: f64,
}

#[derive(Clone, Debug)]
pub struct ScrollTracker {
    options: ScrollOptions,
    sections: Vec<Section>,
    throttle: ScrollThrottle,
}

impl ScrollTracker {
    pub fn new(options: ScrollOptions, sections: Vec<Section>) -> Self {
        Self {
            throttle: ScrollThrottle::new(options.throttle),
            options,
            sections,
        }
    }

    pub fn options(&self) -> &ScrollOptions {
        &self.options
    }

    pub fn set_sections(&mut self, sections: Vec<Section>) {
        self.sections = sections;
    }

    /// `None` when the event falls inside the throttle window.
    pub fn on_scroll(&mut self, scroll_y: f64, now: Instant) -> Option<ScrollFrame> {
        if !self.throttle.should_run(now) {
            return None;
        }
        Some(ScrollFrame {
            active_section: self
                .options
                .active_section(&self.sections, scroll_y)
                .map(str::to_string),
            back_to_top_visible: self.options.back_to_top_visible(scroll_y),
            parallax_offset: self.options.parallax_offset(scroll_y),
        })
    }
}
