use std::collections::BTreeSet;
use std::time::Duration;

use crate::timer::Timer;

/// Id of the section whose activation also fills the skill bars.
pub const SKILLS_SECTION_ID: &str = "skills";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealOptions {
    pub threshold: f64,
    /// Shrinks the viewport from the bottom before computing intersections.
    pub bottom_margin: f64,
    pub skill_bar_delay: Duration,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            bottom_margin: 50.0,
            skill_bar_delay: Duration::from_millis(200),
        }
    }
}

impl RevealOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn threshold(mut self, value: f64) -> Self {
        self.threshold = value;
        self
    }

    pub fn bottom_margin(mut self, value: f64) -> Self {
        self.bottom_margin = value;
        self
    }

    pub fn skill_bar_delay(mut self, value: Duration) -> Self {
        self.skill_bar_delay = value;
        self
    }

    /// Share of the element inside the margin-adjusted viewport, in `0.0..=1.0`.
    /// `top` and `height` are in viewport coordinates.
    pub fn intersection_ratio(&self, top: f64, height: f64, viewport_height: f64) -> f64 {
        if height <= 0.0 {
            return 0.0;
        }
        let root_bottom = (viewport_height - self.bottom_margin).max(0.0);
        let visible = (top + height).min(root_bottom) - top.max(0.0);
        (visible.max(0.0) / height).min(1.0)
    }

    pub fn is_revealed(&self, ratio: f64) -> bool {
        ratio > 0.0 && ratio >= self.threshold
    }
}

/// Width applied to one skill bar once the skills section is shown.
#[derive(Clone, Debug, PartialEq)]
pub struct SkillBar {
    pub label: String,
    pub width_percent: u8,
}

impl SkillBar {
    pub fn new(label: impl Into<String>, width_percent: u8) -> Self {
        Self {
            label: label.into(),
            width_percent: width_percent.min(100),
        }
    }
}

/// What the page should do after an observation pass.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RevealUpdate {
    /// Elements that just gained the `active` class.
    pub activated: Vec<String>,
    pub animate_skills: bool,
}

/// Remembers which tracked elements were revealed. Once active, an element
/// stays active even after scrolling away. The skills section re-runs its bar
/// animation every time it comes back into view.
#[derive(Clone, Debug, Default)]
pub struct RevealTracker {
    options: RevealOptions,
    active: BTreeSet<String>,
    in_view: BTreeSet<String>,
}

impl RevealTracker {
    pub fn new(options: RevealOptions) -> Self {
        Self {
            options,
            active: BTreeSet::new(),
            in_view: BTreeSet::new(),
        }
    }

    pub fn options(&self) -> &RevealOptions {
        &self.options
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active.contains(id)
    }

    /// `elements` yields `(id, top, height)` per tracked element.
    pub fn observe<'a, I>(&mut self, elements: I, viewport_height: f64) -> RevealUpdate
    where
        I: IntoIterator<Item = (&'a str, f64, f64)>,
    {
        let mut update = RevealUpdate::default();
        for (id, top, height) in elements {
            let ratio = self.options.intersection_ratio(top, height, viewport_height);
            if !self.options.is_revealed(ratio) {
                self.in_view.remove(id);
                continue;
            }
            if !self.in_view.insert(id.to_string()) {
                continue;
            }
            update.animate_skills |= id == SKILLS_SECTION_ID;
            if self.active.insert(id.to_string()) {
                tracing::trace!(id, ratio, "element revealed");
                update.activated.push(id.to_string());
            }
        }
        update
    }
}

/// Waits the configured delay, then hands every bar's width to `apply`.
pub async fn animate_skill_bars<F>(
    timer: &dyn Timer,
    options: &RevealOptions,
    bars: &[SkillBar],
    mut apply: F,
) where
    F: FnMut(&SkillBar),
{
    timer.sleep(options.skill_bar_delay).await;
    for bar in bars {
        apply(bar);
    }
}
