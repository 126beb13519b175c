use std::sync::Arc;

use crate::feedback::{NotificationCenter, NotificationOptions};
use crate::form::{ContactFormController, ContactRules, FormOptions, FormPresenter, contact_form};
use crate::i18n::{I18nManager, Locale};
use crate::theme::{InMemoryThemeStore, ThemeController, ThemeStore};
use crate::timer::{FuturesTimer, Timer};

/// Page-wide services shared by every widget: theme, notifications,
/// translations and the timer they all schedule on.
#[derive(Clone)]
pub struct SiteProvider {
    theme: ThemeController,
    notifications: NotificationCenter,
    i18n: I18nManager,
    timer: Arc<dyn Timer>,
}

impl Default for SiteProvider {
    fn default() -> Self {
        Self::new(InMemoryThemeStore::new())
    }
}

impl SiteProvider {
    pub fn new(theme_store: impl ThemeStore) -> Self {
        Self::with_timer(theme_store, FuturesTimer)
    }

    pub fn with_timer(theme_store: impl ThemeStore, timer: impl Timer) -> Self {
        let timer: Arc<dyn Timer> = Arc::new(timer);
        Self {
            theme: ThemeController::init(theme_store),
            notifications: NotificationCenter::with_timer(
                NotificationOptions::default(),
                timer.clone(),
            ),
            i18n: I18nManager::default(),
            timer,
        }
    }

    pub fn set_i18n_locale(self, locale: impl Into<Locale>) -> Self {
        self.i18n.set_locale(locale);
        self
    }

    pub fn set_notification_options(mut self, options: NotificationOptions) -> Self {
        self.notifications = NotificationCenter::with_timer(options, self.timer.clone());
        self
    }

    pub fn theme(&self) -> ThemeController {
        self.theme.clone()
    }

    pub fn notifications(&self) -> NotificationCenter {
        self.notifications.clone()
    }

    pub fn i18n(&self) -> I18nManager {
        self.i18n.clone()
    }

    pub fn timer(&self) -> Arc<dyn Timer> {
        self.timer.clone()
    }

    /// Contact form wired to this provider's translations and timer, with the
    /// simulated transport.
    pub fn contact_form(
        &self,
        presenter: impl FormPresenter,
        options: FormOptions,
        rules: ContactRules,
    ) -> ContactFormController {
        rules.build(
            contact_form()
                .options(options)
                .i18n(self.i18n.clone())
                .presenter(presenter)
                .timer(self.timer.clone()),
        )
    }
}

impl std::fmt::Debug for SiteProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteProvider")
            .field("theme", &self.theme)
            .field("notifications", &self.notifications)
            .field("i18n", &self.i18n)
            .finish_non_exhaustive()
    }
}
