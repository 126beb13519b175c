pub use crate::SiteProvider;
pub use crate::feedback::{
    Notification, NotificationCenter, NotificationId, NotificationOptions, NotificationPhase,
};
pub use crate::form::{
    ContactFieldError, ContactFormController, ContactRules, FieldError, FieldKey, FieldLens,
    FormController, FormModel, FormOptions, FormPresenter, FormSnapshot, FormStatus, StatusKind,
    StatusMessage, SubmissionOutcome, SubmissionState, SubmitError, SubmitTransport,
    ValidationError, ValidationTrigger, contact_form,
};
pub use crate::i18n::{I18nManager, Locale};
pub use crate::navigation::{ActiveLink, NavEvent, NavMenu};
pub use crate::reveal::{RevealOptions, RevealTracker, SkillBar};
pub use crate::scroll::{ScrollOptions, ScrollThrottle, ScrollTracker, Section};
pub use crate::theme::{ColorScheme, FileThemeStore, InMemoryThemeStore, ThemeController, ThemeStore};
pub use crate::timer::{FuturesTimer, InstantTimer, Timer};
pub use crate::typing::{TypingEffect, TypingOptions};
