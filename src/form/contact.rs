//! The portfolio contact form: its snapshot model and its three rules.

use std::sync::LazyLock;

use regex::Regex;

use crate::i18n::I18nManager;

use super::controller::{FieldKey, FormController, FormControllerBuilder};
use super::validation::{FieldError, FormModel, ValidationError, ValidationTrigger};

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Values of the contact form captured when the user submits. `subject` is
/// optional and may be empty.
#[derive(Clone, Debug, Default, Eq, PartialEq, folio_form_derive::FormModel)]
pub struct FormSnapshot {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl FormSnapshot {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            subject: subject.into(),
            message: message.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ContactFieldError {
    NameTooShort { min: usize },
    InvalidEmail,
    MessageTooShort { min: usize },
}

impl ContactFieldError {
    pub const fn field(self) -> FieldKey {
        match self {
            Self::NameTooShort { .. } => FieldKey::new("name"),
            Self::InvalidEmail => FieldKey::new("email"),
            Self::MessageTooShort { .. } => FieldKey::new("message"),
        }
    }
}

impl ValidationError for ContactFieldError {
    fn message_key(&self, trigger: ValidationTrigger) -> &'static str {
        match (self, trigger) {
            (Self::NameTooShort { .. }, ValidationTrigger::Submit) => "contact.name.invalid",
            (Self::NameTooShort { .. }, ValidationTrigger::Blur) => "contact.name.too_short",
            (Self::InvalidEmail, _) => "contact.email.invalid",
            (Self::MessageTooShort { .. }, ValidationTrigger::Submit) => "contact.message.invalid",
            (Self::MessageTooShort { .. }, ValidationTrigger::Blur) => "contact.message.too_short",
        }
    }

    fn message_params(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::NameTooShort { min } | Self::MessageTooShort { min } => {
                vec![("min", min.to_string())]
            }
            Self::InvalidEmail => Vec::new(),
        }
    }
}

pub type ContactFormController = FormController<FormSnapshot, ContactFieldError>;

/// Minimum lengths, counted in characters after trimming.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ContactRules {
    pub name_min_chars: usize,
    pub message_min_chars: usize,
}

impl Default for ContactRules {
    fn default() -> Self {
        Self {
            name_min_chars: 2,
            message_min_chars: 10,
        }
    }
}

impl ContactRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name_min_chars(mut self, value: usize) -> Self {
        self.name_min_chars = value;
        self
    }

    pub fn message_min_chars(mut self, value: usize) -> Self {
        self.message_min_chars = value;
        self
    }

    pub fn check_name(&self, value: &str) -> Result<(), ContactFieldError> {
        let min = self.name_min_chars;
        if value.trim().chars().count() < min {
            return Err(ContactFieldError::NameTooShort { min });
        }
        Ok(())
    }

    pub fn check_email(&self, value: &str) -> Result<(), ContactFieldError> {
        if !is_valid_email(value) {
            return Err(ContactFieldError::InvalidEmail);
        }
        Ok(())
    }

    /// Blur checks what the visitor typed with surrounding whitespace
    /// ignored. Submit checks the raw value.
    pub fn check_email_on(
        &self,
        value: &str,
        trigger: ValidationTrigger,
    ) -> Result<(), ContactFieldError> {
        match trigger {
            ValidationTrigger::Blur => self.check_email(value.trim()),
            ValidationTrigger::Submit => self.check_email(value),
        }
    }

    pub fn check_message(&self, value: &str) -> Result<(), ContactFieldError> {
        let min = self.message_min_chars;
        if value.trim().chars().count() < min {
            return Err(ContactFieldError::MessageTooShort { min });
        }
        Ok(())
    }

    /// Every failing rule, in field order. The subject is never checked.
    pub fn check(&self, snapshot: &FormSnapshot) -> Vec<ContactFieldError> {
        [
            self.check_name(&snapshot.name),
            self.check_email(&snapshot.email),
            self.check_message(&snapshot.message),
        ]
        .into_iter()
        .filter_map(Result::err)
        .collect()
    }

    pub fn register(&self, controller: &ContactFormController) {
        let fields = FormSnapshot::fields();
        let rules = *self;
        controller.register_field_validator(
            fields.name(),
            move |_model: &FormSnapshot, value: &String| rules.check_name(value),
        );
        controller.register_trigger_validator(
            fields.email(),
            move |_model: &FormSnapshot, value: &String, trigger: ValidationTrigger| {
                rules.check_email_on(value, trigger)
            },
        );
        controller.register_field_validator(
            fields.message(),
            move |_model: &FormSnapshot, value: &String| rules.check_message(value),
        );
    }

    pub fn build(
        self,
        builder: FormControllerBuilder<FormSnapshot, ContactFieldError>,
    ) -> ContactFormController {
        let controller = builder.build();
        self.register(&controller);
        controller
    }
}

/// Starts a contact-form controller with an empty initial snapshot.
pub fn contact_form() -> FormControllerBuilder<FormSnapshot, ContactFieldError> {
    ContactFormController::builder(FormSnapshot::default())
}

/// `local@domain.tld`: no whitespace, exactly one `@`, and a dot somewhere in
/// the part after it with text on both sides.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

/// Pure validation with the default rules, messages resolved through `i18n`.
pub fn validate(snapshot: &FormSnapshot, i18n: &I18nManager) -> Vec<FieldError> {
    ContactRules::default()
        .check(snapshot)
        .into_iter()
        .map(|error| {
            FieldError::new(error.field(), error.message(ValidationTrigger::Submit, i18n))
        })
        .collect()
}
