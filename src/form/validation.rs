use std::sync::Arc;

use crate::i18n::I18nManager;

use super::controller::{FieldKey, FormController, SyncFieldValidatorFn, write_lock};

/// When a rule runs. Blur feedback may use a shorter wording than the
/// messages surfaced on submit.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValidationTrigger {
    Blur,
    Submit,
}

pub trait ValidationError: Clone + Send + Sync + 'static {
    fn message_key(&self, trigger: ValidationTrigger) -> &'static str;

    fn message_params(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    fn message(&self, trigger: ValidationTrigger, i18n: &I18nManager) -> String {
        let params = self.message_params();
        let params = params
            .iter()
            .map(|(name, value)| (*name, value.as_str()))
            .collect::<Vec<_>>();
        i18n.t_with(self.message_key(trigger), &params)
    }
}

/// A failed rule, resolved to the text shown next to its field.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldError {
    pub field: FieldKey,
    pub message: String,
}

impl FieldError {
    pub fn new(field: FieldKey, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub trait FieldLens<T>: Copy + Send + Sync + 'static {
    type Value: Clone + PartialEq + Send + Sync + 'static;

    fn key(self) -> FieldKey;
    fn get<'a>(self, model: &'a T) -> &'a Self::Value;
    fn set(self, model: &mut T, value: Self::Value);
}

pub trait FormModel: Clone + Send + Sync + 'static {
    type Fields;

    fn fields() -> Self::Fields;

    /// Field keys in declaration order.
    fn field_keys() -> &'static [FieldKey];
}

pub trait FieldValidator<T, L, E>: Send + Sync
where
    L: FieldLens<T>,
    E: ValidationError,
{
    fn validate(&self, model: &T, value: &L::Value) -> Result<(), E>;
}

impl<T, L, E, F> FieldValidator<T, L, E> for F
where
    L: FieldLens<T>,
    E: ValidationError,
    F: for<'a> Fn(&'a T, &'a L::Value) -> Result<(), E> + Send + Sync,
{
    fn validate(&self, model: &T, value: &L::Value) -> Result<(), E> {
        (self)(model, value)
    }
}

pub(super) struct FieldRules<T, E> {
    pub(super) key: FieldKey,
    pub(super) validators: Vec<SyncFieldValidatorFn<T, E>>,
}

impl<T, E> Clone for FieldRules<T, E> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            validators: self.validators.clone(),
        }
    }
}

impl<T, E> FormController<T, E>
where
    T: FormModel,
    E: ValidationError,
{
    /// Adds a rule for the field behind `lens`. Fields are validated in the
    /// order their first rule was registered.
    pub fn register_field_validator<L, V>(&self, lens: L, validator: V)
    where
        L: FieldLens<T>,
        V: FieldValidator<T, L, E> + 'static,
    {
        let validator = Arc::new(validator);
        self.push_rule(
            lens.key(),
            Arc::new(move |model: &T, _trigger: ValidationTrigger| {
                validator.validate(model, lens.get(model))
            }),
        );
    }

    /// Like [`register_field_validator`](Self::register_field_validator), but
    /// the rule also sees whether it runs on blur or on submit.
    pub fn register_trigger_validator<L, F>(&self, lens: L, validator: F)
    where
        L: FieldLens<T>,
        F: for<'a> Fn(&'a T, &'a L::Value, ValidationTrigger) -> Result<(), E>
            + Send
            + Sync
            + 'static,
    {
        self.push_rule(
            lens.key(),
            Arc::new(move |model: &T, trigger: ValidationTrigger| {
                validator(model, lens.get(model), trigger)
            }),
        );
    }

    fn push_rule(&self, key: FieldKey, wrapped: SyncFieldValidatorFn<T, E>) {
        let mut rules = write_lock(&self.rules);
        match rules.iter_mut().find(|entry| entry.key == key) {
            Some(entry) => entry.validators.push(wrapped),
            None => rules.push(FieldRules {
                key,
                validators: vec![wrapped],
            }),
        }
    }

    /// Runs every registered rule against `model` without touching controller
    /// state or the presenter. Rules are not short-circuited across fields, so
    /// all failing fields are reported together.
    pub fn validate(&self, model: &T) -> Vec<FieldError> {
        let rules = super::controller::read_lock(&self.rules).clone();
        rules
            .iter()
            .flat_map(|entry| self.run_rules(entry, model, ValidationTrigger::Submit))
            .collect()
    }

    pub(super) fn validate_key(
        &self,
        key: FieldKey,
        model: &T,
        trigger: ValidationTrigger,
    ) -> Option<FieldError> {
        let entry = super::controller::read_lock(&self.rules)
            .iter()
            .find(|entry| entry.key == key)
            .cloned()?;
        self.run_rules(&entry, model, trigger).into_iter().next()
    }

    fn run_rules(
        &self,
        entry: &FieldRules<T, E>,
        model: &T,
        trigger: ValidationTrigger,
    ) -> Vec<FieldError> {
        let mut errors = Vec::new();
        for validator in &entry.validators {
            if let Err(error) = validator(model, trigger) {
                errors.push(FieldError::new(entry.key, error.message(trigger, &self.i18n)));
                if self.options.validate_first_error_only {
                    break;
                }
            }
        }
        errors
    }
}
