use std::time::Duration;

use super::controller::FieldKey;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StatusKind {
    Success,
    Error,
}

impl StatusKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Banner shown under the form once a submission attempt finishes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StatusMessage {
    pub message: String,
    pub kind: StatusKind,
    pub auto_hide: Duration,
}

impl StatusMessage {
    pub fn success(message: impl Into<String>, auto_hide: Duration) -> Self {
        Self {
            message: message.into(),
            kind: StatusKind::Success,
            auto_hide,
        }
    }

    pub fn error(message: impl Into<String>, auto_hide: Duration) -> Self {
        Self {
            message: message.into(),
            kind: StatusKind::Error,
            auto_hide,
        }
    }
}

/// Output side of the form: the UI layer that renders errors, the busy
/// indicator and the status banner.
///
/// Calls arrive on the thread that drives the controller and must not block.
pub trait FormPresenter: Send + Sync + 'static {
    fn show_field_error(&self, field: FieldKey, message: &str);
    fn clear_field_error(&self, field: FieldKey);
    fn set_loading(&self, loading: bool);
    fn show_status(&self, status: &StatusMessage);
    fn hide_status(&self) {}
    fn reset_form(&self);
}

/// Discards every call. Used when a controller is built without a presenter.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPresenter;

impl FormPresenter for NullPresenter {
    fn show_field_error(&self, _field: FieldKey, _message: &str) {}
    fn clear_field_error(&self, _field: FieldKey) {}
    fn set_loading(&self, _loading: bool) {}
    fn show_status(&self, _status: &StatusMessage) {}
    fn reset_form(&self) {}
}

impl<P> FormPresenter for std::sync::Arc<P>
where
    P: FormPresenter + ?Sized,
{
    fn show_field_error(&self, field: FieldKey, message: &str) {
        (**self).show_field_error(field, message);
    }

    fn clear_field_error(&self, field: FieldKey) {
        (**self).clear_field_error(field);
    }

    fn set_loading(&self, loading: bool) {
        (**self).set_loading(loading);
    }

    fn show_status(&self, status: &StatusMessage) {
        (**self).show_status(status);
    }

    fn hide_status(&self) {
        (**self).hide_status();
    }

    fn reset_form(&self) {
        (**self).reset_form();
    }
}
