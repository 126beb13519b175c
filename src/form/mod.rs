mod contact;
mod controller;
mod presenter;
mod transport;
mod validation;

#[cfg(test)]
mod tests;

pub use contact::{
    ContactFieldError, ContactFormController, ContactRules, FormSnapshot, FormSnapshotFields,
    FormSnapshotEmailLens, FormSnapshotMessageLens, FormSnapshotNameLens, FormSnapshotSubjectLens,
    contact_form, is_valid_email, validate,
};
pub use controller::{
    DEFAULT_STATUS_AUTO_HIDE, FieldKey, FieldMeta, FormController, FormControllerBuilder, FormId,
    FormOptions, FormStatus, StatusTicket, SubmissionOutcome, SubmissionState, TransitionError,
};
pub use folio_form_derive::FormModel;
pub use presenter::{FormPresenter, NullPresenter, StatusKind, StatusMessage};
pub use transport::{
    BoxedSubmitFuture, DEFAULT_SIMULATED_DELAY, SimulatedTransport, SubmitError, SubmitTransport,
};
pub use validation::{
    FieldError, FieldLens, FieldValidator, FormModel, ValidationError, ValidationTrigger,
};
