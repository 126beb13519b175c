use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use crate::i18n::I18nManager;
use crate::timer::{FuturesTimer, Timer};

use super::presenter::{FormPresenter, NullPresenter, StatusMessage};
use super::transport::{SimulatedTransport, SubmitError, SubmitTransport};
use super::validation::{
    FieldError, FieldLens, FieldRules, FormModel, ValidationError, ValidationTrigger,
};

static FORM_ID_ALLOCATOR: AtomicU64 = AtomicU64::new(1);

pub const DEFAULT_STATUS_AUTO_HIDE: Duration = Duration::from_millis(5_000);

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FormId(pub u64);

impl FormId {
    pub fn next() -> Self {
        Self(FORM_ID_ALLOCATOR.fetch_add(1, Ordering::SeqCst))
    }
}

impl Display for FormId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "form-{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FieldKey(&'static str);

impl FieldKey {
    pub const fn new(value: &'static str) -> Self {
        Self(value)
    }

    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl Display for FieldKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Identifies one shown status banner; only the latest one may be auto-hidden.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct StatusTicket(pub u64);

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Validating,
    Loading,
    Success,
    Error,
}

impl SubmissionState {
    /// The submit control is disabled while a pass is running.
    pub const fn disables_submit(self) -> bool {
        matches!(self, Self::Validating | Self::Loading)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
#[error("invalid submission state transition: {from:?} -> {to:?}")]
pub struct TransitionError {
    pub from: SubmissionState,
    pub to: SubmissionState,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SubmissionOutcome {
    /// The transport accepted the snapshot; the form has been reset.
    Sent,
    /// Validation failed; nothing was handed to the transport.
    Invalid(Vec<FieldError>),
    /// The transport reported a failure; the form keeps its values.
    Failed(SubmitError),
    /// A submission was already in flight.
    Busy,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FormOptions {
    pub status_auto_hide: Duration,
    pub validate_first_error_only: bool,
    pub success_message_key: &'static str,
    pub failure_message_key: &'static str,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            status_auto_hide: DEFAULT_STATUS_AUTO_HIDE,
            validate_first_error_only: true,
            success_message_key: "form.status.sent",
            failure_message_key: "form.status.failed",
        }
    }
}

impl FormOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status_auto_hide(mut self, value: Duration) -> Self {
        self.status_auto_hide = value;
        self
    }

    pub fn validate_first_error_only(mut self, value: bool) -> Self {
        self.validate_first_error_only = value;
        self
    }

    pub fn success_message_key(mut self, value: &'static str) -> Self {
        self.success_message_key = value;
        self
    }

    pub fn failure_message_key(mut self, value: &'static str) -> Self {
        self.failure_message_key = value;
        self
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FieldMeta {
    pub dirty: bool,
    pub touched: bool,
    pub error: Option<String>,
}

/// Read-only view of the controller for rendering.
#[derive(Clone, Debug)]
pub struct FormStatus<T> {
    pub model: T,
    pub submission_state: SubmissionState,
    pub submit_count: u32,
    pub submit_disabled: bool,
    pub is_dirty: bool,
    pub field_errors: Vec<FieldError>,
    pub first_error: Option<FieldKey>,
    pub visible_status: Option<StatusMessage>,
}

impl<T> FormStatus<T> {
    pub fn is_valid(&self) -> bool {
        self.field_errors.is_empty()
    }
}

pub(super) type SyncFieldValidatorFn<T, E> =
    Arc<dyn Fn(&T, ValidationTrigger) -> Result<(), E> + Send + Sync>;

pub(super) struct FormState<T> {
    pub(super) id: FormId,
    pub(super) initial_model: T,
    pub(super) model: T,
    pub(super) submission_state: SubmissionState,
    pub(super) submit_count: u32,
    pub(super) field_meta: BTreeMap<FieldKey, FieldMeta>,
    pub(super) status_ticket: StatusTicket,
    pub(super) visible_status: Option<StatusMessage>,
}

impl<T> FormState<T> {
    pub(super) fn ensure_meta(&mut self, key: FieldKey) -> &mut FieldMeta {
        self.field_meta.entry(key).or_default()
    }

    fn clear_errors(&mut self) {
        for meta in self.field_meta.values_mut() {
            meta.error = None;
        }
    }
}

/// Owns field errors and the submission lifecycle of one form.
///
/// Every observable effect goes through the injected [`FormPresenter`]; the
/// controller itself never fails outward. Cloning yields another handle to
/// the same form.
pub struct FormController<T, E>
where
    T: FormModel,
    E: ValidationError,
{
    pub(super) options: FormOptions,
    pub(super) state: Arc<RwLock<FormState<T>>>,
    pub(super) rules: Arc<RwLock<Vec<FieldRules<T, E>>>>,
    pub(super) i18n: I18nManager,
    presenter: Arc<dyn FormPresenter>,
    transport: Arc<dyn SubmitTransport<T>>,
    timer: Arc<dyn Timer>,
}

impl<T, E> Clone for FormController<T, E>
where
    T: FormModel,
    E: ValidationError,
{
    fn clone(&self) -> Self {
        Self {
            options: self.options.clone(),
            state: self.state.clone(),
            rules: self.rules.clone(),
            i18n: self.i18n.clone(),
            presenter: self.presenter.clone(),
            transport: self.transport.clone(),
            timer: self.timer.clone(),
        }
    }
}

pub struct FormControllerBuilder<T, E>
where
    T: FormModel,
    E: ValidationError,
{
    initial: T,
    options: FormOptions,
    i18n: Option<I18nManager>,
    presenter: Option<Arc<dyn FormPresenter>>,
    transport: Option<Arc<dyn SubmitTransport<T>>>,
    timer: Option<Arc<dyn Timer>>,
    _error: std::marker::PhantomData<fn() -> E>,
}

impl<T, E> FormControllerBuilder<T, E>
where
    T: FormModel,
    E: ValidationError,
{
    pub fn options(mut self, value: FormOptions) -> Self {
        self.options = value;
        self
    }

    pub fn i18n(mut self, value: I18nManager) -> Self {
        self.i18n = Some(value);
        self
    }

    pub fn presenter(mut self, value: impl FormPresenter) -> Self {
        self.presenter = Some(Arc::new(value));
        self
    }

    pub fn shared_presenter(mut self, value: Arc<dyn FormPresenter>) -> Self {
        self.presenter = Some(value);
        self
    }

    pub fn transport(mut self, value: impl SubmitTransport<T>) -> Self {
        self.transport = Some(Arc::new(value));
        self
    }

    pub fn timer(mut self, value: impl Timer) -> Self {
        self.timer = Some(Arc::new(value));
        self
    }

    /// Missing collaborators default to a no-op presenter, the simulated
    /// transport and a `futures-timer` backed timer.
    pub fn build(self) -> FormController<T, E> {
        let timer: Arc<dyn Timer> = self.timer.unwrap_or_else(|| Arc::new(FuturesTimer));
        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(SimulatedTransport::new(timer.clone())));
        let id = FormId::next();
        tracing::debug!(form_id = %id, "form controller created");

        FormController {
            options: self.options,
            state: Arc::new(RwLock::new(FormState {
                id,
                initial_model: self.initial.clone(),
                model: self.initial,
                submission_state: SubmissionState::Idle,
                submit_count: 0,
                field_meta: BTreeMap::new(),
                status_ticket: StatusTicket::default(),
                visible_status: None,
            })),
            rules: Arc::new(RwLock::new(Vec::new())),
            i18n: self.i18n.unwrap_or_default(),
            presenter: self.presenter.unwrap_or_else(|| Arc::new(NullPresenter)),
            transport,
            timer,
        }
    }
}

impl<T, E> FormController<T, E>
where
    T: FormModel,
    E: ValidationError,
{
    pub fn builder(initial: T) -> FormControllerBuilder<T, E> {
        FormControllerBuilder {
            initial,
            options: FormOptions::default(),
            i18n: None,
            presenter: None,
            transport: None,
            timer: None,
            _error: std::marker::PhantomData,
        }
    }

    pub fn form_id(&self) -> FormId {
        read_lock(&self.state).id
    }

    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    pub fn submission_state(&self) -> SubmissionState {
        read_lock(&self.state).submission_state
    }

    pub fn is_submit_disabled(&self) -> bool {
        self.submission_state().disables_submit()
    }

    pub fn field_error<L>(&self, lens: L) -> Option<String>
    where
        L: FieldLens<T>,
    {
        read_lock(&self.state)
            .field_meta
            .get(&lens.key())
            .and_then(|meta| meta.error.clone())
    }

    pub fn field_meta<L>(&self, lens: L) -> Option<FieldMeta>
    where
        L: FieldLens<T>,
    {
        read_lock(&self.state).field_meta.get(&lens.key()).cloned()
    }

    pub fn status(&self) -> FormStatus<T> {
        let state = read_lock(&self.state);
        let field_errors = T::field_keys()
            .iter()
            .chain(
                state
                    .field_meta
                    .keys()
                    .filter(|key| !T::field_keys().contains(*key)),
            )
            .filter_map(|key| {
                let message = state.field_meta.get(key)?.error.clone()?;
                Some(FieldError::new(*key, message))
            })
            .collect::<Vec<_>>();

        FormStatus {
            model: state.model.clone(),
            submission_state: state.submission_state,
            submit_count: state.submit_count,
            submit_disabled: state.submission_state.disables_submit(),
            is_dirty: state.field_meta.values().any(|meta| meta.dirty),
            first_error: field_errors.first().map(|error| error.field),
            field_errors,
            visible_status: state.visible_status.clone(),
        }
    }

    /// "Field changed": stores the value and drops the field's error without
    /// running any rule.
    pub fn handle_input<L>(&self, lens: L, value: L::Value)
    where
        L: FieldLens<T>,
    {
        let key = lens.key();
        let had_error = {
            let mut state = write_lock(&self.state);
            store_value(&mut state, lens, value);
            state.ensure_meta(key).error.take().is_some()
        };
        if had_error {
            tracing::trace!(field = %key, "field error cleared on input");
            self.presenter.clear_field_error(key);
        }
    }

    /// "Field blurred": stores the value, marks the field touched and runs only
    /// that field's rules. Returns whether the field is valid.
    pub fn handle_blur<L>(&self, lens: L, value: L::Value) -> bool
    where
        L: FieldLens<T>,
    {
        let key = lens.key();
        let model = {
            let mut state = write_lock(&self.state);
            store_value(&mut state, lens, value);
            state.ensure_meta(key).touched = true;
            state.model.clone()
        };

        let error = self.validate_key(key, &model, ValidationTrigger::Blur);
        write_lock(&self.state).ensure_meta(key).error =
            error.as_ref().map(|error| error.message.clone());

        match error {
            Some(error) => {
                tracing::debug!(field = %key, "field failed validation on blur");
                self.presenter.show_field_error(key, &error.message);
                false
            }
            None => {
                self.presenter.clear_field_error(key);
                true
            }
        }
    }

    /// Validates `snapshot` and, when it passes, hands it to the transport.
    ///
    /// The returned future also covers the status auto-hide delay; callers
    /// spawn it on their UI executor and are free to ignore its completion.
    pub async fn submit(&self, snapshot: T) -> SubmissionOutcome {
        let (form_id, attempt) = {
            let mut state = write_lock(&self.state);
            if state.submission_state.disables_submit() {
                tracing::debug!(form_id = %state.id, "submit ignored while a submission is in flight");
                return SubmissionOutcome::Busy;
            }
            if let Err(error) = transition(&mut state, SubmissionState::Validating) {
                tracing::warn!(form_id = %state.id, %error, "submit rejected");
                return SubmissionOutcome::Busy;
            }
            state.submit_count = state.submit_count.saturating_add(1);
            state.model = snapshot.clone();
            state.clear_errors();
            (state.id, state.submit_count)
        };
        self.clear_presented_errors();

        let errors = self.validate(&snapshot);
        if !errors.is_empty() {
            {
                let mut state = write_lock(&self.state);
                for error in &errors {
                    let meta = state.ensure_meta(error.field);
                    if meta.error.is_none() {
                        meta.error = Some(error.message.clone());
                    }
                }
                transition_or_warn(&mut state, SubmissionState::Idle);
            }
            for error in &errors {
                self.presenter.show_field_error(error.field, &error.message);
            }
            tracing::info!(%form_id, attempt, errors = errors.len(), "submission rejected by validation");
            return SubmissionOutcome::Invalid(errors);
        }

        transition_or_warn(&mut write_lock(&self.state), SubmissionState::Loading);
        self.presenter.set_loading(true);
        tracing::debug!(%form_id, attempt, "submission handed to transport");

        let result = self.transport.send(&snapshot).await;
        self.presenter.set_loading(false);

        let (status, outcome) = match result {
            Ok(()) => {
                {
                    let mut state = write_lock(&self.state);
                    transition_or_warn(&mut state, SubmissionState::Success);
                    reset_state(&mut state);
                }
                self.presenter.reset_form();
                self.clear_presented_errors();
                tracing::info!(%form_id, attempt, "submission delivered");
                (
                    StatusMessage::success(
                        self.i18n.t(self.options.success_message_key),
                        self.options.status_auto_hide,
                    ),
                    SubmissionOutcome::Sent,
                )
            }
            Err(error) => {
                transition_or_warn(&mut write_lock(&self.state), SubmissionState::Error);
                tracing::warn!(%form_id, attempt, %error, "submission failed");
                let reason = error.to_string();
                (
                    StatusMessage::error(
                        self.i18n
                            .t_with(self.options.failure_message_key, &[("reason", &reason)]),
                        self.options.status_auto_hide,
                    ),
                    SubmissionOutcome::Failed(error),
                )
            }
        };

        let ticket = {
            let mut state = write_lock(&self.state);
            state.status_ticket = StatusTicket(state.status_ticket.0 + 1);
            state.visible_status = Some(status.clone());
            state.status_ticket
        };
        self.presenter.show_status(&status);
        transition_or_warn(&mut write_lock(&self.state), SubmissionState::Idle);

        self.timer.sleep(status.auto_hide).await;
        let still_latest = {
            let mut state = write_lock(&self.state);
            let latest = state.status_ticket == ticket;
            if latest {
                state.visible_status = None;
            }
            latest
        };
        if still_latest {
            self.presenter.hide_status();
        }

        outcome
    }

    /// Restores the initial model and clears every error. A submission in
    /// flight keeps its state and still completes.
    pub fn reset(&self) {
        {
            let mut state = write_lock(&self.state);
            reset_state(&mut state);
            if !state.submission_state.disables_submit() {
                state.submission_state = SubmissionState::Idle;
            }
        }
        self.presenter.reset_form();
        self.clear_presented_errors();
    }

    pub fn clear_field_error<L>(&self, lens: L)
    where
        L: FieldLens<T>,
    {
        let key = lens.key();
        if let Some(meta) = write_lock(&self.state).field_meta.get_mut(&key) {
            meta.error = None;
        }
        self.presenter.clear_field_error(key);
    }

    fn clear_presented_errors(&self) {
        for key in T::field_keys() {
            self.presenter.clear_field_error(*key);
        }
    }
}

fn store_value<T, L>(state: &mut FormState<T>, lens: L, value: L::Value)
where
    L: FieldLens<T>,
{
    lens.set(&mut state.model, value);
    let dirty = lens.get(&state.model) != lens.get(&state.initial_model);
    state.ensure_meta(lens.key()).dirty = dirty;
}

fn reset_state<T: Clone>(state: &mut FormState<T>) {
    state.model = state.initial_model.clone();
    for meta in state.field_meta.values_mut() {
        *meta = FieldMeta::default();
    }
}

pub(super) fn transition<T>(
    state: &mut FormState<T>,
    next: SubmissionState,
) -> Result<(), TransitionError> {
    let current = state.submission_state;
    if current == next {
        return Ok(());
    }

    let allowed = matches!(
        (current, next),
        (SubmissionState::Idle, SubmissionState::Validating)
            | (SubmissionState::Validating, SubmissionState::Idle)
            | (SubmissionState::Validating, SubmissionState::Loading)
            | (SubmissionState::Loading, SubmissionState::Success)
            | (SubmissionState::Loading, SubmissionState::Error)
            | (SubmissionState::Success, SubmissionState::Idle)
            | (SubmissionState::Error, SubmissionState::Idle)
    );
    if !allowed {
        return Err(TransitionError {
            from: current,
            to: next,
        });
    }
    tracing::debug!(form_id = %state.id, from = ?current, to = ?next, "submission state changed");
    state.submission_state = next;
    Ok(())
}

fn transition_or_warn<T>(state: &mut FormState<T>, next: SubmissionState) {
    if let Err(error) = transition(state, next) {
        tracing::warn!(form_id = %state.id, %error, "submission state left unchanged");
    }
}

pub(super) fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    match lock.read() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

pub(super) fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    match lock.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
