use super::controller::{FormState, transition};
use super::*;
use crate::i18n::I18nManager;
use crate::timer::InstantTimer;
use futures::executor::block_on;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone, Debug, Eq, PartialEq)]
enum Call {
    ShowError(&'static str, String),
    ClearError(&'static str),
    Loading(bool),
    ShowStatus(StatusMessage),
    HideStatus,
    Reset,
}

#[derive(Clone, Default)]
struct RecordingPresenter {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl RecordingPresenter {
    fn push(&self, call: Call) {
        self.calls.lock().expect("presenter log").push(call);
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("presenter log").clone()
    }

    fn take(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.lock().expect("presenter log"))
    }
}

impl FormPresenter for RecordingPresenter {
    fn show_field_error(&self, field: FieldKey, message: &str) {
        self.push(Call::ShowError(field.as_str(), message.to_string()));
    }

    fn clear_field_error(&self, field: FieldKey) {
        self.push(Call::ClearError(field.as_str()));
    }

    fn set_loading(&self, loading: bool) {
        self.push(Call::Loading(loading));
    }

    fn show_status(&self, status: &StatusMessage) {
        self.push(Call::ShowStatus(status.clone()));
    }

    fn hide_status(&self) {
        self.push(Call::HideStatus);
    }

    fn reset_form(&self) {
        self.push(Call::Reset);
    }
}

/// Records what the controller looked like while delivery was in progress.
#[derive(Clone, Default)]
struct SpyTransport {
    controller: Arc<Mutex<Option<ContactFormController>>>,
    seen_states: Arc<Mutex<Vec<SubmissionState>>>,
    nested_outcomes: Arc<Mutex<Vec<SubmissionOutcome>>>,
    failure: Option<SubmitError>,
}

impl SubmitTransport<FormSnapshot> for SpyTransport {
    fn send<'a>(&'a self, model: &'a FormSnapshot) -> BoxedSubmitFuture<'a> {
        Box::pin(async move {
            let controller = self.controller.lock().expect("spy").clone();
            if let Some(controller) = controller {
                self.seen_states
                    .lock()
                    .expect("spy")
                    .push(controller.submission_state());
                let nested = controller.submit(model.clone()).await;
                self.nested_outcomes.lock().expect("spy").push(nested);
            }
            match &self.failure {
                Some(error) => Err(error.clone()),
                None => Ok(()),
            }
        })
    }
}

fn en() -> I18nManager {
    I18nManager::with_locale("en-US")
}

fn valid_snapshot() -> FormSnapshot {
    FormSnapshot::new(
        "Ada Lovelace",
        "ada@example.com",
        "Engines",
        "I would like to talk about analytical engines.",
    )
}

fn harness() -> (ContactFormController, RecordingPresenter, InstantTimer) {
    let presenter = RecordingPresenter::default();
    let timer = InstantTimer::new();
    let controller = ContactRules::default().build(
        contact_form()
            .presenter(presenter.clone())
            .timer(timer.clone())
            .i18n(en()),
    );
    (controller, presenter, timer)
}

fn spy_harness(
    failure: Option<SubmitError>,
) -> (ContactFormController, RecordingPresenter, SpyTransport) {
    let presenter = RecordingPresenter::default();
    let transport = SpyTransport {
        failure,
        ..SpyTransport::default()
    };
    let controller = ContactRules::default().build(
        contact_form()
            .presenter(presenter.clone())
            .transport(transport.clone())
            .timer(InstantTimer::new())
            .i18n(en()),
    );
    *transport.controller.lock().expect("spy") = Some(controller.clone());
    (controller, presenter, transport)
}

fn clear_all() -> Vec<Call> {
    ["name", "email", "subject", "message"]
        .into_iter()
        .map(Call::ClearError)
        .collect()
}

#[test]
fn derive_macro_generates_field_lenses_and_keys() {
    let fields = FormSnapshot::fields();
    assert_eq!(fields.email().key().as_str(), "email");
    assert_eq!(
        FormSnapshot::field_keys()
            .iter()
            .map(|key| key.as_str())
            .collect::<Vec<_>>(),
        vec!["name", "email", "subject", "message"]
    );

    let mut snapshot = FormSnapshot::default();
    fields.subject().set(&mut snapshot, "Hello".into());
    assert_eq!(fields.subject().get(&snapshot), "Hello");
}

#[test]
fn valid_snapshot_has_no_errors_and_no_side_effects() {
    let (controller, presenter, _) = harness();
    assert!(controller.validate(&valid_snapshot()).is_empty());
    assert!(presenter.calls().is_empty());
    assert_eq!(controller.submission_state(), SubmissionState::Idle);
}

#[test]
fn a_single_broken_rule_reports_only_its_field() {
    let (controller, _, _) = harness();
    let cases = [
        ("name", FormSnapshot { name: "A".into(), ..valid_snapshot() }),
        ("email", FormSnapshot { email: "ada@example".into(), ..valid_snapshot() }),
        ("message", FormSnapshot { message: "too short".into(), ..valid_snapshot() }),
    ];

    for (field, snapshot) in cases {
        let errors = controller.validate(&snapshot);
        assert_eq!(errors.len(), 1, "{field}");
        assert_eq!(errors[0].field.as_str(), field);
    }
}

#[test]
fn all_rules_run_without_short_circuit() {
    let (controller, _, _) = harness();
    let errors = controller.validate(&FormSnapshot::new("A", "bad-email", "", "short"));
    assert_eq!(
        errors,
        vec![
            FieldError::new(
                FieldKey::new("name"),
                "Please enter a valid name (at least 2 characters)."
            ),
            FieldError::new(FieldKey::new("email"), "Please enter a valid email address."),
            FieldError::new(
                FieldKey::new("message"),
                "Please enter a message (at least 10 characters)."
            ),
        ]
    );
}

#[test]
fn valid_submit_loads_succeeds_resets_and_hides_status() {
    let (controller, presenter, timer) = harness();
    let fields = FormSnapshot::fields();
    controller.handle_input(fields.name(), "Ada Lovelace".into());
    presenter.take();

    let outcome = block_on(controller.submit(valid_snapshot()));
    assert_eq!(outcome, SubmissionOutcome::Sent);

    let success = StatusMessage::success(
        "Message sent successfully! I'll get back to you soon.",
        Duration::from_millis(5_000),
    );
    let mut expected = clear_all();
    expected.extend([Call::Loading(true), Call::Loading(false), Call::Reset]);
    expected.extend(clear_all());
    expected.extend([Call::ShowStatus(success), Call::HideStatus]);
    assert_eq!(presenter.calls(), expected);

    assert_eq!(
        timer.requested(),
        vec![Duration::from_millis(2_000), Duration::from_millis(5_000)]
    );

    let status = controller.status();
    assert_eq!(status.submission_state, SubmissionState::Idle);
    assert_eq!(status.model, FormSnapshot::default());
    assert!(status.is_valid());
    assert!(!status.is_dirty);
    assert_eq!(status.submit_count, 1);
    assert_eq!(status.visible_status, None);
}

#[test]
fn submit_is_loading_while_the_transport_runs() {
    let (controller, _, transport) = spy_harness(None);
    let outcome = block_on(controller.submit(valid_snapshot()));

    assert_eq!(outcome, SubmissionOutcome::Sent);
    assert_eq!(
        *transport.seen_states.lock().expect("spy"),
        vec![SubmissionState::Loading]
    );
    assert_eq!(controller.submission_state(), SubmissionState::Idle);
}

#[test]
fn second_submit_while_loading_is_rejected_as_busy() {
    let (controller, _, transport) = spy_harness(None);
    block_on(controller.submit(valid_snapshot()));

    assert_eq!(
        *transport.nested_outcomes.lock().expect("spy"),
        vec![SubmissionOutcome::Busy]
    );
    assert_eq!(controller.status().submit_count, 1);
}

#[test]
fn invalid_submit_never_loads_and_shows_field_errors() {
    let (controller, presenter, timer) = harness();
    let outcome = block_on(controller.submit(FormSnapshot::new("A", "bad-email", "", "short")));

    let SubmissionOutcome::Invalid(errors) = outcome else {
        panic!("expected validation failure, got {outcome:?}");
    };
    assert_eq!(errors.len(), 3);

    let calls = presenter.calls();
    assert!(!calls.iter().any(|call| matches!(call, Call::Loading(_))));
    assert!(!calls.iter().any(|call| matches!(call, Call::ShowStatus(_))));
    assert!(calls.contains(&Call::ShowError(
        "email",
        "Please enter a valid email address.".into()
    )));
    assert!(timer.requested().is_empty());

    let status = controller.status();
    assert_eq!(status.submission_state, SubmissionState::Idle);
    assert_eq!(status.field_errors, errors);
    assert_eq!(status.first_error, Some(FieldKey::new("name")));
    assert!(!status.submit_disabled);
}

#[test]
fn resubmitting_clears_stale_errors_first() {
    let (controller, _, _) = harness();
    block_on(controller.submit(FormSnapshot::new("A", "bad-email", "", "short")));
    let outcome = block_on(controller.submit(FormSnapshot {
        email: "bad-email".into(),
        ..valid_snapshot()
    }));

    let SubmissionOutcome::Invalid(errors) = outcome else {
        panic!("expected validation failure, got {outcome:?}");
    };
    assert_eq!(errors.len(), 1);
    let status = controller.status();
    assert_eq!(status.field_errors.len(), 1);
    assert_eq!(status.field_errors[0].field.as_str(), "email");
    assert_eq!(status.submit_count, 2);
}

#[test]
fn transport_failure_shows_error_status_and_keeps_values() {
    let (controller, presenter, _) =
        spy_harness(Some(SubmitError::Unavailable("offline".into())));
    let snapshot = valid_snapshot();
    let outcome = block_on(controller.submit(snapshot.clone()));

    assert_eq!(
        outcome,
        SubmissionOutcome::Failed(SubmitError::Unavailable("offline".into()))
    );
    let calls = presenter.calls();
    assert!(!calls.contains(&Call::Reset));
    assert!(calls.contains(&Call::ShowStatus(StatusMessage::error(
        "Something went wrong while sending your message: delivery unavailable: offline",
        Duration::from_millis(5_000),
    ))));
    let status = controller.status();
    assert_eq!(status.submission_state, SubmissionState::Idle);
    assert_eq!(status.model, snapshot);
}

#[test]
fn input_clears_error_without_revalidating() {
    let (controller, presenter, _) = harness();
    let fields = FormSnapshot::fields();
    let subject_runs = Arc::new(AtomicUsize::new(0));
    {
        let subject_runs = subject_runs.clone();
        controller.register_field_validator(
            fields.subject(),
            move |_model: &FormSnapshot, _value: &String| {
                subject_runs.fetch_add(1, Ordering::SeqCst);
                Ok(())
            },
        );
    }

    block_on(controller.submit(FormSnapshot::new("A", "bad-email", "", "short")));
    assert_eq!(subject_runs.load(Ordering::SeqCst), 1);
    presenter.take();

    controller.handle_input(fields.name(), "B".into());
    controller.handle_input(fields.subject(), "Hi".into());
    assert_eq!(controller.field_error(fields.name()), None);
    assert!(controller.field_error(fields.email()).is_some());
    assert_eq!(presenter.calls(), vec![Call::ClearError("name")]);
    assert_eq!(subject_runs.load(Ordering::SeqCst), 1);

    controller.handle_blur(fields.subject(), "Hi".into());
    assert_eq!(subject_runs.load(Ordering::SeqCst), 2);
}

#[test]
fn blur_validates_only_that_field_with_blur_wording() {
    let (controller, presenter, _) = harness();
    let fields = FormSnapshot::fields();

    assert!(!controller.handle_blur(fields.name(), "A".into()));
    assert_eq!(
        controller.field_error(fields.name()).as_deref(),
        Some("Name must be at least 2 characters long.")
    );
    assert_eq!(controller.field_error(fields.email()), None);
    assert_eq!(
        presenter.take(),
        vec![Call::ShowError(
            "name",
            "Name must be at least 2 characters long.".into()
        )]
    );

    assert!(controller.handle_blur(fields.name(), "Ada".into()));
    assert_eq!(controller.field_error(fields.name()), None);
    assert_eq!(presenter.take(), vec![Call::ClearError("name")]);

    let meta = controller.field_meta(fields.name()).expect("name meta");
    assert!(meta.touched);
    assert!(meta.dirty);
}

#[test]
fn padded_email_is_trimmed_on_blur_only() {
    let (controller, presenter, _) = harness();
    let fields = FormSnapshot::fields();

    assert!(controller.handle_blur(fields.email(), " ada@example.com ".into()));
    assert_eq!(controller.field_error(fields.email()), None);
    assert_eq!(presenter.take(), vec![Call::ClearError("email")]);

    let outcome = block_on(controller.submit(FormSnapshot {
        email: " ada@example.com ".into(),
        ..valid_snapshot()
    }));
    assert_eq!(
        outcome,
        SubmissionOutcome::Invalid(vec![FieldError::new(
            FieldKey::new("email"),
            "Please enter a valid email address."
        )])
    );
    assert_eq!(
        controller.field_error(fields.email()).as_deref(),
        Some("Please enter a valid email address.")
    );
}

#[test]
fn blur_messages_follow_the_active_locale() {
    let controller = ContactRules::default().build(
        contact_form()
            .timer(InstantTimer::new())
            .i18n(I18nManager::with_locale("zh-CN")),
    );
    let fields = FormSnapshot::fields();
    controller.handle_blur(fields.message(), "短".into());
    assert_eq!(
        controller.field_error(fields.message()).as_deref(),
        Some("留言至少需要 10 个字符。")
    );
}

#[test]
fn reset_restores_initial_values_and_clears_errors() {
    let (controller, presenter, _) = harness();
    let fields = FormSnapshot::fields();
    controller.handle_blur(fields.email(), "nope".into());
    presenter.take();

    controller.reset();
    let status = controller.status();
    assert!(status.is_valid());
    assert_eq!(status.model, FormSnapshot::default());
    assert!(!status.is_dirty);

    let mut expected = vec![Call::Reset];
    expected.extend(clear_all());
    assert_eq!(presenter.calls(), expected);
}

#[test]
fn loading_is_only_reachable_through_validating() {
    let mut state = FormState {
        id: FormId::next(),
        initial_model: FormSnapshot::default(),
        model: FormSnapshot::default(),
        submission_state: SubmissionState::Idle,
        submit_count: 0,
        field_meta: Default::default(),
        status_ticket: StatusTicket::default(),
        visible_status: None,
    };

    assert_eq!(
        transition(&mut state, SubmissionState::Loading),
        Err(TransitionError {
            from: SubmissionState::Idle,
            to: SubmissionState::Loading,
        })
    );
    assert!(transition(&mut state, SubmissionState::Success).is_err());

    for next in [
        SubmissionState::Validating,
        SubmissionState::Loading,
        SubmissionState::Error,
        SubmissionState::Idle,
    ] {
        transition(&mut state, next).expect("allowed transition");
    }
    assert!(SubmissionState::Loading.disables_submit());
    assert!(!SubmissionState::Success.disables_submit());
}

#[test]
fn first_error_only_can_be_disabled() {
    let controller = FormController::<FormSnapshot, ContactFieldError>::builder(
        FormSnapshot::default(),
    )
    .options(FormOptions::new().validate_first_error_only(false))
    .i18n(en())
    .timer(InstantTimer::new())
    .build();
    let fields = FormSnapshot::fields();
    ContactRules::default().register(&controller);
    controller.register_field_validator(
        fields.name(),
        |_model: &FormSnapshot, value: &String| {
            if value.contains('@') {
                Err(ContactFieldError::InvalidEmail)
            } else {
                Ok(())
            }
        },
    );

    let errors = controller.validate(&FormSnapshot {
        name: "@".into(),
        ..valid_snapshot()
    });
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|error| error.field.as_str() == "name"));
}
