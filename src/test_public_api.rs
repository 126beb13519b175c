use crate::form::FormModel as _;
use crate::form::{BoxedSubmitFuture, SubmitError};
use futures::executor::block_on;

#[derive(Clone, Debug, Default, crate::form::FormModel)]
struct QuoteRequest {
    company: String,
    budget: u32,
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum QuoteError {
    CompanyRequired,
    BudgetTooLow,
}

impl crate::form::ValidationError for QuoteError {
    fn message_key(&self, _trigger: crate::form::ValidationTrigger) -> &'static str {
        match self {
            Self::CompanyRequired => "quote.company.required",
            Self::BudgetTooLow => "quote.budget.too_low",
        }
    }
}

fn validate_company(_model: &QuoteRequest, value: &String) -> Result<(), QuoteError> {
    if value.trim().is_empty() {
        Err(QuoteError::CompanyRequired)
    } else {
        Ok(())
    }
}

fn reject_everything(_model: &QuoteRequest) -> BoxedSubmitFuture<'_> {
    Box::pin(async { Err(SubmitError::Rejected("closed for the season".to_string())) })
}

#[test]
fn form_public_api_smoke_compiles() {
    let controller = crate::form::FormController::<QuoteRequest, QuoteError>::builder(
        QuoteRequest::default(),
    )
    .options(crate::form::FormOptions::new().validate_first_error_only(false))
    .transport(reject_everything)
    .timer(crate::timer::InstantTimer::new())
    .build();
    let fields = QuoteRequest::fields();

    controller.register_field_validator(fields.company(), validate_company);
    controller.register_field_validator(
        fields.budget(),
        |_model: &QuoteRequest, value: &u32| {
            if *value < 100 {
                Err(QuoteError::BudgetTooLow)
            } else {
                Ok(())
            }
        },
    );

    let errors = controller.validate(&QuoteRequest::default());
    let keys = errors.iter().map(|error| error.field.as_str()).collect::<Vec<_>>();
    assert_eq!(keys, vec!["company", "budget"]);
    // Untranslated keys fall through as-is.
    assert_eq!(errors[0].message, "quote.company.required");

    controller.handle_input(fields.company(), "Acme".to_string());
    assert!(controller.handle_blur(fields.budget(), 500));

    let outcome = block_on(controller.submit(QuoteRequest {
        company: "Acme".to_string(),
        budget: 500,
    }));
    assert_eq!(
        outcome,
        crate::form::SubmissionOutcome::Failed(SubmitError::Rejected(
            "closed for the season".to_string()
        ))
    );
    assert_eq!(
        controller.submission_state(),
        crate::form::SubmissionState::Idle
    );
    controller.reset();
}

#[test]
fn prelude_exports_page_services() {
    use crate::prelude::*;

    let site = SiteProvider::with_timer(InMemoryThemeStore::new(), InstantTimer::new());
    assert_eq!(site.theme().scheme(), ColorScheme::Light);
    assert!(site.notifications().list().is_empty());

    let mut menu = NavMenu::new();
    menu.handle(NavEvent::ToggleClicked);
    assert!(menu.is_open());

    let _ = ScrollTracker::new(ScrollOptions::default(), vec![Section::new("home", 0.0, 600.0)]);
    let _ = RevealTracker::new(RevealOptions::default());
    let _ = TypingEffect::new(TypingOptions::default()).expect("default phrases");
    let _ = contact_form().build();
}
