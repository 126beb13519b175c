use folio::form::{FieldLens, FormModel};

#[derive(Clone, folio::form::FormModel)]
struct NewsletterSignup {
    email: String,
    first_name: String,
}

fn main() {
    let fields = NewsletterSignup::fields();
    let lens = fields.first_name();
    let mut model = NewsletterSignup {
        email: "ada@example.com".to_string(),
        first_name: "Ada".to_string(),
    };
    lens.set(&mut model, "Grace".to_string());
    assert_eq!(lens.key().as_str(), "first_name");
    assert_eq!(lens.get(&model), "Grace");
    assert_eq!(fields.email().get(&model), "ada@example.com");

    let keys = NewsletterSignup::field_keys()
        .iter()
        .map(|key| key.as_str())
        .collect::<Vec<_>>();
    assert_eq!(keys, ["email", "first_name"]);
}
