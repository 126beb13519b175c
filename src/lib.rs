pub mod feedback;
pub mod form;
pub mod i18n;
pub mod navigation;
pub mod prelude;
pub mod provider;
pub mod reveal;
pub mod scroll;
pub mod theme;
pub mod timer;
pub mod typing;

pub use i18n::{I18nManager, Locale};
pub use provider::SiteProvider;

#[cfg(test)]
mod test_public_api;
