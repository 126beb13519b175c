use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Arc, RwLock};

use crate::i18n::I18nManager;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

impl ColorScheme {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Value written to the `data-theme` attribute and to the store.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// The toggle shows the scheme you would switch to.
    pub const fn toggle_icon(self) -> &'static str {
        match self {
            Self::Light => "fas fa-moon",
            Self::Dark => "fas fa-sun",
        }
    }

    pub const fn toggle_label_key(self) -> &'static str {
        match self {
            Self::Light => "theme.switch_to_dark",
            Self::Dark => "theme.switch_to_light",
        }
    }
}

impl Display for ColorScheme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorScheme {
    type Err = ThemeStoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(ThemeStoreError::UnknownScheme(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ThemeStoreError {
    #[error("unknown color scheme `{0}`")]
    UnknownScheme(String),
    #[error("theme preference i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Where the single persisted preference lives.
pub trait ThemeStore: Send + Sync + 'static {
    fn load(&self) -> Result<Option<ColorScheme>, ThemeStoreError>;
    fn save(&self, scheme: ColorScheme) -> Result<(), ThemeStoreError>;
}

#[derive(Clone, Debug, Default)]
pub struct InMemoryThemeStore {
    value: Arc<RwLock<Option<ColorScheme>>>,
}

impl InMemoryThemeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scheme(scheme: ColorScheme) -> Self {
        Self {
            value: Arc::new(RwLock::new(Some(scheme))),
        }
    }
}

impl ThemeStore for InMemoryThemeStore {
    fn load(&self) -> Result<Option<ColorScheme>, ThemeStoreError> {
        let value = match self.value.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        };
        Ok(value)
    }

    fn save(&self, scheme: ColorScheme) -> Result<(), ThemeStoreError> {
        match self.value.write() {
            Ok(mut guard) => *guard = Some(scheme),
            Err(poisoned) => *poisoned.into_inner() = Some(scheme),
        }
        Ok(())
    }
}

/// Keeps the preference as a one-word text file (`light` or `dark`).
#[derive(Clone, Debug)]
pub struct FileThemeStore {
    path: PathBuf,
}

impl FileThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ThemeStore for FileThemeStore {
    fn load(&self) -> Result<Option<ColorScheme>, ThemeStoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw.parse().map(Some),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn save(&self, scheme: ColorScheme) -> Result<(), ThemeStoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, scheme.as_str())?;
        Ok(())
    }
}

/// Active scheme plus its persistence.
#[derive(Clone)]
pub struct ThemeController {
    store: Arc<dyn ThemeStore>,
    current: Arc<RwLock<ColorScheme>>,
}

impl ThemeController {
    /// Reads the stored preference. A missing or unreadable value falls back
    /// to the light scheme.
    pub fn init(store: impl ThemeStore) -> Self {
        let scheme = match store.load() {
            Ok(Some(scheme)) => scheme,
            Ok(None) => ColorScheme::default(),
            Err(error) => {
                tracing::warn!(%error, "ignoring stored theme preference");
                ColorScheme::default()
            }
        };
        tracing::debug!(%scheme, "theme initialized");
        Self {
            store: Arc::new(store),
            current: Arc::new(RwLock::new(scheme)),
        }
    }

    pub fn scheme(&self) -> ColorScheme {
        match self.current.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    pub fn set_scheme(&self, scheme: ColorScheme) -> Result<ColorScheme, ThemeStoreError> {
        match self.current.write() {
            Ok(mut guard) => *guard = scheme,
            Err(poisoned) => *poisoned.into_inner() = scheme,
        }
        tracing::info!(%scheme, "theme changed");
        self.store.save(scheme)?;
        Ok(scheme)
    }

    /// Accessible label for the toggle button in the active locale.
    pub fn toggle_label(&self, i18n: &I18nManager) -> String {
        i18n.t(self.scheme().toggle_label_key())
    }

    /// Flips the scheme and persists it. The in-memory scheme changes even
    /// when saving fails.
    pub fn toggle(&self) -> Result<ColorScheme, ThemeStoreError> {
        self.set_scheme(self.scheme().toggled())
    }
}

impl std::fmt::Debug for ThemeController {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeController")
            .field("scheme", &self.scheme())
            .finish_non_exhaustive()
    }
}
