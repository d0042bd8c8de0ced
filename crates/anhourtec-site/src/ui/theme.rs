//! Light/dark theme state.
//!
//! The mode lives in three places: the controller, the persisted preference
//! under [`STORAGE_KEY`], and the document root's class list plus its
//! `color-scheme`. [`Theme`] keeps them in step.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::storage::PreferenceStore;

/// Preference key holding the persisted mode.
pub const STORAGE_KEY: &str = "theme-mode";

/// Color mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Light mode.
    #[default]
    Light,
    /// Dark mode.
    Dark,
}

impl ThemeMode {
    /// Class name and stored value for this mode.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// The other mode.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(Error::InvalidThemeMode {
                value: s.to_string(),
            }),
        }
    }
}

/// The document root element: its class list and `color-scheme` style.
pub trait DocumentRoot: fmt::Debug {
    /// Whether the root carries `class`.
    fn has_class(&self, class: &str) -> bool;
    /// Add `class` to the root. Adding a present class is a no-op.
    fn add_class(&mut self, class: &str);
    /// Remove `class` from the root.
    fn remove_class(&mut self, class: &str);
    /// Set the root's `color-scheme` style.
    fn set_color_scheme(&mut self, scheme: &str);
}

/// A document root with no rendering behind it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadlessDocument {
    classes: Vec<String>,
    color_scheme: Option<String>,
}

impl HeadlessDocument {
    /// An empty root.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A root carrying the given classes.
    #[must_use]
    pub fn with_classes<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut document = Self::default();
        for class in classes {
            document.add_class(class.as_ref());
        }
        document
    }

    /// Classes in insertion order.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// The `color-scheme` style, if set.
    #[must_use]
    pub fn color_scheme(&self) -> Option<&str> {
        self.color_scheme.as_deref()
    }
}

impl DocumentRoot for HeadlessDocument {
    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    fn set_color_scheme(&mut self, scheme: &str) {
        self.color_scheme = Some(scheme.to_string());
    }
}

/// Theme controller.
#[derive(Debug)]
pub struct Theme<D, S> {
    mode: ThemeMode,
    document: D,
    storage: S,
}

impl<D: DocumentRoot, S: PreferenceStore> Theme<D, S> {
    /// Create a controller, reading the initial mode.
    ///
    /// Dark if the document root carries the `dark` class, else dark if the
    /// stored preference is `"dark"`, else light. A storage read failure is
    /// logged and treated as no preference.
    pub fn new(document: D, storage: S) -> Self {
        let mode = if document.has_class(ThemeMode::Dark.as_str()) {
            ThemeMode::Dark
        } else {
            match storage.get_item(STORAGE_KEY) {
                Ok(Some(value)) if value == ThemeMode::Dark.as_str() => ThemeMode::Dark,
                Ok(_) => ThemeMode::Light,
                Err(e) => {
                    warn!("Failed to read theme preference: {e}");
                    ThemeMode::Light
                }
            }
        };
        debug!(%mode, "theme initialized");
        Self {
            mode,
            document,
            storage,
        }
    }

    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    /// Whether dark mode is active.
    #[must_use]
    pub fn is_dark(&self) -> bool {
        self.mode == ThemeMode::Dark
    }

    /// Switch to `mode`, persisting it and updating the document.
    ///
    /// The new class is added before the old one is removed so the root is
    /// never without a mode class.
    pub fn set(&mut self, mode: ThemeMode) {
        self.mode = mode;

        if let Err(e) = self.storage.set_item(STORAGE_KEY, mode.as_str()) {
            warn!("Failed to persist theme preference: {e}");
        }

        self.document.add_class(mode.as_str());
        self.document.remove_class(mode.opposite().as_str());
        self.document.set_color_scheme(mode.as_str());
        debug!(%mode, "theme set");
    }

    /// Flip between light and dark.
    pub fn toggle(&mut self) -> ThemeMode {
        self.set(self.mode.opposite());
        self.mode
    }

    /// Re-read the mode from the document class only.
    pub fn init(&mut self) {
        self.mode = if self.document.has_class(ThemeMode::Dark.as_str()) {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        };
    }

    /// The document root.
    pub fn document(&self) -> &D {
        &self.document
    }

    /// The preference store.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Consume the controller, returning the document and store.
    pub fn into_parts(self) -> (D, S) {
        (self.document, self.storage)
    }
}
