//! Error types for the configuration framework
//!
//! Split along the lines callers care about:
//! - [`DefinitionError`]: mod-author bugs caught at startup, always fatal
//! - [`LookupError`]: unknown component/option at runtime, recoverable
//! - [`OptionError`]: a value that doesn't fit an option's type or bounds
//! - [`PersistError`]: file I/O and JSON failures during load/save

use std::path::PathBuf;

use thiserror::Error;

/// Fatal startup-time errors caused by a faulty component declaration.
///
/// These indicate a bug in the component author's config definition,
/// never user data, and abort registration for that component.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("config for '{0}' is already registered")]
    AlreadyRegistered(String),

    #[error("config declares component id '{declared}' but was registered for '{registered}'")]
    ComponentIdMismatch { declared: String, registered: String },

    #[error("option id '{id}' is declared more than once")]
    OptionIdCollision { id: String },

    #[error("default value for option '{id}' is invalid: {source}")]
    InvalidDefault {
        id: String,
        #[source]
        source: OptionError,
    },

    #[error("could not resolve a config directory for this platform")]
    NoConfigRoot,
}

/// Recoverable runtime lookup failures.
///
/// "No such config" and "no such option within an existing config" are
/// distinct cases and must stay distinguishable for callers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("no config registered for component '{0}'")]
    NoSuchConfig(String),

    #[error("component '{component}' has no option '{option}'")]
    NoSuchOption { component: String, option: String },
}

/// A value rejected by an option's type or constraints.
#[derive(Debug, Error)]
pub enum OptionError {
    #[error("expected a {expected} value, got {found}")]
    TypeMismatch { expected: &'static str, found: &'static str },

    #[error("'{value}' is not a valid variant, expected one of {variants:?}")]
    InvalidVariant { value: String, variants: Vec<String> },

    #[error("option '{id}' cannot be set from {found} JSON")]
    Unparseable { id: String, found: &'static str },
}

/// Failures while reading or writing a config file.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config file {0:?} does not contain a JSON object")]
    NotAnObject(PathBuf),
}

/// Everything that can go wrong while constructing and registering one
/// component's config: a faulty definition, or an eager load/save that
/// failed at the file level.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Composite error for registry operations that both look up and mutate.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Value(#[from] OptionError),
}
