//! Per-component config instances and their persistence

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::{Map, Value};

use crate::error::{LookupError, PersistError, RegistrationError, RegistryError};
use crate::option::{ConfigOption, CustomOption};
use crate::schema::Schema;
use crate::storage::ConfigStorage;
use crate::value::OptionValue;

/// A component's configuration declaration.
///
/// Implement this once per component; the framework derives the option
/// set, persistence and a default edit surface from it.
pub trait ModConfig: Send + Sync {
    /// The id of the component owning this config. Must match the id the
    /// host declared the config under, or registration is rejected.
    fn component_id(&self) -> &str;

    /// The ordered field declaration this config is built from
    fn schema(&self) -> Schema;

    /// Options not backed by a schema field, e.g. computed values.
    /// Their ids must not collide with field-derived ids.
    fn custom_options(&self) -> Vec<Box<dyn CustomOption>> {
        Vec::new()
    }

    /// Where the config is persisted. Override to share a file with
    /// other components or to use a global location. The parent
    /// directory is created on registration.
    ///
    /// Two same-process components sharing a path will drop each other's
    /// keys on save, and concurrent processes are unguarded; see the
    /// shared-file note in the crate docs.
    fn config_file(&self, config_root: &Path) -> PathBuf {
        config_root.join(format!("{}.json", self.component_id()))
    }

    /// Whether the config may currently be edited, e.g. `false` during a
    /// live session. Presentation layers refuse edits while this is
    /// `false` but still list the config.
    fn is_available(&self) -> bool {
        true
    }
}

/// Persistence and lifecycle wrapper around one component's config.
///
/// Created once when its component registers; loads its file eagerly and
/// immediately writes it back in full, so definition and file problems
/// surface at startup and the file on disk always lists every option.
pub struct ConfigContainer {
    component_id: String,
    path: PathBuf,
    storage: ConfigStorage,
    config: Box<dyn ModConfig>,
    dirty: AtomicBool,
}

impl fmt::Debug for ConfigContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigContainer")
            .field("component_id", &self.component_id)
            .field("path", &self.path)
            .field("storage", &self.storage)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl ConfigContainer {
    pub(crate) fn create(
        config: Box<dyn ModConfig>,
        config_root: &Path,
    ) -> Result<Self, RegistrationError> {
        let storage = ConfigStorage::build(&config.schema(), config.custom_options())
            .map_err(RegistrationError::Definition)?;

        let path = config.config_file(config_root);
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(PersistError::Io)?;
                log::info!("created config directory {parent:?}");
            }
        }

        let container = Self {
            component_id: config.component_id().to_string(),
            path,
            storage,
            config,
            dirty: AtomicBool::new(false),
        };
        container.load()?;
        container.save()?;
        Ok(container)
    }

    pub fn component_id(&self) -> &str {
        &self.component_id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn storage(&self) -> &ConfigStorage {
        &self.storage
    }

    /// Look up one option by its dot-path id
    pub fn option(&self, id: &str) -> Result<&ConfigOption, LookupError> {
        self.storage.get(id).ok_or_else(|| LookupError::NoSuchOption {
            component: self.component_id.clone(),
            option: id.to_string(),
        })
    }

    /// Set an option's value, with the usual validation and clamping
    pub fn set_value(&self, id: &str, value: OptionValue) -> Result<(), RegistryError> {
        self.option(id)?.set(value)?;
        self.dirty.store(true, Ordering::Release);
        Ok(())
    }

    /// Whether any option changed since the last save
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Availability gate, delegated to the config itself
    pub fn is_available(&self) -> bool {
        self.config.is_available()
    }

    /// Read the backing file and apply every known key.
    ///
    /// An absent file is a no-op (defaults stand). Unknown keys are
    /// ignored for forward compatibility. A key whose value does not
    /// convert to its option's type is skipped with a warning and the
    /// rest of the file still loads; only a file that is not a JSON
    /// object at all fails the load.
    pub fn load(&self) -> Result<(), PersistError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        let root: Value = serde_json::from_str(&text)?;
        let object = root
            .as_object()
            .ok_or_else(|| PersistError::NotAnObject(self.path.clone()))?;

        for (key, json) in object {
            match self.storage.get(key) {
                Some(option) => {
                    if let Err(e) = option.from_json(json) {
                        log::warn!(
                            "{}: keeping default for '{key}': {e}",
                            self.path.display()
                        );
                    }
                }
                None => {
                    log::debug!("{}: ignoring unknown key '{key}'", self.path.display());
                }
            }
        }
        Ok(())
    }

    /// Write every option (defaults included) in declaration order.
    ///
    /// The file is pretty-printed with explicit nulls so users can
    /// hand-edit it. The write replaces the whole file via a temp file
    /// and rename, atomic where the OS supports it.
    pub fn save(&self) -> Result<(), PersistError> {
        let mut object = Map::with_capacity(self.storage.len());
        for option in self.storage.iter() {
            object.insert(option.id().to_string(), option.to_json());
        }

        let text = serde_json::to_string_pretty(&Value::Object(object))?;
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, text)?;
        fs::rename(&temp_path, &self.path)?;

        self.dirty.store(false, Ordering::Release);
        log::debug!("saved config for '{}' to {:?}", self.component_id, self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::IntBounds;

    struct TuneConfig {
        available: bool,
    }

    impl ModConfig for TuneConfig {
        fn component_id(&self) -> &str {
            "tune"
        }

        fn schema(&self) -> Schema {
            Schema::builder()
                .boolean("enabled", true)
                .int("level", 3, IntBounds::new(0, 10))
                .build()
        }

        fn is_available(&self) -> bool {
            self.available
        }
    }

    fn create(dir: &Path, available: bool) -> ConfigContainer {
        ConfigContainer::create(Box::new(TuneConfig { available }), dir).unwrap()
    }

    #[test]
    fn test_create_writes_self_documenting_file() {
        let dir = tempfile::tempdir().unwrap();
        let container = create(dir.path(), true);

        let text = fs::read_to_string(container.path()).unwrap();
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["enabled"], Value::Bool(true));
        assert_eq!(parsed["level"], Value::from(3));
    }

    #[test]
    fn test_option_lookup_failure_names_the_option() {
        let dir = tempfile::tempdir().unwrap();
        let container = create(dir.path(), true);

        let err = container.option("missing").unwrap_err();
        assert_eq!(
            err,
            LookupError::NoSuchOption {
                component: "tune".into(),
                option: "missing".into(),
            }
        );
    }

    #[test]
    fn test_dirty_tracking() {
        let dir = tempfile::tempdir().unwrap();
        let container = create(dir.path(), true);

        assert!(!container.is_dirty());
        container.set_value("level", OptionValue::Int(7)).unwrap();
        assert!(container.is_dirty());
        container.save().unwrap();
        assert!(!container.is_dirty());
    }

    #[test]
    fn test_availability_gate() {
        let dir = tempfile::tempdir().unwrap();
        let container = create(dir.path(), false);
        assert!(!container.is_available());
        // an unavailable config still exists and can be read
        assert_eq!(container.option("level").unwrap().get(), OptionValue::Int(3));
    }

    #[test]
    fn test_non_object_file_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("tune.json"), "[1, 2, 3]").unwrap();
        let err = ConfigContainer::create(Box::new(TuneConfig { available: true }), dir.path())
            .unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::Persist(PersistError::NotAnObject(_))
        ));
    }
}
