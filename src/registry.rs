//! Component registry and startup lifecycle
//!
//! The host declares its components once, then drives the three startup
//! phases in order; each phase constructs and registers the configs
//! queued for it. After registration the tables are read-only and safe
//! to query from any thread.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use crate::container::{ConfigContainer, ModConfig};
use crate::error::{
    DefinitionError, LookupError, OptionError, RegistrationError, RegistryError,
};
use crate::screen::{GeneratedScreenProvider, ScreenProvider};
use crate::value::OptionValue;

/// Startup milestone at which a component's config is constructed.
///
/// Phases are drained strictly in this order, each exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InitPoint {
    PreLaunch,
    OnInitialize,
    PostLaunch,
}

impl Default for InitPoint {
    fn default() -> Self {
        InitPoint::OnInitialize
    }
}

/// Produces a component's config when its init phase is reached.
pub type ConfigFactory = Box<dyn FnOnce() -> Box<dyn ModConfig> + Send>;

/// One component as announced by the host's discovery mechanism.
pub struct ComponentDecl {
    id: String,
    config: Option<(InitPoint, ConfigFactory)>,
    screen: Option<Arc<dyn ScreenProvider>>,
}

impl ComponentDecl {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            config: None,
            screen: None,
        }
    }

    /// Declare a config, constructed at the default phase
    pub fn config<C, F>(self, factory: F) -> Self
    where
        C: ModConfig + 'static,
        F: FnOnce() -> C + Send + 'static,
    {
        self.config_at(InitPoint::default(), factory)
    }

    /// Declare a config, constructed at the given phase
    pub fn config_at<C, F>(mut self, init_point: InitPoint, factory: F) -> Self
    where
        C: ModConfig + 'static,
        F: FnOnce() -> C + Send + 'static,
    {
        self.config = Some((init_point, Box::new(move || Box::new(factory()))));
        self
    }

    /// Declare a custom screen provider instead of the generated one
    pub fn screen(mut self, provider: impl ScreenProvider + 'static) -> Self {
        self.screen = Some(Arc::new(provider));
        self
    }
}

struct PendingConfig {
    component_id: String,
    factory: ConfigFactory,
}

/// Process-wide table of component configs.
///
/// An explicit object with controlled lifetime: create one, hand it by
/// reference to whatever needs lookups, drop it at teardown. Writes go
/// through an exclusive lock so check-then-insert is atomic; reads may
/// come from any thread once registration is done.
pub struct Registry {
    config_root: PathBuf,
    pending: Mutex<HashMap<InitPoint, Vec<PendingConfig>>>,
    containers: RwLock<HashMap<String, Arc<ConfigContainer>>>,
    screens: RwLock<HashMap<String, Arc<dyn ScreenProvider>>>,
}

impl Registry {
    pub fn new(config_root: impl Into<PathBuf>) -> Self {
        Self {
            config_root: config_root.into(),
            pending: Mutex::new(HashMap::new()),
            containers: RwLock::new(HashMap::new()),
            screens: RwLock::new(HashMap::new()),
        }
    }

    /// Create a registry rooted at the platform config directory
    /// (`~/.config/modconf` on Linux, a `.modconf` home directory
    /// elsewhere).
    pub fn with_default_root() -> Result<Self, DefinitionError> {
        let config_root = if cfg!(target_os = "linux") {
            dirs::config_dir()
                .ok_or(DefinitionError::NoConfigRoot)?
                .join("modconf")
        } else {
            dirs::home_dir()
                .ok_or(DefinitionError::NoConfigRoot)?
                .join(".modconf")
        };
        Ok(Self::new(config_root))
    }

    pub fn config_root(&self) -> &Path {
        &self.config_root
    }

    /// Take the host's component list and queue each declared config
    /// under its init phase, preserving discovery order. Custom screen
    /// providers are installed immediately; their lifecycle is
    /// independent of the config's.
    pub fn discover(&self, components: Vec<ComponentDecl>) {
        let mut pending = self.pending.lock().unwrap();
        let mut screens = self.screens.write().unwrap();
        for component in components {
            if let Some(provider) = component.screen {
                screens.insert(component.id.clone(), provider);
            }
            if let Some((init_point, factory)) = component.config {
                log::debug!("queued config for '{}' at {init_point:?}", component.id);
                pending.entry(init_point).or_default().push(PendingConfig {
                    component_id: component.id,
                    factory,
                });
            }
        }
    }

    /// Drain the queue for one phase, constructing and registering each
    /// queued config in discovery order.
    ///
    /// Each phase's queue is consumed exactly once; a repeated call for
    /// the same phase is a no-op. Definition errors fail fast — they are
    /// component-author bugs — leaving configs registered earlier in the
    /// drain in place.
    pub fn advance(&self, init_point: InitPoint) -> Result<(), RegistrationError> {
        let drained = self.pending.lock().unwrap().remove(&init_point);
        let Some(drained) = drained else {
            return Ok(());
        };

        for pending in drained {
            if self.containers.read().unwrap().contains_key(&pending.component_id) {
                return Err(DefinitionError::AlreadyRegistered(pending.component_id).into());
            }

            let config = (pending.factory)();
            if config.component_id() != pending.component_id {
                return Err(DefinitionError::ComponentIdMismatch {
                    declared: config.component_id().to_string(),
                    registered: pending.component_id,
                }
                .into());
            }

            self.register(config)?;
        }
        Ok(())
    }

    /// Register a config directly, outside the phase queues.
    ///
    /// This is the entry point for components that register themselves
    /// at startup rather than going through discovery.
    pub fn register(&self, config: Box<dyn ModConfig>) -> Result<(), RegistrationError> {
        let component_id = config.component_id().to_string();

        // Hold the write lock across the check so a racing registration
        // of the same id cannot slip in between check and insert.
        let mut containers = self.containers.write().unwrap();
        if containers.contains_key(&component_id) {
            return Err(DefinitionError::AlreadyRegistered(component_id).into());
        }

        let container = Arc::new(ConfigContainer::create(config, &self.config_root)?);
        containers.insert(component_id.clone(), container);
        log::debug!("registered config for '{component_id}'");
        Ok(())
    }

    /// The registered container for a component
    pub fn container(&self, component: &str) -> Result<Arc<ConfigContainer>, LookupError> {
        self.containers
            .read()
            .unwrap()
            .get(component)
            .cloned()
            .ok_or_else(|| LookupError::NoSuchConfig(component.to_string()))
    }

    /// Ids of all registered components, sorted for stable output
    pub fn components(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.containers.read().unwrap().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Current value of one option of one component
    pub fn get_value(&self, component: &str, option: &str) -> Result<OptionValue, LookupError> {
        Ok(self.container(component)?.option(option)?.get())
    }

    /// Like [`get_value`] but collapses both lookup failures to `None`
    ///
    /// [`get_value`]: Registry::get_value
    pub fn get_value_opt(&self, component: &str, option: &str) -> Option<OptionValue> {
        self.get_value(component, option).ok()
    }

    /// Set one option of one component, with full validation
    pub fn set_value(
        &self,
        component: &str,
        option: &str,
        value: OptionValue,
    ) -> Result<(), RegistryError> {
        self.container(component)?.set_value(option, value)
    }

    /// Like [`set_value`] but collapses lookup failures to `false`.
    /// A value rejected by the option's type or bounds is a caller bug
    /// and still surfaces as an error.
    ///
    /// [`set_value`]: Registry::set_value
    pub fn set_value_opt(
        &self,
        component: &str,
        option: &str,
        value: OptionValue,
    ) -> Result<bool, OptionError> {
        match self.set_value(component, option, value) {
            Ok(()) => Ok(true),
            Err(RegistryError::Lookup(_)) => Ok(false),
            Err(RegistryError::Value(e)) => Err(e),
        }
    }

    /// Install or replace a component's custom screen provider
    pub fn register_screen_provider(
        &self,
        component: &str,
        provider: impl ScreenProvider + 'static,
    ) {
        self.screens
            .write()
            .unwrap()
            .insert(component.to_string(), Arc::new(provider));
    }

    /// The provider for one component: its custom one if declared,
    /// otherwise a generated provider over its option set.
    pub fn screen_provider(&self, component: &str) -> Option<Arc<dyn ScreenProvider>> {
        if let Some(provider) = self.screens.read().unwrap().get(component) {
            return Some(Arc::clone(provider));
        }
        self.container(component)
            .ok()
            .map(|container| {
                Arc::new(GeneratedScreenProvider::new(container)) as Arc<dyn ScreenProvider>
            })
    }

    /// Providers for every component that has one: custom providers win,
    /// every registered config without one gets a generated provider.
    pub fn screen_providers(&self) -> HashMap<String, Arc<dyn ScreenProvider>> {
        let mut providers: HashMap<String, Arc<dyn ScreenProvider>> = self
            .screens
            .read()
            .unwrap()
            .iter()
            .map(|(id, provider)| (id.clone(), Arc::clone(provider)))
            .collect();
        for (id, container) in self.containers.read().unwrap().iter() {
            providers
                .entry(id.clone())
                .or_insert_with(|| Arc::new(GeneratedScreenProvider::new(Arc::clone(container))));
        }
        providers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::IntBounds;
    use crate::schema::Schema;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubConfig {
        id: &'static str,
    }

    impl ModConfig for StubConfig {
        fn component_id(&self) -> &str {
            self.id
        }

        fn schema(&self) -> Schema {
            Schema::builder()
                .int("level", 3, IntBounds::new(0, 10))
                .build()
        }
    }

    fn test_registry() -> (tempfile::TempDir, Registry) {
        let dir = tempfile::tempdir().unwrap();
        let registry = Registry::new(dir.path());
        (dir, registry)
    }

    #[test]
    fn test_register_and_query() {
        let (_dir, registry) = test_registry();
        registry.register(Box::new(StubConfig { id: "jumps" })).unwrap();

        assert_eq!(
            registry.get_value("jumps", "level").unwrap(),
            OptionValue::Int(3)
        );
        registry.set_value("jumps", "level", OptionValue::Int(8)).unwrap();
        assert_eq!(
            registry.get_value_opt("jumps", "level"),
            Some(OptionValue::Int(8))
        );
    }

    #[test]
    fn test_lookup_errors_are_distinguishable() {
        let (_dir, registry) = test_registry();
        registry.register(Box::new(StubConfig { id: "jumps" })).unwrap();

        assert_eq!(
            registry.get_value("nope", "level").unwrap_err(),
            LookupError::NoSuchConfig("nope".into())
        );
        assert_eq!(
            registry.get_value("jumps", "nope").unwrap_err(),
            LookupError::NoSuchOption {
                component: "jumps".into(),
                option: "nope".into(),
            }
        );
        assert_eq!(registry.get_value_opt("nope", "level"), None);
    }

    #[test]
    fn test_duplicate_registration_keeps_first() {
        let (_dir, registry) = test_registry();
        registry.register(Box::new(StubConfig { id: "jumps" })).unwrap();
        registry.set_value("jumps", "level", OptionValue::Int(9)).unwrap();

        let err = registry.register(Box::new(StubConfig { id: "jumps" })).unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::Definition(DefinitionError::AlreadyRegistered(_))
        ));
        // first registration intact
        assert_eq!(
            registry.get_value("jumps", "level").unwrap(),
            OptionValue::Int(9)
        );
    }

    #[test]
    fn test_id_mismatch_registers_nothing() {
        let (_dir, registry) = test_registry();
        registry.discover(vec![
            ComponentDecl::new("declared").config(|| StubConfig { id: "actual" }),
        ]);

        let err = registry.advance(InitPoint::OnInitialize).unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::Definition(DefinitionError::ComponentIdMismatch { .. })
        ));
        assert!(registry.container("declared").is_err());
        assert!(registry.container("actual").is_err());
    }

    #[test]
    fn test_phases_drain_independently_and_once() {
        let (_dir, registry) = test_registry();
        let constructions = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&constructions);

        registry.discover(vec![
            ComponentDecl::new("early").config_at(InitPoint::PreLaunch, || StubConfig { id: "early" }),
            ComponentDecl::new("late").config_at(InitPoint::PostLaunch, move || {
                counted.fetch_add(1, Ordering::SeqCst);
                StubConfig { id: "late" }
            }),
        ]);

        registry.advance(InitPoint::PreLaunch).unwrap();
        assert!(registry.container("early").is_ok());

        registry.advance(InitPoint::OnInitialize).unwrap();
        assert_eq!(constructions.load(Ordering::SeqCst), 0);
        assert!(registry.container("late").is_err());

        registry.advance(InitPoint::PostLaunch).unwrap();
        assert_eq!(constructions.load(Ordering::SeqCst), 1);
        assert!(registry.container("late").is_ok());

        // queue already consumed
        registry.advance(InitPoint::PostLaunch).unwrap();
        assert_eq!(constructions.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_set_value_opt_swallows_lookup_but_not_value_errors() {
        let (_dir, registry) = test_registry();
        registry.register(Box::new(StubConfig { id: "jumps" })).unwrap();

        assert!(registry.set_value_opt("jumps", "level", OptionValue::Int(5)).unwrap());
        assert!(!registry.set_value_opt("nope", "level", OptionValue::Int(5)).unwrap());
        assert!(registry
            .set_value_opt("jumps", "level", OptionValue::Bool(true))
            .is_err());
    }

    struct LockedConfig;

    impl ModConfig for LockedConfig {
        fn component_id(&self) -> &str {
            "locked"
        }

        fn schema(&self) -> Schema {
            Schema::builder().boolean("enabled", true).build()
        }

        fn is_available(&self) -> bool {
            false
        }
    }

    #[test]
    fn test_unavailable_config_is_listed_but_not_editable() {
        let (_dir, registry) = test_registry();
        registry.register(Box::new(LockedConfig)).unwrap();

        let provider = registry.screen_provider("locked").unwrap();
        assert!(!provider.editable());
        // still listed with its full option set, just not editable
        assert_eq!(provider.option_views().len(), 1);
    }

    #[test]
    fn test_generated_screen_provider_fills_gaps() {
        let (_dir, registry) = test_registry();
        registry.register(Box::new(StubConfig { id: "jumps" })).unwrap();

        let providers = registry.screen_providers();
        let provider = providers.get("jumps").unwrap();
        assert!(provider.editable());
        let views = provider.option_views();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].id, "level");
        assert_eq!(views[0].int_bounds.unwrap().max, 10);
    }
}
