//! Pluggable, typed configuration for mod components
//!
//! Independently developed components declare their options once as a
//! schema and get the rest for free:
//! - Type-safe values with bounds clamping and interval snapping
//! - JSON persistence with tolerant merge-on-missing-key
//! - A registry resolving *when* each config is constructed relative to
//!   the host's startup phases
//! - A generated edit surface for settings UIs
//!
//! ```no_run
//! use modconf::{ComponentDecl, InitPoint, IntBounds, ModConfig, Registry, Schema};
//!
//! struct JumpsConfig;
//!
//! impl ModConfig for JumpsConfig {
//!     fn component_id(&self) -> &str {
//!         "jumps"
//!     }
//!
//!     fn schema(&self) -> Schema {
//!         Schema::builder()
//!             .boolean("enabled", true)
//!             .int("height", 3, IntBounds::new(1, 10))
//!             .label("Jump Height")
//!             .build()
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Registry::with_default_root()?;
//! registry.discover(vec![ComponentDecl::new("jumps").config(|| JumpsConfig)]);
//!
//! // the host drives the phases, strictly in order
//! registry.advance(InitPoint::PreLaunch)?;
//! registry.advance(InitPoint::OnInitialize)?;
//! registry.advance(InitPoint::PostLaunch)?;
//!
//! let _height = registry.get_value("jumps", "height")?;
//! # Ok(())
//! # }
//! ```
//!
//! Shared config files: a config may override
//! [`ModConfig::config_file`] to point several components at one file.
//! Each container writes only its own known option ids and replaces the
//! whole file, so same-process sharers drop each other's keys on save
//! and concurrent processes are entirely unguarded. Known limitation.

pub mod bounds;
pub mod container;
pub mod error;
pub mod option;
pub mod registry;
pub mod schema;
pub mod screen;
pub mod storage;
pub mod value;

pub use bounds::{FloatBounds, IntBounds};
pub use container::{ConfigContainer, ModConfig};
pub use error::{
    DefinitionError, LookupError, OptionError, PersistError, RegistrationError, RegistryError,
};
pub use option::{ConfigOption, CustomOption, FloatKind, IntKind, OptionType};
pub use registry::{ComponentDecl, ConfigFactory, InitPoint, Registry};
pub use schema::{Schema, SchemaBuilder, SchemaEntry};
pub use screen::{GeneratedScreenProvider, OptionView, ScreenProvider};
pub use storage::ConfigStorage;
pub use value::OptionValue;
