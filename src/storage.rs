//! Ordered option storage built from a declared schema

use std::collections::HashMap;

use crate::error::DefinitionError;
use crate::option::{ConfigOption, CustomOption, OptionDef};
use crate::schema::{Schema, SchemaEntry};

/// The ordered mapping of option id to live option for one config.
///
/// Flattening is depth-first and preserves declaration order exactly;
/// the order is observable in the persisted file and in generated UI, so
/// it has to be deterministic across runs. Custom options follow the
/// field-derived ones in registration order.
#[derive(Debug)]
pub struct ConfigStorage {
    options: Vec<ConfigOption>,
    index: HashMap<String, usize>,
}

impl ConfigStorage {
    /// Build the storage from a schema plus any custom options.
    ///
    /// Fails on a duplicate id anywhere (including a custom option
    /// colliding with a field-derived one) or on a default value that
    /// does not satisfy its own declared type; both are bugs in the
    /// config author's declaration.
    pub fn build(
        schema: &Schema,
        custom: Vec<Box<dyn CustomOption>>,
    ) -> Result<Self, DefinitionError> {
        let mut defs = Vec::new();
        flatten(schema, "", &mut defs);

        let mut options = Vec::with_capacity(defs.len() + custom.len());
        for mut def in defs {
            let id = def.id.clone();
            def.default = def
                .ty
                .coerce(def.default)
                .map_err(|source| DefinitionError::InvalidDefault { id: id.clone(), source })?;
            options.push(ConfigOption::field(def));
        }
        for opt in custom {
            options.push(ConfigOption::custom(opt));
        }

        let mut index = HashMap::with_capacity(options.len());
        for (position, option) in options.iter().enumerate() {
            if index.insert(option.id().to_string(), position).is_some() {
                return Err(DefinitionError::OptionIdCollision {
                    id: option.id().to_string(),
                });
            }
        }

        Ok(Self { options, index })
    }

    pub fn get(&self, id: &str) -> Option<&ConfigOption> {
        self.index.get(id).map(|&position| &self.options[position])
    }

    /// Options in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &ConfigOption> {
        self.options.iter()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

fn flatten(schema: &Schema, prefix: &str, into: &mut Vec<OptionDef>) {
    for entry in schema.entries() {
        match entry {
            SchemaEntry::Option(def) => {
                let mut def = def.clone();
                def.id = format!("{prefix}{}", def.id);
                into.push(def);
            }
            SchemaEntry::Group(name, inner) => {
                flatten(inner, &format!("{prefix}{name}."), into);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::{FloatBounds, IntBounds};
    use crate::error::OptionError;
    use crate::value::OptionValue;
    use serde_json::Value;

    fn sample_schema() -> Schema {
        Schema::builder()
            .boolean("fancy_graphics", true)
            .int("render_distance", 12, IntBounds::new(2, 32))
            .group("sounds", |sounds| {
                sounds
                    .double("volume", 1.0, FloatBounds::new(0.0, 1.0))
                    .boolean("muted", false)
            })
            .string("player_name", "anon")
            .build()
    }

    #[test]
    fn test_flatten_depth_first_with_dot_paths() {
        let storage = ConfigStorage::build(&sample_schema(), Vec::new()).unwrap();
        let ids: Vec<_> = storage.iter().map(|o| o.id().to_string()).collect();
        assert_eq!(
            ids,
            [
                "fancy_graphics",
                "render_distance",
                "sounds.volume",
                "sounds.muted",
                "player_name",
            ]
        );
    }

    #[test]
    fn test_lookup_by_dot_path() {
        let storage = ConfigStorage::build(&sample_schema(), Vec::new()).unwrap();
        let volume = storage.get("sounds.volume").unwrap();
        assert_eq!(volume.get(), OptionValue::Float(1.0));
        assert!(storage.get("sounds").is_none());
    }

    #[test]
    fn test_duplicate_field_id_is_fatal() {
        let schema = Schema::builder()
            .boolean("x", true)
            .string("x", "oops")
            .build();
        let err = ConfigStorage::build(&schema, Vec::new()).unwrap_err();
        assert!(matches!(err, DefinitionError::OptionIdCollision { .. }));
    }

    struct Derived;

    impl CustomOption for Derived {
        fn id(&self) -> &str {
            "fancy_graphics"
        }

        fn get(&self) -> Value {
            Value::Null
        }

        fn set(&self, _value: Value) -> Result<(), OptionError> {
            Ok(())
        }

        fn is_default(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_custom_collision_with_field_is_fatal() {
        let err = ConfigStorage::build(&sample_schema(), vec![Box::new(Derived)]).unwrap_err();
        assert!(matches!(
            err,
            DefinitionError::OptionIdCollision { id } if id == "fancy_graphics"
        ));
    }

    #[test]
    fn test_default_is_normalized_through_bounds() {
        let schema = Schema::builder()
            .int("speed", 107, IntBounds::new(0, 100).step(10))
            .build();
        let storage = ConfigStorage::build(&schema, Vec::new()).unwrap();
        assert_eq!(storage.get("speed").unwrap().get(), OptionValue::Int(100));
    }

    #[test]
    fn test_invalid_enum_default_is_fatal() {
        let schema = Schema::builder()
            .enumeration("difficulty", &["easy", "hard"], "nightmare")
            .build();
        let err = ConfigStorage::build(&schema, Vec::new()).unwrap_err();
        assert!(matches!(err, DefinitionError::InvalidDefault { .. }));
    }
}
