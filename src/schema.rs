//! Declarative option schemas
//!
//! A config declares its fields once as an ordered schema; the storage
//! layer turns that declaration into live options. Declaration order is
//! preserved all the way to the persisted file and generated UI.

use crate::bounds::{FloatBounds, IntBounds};
use crate::option::{FloatKind, IntKind, OptionDef, OptionType};
use crate::value::OptionValue;

/// One declared entry: a field descriptor or a named nested group.
#[derive(Debug, Clone)]
pub enum SchemaEntry {
    Option(OptionDef),
    Group(String, Schema),
}

/// An ordered list of option declarations, possibly nested.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    entries: Vec<SchemaEntry>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    pub fn entries(&self) -> &[SchemaEntry] {
        &self.entries
    }
}

/// Fluent builder for [`Schema`].
///
/// `label`/`describe` refine the most recently declared option:
///
/// ```
/// use modconf::{Schema, IntBounds};
///
/// let schema = Schema::builder()
///     .boolean("fancy_graphics", true)
///     .label("Fancy Graphics")
///     .int("render_distance", 12, IntBounds::new(2, 32))
///     .describe("Chunks rendered in each direction")
///     .group("sounds", |sounds| {
///         sounds.double("volume", 1.0, modconf::FloatBounds::new(0.0, 1.0))
///     })
///     .build();
/// assert_eq!(schema.entries().len(), 3);
/// ```
#[derive(Default)]
pub struct SchemaBuilder {
    entries: Vec<SchemaEntry>,
}

impl SchemaBuilder {
    pub fn boolean(self, id: &str, default: bool) -> Self {
        self.push(id, OptionType::Bool, OptionValue::Bool(default))
    }

    pub fn byte(self, id: &str, default: i64, bounds: IntBounds) -> Self {
        self.whole_number(id, IntKind::Byte, default, bounds)
    }

    pub fn short(self, id: &str, default: i64, bounds: IntBounds) -> Self {
        self.whole_number(id, IntKind::Short, default, bounds)
    }

    pub fn int(self, id: &str, default: i64, bounds: IntBounds) -> Self {
        self.whole_number(id, IntKind::Int, default, bounds)
    }

    pub fn long(self, id: &str, default: i64, bounds: IntBounds) -> Self {
        self.whole_number(id, IntKind::Long, default, bounds)
    }

    /// Single-precision float option; values round-trip through `f32`
    pub fn float(self, id: &str, default: f64, bounds: FloatBounds) -> Self {
        self.push(
            id,
            OptionType::Float { kind: FloatKind::Single, bounds },
            OptionValue::Float(default),
        )
    }

    pub fn double(self, id: &str, default: f64, bounds: FloatBounds) -> Self {
        self.push(
            id,
            OptionType::Float { kind: FloatKind::Double, bounds },
            OptionValue::Float(default),
        )
    }

    pub fn string(self, id: &str, default: &str) -> Self {
        self.push(id, OptionType::String, OptionValue::String(default.to_string()))
    }

    pub fn enumeration(self, id: &str, variants: &[&str], default: &str) -> Self {
        self.push(
            id,
            OptionType::Enum {
                variants: variants.iter().map(|s| s.to_string()).collect(),
            },
            OptionValue::String(default.to_string()),
        )
    }

    /// Declare a nested group; its options get a `"<name>."` id prefix.
    pub fn group(mut self, name: &str, build: impl FnOnce(SchemaBuilder) -> SchemaBuilder) -> Self {
        let inner = build(SchemaBuilder::default());
        self.entries.push(SchemaEntry::Group(name.to_string(), inner.build()));
        self
    }

    /// Set the display label of the most recently declared option
    pub fn label(mut self, label: &str) -> Self {
        if let Some(SchemaEntry::Option(def)) = self.entries.last_mut() {
            def.label = label.to_string();
        }
        self
    }

    /// Set the help text of the most recently declared option
    pub fn describe(mut self, description: &str) -> Self {
        if let Some(SchemaEntry::Option(def)) = self.entries.last_mut() {
            def.description = description.to_string();
        }
        self
    }

    pub fn build(self) -> Schema {
        Schema { entries: self.entries }
    }

    fn whole_number(self, id: &str, kind: IntKind, default: i64, bounds: IntBounds) -> Self {
        self.push(id, OptionType::Int { kind, bounds }, OptionValue::Int(default))
    }

    fn push(mut self, id: &str, ty: OptionType, default: OptionValue) -> Self {
        self.entries.push(SchemaEntry::Option(OptionDef {
            id: id.to_string(),
            label: id.to_string(),
            description: String::new(),
            ty,
            default,
        }));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_preserves_declaration_order() {
        let schema = Schema::builder()
            .boolean("a", true)
            .string("b", "x")
            .boolean("c", false)
            .build();

        let ids: Vec<_> = schema
            .entries()
            .iter()
            .map(|e| match e {
                SchemaEntry::Option(def) => def.id.clone(),
                SchemaEntry::Group(name, _) => name.clone(),
            })
            .collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn test_label_and_describe_refine_last_option() {
        let schema = Schema::builder()
            .int("render_distance", 12, IntBounds::new(2, 32))
            .label("Render Distance")
            .describe("Chunks rendered in each direction")
            .build();

        match &schema.entries()[0] {
            SchemaEntry::Option(def) => {
                assert_eq!(def.label, "Render Distance");
                assert_eq!(def.description, "Chunks rendered in each direction");
            }
            _ => panic!("expected an option entry"),
        }
    }

    #[test]
    fn test_nested_groups() {
        let schema = Schema::builder()
            .group("sounds", |sounds| {
                sounds
                    .double("volume", 1.0, FloatBounds::new(0.0, 1.0))
                    .boolean("muted", false)
            })
            .build();

        match &schema.entries()[0] {
            SchemaEntry::Group(name, inner) => {
                assert_eq!(name, "sounds");
                assert_eq!(inner.entries().len(), 2);
            }
            _ => panic!("expected a group entry"),
        }
    }
}
