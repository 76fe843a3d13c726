//! Live config options: typed, bounded, (de)serializable

use std::fmt;
use std::sync::RwLock;

use serde_json::Value;

use crate::bounds::{FloatBounds, IntBounds};
use crate::error::OptionError;
use crate::value::OptionValue;

/// Native width of a whole-number option.
///
/// All whole numbers are carried as `i64` at runtime; the declared width
/// is a hard range applied on every set, even when declared bounds are
/// advisory, since a narrower backing type could never hold the excess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntKind {
    Byte,
    Short,
    Int,
    Long,
}

impl IntKind {
    pub fn min(self) -> i64 {
        match self {
            IntKind::Byte => i8::MIN as i64,
            IntKind::Short => i16::MIN as i64,
            IntKind::Int => i32::MIN as i64,
            IntKind::Long => i64::MIN,
        }
    }

    pub fn max(self) -> i64 {
        match self {
            IntKind::Byte => i8::MAX as i64,
            IntKind::Short => i16::MAX as i64,
            IntKind::Int => i32::MAX as i64,
            IntKind::Long => i64::MAX,
        }
    }
}

/// Precision of a floating-point option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatKind {
    /// Values round-trip through `f32`
    Single,
    Double,
}

/// Type definition with constraints for validation
#[derive(Debug, Clone)]
pub enum OptionType {
    Bool,
    Int { kind: IntKind, bounds: IntBounds },
    Float { kind: FloatKind, bounds: FloatBounds },
    String,
    Enum { variants: Vec<String> },
}

impl OptionType {
    /// Declared whole-number bounds, if this is a whole-number option
    pub fn int_bounds(&self) -> Option<&IntBounds> {
        match self {
            OptionType::Int { bounds, .. } => Some(bounds),
            _ => None,
        }
    }

    /// Declared floating-point bounds, if this is a float option
    pub fn float_bounds(&self) -> Option<&FloatBounds> {
        match self {
            OptionType::Float { bounds, .. } => Some(bounds),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            OptionType::Bool => "bool",
            OptionType::Int { .. } => "int",
            OptionType::Float { .. } => "float",
            OptionType::String => "string",
            OptionType::Enum { .. } => "enum",
        }
    }

    /// Validate a value against this type and apply clamp/snap.
    ///
    /// Every path that commits a value goes through here, so persistence
    /// and the query API can never bypass bounds enforcement.
    pub fn coerce(&self, value: OptionValue) -> Result<OptionValue, OptionError> {
        match (self, value) {
            (OptionType::Bool, v @ OptionValue::Bool(_)) => Ok(v),
            (OptionType::Int { kind, bounds }, OptionValue::Int(v)) => {
                let v = bounds.apply(v).clamp(kind.min(), kind.max());
                Ok(OptionValue::Int(v))
            }
            (OptionType::Float { kind, bounds }, OptionValue::Float(v)) => {
                let mut v = bounds.apply(v);
                if *kind == FloatKind::Single {
                    v = v as f32 as f64;
                }
                Ok(OptionValue::Float(v))
            }
            (OptionType::String, v @ OptionValue::String(_)) => Ok(v),
            (OptionType::Enum { variants }, OptionValue::String(v)) => {
                if variants.contains(&v) {
                    Ok(OptionValue::String(v))
                } else {
                    Err(OptionError::InvalidVariant {
                        value: v,
                        variants: variants.clone(),
                    })
                }
            }
            (ty, value) => Err(OptionError::TypeMismatch {
                expected: ty.name(),
                found: value.type_name(),
            }),
        }
    }
}

/// Definition of one field-backed option: id, UI metadata, type, default.
#[derive(Debug, Clone)]
pub struct OptionDef {
    /// Full dot-path id within the owning config (e.g. `"sounds.volume"`)
    pub id: String,
    /// Human-readable label for UI controls
    pub label: String,
    /// Help text
    pub description: String,
    pub ty: OptionType,
    pub default: OptionValue,
}

/// An option not backed by a schema field, e.g. a computed or derived
/// value. Authors implement this and hand instances to the config via
/// [`ModConfig::custom_options`](crate::container::ModConfig::custom_options).
///
/// The payload is raw JSON; an explicit null is a legitimate state.
pub trait CustomOption: Send + Sync {
    fn id(&self) -> &str;

    fn label(&self) -> &str {
        self.id()
    }

    fn description(&self) -> &str {
        ""
    }

    fn get(&self) -> Value;

    /// Apply a new value. Implementations own their validation and must
    /// apply it here too, since file loads funnel through `set`.
    fn set(&self, value: Value) -> Result<(), OptionError>;

    fn is_default(&self) -> bool;
}

enum OptionKind {
    Field {
        ty: OptionType,
        default: OptionValue,
        value: RwLock<OptionValue>,
    },
    Custom(Box<dyn CustomOption>),
}

/// A live option: the unit the storage, container, registry and screen
/// layers all operate on.
///
/// The current value sits behind its own lock; the constructing thread
/// writes it during load, arbitrary threads read it afterwards.
pub struct ConfigOption {
    id: String,
    label: String,
    description: String,
    kind: OptionKind,
}

impl fmt::Debug for ConfigOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigOption")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl ConfigOption {
    pub(crate) fn field(def: OptionDef) -> Self {
        Self {
            id: def.id,
            label: def.label,
            description: def.description,
            kind: OptionKind::Field {
                value: RwLock::new(def.default.clone()),
                default: def.default,
                ty: def.ty,
            },
        }
    }

    pub(crate) fn custom(opt: Box<dyn CustomOption>) -> Self {
        Self {
            id: opt.id().to_string(),
            label: opt.label().to_string(),
            description: opt.description().to_string(),
            kind: OptionKind::Custom(opt),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Type definition, if this is a field-backed option
    pub fn ty(&self) -> Option<&OptionType> {
        match &self.kind {
            OptionKind::Field { ty, .. } => Some(ty),
            OptionKind::Custom(_) => None,
        }
    }

    /// Current value. Never absent for field-backed options.
    pub fn get(&self) -> OptionValue {
        match &self.kind {
            OptionKind::Field { value, .. } => value.read().unwrap().clone(),
            OptionKind::Custom(opt) => OptionValue::Json(opt.get()),
        }
    }

    /// Set a new value, applying bounds clamp/snap before committing.
    pub fn set(&self, new: OptionValue) -> Result<(), OptionError> {
        match &self.kind {
            OptionKind::Field { ty, value, .. } => {
                let coerced = ty.coerce(new)?;
                log::debug!("set option {} = {:?}", self.id, coerced);
                *value.write().unwrap() = coerced;
                Ok(())
            }
            OptionKind::Custom(opt) => {
                let json = new.as_json()?;
                log::debug!("set custom option {} = {}", self.id, json);
                opt.set(json)
            }
        }
    }

    /// Whether the current value equals the compile-time default
    pub fn is_default(&self) -> bool {
        match &self.kind {
            OptionKind::Field { value, default, .. } => *value.read().unwrap() == *default,
            OptionKind::Custom(opt) => opt.is_default(),
        }
    }

    /// JSON representation for the persisted file
    pub fn to_json(&self) -> Value {
        self.get().to_json()
    }

    /// Apply a persisted JSON value, with the same validation as [`set`].
    ///
    /// A JSON value that cannot convert to the native type is a typed
    /// error, never a silent default.
    ///
    /// [`set`]: ConfigOption::set
    pub fn from_json(&self, json: &Value) -> Result<(), OptionError> {
        let value = match &self.kind {
            OptionKind::Custom(_) => OptionValue::Json(json.clone()),
            OptionKind::Field { ty, .. } => match ty {
                OptionType::Bool => OptionValue::Bool(
                    json.as_bool().ok_or_else(|| self.unparseable(json))?,
                ),
                OptionType::Int { .. } => OptionValue::Int(
                    json.as_i64().ok_or_else(|| self.unparseable(json))?,
                ),
                OptionType::Float { .. } => OptionValue::Float(
                    json.as_f64().ok_or_else(|| self.unparseable(json))?,
                ),
                OptionType::String | OptionType::Enum { .. } => OptionValue::String(
                    json.as_str().ok_or_else(|| self.unparseable(json))?.to_string(),
                ),
            },
        };
        self.set(value)
    }

    fn unparseable(&self, json: &Value) -> OptionError {
        OptionError::Unparseable {
            id: self.id.clone(),
            found: json_type_name(json),
        }
    }
}

fn json_type_name(json: &Value) -> &'static str {
    match json {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
