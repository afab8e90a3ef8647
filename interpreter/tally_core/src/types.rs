//! Type descriptors and the conversion matrix.
//!
//! Populated once by [`TypeRegistry::with_builtins`] before any
//! evaluation begins and read-only afterwards, so independent evaluator
//! instances can share one registry.

use rustc_hash::FxHashMap;

use crate::errors::{unknown_conversion, EvalError};
use crate::value::TypeTag;

/// How a source tag may become a destination tag.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ConversionMode {
    /// Identity; no conversion needed.
    SameType,
    /// Always representable.
    Supported,
    /// Representable for some payloads; checked at runtime
    /// (e.g. string to number requires numeric content).
    RuntimeCheck,
    /// Never representable.
    NotSupported,
}

/// Descriptor of one built-in type.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct TypeDescriptor {
    /// Script-facing name.
    pub name: &'static str,
    /// Fully-qualified name.
    pub full_name: String,
    /// True for engine-provided types (everything registered here).
    pub builtin: bool,
    /// The tag this descriptor describes.
    pub tag: TypeTag,
}

/// Registry of type descriptors plus the tag-to-tag conversion matrix.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    descriptors: FxHashMap<TypeTag, TypeDescriptor>,
    conversions: FxHashMap<(TypeTag, TypeTag), ConversionMode>,
}

impl TypeRegistry {
    /// Build the registry for all built-in types.
    pub fn with_builtins() -> Self {
        let mut registry = TypeRegistry::default();
        for tag in TypeTag::ALL {
            registry.descriptors.insert(
                tag,
                TypeDescriptor {
                    name: tag.name(),
                    full_name: format!("tally.{}", tag.name()),
                    builtin: true,
                    tag,
                },
            );
        }
        registry.seed_conversions();
        registry
    }

    /// Look up a descriptor. Every tag is registered by `with_builtins`.
    pub fn descriptor(&self, tag: TypeTag) -> Option<&TypeDescriptor> {
        self.descriptors.get(&tag)
    }

    /// The registered mode for converting `src` to `dst`.
    ///
    /// Querying an unregistered pair is an error, not a silent
    /// `NotSupported`; an unregistered pair means a registration bug.
    pub fn conversion_mode(
        &self,
        src: TypeTag,
        dst: TypeTag,
    ) -> Result<ConversionMode, EvalError> {
        self.conversions
            .get(&(src, dst))
            .copied()
            .ok_or_else(|| unknown_conversion(src.name(), dst.name()))
    }

    fn seed_conversions(&mut self) {
        use ConversionMode::{NotSupported, RuntimeCheck, SameType, Supported};
        // Default the full matrix, then carve out the supported pairs.
        for src in TypeTag::ALL {
            for dst in TypeTag::ALL {
                let mode = if src == dst { SameType } else { NotSupported };
                self.conversions.insert((src, dst), mode);
            }
        }
        let mut set = |src, dst, mode| {
            self.conversions.insert((src, dst), mode);
        };
        // Everything renders, so everything converts to string.
        for src in TypeTag::ALL {
            if src != TypeTag::String {
                set(src, TypeTag::String, Supported);
            }
        }
        // Scalar widenings and narrowings.
        set(TypeTag::Bool, TypeTag::Number, Supported);
        set(TypeTag::Number, TypeTag::Bool, Supported);
        set(TypeTag::String, TypeTag::Number, RuntimeCheck);
        set(TypeTag::String, TypeTag::Bool, RuntimeCheck);
        set(TypeTag::String, TypeTag::Date, RuntimeCheck);
        set(TypeTag::String, TypeTag::Time, RuntimeCheck);
        set(TypeTag::Number, TypeTag::DayOfWeek, RuntimeCheck);
        set(TypeTag::DayOfWeek, TypeTag::Number, Supported);
        set(TypeTag::Date, TypeTag::DayOfWeek, Supported);
        set(TypeTag::Unit, TypeTag::Number, Supported);
        set(TypeTag::Number, TypeTag::Unit, RuntimeCheck);
        // Null converts to any nullable slot.
        for dst in TypeTag::ALL {
            if dst != TypeTag::Null {
                set(TypeTag::Null, dst, Supported);
            }
        }
    }
}
