//! Rule Attributes
//!
//! Everything the bridge derives from the rule engine's description of a
//! rule file:
//!
//! - [`info`]: the raw introspection data (entries and annotations)
//! - [`names`]: parsing and cleaning of fully qualified attribute names
//! - [`attributes`]: host-facing attributes, their names and ordering
//! - [`enums`]: synchronization of host enum fields with rule values

pub mod attributes;
pub mod enums;
pub mod info;
pub mod names;

pub use attributes::{
    AttributeKind, EnumAnnotation, ORDER_FIRST, ORDER_NONE, RuleAttribute, RuleAttributeRegistry, UiHint,
};
pub use enums::{CUSTOM_DEFAULT_INDEX, EnumMode, EnumSynchronizer, EnumUpdate, MAX_OPTIONS};
pub use info::{Annotation, AnnotationArgument, AnnotationValue, RuleFileEntry, RuleFileInfo, ValueKind};
