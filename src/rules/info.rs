//! Rule file introspection data.
//!
//! The rule engine describes a compiled rule file as a list of entries
//! (attributes and rules) carrying annotations such as `@Group` or `@Enum`.
//! These types mirror that description; they are produced by a
//! [`RuleEngine`](crate::context::RuleEngine) and consumed by the
//! [`RuleAttributeRegistry`](crate::rules::RuleAttributeRegistry).

pub const ANNOT_RANGE: &str = "@Range";
pub const ANNOT_ENUM: &str = "@Enum";
pub const ANNOT_HIDDEN: &str = "@Hidden";
pub const ANNOT_COLOR: &str = "@Color";
pub const ANNOT_DIRECTORY: &str = "@Directory";
pub const ANNOT_FILE: &str = "@File";
pub const ANNOT_ORDER: &str = "@Order";
pub const ANNOT_GROUP: &str = "@Group";
pub const ANNOT_IMPORTS: &str = "@Imports";

/// Key the engine reports for positional (unnamed) annotation arguments.
pub const NULL_KEY: &str = "#NULL#";
pub const IMPORTS_KEY: &str = "import";
pub const RESTRICTED_KEY: &str = "restricted";
pub const VALUES_ATTR_KEY: &str = "valuesAttr";
pub const MIN_KEY: &str = "min";
pub const MAX_KEY: &str = "max";

/// Declared value type of a rule attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    String,
    Float,
    Bool,
    StringArray,
    FloatArray,
    BoolArray,
    Void,
}

/// Value of an annotation argument.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    Bool(bool),
    Float(f64),
    Str(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationArgument {
    pub key: String,
    pub value: AnnotationValue,
}

impl AnnotationArgument {
    /// A positional argument.
    pub fn positional(value: AnnotationValue) -> Self {
        Self {
            key: NULL_KEY.to_string(),
            value,
        }
    }

    pub fn keyed(key: impl Into<String>, value: AnnotationValue) -> Self {
        Self { key: key.into(), value }
    }

    #[must_use]
    pub fn is_positional(&self) -> bool {
        self.key == NULL_KEY
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub name: String,
    pub arguments: Vec<AnnotationArgument>,
}

impl Annotation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, value: AnnotationValue) -> Self {
        self.arguments.push(AnnotationArgument::positional(value));
        self
    }

    #[must_use]
    pub fn keyed_arg(mut self, key: impl Into<String>, value: AnnotationValue) -> Self {
        self.arguments.push(AnnotationArgument::keyed(key, value));
        self
    }
}

/// An attribute (or rule) declared by a rule file.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleFileEntry {
    /// Fully qualified name, e.g. `Default$bldg.height`.
    pub name: String,
    pub return_kind: ValueKind,
    pub parameter_count: usize,
    pub annotations: Vec<Annotation>,
}

impl RuleFileEntry {
    pub fn new(name: impl Into<String>, return_kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            return_kind,
            parameter_count: 0,
            annotations: Vec::new(),
        }
    }

    #[must_use]
    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn annotation(&self, name: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.name == name)
    }
}

/// Introspection result for one compiled rule file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleFileInfo {
    pub attributes: Vec<RuleFileEntry>,
    /// File-level annotations (`@Imports`, ...).
    pub annotations: Vec<Annotation>,
}

impl RuleFileInfo {
    /// Import names in declaration order.
    pub fn imports(&self) -> impl Iterator<Item = &str> {
        self.annotations
            .iter()
            .filter(|a| a.name == ANNOT_IMPORTS)
            .flat_map(|a| a.arguments.iter())
            .filter(|arg| arg.key == IMPORTS_KEY)
            .filter_map(|arg| match &arg.value {
                AnnotationValue::Str(s) => Some(s.as_str()),
                _ => None,
            })
    }
}
