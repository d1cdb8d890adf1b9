//! Rule Attributes
//!
//! Derives the host-facing description of every rule attribute declared by a
//! rule file: display names, grouping, ordering and UI hints.
//!
//! # Ordering
//!
//! Attributes are presented ordered by
//! `(rule_order, global_group_order, group_order, order, base name)`, with
//! the rule file, group path and fully qualified name as final tiebreakers.
//! Fully qualified names are unique within a registry, so the resulting
//! order is strict and total.

use std::cmp::Ordering;
use std::fmt;
use std::path::Path;

use rustc_hash::FxHashMap;

use super::info::{
    ANNOT_COLOR, ANNOT_DIRECTORY, ANNOT_ENUM, ANNOT_FILE, ANNOT_GROUP, ANNOT_HIDDEN, ANNOT_ORDER,
    ANNOT_RANGE, Annotation, AnnotationValue, MAX_KEY, MIN_KEY, RESTRICTED_KEY, RuleFileEntry,
    RuleFileInfo, VALUES_ATTR_KEY, ValueKind,
};
use super::names;

/// Sorts before every explicit order.
pub const ORDER_FIRST: i32 = i32::MIN;
/// No explicit order; sorts after every explicit order.
pub const ORDER_NONE: i32 = i32::MAX;

const HOST_NAME_PREFIX: &str = "PRT_";

/// Host-side kind of a rule attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Bool,
    Float,
    String,
    /// A string attribute annotated `@Color`.
    Color,
    StringArray,
    FloatArray,
    BoolArray,
}

impl AttributeKind {
    fn from_value_kind(kind: ValueKind, is_color: bool) -> Option<Self> {
        match kind {
            ValueKind::Bool => Some(Self::Bool),
            ValueKind::Float => Some(Self::Float),
            ValueKind::String if is_color => Some(Self::Color),
            ValueKind::String => Some(Self::String),
            ValueKind::StringArray => Some(Self::StringArray),
            ValueKind::FloatArray => Some(Self::FloatArray),
            ValueKind::BoolArray => Some(Self::BoolArray),
            ValueKind::Void => None,
        }
    }
}

/// Parsed `@Enum` annotation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnumAnnotation {
    /// Positional options, in declaration order.
    pub options: Vec<AnnotationValue>,
    /// Whether the attribute only accepts one of the options.
    pub restricted: bool,
    /// Key of a sibling attribute supplying the options at evaluation time.
    pub values_attr: Option<String>,
}

impl EnumAnnotation {
    #[must_use]
    pub fn from_annotation(annotation: &Annotation) -> Self {
        let mut parsed = EnumAnnotation {
            restricted: true,
            ..Default::default()
        };
        for arg in &annotation.arguments {
            if arg.is_positional() {
                parsed.options.push(arg.value.clone());
                continue;
            }
            match (arg.key.as_str(), &arg.value) {
                (RESTRICTED_KEY, AnnotationValue::Bool(b)) => parsed.restricted = *b,
                (VALUES_ATTR_KEY, AnnotationValue::Str(s)) if !s.is_empty() => {
                    parsed.values_attr = Some(s.clone());
                }
                (key, value) => log::debug!("Ignoring @Enum argument {key}={value:?}"),
            }
        }
        parsed
    }

    /// Options are supplied by another attribute at evaluation time.
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        self.values_attr.is_some()
    }
}

/// UI presentation hint of an attribute.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum UiHint {
    #[default]
    None,
    Range {
        min: Option<f64>,
        max: Option<f64>,
    },
    Enum(EnumAnnotation),
    File,
    Directory,
}

fn float_arg(annotation: &Annotation, key: &str) -> Option<f64> {
    annotation.arguments.iter().find_map(|arg| match &arg.value {
        AnnotationValue::Float(v) if arg.key == key => Some(*v),
        _ => None,
    })
}

fn ui_hint(entry: &RuleFileEntry) -> UiHint {
    for annotation in &entry.annotations {
        match annotation.name.as_str() {
            ANNOT_ENUM => return UiHint::Enum(EnumAnnotation::from_annotation(annotation)),
            ANNOT_RANGE => {
                return UiHint::Range {
                    min: float_arg(annotation, MIN_KEY),
                    max: float_arg(annotation, MAX_KEY),
                };
            }
            ANNOT_FILE => return UiHint::File,
            ANNOT_DIRECTORY => return UiHint::Directory,
            _ => {}
        }
    }
    UiHint::None
}

/// A rule attribute as presented to the host.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleAttribute {
    pub fq_name: String,
    /// Host attribute name: `PRT_` + cleaned fq name + duplicate suffix.
    pub full_name: String,
    /// Short host attribute name: cleaned name without style + duplicate suffix.
    pub brief_name: String,
    /// Display label.
    pub nice_name: String,
    pub kind: AttributeKind,
    pub ui: UiHint,
    pub groups: Vec<String>,
    pub order: i32,
    pub group_order: i32,
    pub global_group_order: i32,
    /// Rule file (import prefix) declaring the attribute.
    pub rule_file: String,
    pub rule_order: i32,
    pub member_of_start_rule_file: bool,
}

impl RuleAttribute {
    /// An ungrouped, unordered attribute of the start rule file.
    ///
    /// Host names carry the `_0` suffix of a first occurrence.
    pub fn new(fq_name: impl Into<String>, kind: AttributeKind) -> Self {
        let fq_name = fq_name.into();
        let cleaned_fq = names::clean_name(&fq_name);
        let cleaned_brief = names::clean_name(names::remove_style(&fq_name));
        Self {
            full_name: format!("{HOST_NAME_PREFIX}{cleaned_fq}_0"),
            brief_name: format!("{cleaned_brief}_0"),
            nice_name: names::clean_name(names::base_name(&fq_name)),
            rule_file: names::import(&fq_name).to_string(),
            member_of_start_rule_file: names::import(&fq_name).is_empty(),
            fq_name,
            kind,
            ui: UiHint::None,
            groups: Vec::new(),
            order: ORDER_NONE,
            group_order: ORDER_FIRST,
            global_group_order: ORDER_FIRST,
            rule_order: ORDER_NONE,
        }
    }

    #[must_use]
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    #[must_use]
    pub fn with_groups<I, S>(mut self, groups: I, group_order: i32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = groups.into_iter().map(Into::into).collect();
        self.group_order = group_order;
        self.global_group_order = group_order;
        self
    }

    #[must_use]
    pub fn with_rule_order(mut self, rule_order: i32) -> Self {
        self.rule_order = rule_order;
        self
    }

    #[must_use]
    pub fn with_ui(mut self, ui: UiHint) -> Self {
        self.ui = ui;
        self
    }

    /// Attribute name without style and import prefixes.
    #[must_use]
    pub fn base_name(&self) -> &str {
        names::base_name(&self.fq_name)
    }

    #[must_use]
    pub fn enum_annotation(&self) -> Option<&EnumAnnotation> {
        match &self.ui {
            UiHint::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// Presentation order, see the module docs.
    #[must_use]
    pub fn display_cmp(&self, other: &Self) -> Ordering {
        self.rule_order
            .cmp(&other.rule_order)
            .then(self.global_group_order.cmp(&other.global_group_order))
            .then(self.group_order.cmp(&other.group_order))
            .then(self.order.cmp(&other.order))
            .then_with(|| self.base_name().cmp(other.base_name()))
            .then_with(|| self.rule_file.cmp(&other.rule_file))
            .then_with(|| self.groups.cmp(&other.groups))
            .then_with(|| self.fq_name.cmp(&other.fq_name))
    }
}

impl fmt::Display for RuleAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RuleAttribute '{}' (full '{}', brief '{}', nice '{}'): {:?}, groups {:?}, order {}, group order {}, global group order {}, rule file '{}', rule order {}",
            self.fq_name,
            self.full_name,
            self.brief_name,
            self.nice_name,
            self.kind,
            self.groups,
            self.order,
            self.group_order,
            self.global_group_order,
            self.rule_file,
            self.rule_order,
        )
    }
}

/// `@Group("a", "b", 3)`: string arguments form the path, a float in the
/// last position sets the group order.
fn parse_group(annotation: &Annotation) -> (Vec<String>, i32) {
    let groups = annotation
        .arguments
        .iter()
        .filter_map(|arg| match &arg.value {
            AnnotationValue::Str(s) => Some(s.clone()),
            _ => None,
        })
        .collect();
    let order = match annotation.arguments.last().map(|arg| &arg.value) {
        Some(AnnotationValue::Float(v)) => *v as i32,
        _ => ORDER_NONE,
    };
    (groups, order)
}

/// `@Order(n)`: only the first argument counts.
fn parse_order(annotation: &Annotation) -> Option<i32> {
    match annotation.arguments.first().map(|arg| &arg.value) {
        Some(AnnotationValue::Float(v)) => Some(*v as i32),
        _ => None,
    }
}

/// Sets each attribute's global group order: the minimum group order over
/// every attribute sharing its rule file and sitting under the same group
/// path (including deeper groups).
pub fn assign_global_group_order(attributes: &mut [RuleAttribute]) {
    let mut minimums: FxHashMap<(&str, &[String]), i32> = FxHashMap::default();
    for attr in attributes.iter() {
        for depth in 1..=attr.groups.len() {
            let key = (attr.rule_file.as_str(), &attr.groups[..depth]);
            minimums
                .entry(key)
                .and_modify(|o| *o = (*o).min(attr.group_order))
                .or_insert(attr.group_order);
        }
    }
    let resolved: Vec<i32> = attributes
        .iter()
        .map(|attr| {
            if attr.groups.is_empty() {
                ORDER_FIRST
            } else {
                minimums
                    .get(&(attr.rule_file.as_str(), attr.groups.as_slice()))
                    .copied()
                    .unwrap_or(ORDER_NONE)
            }
        })
        .collect();
    for (attr, order) in attributes.iter_mut().zip(resolved) {
        attr.global_group_order = order;
    }
}

/// The rule attributes of one rule file, in presentation order.
#[derive(Debug, Clone, Default)]
pub struct RuleAttributeRegistry {
    attributes: Vec<RuleAttribute>,
    by_name: FxHashMap<String, usize>,
}

impl RuleAttributeRegistry {
    /// Derives the attributes of `rule_file` from its introspection data.
    ///
    /// Entries with parameters (rules) and `@Hidden` attributes are skipped.
    #[must_use]
    pub fn from_rule_file_info(rule_file: &str, info: &RuleFileInfo) -> Self {
        let start_rule_file = Path::new(rule_file)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let import_order: FxHashMap<&str, i32> = info
            .imports()
            .enumerate()
            .map(|(i, name)| (name, i32::try_from(i).unwrap_or(ORDER_NONE)))
            .collect();

        let mut brief_counts = FxHashMap::default();
        let mut full_counts = FxHashMap::default();
        let mut attributes = Vec::with_capacity(info.attributes.len());

        for entry in &info.attributes {
            if entry.parameter_count > 0 || entry.annotation(ANNOT_HIDDEN).is_some() {
                continue;
            }
            let is_color = entry.annotation(ANNOT_COLOR).is_some();
            let Some(kind) = AttributeKind::from_value_kind(entry.return_kind, is_color) else {
                log::debug!("Skipping rule attribute {} without a value", entry.name);
                continue;
            };

            let fq_name = entry.name.as_str();
            let import = names::import(fq_name);
            let member_of_start_rule_file = import.is_empty();
            let (rule_file, rule_order) = if member_of_start_rule_file {
                (start_rule_file.clone(), ORDER_FIRST)
            } else {
                (import.to_string(), import_order.get(import).copied().unwrap_or(ORDER_NONE))
            };

            let (groups, group_order) = entry
                .annotation(ANNOT_GROUP)
                .map_or((Vec::new(), ORDER_FIRST), parse_group);
            let order = entry.annotation(ANNOT_ORDER).and_then(parse_order).unwrap_or(ORDER_NONE);

            let brief = names::clean_name(names::remove_style(fq_name));
            let full = format!("{HOST_NAME_PREFIX}{}", names::clean_name(fq_name));

            let attribute = RuleAttribute {
                fq_name: fq_name.to_string(),
                full_name: names::with_duplicate_suffix(&full, &mut full_counts),
                brief_name: names::with_duplicate_suffix(&brief, &mut brief_counts),
                nice_name: names::clean_name(names::base_name(fq_name)),
                kind,
                ui: ui_hint(entry),
                groups,
                order,
                group_order,
                global_group_order: ORDER_FIRST,
                rule_file,
                rule_order,
                member_of_start_rule_file,
            };
            log::trace!("{attribute}");
            attributes.push(attribute);
        }

        assign_global_group_order(&mut attributes);
        Self::from_attributes(attributes)
    }

    /// Builds a registry from already derived attributes. Later duplicates
    /// of a fully qualified name are dropped.
    #[must_use]
    pub fn from_attributes(mut attributes: Vec<RuleAttribute>) -> Self {
        let mut seen = rustc_hash::FxHashSet::default();
        attributes.retain(|a| seen.insert(a.fq_name.clone()));
        attributes.sort_by(RuleAttribute::display_cmp);
        let by_name = attributes
            .iter()
            .enumerate()
            .map(|(i, a)| (a.fq_name.clone(), i))
            .collect();
        Self { attributes, by_name }
    }

    #[must_use]
    pub fn get(&self, fq_name: &str) -> Option<&RuleAttribute> {
        self.by_name.get(fq_name).map(|&i| &self.attributes[i])
    }

    /// Attributes in presentation order.
    pub fn iter(&self) -> std::slice::Iter<'_, RuleAttribute> {
        self.attributes.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl<'a> IntoIterator for &'a RuleAttributeRegistry {
    type Item = &'a RuleAttribute;
    type IntoIter = std::slice::Iter<'a, RuleAttribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
