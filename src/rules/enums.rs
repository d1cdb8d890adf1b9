//! Enum attribute synchronization.
//!
//! An `@Enum` rule attribute becomes an enum attribute on the host node. Its
//! options are either fixed by the annotation (static) or read from a
//! sibling rule attribute every time the node evaluates (dynamic, selected
//! by the `valuesAttr` annotation key).
//!
//! Field index `0` is reserved for the attribute's current rule default
//! when that value is not among the options, so the host can still display
//! it.

use crate::errors::{Error, Result};
use crate::host::EnumAttribute;
use crate::resources::{AttributeMap, AttributeValue};

use super::attributes::{AttributeKind, EnumAnnotation, RuleAttributeRegistry};
use super::info::AnnotationValue;
use super::names;

/// Field index holding a default that is not one of the options.
pub const CUSTOM_DEFAULT_INDEX: i16 = 0;

/// Options occupy indices `1..=i16::MAX`.
pub const MAX_OPTIONS: usize = 32_767;

/// Where the options of an enum come from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EnumMode {
    #[default]
    Uninitialized,
    /// Options are fixed by the annotation.
    Static,
    /// Options come from the sibling attribute named by the key.
    Dynamic(String),
}

/// Outcome of [`EnumSynchronizer::update_options`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumUpdate {
    /// Whether the host fields were rewritten.
    pub changed: bool,
    /// Index of the previously selected option after the update, `0` when
    /// it is gone.
    pub selected_index: i16,
}

/// Keeps the fields of one host enum attribute in line with its rule
/// attribute.
#[derive(Debug, Clone, Default)]
pub struct EnumSynchronizer {
    fq_name: String,
    mode: EnumMode,
    restricted: bool,
    custom_default: String,
}

/// Cuts `s` at the first line break.
#[must_use]
pub fn truncate_at_line_break(s: &str) -> &str {
    s.find(['\r', '\n']).map_or(s, |pos| &s[..pos])
}

#[must_use]
pub fn float_string(v: f64) -> String {
    format!("{v:.6}")
}

#[must_use]
pub fn bool_string(v: bool) -> &'static str {
    if v { "1" } else { "0" }
}

fn annotation_value_string(value: &AnnotationValue) -> String {
    match value {
        AnnotationValue::Str(s) => s.clone(),
        AnnotationValue::Float(v) => float_string(*v),
        AnnotationValue::Bool(b) => bool_string(*b).to_string(),
    }
}

/// Options supplied by a dynamic values attribute.
///
/// Arrays enumerate their entries and a scalar is a single option. Only
/// array strings are cut at line breaks.
fn options_from_value(value: &AttributeValue) -> Vec<String> {
    match value {
        AttributeValue::StringArray(values) => values
            .iter()
            .flatten()
            .map(|s| truncate_at_line_break(s).to_string())
            .collect(),
        AttributeValue::FloatArray(values) => values.iter().map(|v| float_string(*v)).collect(),
        AttributeValue::BoolArray(values) => values.iter().map(|v| bool_string(*v).to_string()).collect(),
        AttributeValue::String(s) => vec![s.clone()],
        AttributeValue::Float(v) => vec![float_string(*v)],
        AttributeValue::Bool(b) => vec![bool_string(*b).to_string()],
    }
}

/// Drops the options that do not fit into the host's `i16` field indices.
fn capped(mut options: Vec<String>, enum_name: &str) -> Vec<String> {
    if options.len() > MAX_OPTIONS {
        log::warn!(
            "Enum '{enum_name}' has {} options, keeping the first {MAX_OPTIONS}",
            options.len()
        );
        options.truncate(MAX_OPTIONS);
    }
    options
}

fn default_string(value: &AttributeValue, kind: AttributeKind) -> Option<String> {
    match (value, kind) {
        (AttributeValue::String(s), AttributeKind::String | AttributeKind::Color) => Some(s.clone()),
        (AttributeValue::Float(v), AttributeKind::Float) => Some(float_string(*v)),
        (AttributeValue::Bool(b), AttributeKind::Bool) => Some(bool_string(*b).to_string()),
        _ => None,
    }
}

fn installed_options<H: EnumAttribute + ?Sized>(host: &H) -> Result<Vec<String>> {
    let max = host.max_index()?;
    Ok((1..=max).filter_map(|i| host.field_name(i)).collect())
}

fn install_options<H: EnumAttribute + ?Sized>(host: &mut H, options: &[String]) -> Result<()> {
    for (index, option) in (1_i16..).zip(options) {
        host.add_field(option, index)?;
    }
    Ok(())
}

impl EnumSynchronizer {
    /// Installs the annotation's static options on `host` and fixes the
    /// synchronization mode.
    pub fn from_annotation<H>(fq_name: impl Into<String>, annotation: &EnumAnnotation, host: &mut H) -> Result<Self>
    where
        H: EnumAttribute + ?Sized,
    {
        let options = annotation.options.iter().map(annotation_value_string).collect();
        let options = capped(options, host.name());
        host.clear_fields()?;
        install_options(host, &options)?;

        let mode = match &annotation.values_attr {
            Some(key) => EnumMode::Dynamic(key.clone()),
            None => EnumMode::Static,
        };
        Ok(Self {
            fq_name: fq_name.into(),
            mode,
            restricted: annotation.restricted,
            custom_default: String::new(),
        })
    }

    #[must_use]
    pub fn fq_name(&self) -> &str {
        &self.fq_name
    }

    #[must_use]
    pub fn mode(&self) -> &EnumMode {
        &self.mode
    }

    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        matches!(self.mode, EnumMode::Dynamic(_))
    }

    #[must_use]
    pub fn restricted(&self) -> bool {
        self.restricted
    }

    /// Current rule default as installed on the host.
    #[must_use]
    pub fn custom_default(&self) -> &str {
        &self.custom_default
    }

    /// Brings the host fields in line with `values` (the evaluated rule
    /// attributes of the node).
    ///
    /// `selected` is the field index currently selected on the host; the
    /// returned [`EnumUpdate`] carries its index after the update. When the
    /// options and the default are unchanged the host is not touched.
    pub fn update_options<H>(
        &mut self,
        host: &mut H,
        registry: &RuleAttributeRegistry,
        values: &AttributeMap,
        selected: i16,
    ) -> Result<EnumUpdate>
    where
        H: EnumAttribute + ?Sized,
    {
        if self.mode == EnumMode::Uninitialized {
            return Err(Error::InvariantViolation(format!(
                "enum attribute '{}' was updated before initialization",
                host.name()
            )));
        }

        let Some(attribute) = registry.get(&self.fq_name) else {
            log::error!("Rule attribute {} of enum '{}' is not registered", self.fq_name, host.name());
            return Err(Error::RuleAttributeNotFound(self.fq_name.clone()));
        };
        let kind = attribute.kind;

        let installed = installed_options(host)?;
        let options = match &self.mode {
            EnumMode::Dynamic(key) => {
                let source = names::sibling_name(&self.fq_name, key);
                match values.get(&source) {
                    Some(value) => capped(options_from_value(value), host.name()),
                    None => {
                        log::warn!("Enum values attribute {source} has no value");
                        Vec::new()
                    }
                }
            }
            _ => installed.clone(),
        };

        match values.get(&self.fq_name).and_then(|v| default_string(v, kind)) {
            Some(default) => self.custom_default = default,
            None => log::error!(
                "Cannot read the default of enum attribute {} as {kind:?}, keeping '{}'",
                self.fq_name,
                self.custom_default
            ),
        }

        if host.field_index(&self.custom_default).is_some() && options == installed {
            return Ok(EnumUpdate {
                changed: false,
                selected_index: selected,
            });
        }

        let previous = host.field_name(selected);

        host.clear_fields()?;
        install_options(host, &options)?;
        if !options.contains(&self.custom_default) {
            host.add_field(&self.custom_default, CUSTOM_DEFAULT_INDEX)?;
        }

        let selected_index = previous
            .and_then(|name| host.field_index(&name))
            .unwrap_or(CUSTOM_DEFAULT_INDEX);
        log::debug!(
            "Updated enum '{}' with {} options, selection {selected} -> {selected_index}",
            host.name(),
            options.len()
        );
        Ok(EnumUpdate {
            changed: true,
            selected_index,
        })
    }
}
