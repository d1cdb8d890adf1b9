//! Enum Synchronizer Tests
//!
//! Tests for:
//! - Construction from @Enum annotations (static options, mode)
//! - Dynamic options from array and scalar values attributes
//! - Custom default at the sentinel index
//! - Idempotence: unchanged inputs never touch the host twice
//! - Option count limited by the host's field index range
//! - Selection tracking and error cases

use cga_bridge::errors::Error;
use cga_bridge::host::{EnumAttribute, MemoryEnumAttribute};
use cga_bridge::resources::{AttributeMap, AttributeValue};
use cga_bridge::rules::{
    AnnotationValue, AttributeKind, CUSTOM_DEFAULT_INDEX, EnumAnnotation, EnumMode, EnumSynchronizer, MAX_OPTIONS,
    RuleAttribute, RuleAttributeRegistry, UiHint,
};

const FQ_NAME: &str = "Default$bldg.style";
const VALUES_NAME: &str = "Default$bldg.styles";

fn dynamic_annotation() -> EnumAnnotation {
    EnumAnnotation {
        options: Vec::new(),
        restricted: false,
        values_attr: Some("styles".into()),
    }
}

fn static_annotation(options: &[AnnotationValue]) -> EnumAnnotation {
    EnumAnnotation {
        options: options.to_vec(),
        restricted: true,
        values_attr: None,
    }
}

fn registry_with(kind: AttributeKind, annotation: &EnumAnnotation) -> RuleAttributeRegistry {
    RuleAttributeRegistry::from_attributes(vec![
        RuleAttribute::new(FQ_NAME, kind).with_ui(UiHint::Enum(annotation.clone())),
    ])
}

fn fields(host: &MemoryEnumAttribute) -> Vec<(i16, String)> {
    host.fields().map(|(i, n)| (i, n.to_string())).collect()
}

fn strings(values: &[&str]) -> AttributeValue {
    AttributeValue::from(values.to_vec())
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn from_annotation_installs_static_options() {
    let _ = env_logger::builder().is_test(true).try_init();
    let annotation = static_annotation(&[
        AnnotationValue::Str("flat".into()),
        AnnotationValue::Float(2.5),
        AnnotationValue::Bool(true),
    ]);
    let mut host = MemoryEnumAttribute::new("style");
    let sync = EnumSynchronizer::from_annotation(FQ_NAME, &annotation, &mut host).unwrap();

    assert_eq!(sync.mode(), &EnumMode::Static);
    assert!(sync.restricted());
    assert_eq!(
        fields(&host),
        vec![(1, "flat".into()), (2, "2.500000".into()), (3, "1".into())]
    );
}

#[test]
fn from_annotation_with_values_attr_is_dynamic() {
    let mut host = MemoryEnumAttribute::new("style");
    let sync = EnumSynchronizer::from_annotation(FQ_NAME, &dynamic_annotation(), &mut host).unwrap();
    assert!(sync.is_dynamic());
    assert_eq!(sync.mode(), &EnumMode::Dynamic("styles".into()));
}

// ============================================================================
// Dynamic Options
// ============================================================================

#[test]
fn string_array_options_are_truncated_at_line_breaks() {
    let annotation = dynamic_annotation();
    let registry = registry_with(AttributeKind::String, &annotation);
    let mut host = MemoryEnumAttribute::new("style");
    let mut sync = EnumSynchronizer::from_annotation(FQ_NAME, &annotation, &mut host).unwrap();

    let values = AttributeMap::new()
        .with(VALUES_NAME, strings(&["a", "b\nc", "d"]))
        .with(FQ_NAME, "a");
    let update = sync.update_options(&mut host, &registry, &values, 0).unwrap();

    assert!(update.changed);
    assert_eq!(fields(&host), vec![(1, "a".into()), (2, "b".into()), (3, "d".into())]);
}

#[test]
fn null_string_entries_are_skipped() {
    let annotation = dynamic_annotation();
    let registry = registry_with(AttributeKind::String, &annotation);
    let mut host = MemoryEnumAttribute::new("style");
    let mut sync = EnumSynchronizer::from_annotation(FQ_NAME, &annotation, &mut host).unwrap();

    let values = AttributeMap::new()
        .with(VALUES_NAME, AttributeValue::StringArray(vec![Some("a".into()), None, Some("c".into())]))
        .with(FQ_NAME, "a");
    sync.update_options(&mut host, &registry, &values, 0).unwrap();
    assert_eq!(fields(&host), vec![(1, "a".into()), (2, "c".into())]);
}

#[test]
fn float_and_bool_sources_are_stringified() {
    let annotation = dynamic_annotation();

    let registry = registry_with(AttributeKind::Float, &annotation);
    let mut host = MemoryEnumAttribute::new("height");
    let mut sync = EnumSynchronizer::from_annotation(FQ_NAME, &annotation, &mut host).unwrap();
    let values = AttributeMap::new()
        .with(VALUES_NAME, AttributeValue::FloatArray(vec![1.0, 2.25]))
        .with(FQ_NAME, 1.0);
    sync.update_options(&mut host, &registry, &values, 0).unwrap();
    assert_eq!(fields(&host), vec![(1, "1.000000".into()), (2, "2.250000".into())]);

    let registry = registry_with(AttributeKind::Bool, &annotation);
    let mut host = MemoryEnumAttribute::new("flag");
    let mut sync = EnumSynchronizer::from_annotation(FQ_NAME, &annotation, &mut host).unwrap();
    let values = AttributeMap::new()
        .with(VALUES_NAME, AttributeValue::BoolArray(vec![true, false]))
        .with(FQ_NAME, false);
    sync.update_options(&mut host, &registry, &values, 0).unwrap();
    assert_eq!(fields(&host), vec![(1, "1".into()), (2, "0".into())]);
}

#[test]
fn matching_scalar_source_is_a_single_option() {
    let annotation = dynamic_annotation();
    let registry = registry_with(AttributeKind::String, &annotation);
    let mut host = MemoryEnumAttribute::new("style");
    let mut sync = EnumSynchronizer::from_annotation(FQ_NAME, &annotation, &mut host).unwrap();

    let values = AttributeMap::new().with(VALUES_NAME, "only").with(FQ_NAME, "only");
    sync.update_options(&mut host, &registry, &values, 0).unwrap();
    assert_eq!(fields(&host), vec![(1, "only".into())]);
}

#[test]
fn scalar_source_of_another_kind_is_stringified() {
    let annotation = dynamic_annotation();
    let registry = registry_with(AttributeKind::String, &annotation);
    let mut host = MemoryEnumAttribute::new("style");
    let mut sync = EnumSynchronizer::from_annotation(FQ_NAME, &annotation, &mut host).unwrap();

    let values = AttributeMap::new().with(VALUES_NAME, 3.0).with(FQ_NAME, "x");
    let update = sync.update_options(&mut host, &registry, &values, 0).unwrap();
    assert!(update.changed);
    assert_eq!(
        fields(&host),
        vec![(CUSTOM_DEFAULT_INDEX, "x".into()), (1, "3.000000".into())]
    );
}

#[test]
fn scalar_string_source_keeps_line_breaks() {
    let annotation = dynamic_annotation();
    let registry = registry_with(AttributeKind::String, &annotation);
    let mut host = MemoryEnumAttribute::new("style");
    let mut sync = EnumSynchronizer::from_annotation(FQ_NAME, &annotation, &mut host).unwrap();

    let values = AttributeMap::new().with(VALUES_NAME, "b\nc").with(FQ_NAME, "b\nc");
    sync.update_options(&mut host, &registry, &values, 0).unwrap();
    assert_eq!(fields(&host), vec![(1, "b\nc".into())]);
}

#[test]
fn options_beyond_the_index_range_are_dropped() {
    let _ = env_logger::builder().is_test(true).try_init();
    let annotation = dynamic_annotation();
    let registry = registry_with(AttributeKind::Float, &annotation);
    let mut host = MemoryEnumAttribute::new("height");
    let mut sync = EnumSynchronizer::from_annotation(FQ_NAME, &annotation, &mut host).unwrap();

    let many: Vec<f64> = (0..40_000).map(f64::from).collect();
    let values = AttributeMap::new()
        .with(VALUES_NAME, AttributeValue::FloatArray(many))
        .with(FQ_NAME, 0.0);
    assert!(sync.update_options(&mut host, &registry, &values, 0).unwrap().changed);
    assert_eq!(host.fields().count(), MAX_OPTIONS);
    assert_eq!(host.max_index().unwrap(), i16::MAX);

    let mutations = host.mutations();
    assert!(!sync.update_options(&mut host, &registry, &values, 0).unwrap().changed);
    assert_eq!(host.mutations(), mutations);
}

#[test]
fn static_options_beyond_the_index_range_are_dropped() {
    let options: Vec<AnnotationValue> = (0..33_000).map(|i| AnnotationValue::Float(f64::from(i))).collect();
    let mut host = MemoryEnumAttribute::new("height");
    EnumSynchronizer::from_annotation(FQ_NAME, &static_annotation(&options), &mut host).unwrap();
    assert_eq!(host.fields().count(), MAX_OPTIONS);
}

// ============================================================================
// Custom Default
// ============================================================================

#[test]
fn default_outside_options_goes_to_sentinel_index() {
    let annotation = dynamic_annotation();
    let registry = registry_with(AttributeKind::String, &annotation);
    let mut host = MemoryEnumAttribute::new("style");
    let mut sync = EnumSynchronizer::from_annotation(FQ_NAME, &annotation, &mut host).unwrap();

    let values = AttributeMap::new()
        .with(VALUES_NAME, strings(&["a", "b"]))
        .with(FQ_NAME, "custom");
    sync.update_options(&mut host, &registry, &values, 0).unwrap();

    assert_eq!(sync.custom_default(), "custom");
    assert_eq!(
        fields(&host),
        vec![(0, "custom".into()), (1, "a".into()), (2, "b".into())]
    );
}

#[test]
fn default_among_options_has_no_sentinel() {
    let annotation = dynamic_annotation();
    let registry = registry_with(AttributeKind::String, &annotation);
    let mut host = MemoryEnumAttribute::new("style");
    let mut sync = EnumSynchronizer::from_annotation(FQ_NAME, &annotation, &mut host).unwrap();

    let values = AttributeMap::new()
        .with(VALUES_NAME, strings(&["a", "b"]))
        .with(FQ_NAME, "b");
    sync.update_options(&mut host, &registry, &values, 0).unwrap();
    assert!(host.field_name(CUSTOM_DEFAULT_INDEX).is_none());
}

#[test]
fn missing_default_keeps_previous_value() {
    let annotation = dynamic_annotation();
    let registry = registry_with(AttributeKind::String, &annotation);
    let mut host = MemoryEnumAttribute::new("style");
    let mut sync = EnumSynchronizer::from_annotation(FQ_NAME, &annotation, &mut host).unwrap();

    let values = AttributeMap::new()
        .with(VALUES_NAME, strings(&["a"]))
        .with(FQ_NAME, "custom");
    sync.update_options(&mut host, &registry, &values, 0).unwrap();

    let values = AttributeMap::new().with(VALUES_NAME, strings(&["a", "b"]));
    sync.update_options(&mut host, &registry, &values, 0).unwrap();
    assert_eq!(sync.custom_default(), "custom");
    assert_eq!(host.field_name(0).as_deref(), Some("custom"));
}

// ============================================================================
// Idempotence
// ============================================================================

#[test]
fn unchanged_inputs_mutate_host_once() {
    let annotation = dynamic_annotation();
    let registry = registry_with(AttributeKind::String, &annotation);
    let mut host = MemoryEnumAttribute::new("style");
    let mut sync = EnumSynchronizer::from_annotation(FQ_NAME, &annotation, &mut host).unwrap();

    let values = AttributeMap::new()
        .with(VALUES_NAME, strings(&["a", "b"]))
        .with(FQ_NAME, "custom");

    assert!(sync.update_options(&mut host, &registry, &values, 0).unwrap().changed);
    let mutations = host.mutations();

    let second = sync.update_options(&mut host, &registry, &values, 0).unwrap();
    assert!(!second.changed);
    assert_eq!(host.mutations(), mutations);
}

#[test]
fn static_enum_is_stable_after_first_update() {
    let annotation = static_annotation(&[AnnotationValue::Str("a".into()), AnnotationValue::Str("b".into())]);
    let registry = registry_with(AttributeKind::String, &annotation);
    let mut host = MemoryEnumAttribute::new("style");
    let mut sync = EnumSynchronizer::from_annotation(FQ_NAME, &annotation, &mut host).unwrap();

    let values = AttributeMap::new().with(FQ_NAME, "a");
    // The default is already an option, nothing to do.
    assert!(!sync.update_options(&mut host, &registry, &values, 1).unwrap().changed);

    let values = AttributeMap::new().with(FQ_NAME, "z");
    assert!(sync.update_options(&mut host, &registry, &values, 1).unwrap().changed);
    assert!(!sync.update_options(&mut host, &registry, &values, 1).unwrap().changed);
    assert_eq!(fields(&host), vec![(0, "z".into()), (1, "a".into()), (2, "b".into())]);
}

#[test]
fn reordered_options_are_reinstalled() {
    let annotation = dynamic_annotation();
    let registry = registry_with(AttributeKind::String, &annotation);
    let mut host = MemoryEnumAttribute::new("style");
    let mut sync = EnumSynchronizer::from_annotation(FQ_NAME, &annotation, &mut host).unwrap();

    let values = AttributeMap::new().with(VALUES_NAME, strings(&["a", "b"])).with(FQ_NAME, "a");
    sync.update_options(&mut host, &registry, &values, 0).unwrap();

    let values = AttributeMap::new().with(VALUES_NAME, strings(&["b", "a"])).with(FQ_NAME, "a");
    assert!(sync.update_options(&mut host, &registry, &values, 0).unwrap().changed);
    assert_eq!(fields(&host), vec![(1, "b".into()), (2, "a".into())]);
}

// ============================================================================
// Selection & Errors
// ============================================================================

#[test]
fn selection_follows_option_to_new_index() {
    let annotation = dynamic_annotation();
    let registry = registry_with(AttributeKind::String, &annotation);
    let mut host = MemoryEnumAttribute::new("style");
    let mut sync = EnumSynchronizer::from_annotation(FQ_NAME, &annotation, &mut host).unwrap();

    let values = AttributeMap::new().with(VALUES_NAME, strings(&["a", "b", "c"])).with(FQ_NAME, "a");
    sync.update_options(&mut host, &registry, &values, 0).unwrap();

    // "b" is selected at index 2 and moves to index 1.
    let values = AttributeMap::new().with(VALUES_NAME, strings(&["b", "c"])).with(FQ_NAME, "a");
    let update = sync.update_options(&mut host, &registry, &values, 2).unwrap();
    assert_eq!(update.selected_index, 1);

    // The selected "c" disappears.
    let values = AttributeMap::new().with(VALUES_NAME, strings(&["b"])).with(FQ_NAME, "a");
    let update = sync.update_options(&mut host, &registry, &values, 2).unwrap();
    assert_eq!(update.selected_index, CUSTOM_DEFAULT_INDEX);
}

#[test]
fn unknown_rule_attribute_is_an_error() {
    let annotation = dynamic_annotation();
    let registry = RuleAttributeRegistry::default();
    let mut host = MemoryEnumAttribute::new("style");
    let mut sync = EnumSynchronizer::from_annotation(FQ_NAME, &annotation, &mut host).unwrap();

    let result = sync.update_options(&mut host, &registry, &AttributeMap::new(), 0);
    assert!(matches!(result, Err(Error::RuleAttributeNotFound(name)) if name == FQ_NAME));
}

#[test]
fn uninitialized_synchronizer_is_an_error() {
    let mut sync = EnumSynchronizer::default();
    let mut host = MemoryEnumAttribute::new("style");
    let result = sync.update_options(&mut host, &RuleAttributeRegistry::default(), &AttributeMap::new(), 0);
    assert!(matches!(result, Err(Error::InvariantViolation(_))));
}
