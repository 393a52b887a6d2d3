use super::{Decomposition, Greedy, Template};
use crate::error::TemplateError;
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;

fn tags(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn decomposition(measurement: &str, tag_pairs: &[(&str, &str)], field: &str) -> Decomposition {
    Decomposition { measurement: measurement.to_string(), tags: tags(tag_pairs), field: field.to_string() }
}

#[test]
fn template_examples_decompose() {
    // (pattern, line, expected)
    let cases: Vec<(&str, &str, Decomposition)> = vec![
        ("measurement.field", "cpu.usage", decomposition("cpu", &[], "usage")),
        ("measurement.measurement.field", "cpu.usage.idle", decomposition("cpu.usage", &[], "idle")),
        ("measurement.host.field*", "cpu.server01.usage.idle", decomposition("cpu", &[("host", "server01")], "usage.idle")),
        ("measurement*", "cpu.usage.idle", decomposition("cpu.usage.idle", &[], "")),
        ("host.measurement*", "server01.cpu.usage", decomposition("cpu.usage", &[("host", "server01")], "")),
        ("region.host.measurement.field", "us.server01.cpu.idle", decomposition("cpu", &[("host", "server01"), ("region", "us")], "idle")),
        (".measurement.field", "servers.cpu.idle", decomposition("cpu", &[], "idle")),
        ("measurement.host.host", "cpu.rack1.server01", decomposition("cpu", &[("host", "rack1.server01")], "")),
        ("measurement.field.field", "cpu.usage.idle", decomposition("cpu", &[], "usage.idle")),
    ];

    for (pattern, line, expected) in cases {
        let template = Template::with_pattern(pattern).unwrap();
        let got = template.apply(line, ".").unwrap();
        assert_eq!(got, expected, "pattern {pattern:?} on line {line:?}");
    }
}

#[test]
fn pattern_longer_than_line_ignores_extra_parts() {
    let template = Template::with_pattern("measurement.host.field").unwrap();
    assert_eq!(template.apply("cpu", ".").unwrap(), decomposition("cpu", &[], ""));
}

#[test]
fn line_longer_than_pattern_drops_trailing_segments() {
    let template = Template::with_pattern("measurement.field").unwrap();
    assert_eq!(template.apply("cpu.usage.idle.extra", ".").unwrap(), decomposition("cpu", &[], "usage"));
}

#[test]
fn greedy_part_stops_processing_later_parts() {
    let template = Template::with_pattern("measurement.field*.host").unwrap();
    let got = template.apply("cpu.usage.idle", ".").unwrap();
    assert_eq!(got, decomposition("cpu", &[], "usage.idle"));
}

#[test]
fn untouched_default_tags_are_emitted() {
    let template = Template::new(".", "measurement", tags(&[("region", "us")])).unwrap();
    assert_eq!(template.apply("cpu", ".").unwrap(), decomposition("cpu", &[("region", "us")], ""));
}

#[test]
fn default_tag_value_is_joined_before_extracted_values() {
    let template = Template::new(".", "measurement.host", tags(&[("host", "dc1")])).unwrap();
    let got = template.apply("cpu.server01", ".").unwrap();
    assert_eq!(got.tags.get("host").map(String::as_str), Some("dc1.server01"));
}

#[test]
fn joiner_differs_from_separator() {
    let template = Template::new(".", "measurement.measurement.host.host.field*", BTreeMap::new()).unwrap();
    let got = template.apply("cpu.load.rack1.server01.short.term", "_").unwrap();
    assert_eq!(got, decomposition("cpu_load", &[("host", "rack1_server01")], "short_term"));
}

#[test]
fn custom_separator_splits_pattern_and_line() {
    let template = Template::new("_", "measurement_host_field", BTreeMap::new()).unwrap();
    let got = template.apply("mem_server01_free", "_").unwrap();
    assert_eq!(got, decomposition("mem", &[("host", "server01")], "free"));
}

#[test]
fn empty_separator_falls_back_to_dot() {
    let template = Template::new("", "measurement.field", BTreeMap::new()).unwrap();
    assert_eq!(template.separator(), ".");
    assert_eq!(template.apply("cpu.idle", ".").unwrap(), decomposition("cpu", &[], "idle"));
}

#[test]
fn empty_segments_are_tolerated() {
    let template = Template::with_pattern("measurement.host.field").unwrap();
    assert_eq!(template.apply("cpu..idle", ".").unwrap(), decomposition("cpu", &[("host", "")], "idle"));
}

#[test]
fn missing_measurement_fails_construction() {
    let err = Template::with_pattern("host.field").unwrap_err();
    assert_eq!(err, TemplateError::NoMeasurement("host.field".to_string()));
    assert!(err.to_string().starts_with("no measurement specified for template."));
}

#[test]
fn measurement_must_match_exactly() {
    assert!(Template::with_pattern("measurements.field").is_err());
    assert!(Template::with_pattern("measurement*.host").is_ok());
}

#[test]
fn greedy_conflict_fails_every_apply() {
    let template = Template::with_pattern("measurement*.field*").unwrap();
    assert_eq!(template.greedy(), Greedy::MEASUREMENT | Greedy::FIELD);

    for line in ["", "cpu", "cpu.usage.idle"] {
        let err = template.apply(line, ".").unwrap_err();
        assert_eq!(err, TemplateError::GreedyConflict("measurement*.field*".to_string()));
    }
    assert!(template.validate(".").is_err());
}

#[test]
fn greedy_flags_are_derived_from_parts() {
    assert_eq!(Template::with_pattern("measurement.field").unwrap().greedy(), Greedy::empty());
    assert_eq!(Template::with_pattern("measurement*").unwrap().greedy(), Greedy::MEASUREMENT);
    assert_eq!(Template::with_pattern("measurement.field*").unwrap().greedy(), Greedy::FIELD);
}

#[test]
fn apply_is_deterministic() {
    let template = Template::new(".", "measurement.host.field*", tags(&[("dc", "eu"), ("host", "a")])).unwrap();
    let first = template.apply("cpu.server01.usage.idle", ".").unwrap();
    for _ in 0..10 {
        assert_eq!(template.apply("cpu.server01.usage.idle", ".").unwrap(), first);
    }
}

#[test]
fn pattern_round_trips_labels() {
    let template = Template::with_pattern("measurement..host.field*").unwrap();
    assert_eq!(template.pattern("."), "measurement..host.field*");
    assert_eq!(template.pattern("/"), "measurement//host/field*");
}

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn template_is_shareable_across_threads() {
    assert_send_sync::<Template>();

    let template = std::sync::Arc::new(Template::with_pattern("measurement.host.field*").unwrap());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let template = std::sync::Arc::clone(&template);
            std::thread::spawn(move || template.apply("cpu.server01.usage.idle", ".").unwrap())
        })
        .collect();

    let outputs: Vec<Decomposition> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for out in &outputs {
        assert_eq!(out, &decomposition("cpu", &[("host", "server01")], "usage.idle"));
    }
}
