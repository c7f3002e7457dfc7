use bt_model::{Parameter, ParameterSet, ParameterType};

fn set(items: &[(&str, ParameterType, &str)]) -> ParameterSet {
    items
        .iter()
        .map(|(n, t, v)| Parameter::new(*n, *t, *v))
        .collect()
}

#[test]
fn match_keeps_exactly_the_defined_names() {
    let defs = set(&[
        ("speed", ParameterType::Float, "1.5"),
        ("target", ParameterType::String, "enemy"),
        ("loud", ParameterType::Bool, "false"),
    ]);
    let bindings = set(&[
        ("loud", ParameterType::Bool, "true"),
        ("stale", ParameterType::Int, "4"),
        ("speed", ParameterType::Float, "3"),
    ]);

    let matched = bindings.matched(&defs);
    let names: Vec<&str> = matched.names().collect();
    assert_eq!(names, vec!["loud", "speed", "target"]);
    assert_eq!(matched.get("loud").unwrap().value, "true");
    assert_eq!(matched.get("speed").unwrap().value, "3");
    assert_eq!(matched.get("target").unwrap().value, "enemy");
}

#[test]
fn match_is_idempotent() {
    let defs = set(&[("a", ParameterType::Int, "1"), ("b", ParameterType::Bool, "true")]);
    let bindings = set(&[("b", ParameterType::Bool, "false"), ("c", ParameterType::Int, "9")]);

    let once = bindings.matched(&defs);
    let twice = once.matched(&defs);
    assert_eq!(once, twice);
}

#[test]
fn match_takes_the_definition_type() {
    let defs = set(&[("a", ParameterType::Float, "0")]);
    let mut bindings = set(&[("a", ParameterType::Int, "2")]);
    bindings.match_definitions(&defs);

    let a = bindings.get("a").unwrap();
    assert_eq!(a.ty, ParameterType::Float);
    assert_eq!(a.value, "2");
}

#[test]
fn match_against_empty_definitions_clears_bindings() {
    let bindings = set(&[("a", ParameterType::Int, "2")]);
    assert!(bindings.matched(&ParameterSet::new()).is_empty());
}

#[test]
fn parameter_type_parses_its_canonical_names() {
    for ty in ParameterType::ALL {
        assert_eq!(ty.as_str().parse::<ParameterType>(), Ok(*ty));
    }
    let err = "Double".parse::<ParameterType>().unwrap_err();
    assert_eq!(err.to_string(), "'Double' is not a valid ParameterType");
}
