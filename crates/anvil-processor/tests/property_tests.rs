use anvil_config::{ConfigKey, LayeredConfig};
use anvil_element::{ArgValue, ContainerElement, ElementPath, Member, ModifierList};
use anvil_processor::{
    AnnotationInjector, AnnotationMatchSet, ConfigResolver, GlobalSettings, ProcessorError,
    ProcessorRegistry, TextAnnotationParser, ToleratedElementFilter,
};
use anvil_test_utils::{annotation, id, path, text_arg, tolerated_method, GetterProcessor};
use proptest::prelude::*;
use std::sync::Arc;

fn getter_registry() -> ProcessorRegistry {
    let mut registry = ProcessorRegistry::new();
    registry.register(Arc::new(GetterProcessor::new()));
    registry
}

proptest! {
    #[test]
    fn prop_resolution_follows_precedence(
        explicit in proptest::option::of(any::<bool>()),
        class in proptest::option::of(any::<bool>()),
        package in proptest::option::of(any::<bool>()),
        project in proptest::option::of(any::<bool>()),
        default in any::<bool>(),
    ) {
        let key = ConfigKey::new("lombok.accessors.chain", default);
        let mut config = LayeredConfig::new();
        if let Some(value) = class {
            config.set(path("com.acme.Order"), key.name(), value);
        }
        if let Some(value) = package {
            config.set(path("com.acme"), key.name(), value);
        }
        if let Some(value) = project {
            config.set(ElementPath::root(), key.name(), value);
        }

        let mut trigger = annotation("lombok.Setter");
        if let Some(value) = explicit {
            trigger = trigger.with_argument("chain", ArgValue::Bool(value));
        }

        let expected = explicit.or(class).or(package).or(project).unwrap_or(default);
        let resolver = ConfigResolver::new(&config);
        prop_assert_eq!(
            resolver.resolve_boolean(&trigger, &path("com.acme.Order"), "chain", &key),
            expected
        );
    }

    #[test]
    fn prop_filter_keeps_untolerated_in_order(flags in proptest::collection::vec(any::<bool>(), 0..20)) {
        let mut candidates: Vec<Member> = flags
            .iter()
            .enumerate()
            .map(|(i, &tolerated)| {
                let name = format!("m{i}");
                if tolerated { tolerated_method(&name, "void") } else { Member::method(name, "void") }
            })
            .collect();
        let expected: Vec<String> = flags
            .iter()
            .enumerate()
            .filter(|(_, tolerated)| !**tolerated)
            .map(|(i, _)| format!("m{i}"))
            .collect();

        ToleratedElementFilter::default().filter_tolerated(&mut candidates);
        let kept: Vec<String> = candidates.iter().map(|m| m.name().to_string()).collect();
        prop_assert_eq!(kept, expected);
    }

    #[test]
    fn prop_injection_counts_and_order(valid in proptest::collection::vec(any::<bool>(), 0..12)) {
        let entries: Vec<ArgValue> = valid
            .iter()
            .enumerate()
            .map(|(i, &ok)| {
                let text = if ok { format!("@com.acme.A{i}") } else { format!("@com..A{i}") };
                text_arg(&text, i * 20)
            })
            .collect();
        let trigger = annotation("lombok.Getter").with_argument("onMethod", ArgValue::List(entries));

        let parser = TextAnnotationParser;
        let mut target = ModifierList::new();
        let report = AnnotationInjector::new(&parser)
            .inject_configured_annotations(Some(&trigger), &mut target, "onMethod");

        let good = valid.iter().filter(|v| **v).count();
        prop_assert_eq!(report.injected, good);
        prop_assert_eq!(report.diagnostics.len(), valid.len() - good);

        let expected: Vec<String> = valid
            .iter()
            .enumerate()
            .filter(|(_, ok)| **ok)
            .map(|(i, _)| format!("com.acme.A{i}"))
            .collect();
        let injected: Vec<String> = target
            .annotations()
            .iter()
            .map(|a| a.identifier().to_string())
            .collect();
        prop_assert_eq!(injected, expected);
    }

    #[test]
    fn prop_equivalent_is_transparent(
        annotated in proptest::collection::vec(any::<bool>(), 1..8),
        on_class in any::<bool>(),
    ) {
        let build = |trigger: &str| {
            let mut container = ContainerElement::new(path("com.acme.Order"));
            if on_class {
                container = container.with_annotation(annotation(trigger));
            }
            for (i, &marked) in annotated.iter().enumerate() {
                let mut field = Member::field(format!("f{i}"), "int");
                if marked {
                    field = field.with_annotation(annotation(trigger));
                }
                container = container.with_member(field);
            }
            container
        };

        let registry = getter_registry();
        let settings = GlobalSettings::default();
        let config = LayeredConfig::new();
        let primary = registry.dispatch(&build("lombok.Getter"), &settings, &config);
        let equivalent = registry.dispatch(&build("lombok.experimental.Getter"), &settings, &config);
        prop_assert_eq!(primary.mutations, equivalent.mutations);
    }

    #[test]
    fn prop_dispatch_is_stable(
        fields in proptest::collection::vec(("[a-z]{1,6}", any::<bool>()), 0..8),
        fluent in any::<bool>(),
    ) {
        let mut container = ContainerElement::new(path("com.acme.Order"))
            .with_annotation(annotation("lombok.Getter"));
        for (name, tolerated) in &fields {
            container = container.with_member(Member::field(name.clone(), "int"));
            if *tolerated {
                container = container.with_member(tolerated_method(name, "int"));
            }
        }
        let config = LayeredConfig::new().with_project("lombok.accessors.fluent", fluent);
        let registry = getter_registry();
        let settings = GlobalSettings::default();

        let first = registry.dispatch(&container, &settings, &config);
        let second = registry.dispatch(&container, &settings, &config);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.mutations.len(), fields.len());
    }

    #[test]
    fn prop_match_set_size_bounds(count in 0..6usize) {
        let ids = (0..count).map(|i| id(&format!("com.acme.A{i}")));
        match AnnotationMatchSet::new(ids) {
            Ok(set) => {
                prop_assert!((1..=3).contains(&count));
                prop_assert_eq!(set.len(), count);
                prop_assert_eq!(set.primary(), &id("com.acme.A0"));
            }
            Err(ProcessorError::NoSupportedAnnotations) => prop_assert_eq!(count, 0),
            Err(ProcessorError::TooManyAnnotations { count: got, max }) => {
                prop_assert!(count > 3);
                prop_assert_eq!(got, count);
                prop_assert_eq!(max, 3);
            }
            Err(other) => prop_assert!(false, "unexpected error {other}"),
        }
    }
}
