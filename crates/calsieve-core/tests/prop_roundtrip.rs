/// Property-based tests for the rule DSL and `Time`.
///
/// Generates random pattern and action trees from the space the grammar can
/// express and checks that `parse(serialize(tree)) == tree` and that
/// serialization of a parsed tree reproduces its tokens exactly.
///
/// Excluded from generation, because the grammar cannot express them:
/// - `HasText` with `Some(vec![])` (reads back as `None`)
/// - field names starting with `/`
/// - `AddEvent` with repeated field names
use calsieve_core::dsl::{parse_action, parse_pattern, serialize_action, serialize_pattern};
use calsieve_core::{Action, Event, Pattern, Time};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn arb_field() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z][A-Z0-9;=_-]{0,10}").unwrap()
}

/// Free text; may contain spaces, slashes and keywords.
fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 :,./-]{0,20}",
        Just("".to_string()),
        Just("/has_text".to_string()),
        Just("and".to_string()),
        Just("caf\u{00e9}".to_string()),
    ]
}

fn arb_time() -> impl Strategy<Value = Time> {
    (0u32..=9999, 0u32..=99, 0u32..=99, 0u32..=99, 0u32..=99)
        .prop_map(|(y, mo, d, h, mi)| Time::new(y, mo, d, h, mi))
}

fn arb_pattern() -> impl Strategy<Value = Pattern> {
    let leaf = prop_oneof![
        (
            arb_text(),
            prop::option::of(prop::collection::vec(arb_field(), 1..4))
        )
            .prop_map(|(text, fields)| Pattern::HasText { text, fields }),
        (arb_time(), arb_time()).prop_map(|(start, end)| Pattern::in_time(start, end)),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Pattern::And),
            prop::collection::vec(inner.clone(), 0..4).prop_map(Pattern::Or),
            inner.prop_map(Pattern::not),
        ]
    })
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop::collection::btree_map(arb_field(), arb_text(), 0..4).prop_map(Event::from_fields)
}

fn arb_action() -> impl Strategy<Value = Action> {
    let leaf = prop_oneof![
        Just(Action::RemoveEvent),
        arb_field().prop_map(Action::RemoveField),
        (arb_field(), arb_text(), any::<bool>()).prop_map(|(field, text, overwrite)| {
            Action::WriteField {
                field,
                text,
                overwrite,
            }
        }),
        arb_event().prop_map(Action::add_event),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop::collection::vec(inner, 0..4).prop_map(Action::Multiple)
    })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn pattern_parse_inverts_serialize(pattern in arb_pattern()) {
        let tokens = serialize_pattern(&pattern);
        let parsed = parse_pattern(&tokens).unwrap();
        prop_assert_eq!(&parsed, &pattern);
        prop_assert_eq!(serialize_pattern(&parsed), tokens);
    }

    #[test]
    fn action_parse_inverts_serialize(action in arb_action()) {
        let tokens = serialize_action(&action);
        let parsed = parse_action(&tokens).unwrap();
        prop_assert_eq!(&parsed, &action);
        prop_assert_eq!(serialize_action(&parsed), tokens);
    }

    #[test]
    fn pattern_evaluation_is_unchanged_by_roundtrip(pattern in arb_pattern(), event in arb_event()) {
        let parsed = parse_pattern(&serialize_pattern(&pattern)).unwrap();
        prop_assert_eq!(parsed.resolve(&event), pattern.resolve(&event));
    }

    #[test]
    fn time_order_matches_tuple_order(a in arb_time(), b in arb_time()) {
        prop_assert_eq!(a.cmp(&b), a.as_tuple().cmp(&b.as_tuple()));
    }

    #[test]
    fn time_roundtrips_through_string(t in arb_time()) {
        prop_assert_eq!(Time::parse(&t.as_str()).unwrap(), t);
    }

    #[test]
    fn empty_multiple_is_identity(event in arb_event()) {
        let out = Action::Multiple(vec![]).resolve(event.clone());
        prop_assert_eq!(out.len(), 1);
        prop_assert!(out[0].shares_with(&event));
    }

    #[test]
    fn has_text_all_fields_matches_substring_search(text in "[a-c]{0,2}", event in arb_event()) {
        let expected = event.entries().iter().any(|(_, value)| value.contains(text.as_str()));
        prop_assert_eq!(Pattern::has_text(text.clone()).resolve(&event), expected);
        let none: Vec<String> = Vec::new();
        prop_assert!(!Pattern::has_text_in(text, none).resolve(&event));
    }
}
