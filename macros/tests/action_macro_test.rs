//! Tests for #[derive(Action)] macro

use todolists_macros::Action;

#[derive(Action, Clone, Debug, PartialEq)]
enum ListAction {
    Fetch,

    Rename { id: String, title: String },

    Fetched(Vec<String>),

    FetchFailed { reason: String },
}

#[test]
fn test_name_of_unit_variant() {
    assert_eq!(ListAction::Fetch.name(), "Fetch");
}

#[test]
fn test_name_of_named_variant() {
    let action = ListAction::Rename {
        id: "1".to_string(),
        title: "A".to_string(),
    };
    assert_eq!(action.name(), "Rename");
    assert_eq!(
        ListAction::FetchFailed {
            reason: String::new()
        }
        .name(),
        "FetchFailed"
    );
}

#[test]
fn test_name_of_tuple_variant() {
    assert_eq!(ListAction::Fetched(vec![]).name(), "Fetched");
}
