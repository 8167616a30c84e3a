use crate::pseudo_columns::{DONE, IN_BOARD_ORDER, MAYBE, NOT_NOW, PseudoColumn, PseudoKind};

/// **VALUE**: Verifies every accepted spelling resolves to its lane.
///
/// **WHY THIS MATTERS**: Users type lane names the way the board shows them
/// ("Not Now", "Maybe?", "Done") as well as the API's names.
///
/// **BUG THIS CATCHES**: Would catch case or whitespace sensitivity and
/// missing aliases.
#[test]
fn given_aliases_when_parsed_then_resolve_to_lane() {
    for input in ["not-now", "NOT_NOW", " notnow ", "not-yet", "Not_Yet", "notyet"] {
        assert_eq!(PseudoColumn::parse(input), Some(NOT_NOW), "{input}");
    }
    for input in ["maybe", "Maybe?", "TRIAGE"] {
        assert_eq!(PseudoColumn::parse(input), Some(MAYBE), "{input}");
    }
    for input in ["done", "Closed", "close "] {
        assert_eq!(PseudoColumn::parse(input), Some(DONE), "{input}");
    }
}

#[test]
fn given_real_column_names_when_parsed_then_none() {
    for input in ["", "doing", "not now", "maybe later", "col_123"] {
        assert_eq!(PseudoColumn::parse(input), None, "{input}");
    }
}

#[test]
fn given_pseudo_columns_then_board_order_and_kinds_are_fixed() {
    let ids: Vec<&str> = IN_BOARD_ORDER.iter().map(|column| column.id).collect();
    assert_eq!(ids, ["not-now", "maybe", "done"]);
    assert_eq!(MAYBE.kind, PseudoKind::Triage);
    assert_eq!(DONE.kind.as_str(), "closed");
}
