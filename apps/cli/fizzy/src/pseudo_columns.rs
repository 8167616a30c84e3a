//! Board lanes that are not real columns.
//!
//! Fizzy shows three virtual lanes next to a board's columns. Each maps to a
//! server-side card state rather than a column id, so commands that accept a
//! column translate these names before talking to the API.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PseudoKind {
    /// Postponed cards, `indexed_by=not_now`.
    NotNow,
    /// Cards with no column.
    Triage,
    /// Closed cards, `indexed_by=closed`.
    Closed,
}

impl PseudoKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PseudoKind::NotNow => "not_now",
            PseudoKind::Triage => "triage",
            PseudoKind::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PseudoColumn {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: PseudoKind,
    aliases: &'static [&'static str],
}

pub const NOT_NOW: PseudoColumn = PseudoColumn {
    id: "not-now",
    name: "Not Now",
    kind: PseudoKind::NotNow,
    aliases: &["not_now", "notnow", "not-yet", "not_yet", "notyet"],
};

pub const MAYBE: PseudoColumn = PseudoColumn {
    id: "maybe",
    name: "Maybe?",
    kind: PseudoKind::Triage,
    aliases: &["maybe?", "triage"],
};

pub const DONE: PseudoColumn = PseudoColumn {
    id: "done",
    name: "Done",
    kind: PseudoKind::Closed,
    aliases: &["closed", "close"],
};

/// Board display order.
pub const IN_BOARD_ORDER: [PseudoColumn; 3] = [NOT_NOW, MAYBE, DONE];

impl PseudoColumn {
    /// Resolve a user-supplied column name, ignoring case and surrounding space.
    pub fn parse(input: &str) -> Option<PseudoColumn> {
        let wanted = input.trim().to_lowercase();
        IN_BOARD_ORDER
            .into_iter()
            .find(|column| column.id == wanted || column.aliases.iter().any(|alias| *alias == wanted))
    }
}
