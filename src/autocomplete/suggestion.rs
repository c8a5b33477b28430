use itertools::Itertools;
use serde::Serialize;

/// Kind of thing being suggested. The declaration order is the ranking
/// order: keywords first, literal values last.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    #[display("keyword")]
    Keyword,
    #[display("function")]
    Function,
    #[display("table")]
    Table,
    #[display("column")]
    Column,
    #[display("value")]
    Value,
}

impl SuggestionKind {
    pub const fn priority(self) -> u8 {
        match self {
            SuggestionKind::Keyword => 0,
            SuggestionKind::Function => 1,
            SuggestionKind::Table => 2,
            SuggestionKind::Column => 3,
            SuggestionKind::Value => 4,
        }
    }
}

/// One completion item, ready to hand to an editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, derive_more::Display)]
#[serde(rename_all = "camelCase")]
#[display("{kind}:{text}")]
pub struct SmartSuggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub text: String,
    pub display_text: String,
    pub description: String,
    pub insert_text: String,
    /// `{priority}_{text}`, stable across merges of different sources.
    pub sort_text: String,
}

impl SmartSuggestion {
    pub fn new(kind: SuggestionKind, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            kind,
            sort_text: format!("{}_{}", kind.priority(), text.to_lowercase()),
            display_text: text.clone(),
            insert_text: text.clone(),
            description: String::new(),
            text,
        }
    }

    pub fn keyword(text: impl Into<String>) -> Self {
        Self::new(SuggestionKind::Keyword, text).described("Keyword")
    }

    pub fn function(text: impl Into<String>) -> Self {
        let text = text.into();
        let snippet = format!("{text}()");
        Self::new(SuggestionKind::Function, text)
            .described("Function")
            .inserting(snippet)
    }

    pub fn table(text: impl Into<String>) -> Self {
        Self::new(SuggestionKind::Table, text)
    }

    pub fn column(text: impl Into<String>) -> Self {
        Self::new(SuggestionKind::Column, text)
    }

    pub fn value(text: impl Into<String>) -> Self {
        Self::new(SuggestionKind::Value, text)
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn displayed(mut self, display_text: impl Into<String>) -> Self {
        self.display_text = display_text.into();
        self
    }

    pub fn inserting(mut self, insert_text: impl Into<String>) -> Self {
        self.insert_text = insert_text.into();
        self
    }
}

/// Filter by case-insensitive `prefix`, de-duplicate by `(kind, text)`
/// keeping the first occurrence, and sort by `sort_text` then `text`.
pub fn rank(
    candidates: impl IntoIterator<Item = SmartSuggestion>,
    prefix: &str,
) -> Vec<SmartSuggestion> {
    let prefix = prefix.to_lowercase();
    candidates
        .into_iter()
        .filter(|s| s.text.to_lowercase().starts_with(&prefix))
        .unique_by(|s| (s.kind, s.text.clone()))
        .sorted_by(|a, b| a.sort_text.cmp(&b.sort_text).then_with(|| a.text.cmp(&b.text)))
        .collect()
}

/// Keyword suggestions for every entry of a static table.
pub fn keywords(table: &'static [&'static str]) -> impl Iterator<Item = SmartSuggestion> {
    table.iter().map(|k| SmartSuggestion::keyword(*k))
}

/// Value suggestions for every entry of a static table, described as `what`.
pub fn values(
    table: impl IntoIterator<Item = String>,
    what: &'static str,
) -> impl Iterator<Item = SmartSuggestion> {
    table
        .into_iter()
        .map(move |v| SmartSuggestion::value(v).described(what))
}

/// Column suggestions for schema entries, described as `what`.
pub fn columns(names: Vec<String>, what: &'static str) -> impl Iterator<Item = SmartSuggestion> {
    names
        .into_iter()
        .map(move |n| SmartSuggestion::column(n).described(what))
}

/// Table suggestions for schema entries, described as `what`.
pub fn tables(names: Vec<String>, what: &'static str) -> impl Iterator<Item = SmartSuggestion> {
    names
        .into_iter()
        .map(move |n| SmartSuggestion::table(n).described(what))
}
