use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub id: String,
    pub title: String,
    pub content: String,
}

impl Snippet {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self { id: id.into(), title: title.into(), content: content.into() }
    }
}

/// Fails on the first id that appears twice.
pub fn ensure_unique_ids(snippets: &[Snippet]) -> Result<(), DomainError> {
    let mut seen = HashSet::with_capacity(snippets.len());
    for snippet in snippets {
        if !seen.insert(snippet.id.as_str()) {
            return Err(DomainError::DuplicateSnippetId(snippet.id.clone()));
        }
    }
    Ok(())
}

pub fn insert(snippets: &mut Vec<Snippet>, snippet: Snippet) -> Result<(), DomainError> {
    if snippets.iter().any(|existing| existing.id == snippet.id) {
        return Err(DomainError::DuplicateSnippetId(snippet.id));
    }
    snippets.push(snippet);
    Ok(())
}

pub fn update(
    snippets: &mut [Snippet],
    id: &str,
    title: Option<String>,
    content: Option<String>,
) -> Result<(), DomainError> {
    let snippet = snippets
        .iter_mut()
        .find(|snippet| snippet.id == id)
        .ok_or_else(|| DomainError::UnknownSnippet(id.to_string()))?;
    if let Some(title) = title {
        snippet.title = title;
    }
    if let Some(content) = content {
        snippet.content = content;
    }
    Ok(())
}

pub fn remove(snippets: &mut Vec<Snippet>, id: &str) -> Result<Snippet, DomainError> {
    let index = position_of(snippets, id)?;
    Ok(snippets.remove(index))
}

/// Moves the snippet to `target` (clamped to the end of the list), keeping everyone else's order.
pub fn move_to(snippets: &mut Vec<Snippet>, id: &str, target: usize) -> Result<(), DomainError> {
    let index = position_of(snippets, id)?;
    let snippet = snippets.remove(index);
    let target = target.min(snippets.len());
    snippets.insert(target, snippet);
    Ok(())
}

fn position_of(snippets: &[Snippet], id: &str) -> Result<usize, DomainError> {
    snippets
        .iter()
        .position(|snippet| snippet.id == id)
        .ok_or_else(|| DomainError::UnknownSnippet(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{ensure_unique_ids, insert, move_to, remove, update, Snippet};
    use crate::errors::DomainError;

    fn ids(snippets: &[Snippet]) -> Vec<&str> {
        snippets.iter().map(|snippet| snippet.id.as_str()).collect()
    }

    fn sample() -> Vec<Snippet> {
        vec![
            Snippet::new("hours", "Opening hours", "Mon-Fri 9-17"),
            Snippet::new("returns", "Returns", "30 days"),
            Snippet::new("shipping", "Shipping", "2-3 business days"),
        ]
    }

    #[test]
    fn insert_rejects_duplicate_id_and_keeps_list_intact() {
        let mut snippets = sample();
        let error = insert(&mut snippets, Snippet::new("returns", "Again", "dup"))
            .expect_err("duplicate id");

        assert_eq!(error, DomainError::DuplicateSnippetId("returns".to_string()));
        assert_eq!(ids(&snippets), vec!["hours", "returns", "shipping"]);
    }

    #[test]
    fn insert_appends_in_order() {
        let mut snippets = sample();
        insert(&mut snippets, Snippet::new("faq", "FAQ", "...")).expect("insert");
        assert_eq!(ids(&snippets), vec!["hours", "returns", "shipping", "faq"]);
    }

    #[test]
    fn remove_and_move_preserve_relative_order() {
        let mut snippets = sample();
        move_to(&mut snippets, "shipping", 0).expect("move");
        assert_eq!(ids(&snippets), vec!["shipping", "hours", "returns"]);

        move_to(&mut snippets, "shipping", 99).expect("move to end");
        assert_eq!(ids(&snippets), vec!["hours", "returns", "shipping"]);

        let removed = remove(&mut snippets, "returns").expect("remove");
        assert_eq!(removed.title, "Returns");
        assert_eq!(ids(&snippets), vec!["hours", "shipping"]);
    }

    #[test]
    fn update_unknown_snippet_fails() {
        let mut snippets = sample();
        let error = update(&mut snippets, "missing", Some("x".to_string()), None)
            .expect_err("unknown snippet");
        assert!(matches!(error, DomainError::UnknownSnippet(ref id) if id == "missing"));

        update(&mut snippets, "hours", None, Some("Mon-Sat 9-17".to_string())).expect("update");
        assert_eq!(snippets[0].content, "Mon-Sat 9-17");
        assert_eq!(snippets[0].title, "Opening hours");
    }

    #[test]
    fn ensure_unique_ids_reports_first_duplicate() {
        let mut snippets = sample();
        snippets.push(Snippet::new("hours", "Dup", ""));
        assert_eq!(
            ensure_unique_ids(&snippets),
            Err(DomainError::DuplicateSnippetId("hours".to_string()))
        );
    }
}
