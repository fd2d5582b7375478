use crate::aggregator::ResultSet;
use crate::model::PersonName;

/// Case-insensitive substring match against first or last name.
pub fn matches_term<T: PersonName>(record: &T, lowered_term: &str) -> bool {
    record.first_name().to_lowercase().contains(lowered_term)
        || record.last_name().to_lowercase().contains(lowered_term)
}

// Narrows without re-sorting, so the source order carries over.
pub fn filter<T: PersonName + Clone>(all: &ResultSet<T>, term: &str) -> ResultSet<T> {
    if term.is_empty() {
        return all.clone();
    }
    let term = term.to_lowercase();
    let kept = all
        .iter()
        .filter(|r| matches_term(*r, &term))
        .cloned()
        .collect();
    ResultSet::from_sorted(kept)
}
