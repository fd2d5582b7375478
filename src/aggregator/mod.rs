use std::cmp::Ordering;
use std::future::Future;
use std::ops::Deref;

use futures::future::try_join_all;
use tracing::debug;

use crate::model::FirstName;
use crate::planner::FetchPlan;

/// Records ordered ascending by first name.
///
/// Only [`aggregate`], [`ResultSet::from_unsorted`] and the filter build one,
/// so the ordering always holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultSet<T> {
    records: Vec<T>,
}

impl<T> Default for ResultSet<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<T: FirstName> ResultSet<T> {
    pub fn from_unsorted(mut records: Vec<T>) -> Self {
        sort_by_first_name(&mut records);
        Self { records }
    }
}

impl<T> ResultSet<T> {
    // Callers guarantee `records` is a subsequence of an existing ResultSet.
    pub(crate) fn from_sorted(records: Vec<T>) -> Self {
        Self { records }
    }

    pub fn into_vec(self) -> Vec<T> {
        self.records
    }
}

impl<T> Deref for ResultSet<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.records
    }
}

impl<'a, T> IntoIterator for &'a ResultSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Plain lexical comparison, no locale collation.
pub fn compare_first_names(a: &str, b: &str) -> Ordering {
    if a < b {
        Ordering::Less
    } else if a > b {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

fn sort_by_first_name<T: FirstName>(records: &mut [T]) {
    // sort_by is stable, equal first names keep their page order
    records.sort_by(|a, b| compare_first_names(a.first_name(), b.first_name()));
}

/// Runs every request in `plan` concurrently and merges the pages.
///
/// `fetch_page(index, size)` is called once per request index. The join is
/// all-or-nothing: the first failure is returned and every other page is
/// dropped. Nothing is retried, deduplicated or truncated.
pub async fn aggregate<T, E, F, Fut>(plan: &FetchPlan, fetch_page: F) -> Result<ResultSet<T>, E>
where
    T: FirstName,
    F: Fn(usize, usize) -> Fut,
    Fut: Future<Output = Result<Vec<T>, E>>,
{
    let fetches = plan
        .request_sizes()
        .into_iter()
        .enumerate()
        .map(|(index, size)| fetch_page(index, size));

    let pages = try_join_all(fetches).await?;

    let total: usize = pages.iter().map(Vec::len).sum();
    let mut merged = Vec::with_capacity(total);
    for page in pages {
        merged.extend(page);
    }
    debug!(
        requests = plan.request_count,
        records = merged.len(),
        "merged fetched pages"
    );

    Ok(ResultSet::from_unsorted(merged))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
    use std::sync::Mutex;

    use super::*;
    use crate::planner::plan;

    #[derive(Clone, Debug, PartialEq, Eq)]
    struct Person {
        first: String,
        page: usize,
    }

    impl FirstName for Person {
        fn first_name(&self) -> &str {
            &self.first
        }
    }

    fn person(first: &str, page: usize) -> Person {
        Person {
            first: first.to_string(),
            page,
        }
    }

    fn is_sorted(set: &ResultSet<Person>) -> bool {
        set.windows(2)
            .all(|w| compare_first_names(&w[0].first, &w[1].first) != Ordering::Greater)
    }

    #[test]
    fn comparator_is_plain_lexical() {
        assert_eq!(compare_first_names("Ada", "Bob"), Ordering::Less);
        assert_eq!(compare_first_names("bob", "Bob"), Ordering::Greater);
        assert_eq!(compare_first_names("Zoe", "Zoe"), Ordering::Equal);
        // uppercase sorts before lowercase
        assert_eq!(compare_first_names("Zed", "amy"), Ordering::Less);
    }

    #[tokio::test]
    async fn requests_each_index_once_with_planned_sizes() {
        let p = plan(7, 3).unwrap();
        let seen = Mutex::new(Vec::new());
        let result = aggregate(&p, |index, size| {
            seen.lock().unwrap().push((index, size));
            async move { Ok::<_, String>((0..size).map(|_| person("x", index)).collect::<Vec<_>>()) }
        })
        .await
        .unwrap();

        let mut seen = seen.into_inner().unwrap();
        seen.sort();
        assert_eq!(seen, vec![(0, 1), (1, 3), (2, 3)]);
        assert_eq!(result.len(), 7);
    }

    #[tokio::test]
    async fn output_is_sorted_for_any_page_order() {
        let pages = [
            vec!["Mia", "Ana", "Zoe"],
            vec!["Ben", "ana", "Carl"],
            vec!["Eve", "Ana", "Dan"],
        ];
        let orders = [
            [0, 1, 2],
            [0, 2, 1],
            [1, 0, 2],
            [1, 2, 0],
            [2, 0, 1],
            [2, 1, 0],
        ];
        let p = plan(9, 3).unwrap();
        for order in orders {
            let result = aggregate(&p, |index, _size| {
                let names = pages[order[index]].clone();
                async move {
                    Ok::<_, String>(names.into_iter().map(|n| person(n, index)).collect::<Vec<_>>())
                }
            })
            .await
            .unwrap();
            assert!(is_sorted(&result), "order {order:?} -> {result:?}");
            assert_eq!(result.len(), 9);
        }
    }

    #[tokio::test]
    async fn equal_first_names_keep_page_order() {
        let p = plan(4, 2).unwrap();
        let result = aggregate(&p, |index, _size| async move {
            Ok::<_, String>(vec![person("Sam", index), person("Al", index)])
        })
        .await
        .unwrap();
        let order: Vec<(&str, usize)> = result.iter().map(|r| (r.first.as_str(), r.page)).collect();
        assert_eq!(order, vec![("Al", 0), ("Al", 1), ("Sam", 0), ("Sam", 1)]);
    }

    #[tokio::test]
    async fn one_failing_fetch_fails_the_whole_aggregation() {
        let p = plan(20, 5).unwrap();
        let calls = AtomicUsize::new(0);
        let result: Result<ResultSet<Person>, String> = aggregate(&p, |index, size| {
            calls.fetch_add(1, AtomicOrdering::SeqCst);
            async move {
                if index == 2 {
                    Err(format!("page {} unavailable", index + 1))
                } else {
                    Ok((0..size).map(|_| person("x", index)).collect::<Vec<_>>())
                }
            }
        })
        .await;

        assert_eq!(result.unwrap_err(), "page 3 unavailable");
        assert_eq!(calls.load(AtomicOrdering::SeqCst), 4);
    }

    #[tokio::test]
    async fn keeps_duplicates_and_excess_records() {
        let p = plan(2, 5).unwrap();
        let result = aggregate(&p, |_index, _size| async {
            Ok::<_, String>(vec![person("Kim", 0), person("Kim", 0), person("Lee", 0)])
        })
        .await
        .unwrap();
        assert_eq!(result.len(), 3);
    }
}
