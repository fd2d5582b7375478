use crate::aggregator::ResultSet;
use crate::filter::filter;
use crate::model::UserRecord;

pub const SHOW_ALL_PLACEHOLDER: &str = "Show All Users";
pub const LOAD_FAILED_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Loading,
    Ready,
    Failed(String),
}

/// What the user has typed and the hint shown once a filter is active.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SearchState {
    pub value: String,
    pub placeholder: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct AppState {
    pub status: LoadStatus,
    pub users: ResultSet<UserRecord>,
    pub displayed: ResultSet<UserRecord>,
    pub filter_term: String,
    pub search: SearchState,
}

impl AppState {
    pub fn is_ready(&self) -> bool {
        self.status == LoadStatus::Ready
    }

    /// What to tell the user instead of a listing. The failure reason is
    /// kept in `status` for logs and never shown.
    pub fn status_message(&self) -> Option<&'static str> {
        match self.status {
            LoadStatus::Failed(_) => Some(LOAD_FAILED_MESSAGE),
            LoadStatus::Loading | LoadStatus::Ready => None,
        }
    }
}

#[derive(Clone, Debug)]
pub enum Action {
    UsersLoaded(ResultSet<UserRecord>),
    LoadFailed(String),
    SearchInput(String),
    SubmitFilter,
}

/// Applies one action and returns the next state.
pub fn reduce(state: AppState, action: Action) -> AppState {
    match action {
        Action::UsersLoaded(users) => {
            let displayed = filter(&users, &state.filter_term);
            AppState {
                status: LoadStatus::Ready,
                users,
                displayed,
                ..state
            }
        }
        Action::LoadFailed(reason) => AppState {
            status: LoadStatus::Failed(reason),
            users: ResultSet::default(),
            displayed: ResultSet::default(),
            ..state
        },
        Action::SearchInput(value) => AppState {
            search: SearchState {
                value,
                ..state.search
            },
            ..state
        },
        Action::SubmitFilter => {
            let term = state.search.value.to_lowercase();
            let placeholder = if term.is_empty() {
                String::new()
            } else {
                SHOW_ALL_PLACEHOLDER.to_string()
            };
            let displayed = filter(&state.users, &term);
            AppState {
                displayed,
                filter_term: term,
                search: SearchState {
                    placeholder,
                    ..state.search
                },
                ..state
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Name;

    fn user(first: &str, last: &str) -> UserRecord {
        UserRecord {
            name: Name {
                title: String::new(),
                first: first.to_string(),
                last: last.to_string(),
            },
            ..UserRecord::default()
        }
    }

    fn loaded() -> AppState {
        let users = ResultSet::from_unsorted(vec![
            user("Mona", "Berg"),
            user("Ali", "Khan"),
            user("Kurt", "Alder"),
        ]);
        reduce(AppState::default(), Action::UsersLoaded(users))
    }

    fn firsts(set: &ResultSet<UserRecord>) -> Vec<&str> {
        set.iter().map(|u| u.name.first.as_str()).collect()
    }

    #[test]
    fn starts_loading() {
        let s = AppState::default();
        assert_eq!(s.status, LoadStatus::Loading);
        assert!(s.displayed.is_empty());
    }

    #[test]
    fn load_shows_everything_sorted() {
        let s = loaded();
        assert!(s.is_ready());
        assert_eq!(firsts(&s.displayed), vec!["Ali", "Kurt", "Mona"]);
    }

    #[test]
    fn typing_does_not_filter_until_submit() {
        let s = reduce(loaded(), Action::SearchInput("al".to_string()));
        assert_eq!(s.search.value, "al");
        assert_eq!(s.displayed.len(), 3);

        let s = reduce(s, Action::SubmitFilter);
        assert_eq!(s.filter_term, "al");
        assert_eq!(firsts(&s.displayed), vec!["Ali", "Kurt"]);
        assert_eq!(s.search.placeholder, SHOW_ALL_PLACEHOLDER);
        assert_eq!(s.users.len(), 3);
    }

    #[test]
    fn empty_submit_shows_all_and_clears_placeholder() {
        let s = reduce(loaded(), Action::SearchInput("berg".to_string()));
        let s = reduce(s, Action::SubmitFilter);
        assert_eq!(s.displayed.len(), 1);

        let s = reduce(s, Action::SearchInput(String::new()));
        let s = reduce(s, Action::SubmitFilter);
        assert_eq!(s.displayed.len(), 3);
        assert!(s.search.placeholder.is_empty());
    }

    #[test]
    fn failure_drops_users() {
        let s = reduce(loaded(), Action::LoadFailed("boom".to_string()));
        assert_eq!(s.status, LoadStatus::Failed("boom".to_string()));
        assert!(s.users.is_empty());
        assert!(s.displayed.is_empty());
        assert_eq!(s.status_message(), Some(LOAD_FAILED_MESSAGE));
        assert_eq!(loaded().status_message(), None);
    }

    #[test]
    fn filter_submitted_before_load_applies_on_load() {
        let s = reduce(AppState::default(), Action::SearchInput("KHAN".to_string()));
        let s = reduce(s, Action::SubmitFilter);
        let users = ResultSet::from_unsorted(vec![user("Mona", "Berg"), user("Ali", "Khan")]);
        let s = reduce(s, Action::UsersLoaded(users));
        assert_eq!(firsts(&s.displayed), vec!["Ali"]);
    }
}
