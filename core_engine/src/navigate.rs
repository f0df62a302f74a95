use serde::{Deserialize, Serialize};

use crate::render::Dropdown;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
    #[serde(other)]
    Other,
}

/// Highlighted row of the dropdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    Row(usize),
}

impl Selection {
    pub fn index(self) -> Option<usize> {
        match self {
            Selection::None => None,
            Selection::Row(index) => Some(index),
        }
    }

    pub fn next(self, rows: usize) -> Self {
        if rows == 0 {
            return self;
        }
        match self {
            Selection::Row(index) if index + 1 < rows => Selection::Row(index + 1),
            _ => Selection::Row(0),
        }
    }

    pub fn prev(self, rows: usize) -> Self {
        if rows == 0 {
            return self;
        }
        match self {
            Selection::Row(index) if index > 0 && index < rows => Selection::Row(index - 1),
            _ => Selection::Row(rows - 1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Moved(usize),
    Accept(String),
    Dismiss,
    Ignored,
}

/// Applies one key to the selection over `dropdown`.
pub fn navigate(selection: &mut Selection, dropdown: &Dropdown, key: Key) -> Navigation {
    match key {
        Key::ArrowDown | Key::ArrowUp => {
            if dropdown.is_empty() {
                return Navigation::Ignored;
            }
            *selection = if key == Key::ArrowDown {
                selection.next(dropdown.len())
            } else {
                selection.prev(dropdown.len())
            };
            selection
                .index()
                .map_or(Navigation::Ignored, Navigation::Moved)
        }
        Key::Enter => {
            let selected = selection.index().and_then(|index| dropdown.value_at(index));
            match selected.or_else(|| dropdown.correction().map(|row| row.value.as_str())) {
                Some(value) => Navigation::Accept(value.to_string()),
                None => Navigation::Ignored,
            }
        }
        Key::Escape => {
            *selection = Selection::None;
            Navigation::Dismiss
        }
        Key::Other => Navigation::Ignored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render;
    use crate::suggestion::Suggestion;
    use proptest::prelude::*;

    fn dropdown(items: &[&str], correction: Option<&str>) -> Dropdown {
        let list: Vec<_> = items.iter().map(|s| Suggestion::new(*s)).collect();
        render(&list, "", correction)
    }

    #[test]
    fn arrows_wrap_around() {
        let rows = dropdown(&["a", "b", "c"], None);
        let mut selection = Selection::None;
        assert_eq!(navigate(&mut selection, &rows, Key::ArrowDown), Navigation::Moved(0));
        assert_eq!(navigate(&mut selection, &rows, Key::ArrowUp), Navigation::Moved(2));
        assert_eq!(navigate(&mut selection, &rows, Key::ArrowDown), Navigation::Moved(0));
    }

    #[test]
    fn arrow_up_from_nothing_selects_last() {
        let rows = dropdown(&["a", "b"], Some("c"));
        let mut selection = Selection::None;
        assert_eq!(navigate(&mut selection, &rows, Key::ArrowUp), Navigation::Moved(2));
    }

    #[test]
    fn arrows_on_empty_dropdown_do_nothing() {
        let mut selection = Selection::None;
        let result = navigate(&mut selection, &Dropdown::hidden(), Key::ArrowDown);
        assert_eq!(result, Navigation::Ignored);
        assert_eq!(selection, Selection::None);
    }

    #[test]
    fn enter_accepts_selected_row() {
        let rows = dropdown(&["cat", "car"], Some("cart"));
        let mut selection = Selection::Row(2);
        assert_eq!(
            navigate(&mut selection, &rows, Key::Enter),
            Navigation::Accept("car".to_string())
        );
    }

    #[test]
    fn enter_without_selection_takes_correction() {
        let rows = dropdown(&["cat"], Some("cart"));
        let mut selection = Selection::None;
        assert_eq!(
            navigate(&mut selection, &rows, Key::Enter),
            Navigation::Accept("cart".to_string())
        );
    }

    #[test]
    fn enter_without_selection_or_correction_is_ignored() {
        let rows = dropdown(&["cat"], None);
        let mut selection = Selection::None;
        assert_eq!(navigate(&mut selection, &rows, Key::Enter), Navigation::Ignored);
    }

    #[test]
    fn escape_always_clears() {
        let rows = dropdown(&["cat"], None);
        let mut selection = Selection::Row(0);
        assert_eq!(navigate(&mut selection, &rows, Key::Escape), Navigation::Dismiss);
        assert_eq!(selection, Selection::None);

        let mut selection = Selection::None;
        assert_eq!(
            navigate(&mut selection, &Dropdown::hidden(), Key::Escape),
            Navigation::Dismiss
        );
    }

    #[test]
    fn unknown_key_names_parse_as_other() {
        let key: Key = serde_json::from_str(r#""page_down""#).unwrap();
        assert_eq!(key, Key::Other);
        let key: Key = serde_json::from_str(r#""arrow_up""#).unwrap();
        assert_eq!(key, Key::ArrowUp);
    }

    proptest! {
        #[test]
        fn selection_stays_in_range(rows in 1usize..8, downs in proptest::collection::vec(any::<bool>(), 0..64)) {
            let items: Vec<String> = (0..rows).map(|i| format!("item{i}")).collect();
            let refs: Vec<&str> = items.iter().map(String::as_str).collect();
            let dropdown = dropdown(&refs, None);
            let mut selection = Selection::None;
            let mut expected: Option<usize> = None;
            for down in downs {
                let key = if down { Key::ArrowDown } else { Key::ArrowUp };
                let result = navigate(&mut selection, &dropdown, key);
                let next = match (expected, down) {
                    (None, true) => 0,
                    (None, false) => rows - 1,
                    (Some(i), true) => (i + 1) % rows,
                    (Some(i), false) => (i + rows - 1) % rows,
                };
                expected = Some(next);
                prop_assert_eq!(result, Navigation::Moved(next));
                prop_assert!(selection.index().unwrap() < rows);
            }
        }
    }
}
