use std::cmp::Ordering;

use crate::models::{Intern, InternStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SortField {
    #[default]
    Name,
    Department,
    Tutor,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Column header click: the active column flips direction, any other
    /// column becomes active in ascending order.
    pub fn toggle(self, field: SortField) -> Self {
        if self.field == field {
            Self::new(field, self.direction.flipped())
        } else {
            Self::new(field, SortDirection::Ascending)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TableQuery {
    pub search: String,
    pub status: Option<InternStatus>,
    pub sort: SortState,
}

fn fold_char(c: char, out: &mut String) {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => out.push('a'),
        'æ' => out.push_str("ae"),
        'ç' => out.push('c'),
        'è' | 'é' | 'ê' | 'ë' => out.push('e'),
        'ì' | 'í' | 'î' | 'ï' => out.push('i'),
        'ñ' => out.push('n'),
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => out.push('o'),
        'œ' => out.push_str("oe"),
        'ù' | 'ú' | 'û' | 'ü' => out.push('u'),
        'ý' | 'ÿ' => out.push('y'),
        other => out.push(other),
    }
}

/// Primary collation key: lowercase with accents folded onto the base letter.
pub fn collation_key(value: &str) -> String {
    let mut key = String::with_capacity(value.len());
    for c in value.chars().flat_map(char::to_lowercase) {
        fold_char(c, &mut key);
    }
    key
}

/// Accent and case differences only decide the order when the folded keys
/// are equal.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

fn compare_by(field: SortField, a: &Intern, b: &Intern) -> Ordering {
    match field {
        SortField::Name => locale_compare(&a.last_name, &b.last_name)
            .then_with(|| locale_compare(&a.first_name, &b.first_name)),
        SortField::Department => locale_compare(&a.department, &b.department),
        SortField::Tutor => locale_compare(&a.tutor, &b.tutor),
    }
}

pub fn matches_search(intern: &Intern, search: &str) -> bool {
    let needle = search.to_lowercase();
    intern.full_name().to_lowercase().contains(&needle)
        || intern.department.to_lowercase().contains(&needle)
        || intern.tutor.to_lowercase().contains(&needle)
}

/// Rows for the intern table: search and status filters, then a stable sort
/// on the selected column.
pub fn filter_and_sort<'a>(interns: &'a [Intern], query: &TableQuery) -> Vec<&'a Intern> {
    let mut rows: Vec<&Intern> = interns
        .iter()
        .filter(|intern| matches_search(intern, &query.search))
        .filter(|intern| query.status.map_or(true, |status| intern.status == status))
        .collect();

    let SortState { field, direction } = query.sort;
    rows.sort_by(|a, b| {
        let ordering = compare_by(field, a, b);
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContractType;
    use chrono::NaiveDate;

    fn intern(id: &str, first: &str, last: &str, department: &str, tutor: &str) -> Intern {
        Intern {
            id: id.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: format!("{id}@example.com"),
            phone: String::new(),
            department: department.to_string(),
            tutor: tutor.to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            status: InternStatus::Active,
            contract_type: ContractType::Stage,
            skills: Vec::new(),
            projects: Vec::new(),
            documents: Vec::new(),
            profile_image: None,
        }
    }

    fn ids(rows: &[&Intern]) -> Vec<String> {
        rows.iter().map(|i| i.id.clone()).collect()
    }

    #[test]
    fn toggling_resets_or_flips_direction() {
        let state = SortState::default();
        let flipped = state.toggle(SortField::Name);
        assert_eq!(flipped.direction, SortDirection::Descending);

        let switched = flipped.toggle(SortField::Tutor);
        assert_eq!(switched, SortState::new(SortField::Tutor, SortDirection::Ascending));
        assert_eq!(switched.toggle(SortField::Tutor).direction, SortDirection::Descending);
    }

    #[test]
    fn descending_name_sort_reverses_ascending() {
        let snapshot = crate::seed::mock_snapshot().unwrap();
        let mut query = TableQuery::default();
        let ascending = ids(&filter_and_sort(&snapshot.interns, &query));

        query.sort = query.sort.toggle(SortField::Name);
        let mut descending = ids(&filter_and_sort(&snapshot.interns, &query));
        descending.reverse();

        assert_eq!(ascending, vec!["2", "1", "3", "4", "5"]);
        assert_eq!(ascending, descending);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let interns = vec![
            intern("1", "A", "Zed", "Dev", "Jean"),
            intern("2", "B", "Alpha", "Design", "Paul"),
            intern("3", "C", "Mid", "Dev", "Claire"),
        ];
        let mut query = TableQuery {
            sort: SortState::new(SortField::Department, SortDirection::Ascending),
            ..TableQuery::default()
        };
        assert_eq!(ids(&filter_and_sort(&interns, &query)), vec!["2", "1", "3"]);

        query.sort = query.sort.toggle(SortField::Department);
        assert_eq!(ids(&filter_and_sort(&interns, &query)), vec!["1", "3", "2"]);
    }

    #[test]
    fn accents_sort_next_to_their_base_letter() {
        let interns = vec![
            intern("1", "A", "Zola", "Dev", "x"),
            intern("2", "B", "Émile", "Dev", "x"),
            intern("3", "C", "Dupont", "Dev", "x"),
            intern("4", "D", "fabre", "Dev", "x"),
        ];
        let rows = filter_and_sort(&interns, &TableQuery::default());
        assert_eq!(ids(&rows), vec!["3", "2", "4", "1"]);
        assert_eq!(locale_compare("Léa", "Lea"), Ordering::Greater);
    }

    #[test]
    fn search_spans_name_department_and_tutor() {
        let snapshot = crate::seed::mock_snapshot().unwrap();
        let mut query = TableQuery {
            search: "JEAN".to_string(),
            ..TableQuery::default()
        };
        assert_eq!(ids(&filter_and_sort(&snapshot.interns, &query)), vec!["1", "4"]);

        query.search = "emma mor".to_string();
        assert_eq!(ids(&filter_and_sort(&snapshot.interns, &query)), vec!["3"]);

        query.search = "market".to_string();
        assert_eq!(ids(&filter_and_sort(&snapshot.interns, &query)), vec!["2"]);
    }

    #[test]
    fn status_filter_combines_with_search() {
        let snapshot = crate::seed::mock_snapshot().unwrap();
        let query = TableQuery {
            search: "développement".to_string(),
            status: Some(InternStatus::Active),
            ..TableQuery::default()
        };
        assert_eq!(ids(&filter_and_sort(&snapshot.interns, &query)), vec!["1", "4"]);

        let completed = TableQuery {
            status: Some(InternStatus::Completed),
            ..TableQuery::default()
        };
        assert_eq!(ids(&filter_and_sort(&snapshot.interns, &completed)), vec!["5"]);
    }
}
