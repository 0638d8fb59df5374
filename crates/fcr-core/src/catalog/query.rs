/// Field holding the insertion-ordered document id.
pub const ID_FIELD: &str = "_id";
/// Field holding the stored file type (e.g. `video`, `mkv`).
pub const FILE_TYPE_FIELD: &str = "file_type";
/// Field holding the release year.
pub const YEAR_FIELD: &str = "year";

/// Store-agnostic filter expression. Adapters compile it to their native query.
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    /// Matches every document.
    All,
    /// Case-insensitive regex match on a string field.
    MatchesIgnoreCase { field: String, pattern: String },
    Eq { field: String, value: FilterValue },
    And(Vec<Filter>),
    Or(Vec<Filter>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum FilterValue {
    Int(i64),
    Str(String),
}

impl Filter {
    /// Conjunction that collapses the trivial cases.
    pub fn all_of(mut parts: Vec<Filter>) -> Filter {
        parts.retain(|p| *p != Filter::All);
        match parts.len() {
            0 => Filter::All,
            1 => parts.remove(0),
            _ => Filter::And(parts),
        }
    }

    /// Case-insensitive substring match; `needle` is taken literally.
    pub fn contains(field: &str, needle: &str) -> Filter {
        Filter::MatchesIgnoreCase {
            field: field.to_string(),
            pattern: regex::escape(needle),
        }
    }

    /// Case-insensitive `.<ext>` suffix match; `ext` is taken literally.
    pub fn has_extension(field: &str, ext: &str) -> Filter {
        Filter::MatchesIgnoreCase {
            field: field.to_string(),
            pattern: format!(r"\.{}$", regex::escape(ext)),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl SortOrder {
    /// Anything other than `desc` (any case) sorts ascending.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None => SortOrder::Descending,
            Some(s) if s.trim().eq_ignore_ascii_case("desc") => SortOrder::Descending,
            Some(_) => SortOrder::Ascending,
        }
    }
}

/// 1-based page window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub per_page: u64,
}

impl Pagination {
    pub const LATEST_PER_PAGE: u64 = 20;
    pub const SEARCH_PER_PAGE: u64 = 50;

    /// Parse raw query values. Malformed numbers fall back to the defaults and
    /// anything below 1 is clamped to 1.
    pub fn parse(page: Option<&str>, per_page: Option<&str>, default_per_page: u64) -> Self {
        Self {
            page: parse_positive(page, 1),
            per_page: parse_positive(per_page, default_per_page),
        }
    }

    pub fn capped(self, max_per_page: u64) -> Self {
        Self {
            per_page: self.per_page.min(max_per_page.max(1)),
            ..self
        }
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }
}

fn parse_positive(raw: Option<&str>, default: u64) -> u64 {
    let parsed = raw
        .and_then(|s| s.trim().parse::<i64>().ok())
        .unwrap_or(default as i64);
    parsed.max(1) as u64
}

/// Query handed to a [`CatalogStore`](crate::catalog::CatalogStore).
#[derive(Clone, Debug, PartialEq)]
pub struct FindQuery {
    pub filter: Filter,
    pub sort: SortOrder,
    pub skip: u64,
    pub limit: u64,
}

impl FindQuery {
    /// Newest-first listing of everything.
    pub fn latest(paging: Pagination) -> Self {
        Self {
            filter: Filter::All,
            sort: SortOrder::Descending,
            skip: paging.offset(),
            limit: paging.per_page,
        }
    }
}

/// Parameters of a catalog search. Empty strings mean "not given".
#[derive(Clone, Debug, PartialEq)]
pub struct SearchQuery {
    pub text: Option<String>,
    pub year: Option<String>,
    pub file_type: Option<String>,
    pub sort: SortOrder,
    pub paging: Pagination,
}

impl SearchQuery {
    pub fn new(paging: Pagination) -> Self {
        Self {
            text: None,
            year: None,
            file_type: None,
            sort: SortOrder::Descending,
            paging,
        }
    }

    pub fn text(mut self, text: Option<&str>) -> Self {
        self.text = non_empty(text);
        self
    }

    pub fn year(mut self, year: Option<&str>) -> Self {
        self.year = non_empty(year);
        self
    }

    pub fn file_type(mut self, file_type: Option<&str>) -> Self {
        self.file_type = non_empty(file_type);
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn filter(&self, search_field: &str) -> Filter {
        let mut parts = Vec::new();

        if let Some(text) = &self.text {
            parts.push(Filter::contains(search_field, text));
        }

        if let Some(year) = &self.year {
            let value = match year.trim().parse::<i64>() {
                Ok(n) => FilterValue::Int(n),
                Err(_) => FilterValue::Str(year.clone()),
            };
            parts.push(Filter::Eq {
                field: YEAR_FIELD.to_string(),
                value,
            });
        }

        if let Some(ft) = &self.file_type {
            parts.push(Filter::Or(vec![
                Filter::contains(FILE_TYPE_FIELD, ft),
                Filter::has_extension(search_field, ft),
            ]));
        }

        Filter::all_of(parts)
    }

    pub fn to_find(&self, search_field: &str) -> FindQuery {
        FindQuery {
            filter: self.filter(search_field),
            sort: self.sort,
            skip: self.paging.offset(),
            limit: self.paging.per_page,
        }
    }
}

fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.filter(|s| !s.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_page_minus_one_times_size() {
        let p = Pagination::parse(Some("3"), Some("25"), 20);
        assert_eq!(p, Pagination { page: 3, per_page: 25 });
        assert_eq!(p.offset(), 50);
        assert_eq!(Pagination::parse(Some("1"), Some("7"), 20).offset(), 0);
    }

    #[test]
    fn malformed_paging_falls_back_to_defaults() {
        let p = Pagination::parse(Some("two"), Some(""), Pagination::SEARCH_PER_PAGE);
        assert_eq!(p, Pagination { page: 1, per_page: 50 });

        let p = Pagination::parse(None, Some("1.5"), Pagination::LATEST_PER_PAGE);
        assert_eq!(p, Pagination { page: 1, per_page: 20 });

        let p = Pagination::parse(Some("-4"), Some("0"), 20);
        assert_eq!(p, Pagination { page: 1, per_page: 1 });
    }

    #[test]
    fn per_page_cap_applies() {
        let p = Pagination::parse(Some("2"), Some("5000"), 20).capped(200);
        assert_eq!(p.per_page, 200);
        assert_eq!(p.offset(), 200);
    }

    #[test]
    fn sort_defaults_to_descending() {
        assert_eq!(SortOrder::parse(None), SortOrder::Descending);
        assert_eq!(SortOrder::parse(Some("DESC")), SortOrder::Descending);
        assert_eq!(SortOrder::parse(Some("asc")), SortOrder::Ascending);
        assert_eq!(SortOrder::parse(Some("sideways")), SortOrder::Ascending);
    }

    #[test]
    fn empty_search_has_no_filter() {
        let q = SearchQuery::new(Pagination::parse(None, None, 50))
            .text(Some(""))
            .year(None)
            .file_type(Some(""));
        assert_eq!(q.filter("file_name"), Filter::All);
    }

    #[test]
    fn text_is_escaped() {
        let q = SearchQuery::new(Pagination::parse(None, None, 50)).text(Some("a.b (c)"));
        assert_eq!(
            q.filter("file_name"),
            Filter::MatchesIgnoreCase {
                field: "file_name".into(),
                pattern: r"a\.b \(c\)".into(),
            }
        );
    }

    #[test]
    fn year_is_numeric_when_possible() {
        let f = SearchQuery::new(Pagination::parse(None, None, 50))
            .year(Some("2020"))
            .filter("file_name");
        assert_eq!(
            f,
            Filter::Eq {
                field: "year".into(),
                value: FilterValue::Int(2020)
            }
        );

        let f = SearchQuery::new(Pagination::parse(None, None, 50))
            .year(Some("2020-21"))
            .filter("file_name");
        assert_eq!(
            f,
            Filter::Eq {
                field: "year".into(),
                value: FilterValue::Str("2020-21".into())
            }
        );
    }

    #[test]
    fn type_matches_field_or_extension_and_joins_the_rest() {
        let find = SearchQuery::new(Pagination::parse(Some("2"), Some("10"), 50))
            .text(Some("star"))
            .file_type(Some("mkv"))
            .sort(SortOrder::Ascending)
            .to_find("title");

        assert_eq!(find.skip, 10);
        assert_eq!(find.limit, 10);
        assert_eq!(find.sort, SortOrder::Ascending);
        assert_eq!(
            find.filter,
            Filter::And(vec![
                Filter::contains("title", "star"),
                Filter::Or(vec![
                    Filter::MatchesIgnoreCase {
                        field: "file_type".into(),
                        pattern: "mkv".into()
                    },
                    Filter::MatchesIgnoreCase {
                        field: "title".into(),
                        pattern: r"\.mkv$".into()
                    },
                ]),
            ])
        );
    }
}
