//! Sorting and pagination hooks applied to collection reads.

use crate::collection::{ListQuery, Page, SortDirection, SortSpec};
use crate::record::Query;

/// Query keys read by [`SortingPaginator::pagination_params`].
pub const PAGE_KEY: &str = "page";
pub const PER_PAGE_KEY: &str = "per_page";

/// The pagination values found in a request's query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaginationParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Ordering and windowing for the `list` action.
///
/// Every method has a default; an implementation that overrides nothing
/// reads the collection unordered and unsliced.
pub trait SortingPaginator: Send + Sync {
    fn default_sorting_attribute(&self) -> Option<String> {
        None
    }

    fn default_sorting_direction(&self) -> SortDirection {
        SortDirection::Asc
    }

    /// The ordering to apply; `None` when no attribute is configured.
    fn sort_spec(&self) -> Option<SortSpec> {
        self.default_sorting_attribute().map(|attribute| SortSpec {
            attribute,
            direction: self.default_sorting_direction(),
        })
    }

    /// Extracts `page` and `per_page` from `query`, ignoring every other key.
    ///
    /// Values that are not positive integers are treated as absent.
    fn pagination_params(&self, query: &Query) -> PaginationParams {
        let number = |key: &str| {
            query
                .get(key)
                .and_then(|v| v.trim().parse::<u32>().ok())
                .filter(|n| *n > 0)
        };
        PaginationParams {
            page: number(PAGE_KEY),
            per_page: number(PER_PAGE_KEY),
        }
    }

    /// The page window for this request. The default does not paginate.
    fn paginate(&self, _query: &Query) -> Option<Page> {
        None
    }

    /// Everything the store needs for the read.
    fn list_query(&self, query: &Query) -> ListQuery {
        ListQuery {
            sort: self.sort_spec(),
            page: self.paginate(query),
        }
    }
}

/// No ordering, no pagination.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsorted;

impl SortingPaginator for Unsorted {}

/// Sorts by a fixed attribute and pages through `page`/`per_page`.
#[derive(Debug, Clone)]
pub struct Paginated {
    attribute: Option<String>,
    direction: SortDirection,
    default_per_page: u32,
    max_per_page: u32,
}

impl Paginated {
    pub fn new(default_per_page: u32) -> Self {
        let default_per_page = default_per_page.max(1);
        Self {
            attribute: None,
            direction: SortDirection::Asc,
            default_per_page,
            max_per_page: default_per_page.saturating_mul(4),
        }
    }

    pub fn sorted_by(mut self, attribute: impl Into<String>, direction: SortDirection) -> Self {
        self.attribute = Some(attribute.into());
        self.direction = direction;
        self
    }

    pub fn max_per_page(mut self, max: u32) -> Self {
        self.max_per_page = max.max(self.default_per_page);
        self
    }
}

impl SortingPaginator for Paginated {
    fn default_sorting_attribute(&self) -> Option<String> {
        self.attribute.clone()
    }

    fn default_sorting_direction(&self) -> SortDirection {
        self.direction
    }

    fn paginate(&self, query: &Query) -> Option<Page> {
        let params = self.pagination_params(query);
        Some(Page {
            number: params.page.unwrap_or(1),
            per_page: params
                .per_page
                .unwrap_or(self.default_per_page)
                .min(self.max_per_page),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> Query {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_are_passthrough() {
        let s = Unsorted;
        assert_eq!(s.default_sorting_attribute(), None);
        assert_eq!(s.default_sorting_direction(), SortDirection::Asc);
        assert_eq!(s.list_query(&query(&[("page", "2")])), ListQuery::default());
    }

    #[test]
    fn pagination_params_only_reads_two_keys() {
        let q = query(&[("page", "2"), ("per_page", "10"), ("admin", "true")]);
        assert_eq!(
            Unsorted.pagination_params(&q),
            PaginationParams {
                page: Some(2),
                per_page: Some(10)
            }
        );
    }

    #[test]
    fn pagination_params_ignore_garbage() {
        let q = query(&[("page", "two"), ("per_page", "0")]);
        assert_eq!(Unsorted.pagination_params(&q), PaginationParams::default());
    }

    #[test]
    fn paginated_clamps_page_size() {
        let p = Paginated::new(5)
            .sorted_by("name", SortDirection::Desc)
            .max_per_page(20);
        let lq = p.list_query(&query(&[("page", "3"), ("per_page", "500")]));
        assert_eq!(lq.page, Some(Page { number: 3, per_page: 20 }));
        assert_eq!(
            lq.sort,
            Some(SortSpec {
                attribute: "name".into(),
                direction: SortDirection::Desc
            })
        );

        let lq = p.list_query(&Query::new());
        assert_eq!(lq.page, Some(Page { number: 1, per_page: 5 }));
    }
}
