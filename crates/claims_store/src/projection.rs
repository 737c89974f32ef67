//! Projection of the claim collection into the visible page
//!
//! `project` filters in one linear pass, stable-sorts the matches by the
//! requested key with ties broken by ascending claim id, then slices out the
//! requested page. The same inputs always yield the same `Page`.

use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::ClaimId;
use domain_claims::{Claim, ClaimStatus, ClaimType, Priority};

use crate::filter::{CompiledFilter, FilterSpec};

/// Column the projection is ordered by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    CreatedAt,
    UpdatedAt,
    ServiceDate,
    TrackingNumber,
    Status,
    ClaimType,
    Priority,
    TotalCharged,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Sort key plus direction; defaults to newest first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    pub fn asc(key: SortKey) -> Self {
        Self::new(key, SortDirection::Asc)
    }

    pub fn desc(key: SortKey) -> Self {
        Self::new(key, SortDirection::Desc)
    }
}

/// Everything besides the collection that determines a page
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectionQuery {
    pub filter: FilterSpec,
    pub sort: SortSpec,
    /// 1-based
    pub page_index: usize,
    pub page_size: usize,
}

impl ProjectionQuery {
    pub fn new(page_size: usize) -> Self {
        Self {
            filter: FilterSpec::default(),
            sort: SortSpec::default(),
            page_index: 1,
            page_size,
        }
    }
}

/// One page of the filtered, sorted collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    items: Vec<Claim>,
    page_index: usize,
    page_size: usize,
    total_count: usize,
    page_count: usize,
}

impl Page {
    /// Empty first page
    pub fn empty(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            page_index: 1,
            page_size,
            total_count: 0,
            page_count: 1,
        }
    }

    pub fn items(&self) -> &[Claim] {
        &self.items
    }

    pub fn ids(&self) -> Vec<ClaimId> {
        self.items.iter().map(|claim| claim.id.clone()).collect()
    }

    /// 1-based index after clamping
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Matches before slicing
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// `ceil(total_count / page_size)`, at least 1
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.page_index < self.page_count
    }

    pub fn has_previous(&self) -> bool {
        self.page_index > 1
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortValue<'a> {
    Time(DateTime<Utc>),
    Date(NaiveDate),
    Text(Option<&'a str>),
    Status(ClaimStatus),
    Type(ClaimType),
    Priority(Priority),
    Amount(Decimal),
}

fn sort_value(claim: &Claim, key: SortKey) -> SortValue<'_> {
    match key {
        SortKey::CreatedAt => SortValue::Time(claim.created_at),
        SortKey::UpdatedAt => SortValue::Time(claim.updated_at),
        SortKey::ServiceDate => SortValue::Date(claim.service_period.from()),
        SortKey::TrackingNumber => SortValue::Text(claim.tracking_number.as_deref()),
        SortKey::Status => SortValue::Status(claim.status),
        SortKey::ClaimType => SortValue::Type(claim.claim_type),
        SortKey::Priority => SortValue::Priority(claim.priority),
        // An overflowing total sorts as the largest amount.
        SortKey::TotalCharged => SortValue::Amount(
            claim
                .total_charged()
                .map_or(Decimal::MAX, |total| total.amount()),
        ),
    }
}

/// Number of pages for `total` matches, never less than one
pub fn page_count(total: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    total.div_ceil(page_size).max(1)
}

/// Computes the page described by `query` over `claims`.
///
/// A page index past the end clamps to the last page and an index of 0
/// clamps to the first. A page size of 0 is treated as 1.
pub fn project<'a, I>(claims: I, query: &ProjectionQuery) -> Page
where
    I: IntoIterator<Item = &'a Claim>,
{
    let filter = CompiledFilter::new(&query.filter);
    let sort = query.sort;

    // Sort keys are extracted once per claim, not once per comparison.
    let mut matched: Vec<(SortValue<'a>, &'a Claim)> = claims
        .into_iter()
        .filter(|claim| filter.matches(claim))
        .map(|claim| (sort_value(claim, sort.key), claim))
        .collect();

    matched.sort_by(|(a_key, a), (b_key, b)| {
        sort.direction
            .apply(a_key.cmp(b_key))
            .then_with(|| a.id.cmp(&b.id))
    });

    let page_size = query.page_size.max(1);
    let total_count = matched.len();
    let page_count = page_count(total_count, page_size);
    let page_index = query.page_index.clamp(1, page_count);

    let start = ((page_index - 1) * page_size).min(total_count);
    let end = (start + page_size).min(total_count);
    let items = matched[start..end]
        .iter()
        .map(|(_, claim)| (*claim).clone())
        .collect();

    Page {
        items,
        page_index,
        page_size,
        total_count,
        page_count,
    }
}

struct Memo {
    revision: u64,
    query: ProjectionQuery,
    page: Arc<Page>,
}

/// Memoizes the last computed page.
///
/// The memo is keyed by the collection revision and the full query, so a
/// change to either forces recomputation on the next read. Nothing is
/// computed until a page is asked for.
#[derive(Default)]
pub struct ProjectionCache {
    memo: RefCell<Option<Memo>>,
    computations: Cell<u64>,
}

impl ProjectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the page for `query` at `revision`, computing it if needed
    pub fn page<'a, I>(&self, revision: u64, query: &ProjectionQuery, claims: I) -> Arc<Page>
    where
        I: IntoIterator<Item = &'a Claim>,
    {
        if let Some(memo) = self.memo.borrow().as_ref() {
            if memo.revision == revision && memo.query == *query {
                return Arc::clone(&memo.page);
            }
        }

        let page = Arc::new(project(claims, query));
        self.computations.set(self.computations.get() + 1);
        *self.memo.borrow_mut() = Some(Memo {
            revision,
            query: query.clone(),
            page: Arc::clone(&page),
        });
        page
    }

    /// Drops the memoized page
    pub fn invalidate(&self) {
        self.memo.borrow_mut().take();
    }

    /// How many times a page has actually been computed
    pub fn computations(&self) -> u64 {
        self.computations.get()
    }
}

impl std::fmt::Debug for ProjectionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectionCache")
            .field("memoized", &self.memo.borrow().is_some())
            .field("computations", &self.computations.get())
            .finish()
    }
}
