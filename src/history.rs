//! The newest-first log of completed operations, and paged views onto it.

use crate::{TransactionKind, TransactionRecord};

/// How many records a page holds unless configured otherwise
pub const DEFAULT_PAGE_SIZE: usize = 3;

/// The transaction history, most recent record first
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct History {
    records: Vec<TransactionRecord>,
}

impl History {
    /// Creates an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a history from records that are already ordered newest-first
    pub fn from_records(records: Vec<TransactionRecord>) -> Self {
        Self { records }
    }

    /// Puts a record at the head of the history
    pub fn append(&mut self, record: TransactionRecord) {
        self.records.insert(0, record);
    }

    /// All records, most recent first
    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    /// The most recent record
    pub fn latest(&self) -> Option<&TransactionRecord> {
        self.records.first()
    }

    /// The number of recorded operations
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no operation was recorded yet
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The unfiltered slice `[offset, offset + page_size)`
    pub fn page(&self, offset: usize, page_size: usize) -> HistoryPage<'_> {
        HistoryPage::slice(self.records.iter().collect(), offset, page_size, false)
    }

    /// The slice `[offset, offset + page_size)` of all records matching `filter`
    ///
    /// Matching records keep their relative order.
    pub fn page_by<F>(&self, offset: usize, page_size: usize, filter: F) -> HistoryPage<'_>
        where F: Fn(&TransactionRecord) -> bool
    {
        let matches = self.records.iter().filter(|record| filter(*record)).collect();
        HistoryPage::slice(matches, offset, page_size, true)
    }

    /// Pages through the transfers matching a search term
    ///
    /// A blank term does not filter at all.
    pub fn search(&self, offset: usize, page_size: usize, term: &str) -> HistoryPage<'_> {
        match SearchTerm::new(term) {
            Some(term) => self.page_by(offset, page_size, |record| term.matches(record)),
            None => self.page(offset, page_size),
        }
    }
}

/// A case-insensitive search over transfer recipients
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Returns `None` for blank terms
    pub fn new(term: &str) -> Option<Self> {
        let term = term.trim();
        match term.is_empty() {
            true => None,
            false => Some(Self(term.to_lowercase())),
        }
    }

    /// Whether the record is a transfer to someone whose first or last name
    /// contains the term
    pub fn matches(&self, record: &TransactionRecord) -> bool {
        record.kind() == TransactionKind::Transfer
            && (record.recipient_last_name().to_lowercase().contains(&self.0)
                || record.recipient_first_name().to_lowercase().contains(&self.0))
    }

    /// The lowercased term
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Why a page has nothing to show
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmptyState {
    /// No operation was ever recorded
    NoHistory,
    /// A filter is active and no record matches it
    NoMatches,
}

/// One page of the (optionally filtered) history
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryPage<'a> {
    records: Vec<&'a TransactionRecord>,
    offset: usize,
    matching: usize,
    has_more: bool,
    filtered: bool,
}

impl<'a> HistoryPage<'a> {
    fn slice(
        matches: Vec<&'a TransactionRecord>,
        offset: usize,
        page_size: usize,
        filtered: bool,
    ) -> Self {
        let matching = matches.len();
        let end = offset.saturating_add(page_size);
        let records = matches
            .into_iter()
            .skip(offset)
            .take(page_size)
            .collect();

        Self {
            records,
            offset,
            matching,
            has_more: end < matching,
            filtered,
        }
    }

    /// The records on this page, most recent first
    pub fn records(&self) -> &[&'a TransactionRecord] {
        &self.records
    }

    /// The position of the first record on this page within all matches
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// How many records match in total, across all pages
    pub fn matching(&self) -> usize {
        self.matching
    }

    /// Whether there are matching records after this page
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Whether the page was produced with a filter
    pub fn is_filtered(&self) -> bool {
        self.filtered
    }

    /// Set when not a single record matches, regardless of the offset
    pub fn empty_state(&self) -> Option<EmptyState> {
        match (self.matching, self.filtered) {
            (0, true) => Some(EmptyState::NoMatches),
            (0, false) => Some(EmptyState::NoHistory),
            _ => None,
        }
    }
}

/// The "load more" position of somebody browsing the history
///
/// Each call to [`HistoryCursor::load_more`] yields the next page. The
/// position goes back to the first page whenever the search term changes or
/// a new record is appended (see [`HistoryCursor::reset`]).
#[derive(Clone, Debug)]
pub struct HistoryCursor {
    page_size: usize,
    offset: usize,
    term: Option<SearchTerm>,
}

impl HistoryCursor {
    /// Starts browsing at the first page, without a search term
    ///
    /// A page size of zero is raised to one, so every page moves forward.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            offset: 0,
            term: None,
        }
    }

    /// How many records a page holds
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// How many records were handed out since the last reset
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The active search term, if any
    pub fn term(&self) -> Option<&SearchTerm> {
        self.term.as_ref()
    }

    /// Changes the search term and starts over at the first page
    pub fn search(&mut self, term: &str) {
        self.term = SearchTerm::new(term);
        self.offset = 0;
    }

    /// Starts over at the first page, keeping the search term
    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Returns the next page and advances past it
    pub fn load_more<'a>(&mut self, history: &'a History) -> HistoryPage<'a> {
        let page = match &self.term {
            Some(term) => history.page_by(self.offset, self.page_size, |record| term.matches(record)),
            None => history.page(self.offset, self.page_size),
        };
        self.offset += page.records().len();

        page
    }
}

impl Default for HistoryCursor {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}
