//! Pagination requests and pages
//!
//! Query strings follow the `page` / `size` / `sort=field,dir` convention,
//! with `sort` repeatable.

/// Default page size when the request does not give one
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page size a client may ask for
pub const MAX_PAGE_SIZE: u32 = 2000;

/// Sortable columns of the files table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    /// Record id
    Id,
    /// File name
    Title,
    /// Upload time
    CreationDate,
}

impl SortField {
    /// Parse the wire name of a field
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "id" => Some(SortField::Id),
            "title" => Some(SortField::Title),
            "creationDate" => Some(SortField::CreationDate),
            _ => None,
        }
    }

    /// SQL column for this field
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Id => "f.id",
            SortField::Title => "f.title",
            SortField::CreationDate => "f.creation_date",
        }
    }
}

/// One sort criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    /// Field to sort by
    pub field: SortField,
    /// Ascending when true
    pub ascending: bool,
}

/// A requested page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page index
    pub page: u32,
    /// Page size
    pub size: u32,
    /// Sort criteria, applied in order
    pub sort: Vec<SortOrder>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: Vec::new(),
        }
    }
}

impl PageRequest {
    /// Build a page request from raw query pairs
    ///
    /// Unknown sort fields and unparseable numbers are ignored; `size` is
    /// clamped to `1..=MAX_PAGE_SIZE`.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let mut request = PageRequest::default();
        for (key, value) in pairs {
            match key.as_str() {
                "page" => {
                    if let Ok(page) = value.parse() {
                        request.page = page;
                    }
                }
                "size" => {
                    if let Ok(size) = value.parse::<u32>() {
                        request.size = size.clamp(1, MAX_PAGE_SIZE);
                    }
                }
                "sort" => {
                    let mut parts = value.split(',');
                    let field = parts.next().map(str::trim).and_then(SortField::parse);
                    let ascending = !matches!(
                        parts.next().map(|d| d.trim().to_ascii_lowercase()).as_deref(),
                        Some("desc")
                    );
                    if let Some(field) = field {
                        request.sort.push(SortOrder { field, ascending });
                    }
                }
                _ => {}
            }
        }
        request
    }

    /// Row offset of the first element of this page
    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }

    /// `ORDER BY` clause body built from whitelisted columns, defaulting to id
    pub fn order_by(&self) -> String {
        if self.sort.is_empty() {
            return "f.id ASC".to_string();
        }
        self.sort
            .iter()
            .map(|order| {
                format!(
                    "{} {}",
                    order.field.column(),
                    if order.ascending { "ASC" } else { "DESC" }
                )
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A page of results together with the total element count
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Elements of this page
    pub content: Vec<T>,
    /// Total number of elements across all pages
    pub total: u64,
    /// The request that produced this page
    pub request: PageRequest,
}

impl<T> Page<T> {
    /// Number of pages given the total and page size
    pub fn total_pages(&self) -> u64 {
        let size = u64::from(self.request.size.max(1));
        self.total.div_ceil(size)
    }

    /// Transform the page content, keeping paging metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total: self.total,
            request: self.request,
        }
    }
}
