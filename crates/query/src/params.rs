//! Client-supplied collection parameters with paging defaults and limits.

/// Page number used when the client sends none or an unusable one.
pub const DEFAULT_PAGE_NUMBER: usize = 1;

/// Page size used when the client sends none or an unusable one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Hard upper bound on page size, regardless of what the client asks for.
pub const MAX_PAGE_SIZE: usize = 20;

/// Sort, projection and paging parameters for one collection request.
///
/// Page values are always within bounds once set through the builder
/// methods: number at least 1, size between 1 and [`MAX_PAGE_SIZE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionParameters {
    /// Raw sort clause, e.g. `"name desc, age"`.
    pub order_by: String,

    /// Raw field list, e.g. `"id,name"`. Empty means all fields.
    pub fields: String,

    pub page_number: usize,

    pub page_size: usize,
}

impl CollectionParameters {
    /// Creates parameters with default paging and no sort or projection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sort clause.
    pub fn order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = order_by.into();
        self
    }

    /// Sets the field list.
    pub fn fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = fields.into();
        self
    }

    /// Sets the page number; zero becomes [`DEFAULT_PAGE_NUMBER`].
    pub fn page_number(mut self, page_number: usize) -> Self {
        self.page_number = page_number.max(DEFAULT_PAGE_NUMBER);
        self
    }

    /// Sets the page size, clamped to `1..=MAX_PAGE_SIZE`.
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Sets the page number from a raw query value. Absent or unparsable
    /// values fall back to [`DEFAULT_PAGE_NUMBER`].
    pub fn page_number_param(self, raw: Option<&str>) -> Self {
        let n = parse_positive(raw).unwrap_or(DEFAULT_PAGE_NUMBER);
        self.page_number(n)
    }

    /// Sets the page size from a raw query value. Absent or unparsable
    /// values fall back to [`DEFAULT_PAGE_SIZE`]; large ones are capped.
    pub fn page_size_param(self, raw: Option<&str>) -> Self {
        let n = parse_positive(raw).unwrap_or(DEFAULT_PAGE_SIZE);
        self.page_size(n)
    }
}

impl Default for CollectionParameters {
    fn default() -> Self {
        Self {
            order_by: String::new(),
            fields: String::new(),
            page_number: DEFAULT_PAGE_NUMBER,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Parses a page value. Negative numbers count as present-but-small so they
/// clamp to the lower bound, and numbers too large to represent clamp to the
/// upper bound. Anything that is not an integer yields `None`.
fn parse_positive(raw: Option<&str>) -> Option<usize> {
    let raw = raw?.trim();
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if negative {
        return Some(0);
    }
    Some(digits.parse().unwrap_or(usize::MAX))
}
