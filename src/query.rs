//! Search and sort
//!
//! Filters by name substring (case-insensitive) or canonical time substring,
//! then optionally sorts by name or time.

use std::cmp::Ordering;

use crate::codec::format_canonical;
use crate::record::Reservation;

/// Field to sort results by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Time,
}

impl SortField {
    /// `"name"` or `"time"`; anything else means no sorting
    pub fn parse(input: &str) -> Option<Self> {
        match input {
            "name" => Some(SortField::Name),
            "time" => Some(SortField::Time),
            _ => None,
        }
    }

    fn compare(self, a: &Reservation, b: &Reservation) -> Ordering {
        match self {
            SortField::Name => a.name().cmp(b.name()),
            SortField::Time => a.time().cmp(&b.time()),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// `"desc"` is descending, anything else ascending
    pub fn parse(input: &str) -> Self {
        if input == "desc" {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }
}

/// A parsed search-and-sort request
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    /// Lowercased name needle and raw time needle; `None` matches everything
    term: Option<(String, String)>,
    sort: Option<SortField>,
    order: SortOrder,
}

impl SearchQuery {
    pub fn new(term: Option<&str>, sort: Option<SortField>, order: SortOrder) -> Self {
        let term = term
            .filter(|t| !t.trim().is_empty())
            .map(|t| (t.to_lowercase(), t.to_string()));
        Self { term, sort, order }
    }

    /// Build from caller-supplied strings
    pub fn parse(term: Option<&str>, sort_by: &str, sort_order: &str) -> Self {
        Self::new(term, SortField::parse(sort_by), SortOrder::parse(sort_order))
    }

    pub fn matches(&self, record: &Reservation) -> bool {
        match &self.term {
            None => true,
            Some((lowered, raw)) => {
                record.name().to_lowercase().contains(lowered.as_str())
                    || format_canonical(record.time()).contains(raw.as_str())
            }
        }
    }

    /// Filter and sort into a new list
    pub fn apply<'a, I>(&self, records: I) -> Vec<Reservation>
    where
        I: IntoIterator<Item = &'a Reservation>,
    {
        let mut results: Vec<Reservation> = records
            .into_iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect();

        if let Some(field) = self.sort {
            match self.order {
                SortOrder::Asc => results.sort_by(|a, b| field.compare(a, b)),
                SortOrder::Desc => results.sort_by(|a, b| field.compare(b, a)),
            }
        }

        results
    }
}
