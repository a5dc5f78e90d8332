//! Collection queries

use crate::value::{Document, FieldValue};
use std::cmp::Ordering;

/// Single-field document filter
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Field equals value exactly
    Equals {
        /// Field name
        field: String,
        /// Expected value
        value: FieldValue,
    },
    /// Array field contains value
    ArrayContains {
        /// Field name
        field: String,
        /// Element to look for
        value: FieldValue,
    },
}

impl Filter {
    /// Exact-match filter
    #[must_use]
    pub fn equals(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Array-containment filter
    #[must_use]
    pub fn array_contains(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::ArrayContains {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Evaluate against a document
    #[must_use]
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Self::Equals { field, value } => doc.get(field) == Some(value),
            Self::ArrayContains { field, value } => {
                doc.get(field).is_some_and(|v| v.array_contains(value))
            }
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Smallest first
    #[default]
    Ascending,
    /// Largest first
    Descending,
}

/// Query over one collection
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    collection: String,
    filter: Option<Filter>,
    order_by: Option<(String, Direction)>,
    start_at: Option<FieldValue>,
    limit: Option<usize>,
}

impl Query {
    /// Query every document of a collection
    #[must_use]
    pub fn collection(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            filter: None,
            order_by: None,
            start_at: None,
            limit: None,
        }
    }

    /// Restrict by filter
    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Sort by field; documents lacking the field are excluded
    #[must_use]
    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some((field.into(), direction));
        self
    }

    /// Inclusive cursor on the ordered field
    #[must_use]
    pub fn start_at(mut self, value: impl Into<FieldValue>) -> Self {
        self.start_at = Some(value.into());
        self
    }

    /// Maximum number of results
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Target collection
    #[inline]
    #[must_use]
    pub fn collection_name(&self) -> &str {
        &self.collection
    }

    /// Run the query over `(id, document)` pairs already in id order
    ///
    /// A cursor without an ordering applies to the document id.
    #[must_use]
    pub fn evaluate<'a, I>(&self, docs: I) -> Vec<(String, Document)>
    where
        I: IntoIterator<Item = (&'a String, &'a Document)>,
    {
        let mut hits: Vec<(String, Document)> = docs
            .into_iter()
            .filter(|(_, doc)| self.filter.as_ref().map_or(true, |f| f.matches(doc)))
            .map(|(id, doc)| (id.clone(), doc.clone()))
            .collect();

        match &self.order_by {
            Some((field, direction)) => {
                hits.retain(|(_, doc)| doc.contains(field));
                hits.sort_by(|(_, a), (_, b)| {
                    let ord = match (a.get(field), b.get(field)) {
                        (Some(x), Some(y)) => x.total_cmp(y),
                        _ => Ordering::Equal,
                    };
                    match direction {
                        Direction::Ascending => ord,
                        Direction::Descending => ord.reverse(),
                    }
                });
                if let Some(cursor) = &self.start_at {
                    let direction = *direction;
                    hits.retain(|(_, doc)| {
                        doc.get(field).is_some_and(|v| match direction {
                            Direction::Ascending => v.total_cmp(cursor) != Ordering::Less,
                            Direction::Descending => v.total_cmp(cursor) != Ordering::Greater,
                        })
                    });
                }
            }
            None => {
                if let Some(FieldValue::String(cursor)) = &self.start_at {
                    hits.retain(|(id, _)| id >= cursor);
                }
            }
        }

        if let Some(limit) = self.limit {
            hits.truncate(limit);
        }
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn clubs() -> BTreeMap<String, Document> {
        let mut map = BTreeMap::new();
        map.insert(
            "1".to_string(),
            Document::new().with("name", "Hamburger SV").with("association_id", 3_i64),
        );
        map.insert(
            "2".to_string(),
            Document::new().with("name", "Holstein Kiel").with("association_id", 2_i64),
        );
        map.insert(
            "3".to_string(),
            Document::new().with("name", "FC St. Pauli").with("association_id", 3_i64),
        );
        map.insert("4".to_string(), Document::new().with("association_id", 3_i64));
        map
    }

    #[test]
    fn equals_filter() {
        let data = clubs();
        let hits = Query::collection("clubs")
            .filter(Filter::equals("association_id", 3_i64))
            .evaluate(&data);
        let ids: Vec<_> = hits.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, ["1", "3", "4"]);
    }

    #[test]
    fn order_excludes_missing_field_and_pages() {
        let data = clubs();
        let hits = Query::collection("clubs")
            .order_by("name", Direction::Ascending)
            .start_at("Hamburger SV")
            .limit(1)
            .evaluate(&data);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, "1");

        let all = Query::collection("clubs")
            .order_by("name", Direction::Descending)
            .evaluate(&data);
        let ids: Vec<_> = all.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, ["2", "1", "3"]);
    }
}
