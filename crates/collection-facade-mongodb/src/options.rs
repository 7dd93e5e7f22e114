//! Optional projection / limit / skip / sort for fetch operations

use bson::{doc, Document as BsonDocument};
use mongodb::options::{FindOneOptions, FindOptions};

/// Options bag for `fetch` and `fetch_one`.
///
/// Only the fields that were set reach the driver; an empty bag produces no
/// options at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchOptions {
    projection: Option<BsonDocument>,
    limit: Option<i64>,
    skip: Option<u64>,
    sort: Option<BsonDocument>,
}

impl FetchOptions {
    /// Create an empty options bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the projection document
    pub fn projection(mut self, projection: BsonDocument) -> Self {
        self.projection = Some(projection);
        self
    }

    /// Set the maximum number of documents to return
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the number of documents to skip
    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Set the sort order
    pub fn sort(mut self, sort: BsonDocument) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn get_projection(&self) -> Option<&BsonDocument> {
        self.projection.as_ref()
    }

    pub fn get_limit(&self) -> Option<i64> {
        self.limit
    }

    pub fn get_skip(&self) -> Option<u64> {
        self.skip
    }

    pub fn get_sort(&self) -> Option<&BsonDocument> {
        self.sort.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.projection.is_none() && self.limit.is_none() && self.skip.is_none() && self.sort.is_none()
    }

    /// Driver options for a multi-document find, `None` when nothing was set
    pub fn to_find_options(&self) -> Option<FindOptions> {
        if self.is_empty() {
            return None;
        }
        let mut options = FindOptions::default();
        options.projection = self.projection.clone();
        options.limit = self.limit;
        options.skip = self.skip;
        options.sort = self.sort.clone();
        Some(options)
    }

    /// Driver options for a single-document find.
    ///
    /// A single-document lookup has no limit, so `limit` alone does not
    /// produce options.
    pub fn to_find_one_options(&self) -> Option<FindOneOptions> {
        if self.projection.is_none() && self.skip.is_none() && self.sort.is_none() {
            return None;
        }
        let mut options = FindOneOptions::default();
        options.projection = self.projection.clone();
        options.skip = self.skip;
        options.sort = self.sort.clone();
        Some(options)
    }

    /// Render the supplied keys as a document, for debug dumps
    pub fn to_document(&self) -> BsonDocument {
        let mut rendered = doc! {};
        if let Some(projection) = &self.projection {
            rendered.insert("projection", projection.clone());
        }
        if let Some(limit) = self.limit {
            rendered.insert("limit", limit);
        }
        if let Some(skip) = self.skip {
            // BSON has no unsigned 64-bit integer
            match i64::try_from(skip) {
                Ok(skip) => rendered.insert("skip", skip),
                Err(_) => rendered.insert("skip", skip.to_string()),
            };
        }
        if let Some(sort) = &self.sort {
            rendered.insert("sort", sort.clone());
        }
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_options_produce_no_driver_options() {
        let opts = FetchOptions::new();
        assert!(opts.is_empty());
        assert!(opts.to_find_options().is_none());
        assert!(opts.to_find_one_options().is_none());
        assert!(opts.to_document().is_empty());
    }

    #[test]
    fn test_only_supplied_keys_are_set() {
        let opts = FetchOptions::new().limit(20);
        let find = opts.to_find_options().unwrap();
        assert_eq!(find.limit, Some(20));
        assert!(find.skip.is_none());
        assert!(find.projection.is_none());
        assert!(find.sort.is_none());
        assert_eq!(opts.to_document(), doc! { "limit": 20_i64 });
    }

    #[test]
    fn test_chaining() {
        let projection = doc! { "name": 1, "_id": 0 };
        let sort = doc! { "created_at": -1 };

        let opts = FetchOptions::new()
            .projection(projection.clone())
            .sort(sort.clone())
            .skip(5)
            .limit(10);

        assert_eq!(opts.get_projection(), Some(&projection));
        assert_eq!(opts.get_sort(), Some(&sort));
        assert_eq!(opts.get_skip(), Some(5));
        assert_eq!(opts.get_limit(), Some(10));

        let find = opts.to_find_options().unwrap();
        assert_eq!(find.projection, Some(projection));
        assert_eq!(find.sort, Some(sort));
        assert_eq!(find.skip, Some(5));
        assert_eq!(find.limit, Some(10));
    }

    #[test]
    fn test_to_document_renders_skip() {
        assert_eq!(FetchOptions::new().skip(3).to_document(), doc! { "skip": 3_i64 });
    }

    #[test]
    fn test_to_document_keeps_huge_skip_positive() {
        let rendered = FetchOptions::new().skip(u64::MAX).to_document();
        assert_eq!(rendered.get_str("skip").unwrap(), "18446744073709551615");
    }

    #[test]
    fn test_limit_alone_is_ignored_for_find_one() {
        let opts = FetchOptions::new().limit(1);
        assert!(opts.to_find_options().is_some());
        assert!(opts.to_find_one_options().is_none());
    }

    #[test]
    fn test_find_one_options_keep_sort_and_skip() {
        let opts = FetchOptions::new().sort(doc! { "age": 1 }).skip(2);
        let find_one = opts.to_find_one_options().unwrap();
        assert_eq!(find_one.sort, Some(doc! { "age": 1 }));
        assert_eq!(find_one.skip, Some(2));
    }
}
