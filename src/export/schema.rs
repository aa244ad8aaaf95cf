//! Field schema for the exported table
//!
//! The schema is an ordered list: its order is the CSV header order and the
//! SQLite column order, and every flattened row is positionally aligned to it.

/// Where a column's value lives inside an extension record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    /// Successive object keys from the record root, e.g. `["publisher", "publisherId"]`
    Path(&'static [&'static str]),

    /// The `value` of the first `statistics` entry whose `statisticName` matches
    Statistic(&'static str),
}

/// Post-processing applied to an extracted value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    /// Value passes through unchanged
    Verbatim,

    /// ISO-8601 timestamp reduced to its calendar date (text before the first `T`)
    DatePrefix,
}

/// One output column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub column: &'static str,
    pub extraction: Extraction,
    pub normalization: Normalization,
}

impl FieldSpec {
    pub const fn path(column: &'static str, keys: &'static [&'static str]) -> Self {
        Self {
            column,
            extraction: Extraction::Path(keys),
            normalization: Normalization::Verbatim,
        }
    }

    pub const fn date(column: &'static str, keys: &'static [&'static str]) -> Self {
        Self {
            column,
            extraction: Extraction::Path(keys),
            normalization: Normalization::DatePrefix,
        }
    }

    pub const fn statistic(column: &'static str, name: &'static str) -> Self {
        Self {
            column,
            extraction: Extraction::Statistic(name),
            normalization: Normalization::Verbatim,
        }
    }
}

/// Columns of the extension table, in output order
pub const EXTENSION_FIELDS: &[FieldSpec] = &[
    FieldSpec::path("publisherId", &["publisher", "publisherId"]),
    FieldSpec::path("publisherName", &["publisher", "publisherName"]),
    FieldSpec::path("publisherDisplayName", &["publisher", "displayName"]),
    FieldSpec::path("extensionId", &["extensionId"]),
    FieldSpec::path("extensionName", &["extensionName"]),
    FieldSpec::path("extensionDisplayName", &["displayName"]),
    FieldSpec::date("lastUpdated", &["lastUpdated"]),
    FieldSpec::date("publishedDate", &["publishedDate"]),
    FieldSpec::statistic("install", "install"),
    FieldSpec::statistic("averagerating", "averagerating"),
    FieldSpec::statistic("ratingcount", "ratingcount"),
    FieldSpec::statistic("trendingdaily", "trendingdaily"),
    FieldSpec::statistic("trendingmonthly", "trendingmonthly"),
    FieldSpec::statistic("downloadCount", "downloadCount"),
    FieldSpec::path("categories", &["categories"]),
    FieldSpec::path("tags", &["tags"]),
    FieldSpec::path("pricing", &["pricing"]),
    FieldSpec::path("hasIcon", &["hasIcon"]),
];

/// Column names of a schema, in order
pub fn header(schema: &[FieldSpec]) -> Vec<&'static str> {
    schema.iter().map(|field| field.column).collect()
}
