//! Gallery query payloads
//!
//! Every page request carries the same filter, sort and flag fields; only the
//! page number differs. A [`QueryTemplate`] holds the fixed part and builds a
//! fresh [`ExtensionQuery`] value for each page.

use crate::config::ApiConfig;
use serde::Serialize;

/// Filter type selecting the installation target
const FILTER_INSTALLATION_TARGET: u32 = 8;

/// Filter type matching the free-text search expression
const FILTER_SEARCH_TEXT: u32 = 10;

/// One filter criterion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Criterion {
    pub filter_type: u32,
    pub value: String,
}

/// Filter block of a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryFilter {
    pub criteria: Vec<Criterion>,
    pub direction: u32,
    pub page_size: u32,
    pub page_number: u32,
    pub sort_by: u32,
    pub sort_order: u32,
}

/// Request body for one page of the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionQuery {
    pub filters: Vec<QueryFilter>,
    pub flags: u32,
}

impl ExtensionQuery {
    /// Page number this query asks for
    pub fn page_number(&self) -> u32 {
        self.filters.first().map(|f| f.page_number).unwrap_or_default()
    }
}

/// The fixed part of every page query
#[derive(Debug, Clone)]
pub struct QueryTemplate {
    target: String,
    page_size: u32,
    flags: u32,
    sort_by: u32,
    sort_order: u32,
    direction: u32,
}

impl QueryTemplate {
    /// Builds the template from API configuration
    pub fn from_config(config: &ApiConfig) -> Self {
        Self {
            target: config.target.clone(),
            page_size: config.page_size,
            flags: config.flags,
            sort_by: config.sort_by,
            sort_order: config.sort_order,
            direction: config.direction,
        }
    }

    /// Extensions requested per page
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Builds the query for the given page number
    pub fn for_page(&self, page: u32) -> ExtensionQuery {
        ExtensionQuery {
            filters: vec![QueryFilter {
                criteria: vec![
                    Criterion {
                        filter_type: FILTER_INSTALLATION_TARGET,
                        value: self.target.clone(),
                    },
                    Criterion {
                        filter_type: FILTER_SEARCH_TEXT,
                        value: format!("target:\"{}\" ", self.target),
                    },
                ],
                direction: self.direction,
                page_size: self.page_size,
                page_number: page,
                sort_by: self.sort_by,
                sort_order: self.sort_order,
            }],
            flags: self.flags,
        }
    }
}
