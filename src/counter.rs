use derive_new::new;
use snafu::{Location, OptionExt as _, ResultExt as _, Snafu};
use tracing::instrument;

use crate::config::{CounterConfig, LookupMode};
use crate::database::Database;
use crate::model::{ViewCount, ViewCountRecord};

pub type Result<T, E = FetchError> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum FetchError {
    #[snafu(display("failed to read `{table}` at {location}: {source}"))]
    Lookup {
        table: String,
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("`{table}` holds no view count record"))]
    NoRecord {
        table: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("the view count record has no `{field}` attribute"))]
    MissingField {
        field: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("`{field}` holds a non-numeric value: {value}"))]
    NotNumeric {
        field: String,
        value: String,
        #[snafu(implicit)]
        location: Location,
    },
}

/// Reads the view count out of the store.
#[derive(Debug, Clone, new)]
pub struct ViewCounter {
    database: Database,
    config: CounterConfig,
}

impl ViewCounter {
    /// One read against the store, with nothing behind it: no retry, no
    /// timeout, no fallback read.
    #[instrument(skip(self))]
    pub async fn fetch(&self) -> Result<ViewCount> {
        let record = match self.config.lookup {
            LookupMode::Key => self.lookup_record().await?,
            LookupMode::Scan => self.scan_first().await?,
        };

        let record = record.context(NoRecordSnafu {
            table: self.config.table.as_str(),
        })?;
        tracing::debug!(?record, "view count record");

        let field = self.config.field.as_str();
        let value = record.field(field).context(MissingFieldSnafu { field })?;

        ViewCount::from_value(value).context(NotNumericSnafu {
            field,
            value: value.to_string(),
        })
    }

    async fn lookup_record(&self) -> Result<Option<ViewCountRecord>> {
        let table = self.config.table.as_str();

        self.database
            .select((table, self.config.record.as_str()))
            .await
            .context(LookupSnafu { table })
    }

    async fn scan_first(&self) -> Result<Option<ViewCountRecord>> {
        let table = self.config.table.as_str();

        let records: Vec<ViewCountRecord> = self
            .database
            .select(table)
            .await
            .context(LookupSnafu { table })?;

        tracing::debug!(total = records.len(), "scanned the view count table");
        Ok(records.into_iter().next())
    }

    /// Collapses every failure into the text shown on the page.
    pub async fn display(&self) -> CountText {
        match self.fetch().await {
            Ok(count) => CountText::Count(count),
            Err(error @ FetchError::Lookup { .. }) => {
                tracing::error!(%error, "unable to read the view count");
                CountText::Unavailable
            }
            Err(error) => {
                tracing::error!(%error, "view count missing or malformed");
                CountText::NotFound
            }
        }
    }
}

/// What the page element ends up saying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountText {
    Count(ViewCount),
    /// The record, the attribute, or a parsable number was missing.
    NotFound,
    /// The store itself could not be read.
    Unavailable,
}

impl CountText {
    pub fn count(self) -> Option<ViewCount> {
        match self {
            CountText::Count(count) => Some(count),
            _ => None,
        }
    }
}

impl std::fmt::Display for CountText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CountText::Count(count) => count.fmt(f),
            CountText::NotFound => f.write_str("View count not found"),
            CountText::Unavailable => f.write_str("Error loading view count"),
        }
    }
}
