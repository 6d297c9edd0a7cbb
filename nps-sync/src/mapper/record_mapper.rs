//! Record mapper implementation.
//!
//! Joins a survey with its home and user and projects the result onto the
//! fixed page properties.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use nps_sync_repository::{ExternalPage, PageProperties, SurveyRecord};
use tracing::{debug, instrument};

use super::date::{normalize_date, processing_instant};
use crate::errors::SyncError;
use crate::lookup::LookupService;

/// Text used for the title and owner when nothing better is known.
pub const UNSPECIFIED_FALLBACK: &str = "unspecified";

/// How survey references are turned into page text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MappingStrategy {
    /// Look up the home and the user and use their display names.
    #[default]
    Enriched,
    /// Use the raw references as stored in the survey, without lookups.
    Flat,
}

impl MappingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enriched => "enriched",
            Self::Flat => "flat",
        }
    }
}

impl fmt::Display for MappingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MappingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "enriched" | "enrich" | "lookup" => Ok(Self::Enriched),
            "flat" | "passthrough" | "raw" => Ok(Self::Flat),
            other => Err(format!("unknown mapping strategy '{}'", other)),
        }
    }
}

/// Resolved join of one survey, before fallbacks are applied.
struct Resolved {
    home_name: String,
    home_location: Option<String>,
    user_name: String,
}

/// Maps survey records to external pages.
#[derive(Clone)]
pub struct RecordMapper {
    lookup: LookupService,
    strategy: MappingStrategy,
    parent_id: String,
}

impl RecordMapper {
    /// Create a mapper that creates pages under `parent_id`.
    pub fn new(lookup: LookupService, strategy: MappingStrategy, parent_id: impl Into<String>) -> Self {
        Self {
            lookup,
            strategy,
            parent_id: parent_id.into(),
        }
    }

    pub fn strategy(&self) -> MappingStrategy {
        self.strategy
    }

    /// Map a survey, dating undated surveys with the current instant.
    pub async fn map(&self, record: &SurveyRecord) -> Result<ExternalPage, SyncError> {
        self.map_at(record, Utc::now()).await
    }

    /// Map a survey, dating undated surveys with `now`.
    #[instrument(skip(self, record, now), fields(survey_id = %record.survey_id, strategy = %self.strategy))]
    pub async fn map_at(
        &self,
        record: &SurveyRecord,
        now: DateTime<Utc>,
    ) -> Result<ExternalPage, SyncError> {
        let resolved = match self.strategy {
            MappingStrategy::Enriched => self.resolve(record).await?,
            MappingStrategy::Flat => Resolved {
                home_name: record.home_ref.to_string(),
                home_location: None,
                user_name: record.user_ref.to_string(),
            },
        };

        let properties = PageProperties {
            title: non_empty_or_unspecified(resolved.home_name),
            score: record.score.unwrap_or(0),
            comment: record.comment.clone().unwrap_or_default(),
            date: normalize_date(record.submitted_at).unwrap_or_else(|| processing_instant(now)),
            owner: non_empty_or_unspecified(resolved.user_name),
            destination: resolved.home_location.filter(|location| !location.is_empty()),
        };

        debug!(
            title = %properties.title,
            owner = %properties.owner,
            has_destination = properties.destination.is_some(),
            "Mapped survey"
        );

        Ok(ExternalPage {
            parent_id: self.parent_id.clone(),
            properties,
        })
    }

    /// Look up the home, then the user; fall back to the raw references.
    async fn resolve(&self, record: &SurveyRecord) -> Result<Resolved, SyncError> {
        let (home_name, home_location) = match self.lookup.find_home_by_ref(&record.home_ref).await? {
            Some(home) => (home.display_name, home.location),
            None => (record.home_ref.to_string(), None),
        };

        let user_name = match self.lookup.find_user_by_ref(&record.user_ref).await? {
            Some(user) => user.display_name,
            None => record.user_ref.to_string(),
        };

        Ok(Resolved {
            home_name,
            home_location,
            user_name,
        })
    }
}

fn non_empty_or_unspecified(value: String) -> String {
    if value.is_empty() {
        UNSPECIFIED_FALLBACK.to_string()
    } else {
        value
    }
}
