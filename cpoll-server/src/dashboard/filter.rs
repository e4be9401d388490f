//! Record filtering for the admin view

use cpoll_common::ResponseRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Active filter criteria; empty strings mean "any"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub state: String,
    pub lga: String,
    pub gender: String,
    pub knows_romeo: String,
    pub knows_abdulrasheed: String,
    /// Case-insensitive on name and residence, literal on phone
    pub search: String,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// True when `record` passes every non-empty criterion
    pub fn matches(&self, record: &ResponseRecord) -> bool {
        exact(&self.state, &record.state)
            && exact(&self.lga, &record.lga)
            && exact(&self.gender, &record.gender)
            && exact(&self.knows_romeo, &record.knows_romeo)
            && exact(&self.knows_abdulrasheed, &record.knows_abdulrasheed)
            && self.matches_search(record)
    }

    fn matches_search(&self, record: &ResponseRecord) -> bool {
        if self.search.is_empty() {
            return true;
        }

        let needle = self.search.to_lowercase();
        record.name.to_lowercase().contains(&needle)
            || record.residence.to_lowercase().contains(&needle)
            || record
                .phone
                .as_deref()
                .is_some_and(|phone| phone.contains(self.search.as_str()))
    }

    /// Records passing the filter, in input order
    pub fn apply<'a>(&self, records: &'a [ResponseRecord]) -> Vec<&'a ResponseRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

fn exact(wanted: &str, actual: &str) -> bool {
    wanted.is_empty() || wanted == actual
}

/// Distinct values present in the loaded records, for filter selectors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub states: Vec<String>,
    pub lgas: Vec<String>,
    pub genders: Vec<String>,
}

impl FilterOptions {
    pub fn from_records(records: &[ResponseRecord]) -> Self {
        let collect = |pick: fn(&ResponseRecord) -> &str| -> Vec<String> {
            records
                .iter()
                .map(pick)
                .filter(|v| !v.is_empty())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .map(str::to_string)
                .collect()
        };

        Self {
            states: collect(|r| r.state.as_str()),
            lgas: collect(|r| r.lga.as_str()),
            genders: collect(|r| r.gender.as_str()),
        }
    }
}
