// Filter domain model - criteria applied to the dashboard dataset
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterDimension {
    Region,
    Specialty,
    Plan,
    Provider,
    Time,
}

impl FilterDimension {
    pub const ALL: [FilterDimension; 5] = [
        FilterDimension::Region,
        FilterDimension::Specialty,
        FilterDimension::Plan,
        FilterDimension::Provider,
        FilterDimension::Time,
    ];

    /// Value a dimension returns to on reset.
    pub fn default_value(&self) -> &'static str {
        match self {
            FilterDimension::Time => "ytd",
            _ => "all",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterDimension::Region => "region",
            FilterDimension::Specialty => "specialty",
            FilterDimension::Plan => "plan",
            FilterDimension::Provider => "provider",
            FilterDimension::Time => "time",
        }
    }
}

impl fmt::Display for FilterDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterCriteria(BTreeMap<FilterDimension, String>);

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn defaults() -> Self {
        FilterDimension::ALL
            .into_iter()
            .map(|dim| (dim, dim.default_value().to_string()))
            .collect()
    }

    pub fn with(mut self, dimension: FilterDimension, value: impl Into<String>) -> Self {
        self.0.insert(dimension, value.into());
        self
    }

    pub fn get(&self, dimension: FilterDimension) -> Option<&str> {
        self.0.get(&dimension).map(String::as_str)
    }

}

impl FromIterator<(FilterDimension, String)> for FilterCriteria {
    fn from_iter<I: IntoIterator<Item = (FilterDimension, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
