use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Placeholder used when a listing has no value for a grouping field.
pub const UNKNOWN_KEY: &str = "Unknown";

/// A job listing as stored by the search collaborator.
///
/// Every field is optional in the source data; the salary is kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub qualifications: Vec<String>,
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    /// Date the listing was collected.
    #[serde(default)]
    pub date_added: Option<NaiveDate>,
}

impl Listing {
    /// `"%Y-%m"` of the collection date, or [`UNKNOWN_KEY`].
    pub fn month_key(&self) -> String {
        self.date_added
            .map(|d| d.format("%Y-%m").to_string())
            .unwrap_or_else(|| UNKNOWN_KEY.to_string())
    }

    pub fn state_key(&self) -> String {
        non_blank(self.state.as_deref())
    }

    pub fn title_key(&self) -> String {
        non_blank(self.job_title.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => UNKNOWN_KEY.to_string(),
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
