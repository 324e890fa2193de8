use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::format::parse_timestamp;

/// Identifier assigned by the remote store.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CandidatureId(pub u64);

impl fmt::Display for CandidatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Job application as returned by the remote API.
///
/// Typed fields read missing keys and `null` values as empty. The record the server
/// sent is kept alongside them and is what free-text search runs over.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Candidature {
    #[serde(deserialize_with = "null_as_default")]
    pub id: CandidatureId,
    #[serde(deserialize_with = "null_as_default")]
    pub nom: String,
    #[serde(deserialize_with = "null_as_default")]
    pub poste: String,
    #[serde(deserialize_with = "null_as_default")]
    pub statut: String,
    #[serde(deserialize_with = "null_as_default")]
    pub competences: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub experience: String,
    /// ISO-8601 timestamp, kept as received.
    #[serde(deserialize_with = "null_as_default")]
    pub date_candidature: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub telephone: String,
    /// Link to the résumé.
    #[serde(deserialize_with = "null_as_default")]
    pub cv: String,
    #[serde(deserialize_with = "null_as_default")]
    pub lettre_motivation: String,
    #[serde(deserialize_with = "null_as_default")]
    pub salaire_souhaite: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub disponibilite: String,
    #[serde(deserialize_with = "null_as_default")]
    pub localisation: String,
    #[serde(deserialize_with = "null_as_default")]
    pub commentaires: Vec<Commentaire>,
    #[serde(skip)]
    record: Value,
}

impl Candidature {
    /// Decodes the typed view of `record` and keeps `record` itself untouched.
    pub fn from_record(record: Value) -> Result<Self, serde_json::Error> {
        let mut candidature = Self::deserialize(&record)?;
        candidature.record = record;
        Ok(candidature)
    }

    /// The record exactly as received, or `Value::Null` for locally built values.
    pub fn record(&self) -> &Value {
        &self.record
    }

    pub fn submitted_at(&self) -> Option<DateTime<FixedOffset>> {
        parse_timestamp(&self.date_candidature)
    }

    /// Lowercased JSON rendering of the received record, field names included.
    /// Values that were never received fall back to their typed fields.
    pub fn search_text(&self) -> String {
        let rendered = if self.record.is_null() {
            serde_json::to_string(self).unwrap_or_default()
        } else {
            self.record.to_string()
        };
        rendered.to_lowercase()
    }

    /// `needle` must already be lowercased.
    pub fn has_competence_containing(&self, needle: &str) -> bool {
        self.competences
            .iter()
            .any(|competence| competence.to_lowercase().contains(needle))
    }
}

/// Reviewer note embedded in a [`Candidature`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Commentaire {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub auteur: String,
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub contenu: String,
}

impl Commentaire {
    pub fn written_at(&self) -> Option<DateTime<FixedOffset>> {
        parse_timestamp(&self.date)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
