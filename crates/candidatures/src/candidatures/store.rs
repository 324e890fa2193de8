use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use serde_json::Value;
use tokio::sync::watch;
use tracing::debug;

use super::domain::{Candidature, CandidatureId};
use super::filters::{FilterMap, FilterPlan};
use crate::http::{ApiClient, ApiError, QueryParams};

/// Collection endpoint on the remote API.
pub const COLLECTION: &str = "/candidatures";

/// Everything a view needs to render the collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceState {
    /// Records in server order.
    pub data: Vec<Candidature>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Operation that produced a [`CandidatureError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    FetchAll,
    FetchOne(CandidatureId),
    UpdateStatus(CandidatureId),
    Delete(CandidatureId),
}

impl Verb {
    fn fallback_description(&self) -> String {
        match self {
            Verb::FetchAll => "Failed to fetch candidatures".to_string(),
            Verb::FetchOne(id) => format!("Failed to fetch candidature {id}"),
            Verb::UpdateStatus(id) => format!("Failed to update status for candidature {id}"),
            Verb::Delete(id) => format!("Failed to delete candidature {id}"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{description}")]
pub struct CandidatureError {
    pub verb: Verb,
    pub description: String,
    #[source]
    pub cause: Option<ApiError>,
}

impl CandidatureError {
    fn from_api(verb: Verb, cause: ApiError) -> Self {
        let description = cause
            .description()
            .unwrap_or_else(|| verb.fallback_description());
        Self {
            verb,
            description,
            cause: Some(cause),
        }
    }
}

#[derive(Serialize)]
struct StatusPatch<'a> {
    statut: &'a str,
}

/// Observable list/detail state for candidatures plus the verbs that change it.
///
/// Every verb raises `loading`, clears `error`, and lowers `loading` again on every exit
/// path, including cancellation. Failures set `error` before `loading` drops.
///
/// Overlapping [`fetch_all`](Self::fetch_all) calls do not cancel each other; only the
/// most recently started one may write `data` or `error`.
#[derive(Debug)]
pub struct CandidatureStore {
    client: ApiClient,
    state: watch::Sender<ResourceState>,
    fetch_generation: AtomicU64,
}

impl CandidatureStore {
    pub fn new(client: ApiClient) -> Self {
        let (state, _) = watch::channel(ResourceState::default());
        Self {
            client,
            state,
            fetch_generation: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ResourceState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ResourceState {
        self.state.borrow().clone()
    }

    pub fn data(&self) -> Vec<Candidature> {
        self.state.borrow().data.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    /// Loads the collection and replaces `data` with the locally filtered result.
    ///
    /// `q`, `skill` and `sort` are interpreted here; every other key is forwarded as a
    /// query parameter. See [`FilterPlan`].
    pub async fn fetch_all(
        &self,
        filters: Option<&FilterMap>,
    ) -> Result<Vec<Candidature>, CandidatureError> {
        let generation = self.fetch_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let _loading = self.begin();

        let plan = filters.map(FilterPlan::from_filters).unwrap_or_default();
        let outcome = self
            .client
            .get::<Vec<Value>>(COLLECTION, Some(&plan.query))
            .await
            .and_then(decode_records);
        let latest = self.fetch_generation.load(Ordering::SeqCst) == generation;

        match outcome {
            Ok(records) => {
                let received = records.len();
                let filtered = plan.apply(records);
                debug!(received, kept = filtered.len(), latest, "fetched candidatures");
                if latest {
                    self.state
                        .send_modify(|state| state.data = filtered.clone());
                }
                Ok(filtered)
            }
            Err(cause) => {
                let error = CandidatureError::from_api(Verb::FetchAll, cause);
                if latest {
                    self.record_failure(&error);
                } else {
                    debug!(error = %error, "ignoring failure of a superseded fetch");
                }
                Err(error)
            }
        }
    }

    /// Looks a record up by id. An unknown id yields `Ok(None)`.
    pub async fn fetch_one(
        &self,
        id: CandidatureId,
    ) -> Result<Option<Candidature>, CandidatureError> {
        let _loading = self.begin();

        let mut params = QueryParams::new();
        params.insert("id".to_string(), Some(id.to_string()));

        match self
            .client
            .get::<Vec<Value>>(COLLECTION, Some(&params))
            .await
            .and_then(decode_records)
        {
            Ok(records) => Ok(records.into_iter().next()),
            Err(cause) => Err(self.fail(Verb::FetchOne(id), cause)),
        }
    }

    /// Changes `statut` on the server. The cached `data` is left as is; callers that
    /// display the list re-fetch to observe the new status.
    pub async fn update_status(
        &self,
        id: CandidatureId,
        status: &str,
    ) -> Result<(), CandidatureError> {
        let _loading = self.begin();

        match self
            .client
            .patch::<Value, _>(&record_endpoint(id), &StatusPatch { statut: status })
            .await
        {
            Ok(_) => Ok(()),
            Err(cause) => Err(self.fail(Verb::UpdateStatus(id), cause)),
        }
    }

    /// Deletes on the server, then drops the record from `data`.
    pub async fn delete_candidature(&self, id: CandidatureId) -> Result<(), CandidatureError> {
        let _loading = self.begin();

        match self.client.delete::<Value>(&record_endpoint(id)).await {
            Ok(_) => {
                self.state
                    .send_modify(|state| state.data.retain(|candidature| candidature.id != id));
                Ok(())
            }
            Err(cause) => Err(self.fail(Verb::Delete(id), cause)),
        }
    }

    fn begin(&self) -> LoadingGuard<'_> {
        self.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });
        LoadingGuard { state: &self.state }
    }

    fn fail(&self, verb: Verb, cause: ApiError) -> CandidatureError {
        let error = CandidatureError::from_api(verb, cause);
        self.record_failure(&error);
        error
    }

    fn record_failure(&self, error: &CandidatureError) {
        let description = error.description.clone();
        self.state
            .send_modify(|state| state.error = Some(description));
    }
}

/// Lowers `loading` when the verb finishes, fails, or is dropped mid-flight.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<ResourceState>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.send_modify(|state| state.loading = false);
    }
}

fn decode_records(records: Vec<Value>) -> Result<Vec<Candidature>, ApiError> {
    records
        .into_iter()
        .map(Candidature::from_record)
        .collect::<Result<_, _>>()
        .map_err(ApiError::Decode)
}

fn record_endpoint(id: CandidatureId) -> String {
    format!("{COLLECTION}/{id}")
}
