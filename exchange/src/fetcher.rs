use crate::adapter::SymbolQuery;
use std::collections::HashMap;
use uuid::Uuid;

/// Identical requests that failed within this window are not retried.
const FAILURE_COOLDOWN_MS: i64 = 2_000;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ReqError {
    #[error("Request overlaps with an existing request")]
    Overlaps,
    #[error("Request has just failed: {0}")]
    Failed(String),
    #[error("Unknown request: {0}")]
    Unknown(Uuid),
}

#[derive(PartialEq, Debug)]
enum RequestStatus {
    Pending,
    Superseded,
    Completed(i64),
    Failed(i64, String),
}

#[derive(Debug)]
struct FetchRequest {
    query: SymbolQuery,
    status: RequestStatus,
}

/// Tracks lookups in flight so that only the latest one lands in the UI.
#[derive(Default)]
pub struct RequestHandler {
    requests: HashMap<Uuid, FetchRequest>,
    current: Option<Uuid>,
}

impl RequestHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, query: SymbolQuery) -> Result<Uuid, ReqError> {
        let now = chrono::Utc::now().timestamp_millis();

        let same: Vec<&FetchRequest> = self
            .requests
            .values()
            .filter(|r| r.query == query)
            .collect();

        if same.iter().any(|r| r.status == RequestStatus::Pending) {
            return Err(ReqError::Overlaps);
        }
        if let Some(reason) = same.iter().find_map(|r| match &r.status {
            RequestStatus::Failed(at, reason) if now - at < FAILURE_COOLDOWN_MS => Some(reason),
            _ => None,
        }) {
            return Err(ReqError::Failed(reason.clone()));
        }

        if let Some(previous) = self.current.and_then(|id| self.requests.get_mut(&id)) {
            if previous.status == RequestStatus::Pending {
                log::debug!("Superseding pending lookup for {}", previous.query.symbol);
                previous.status = RequestStatus::Superseded;
            }
        }

        self.prune();

        let id = Uuid::new_v4();
        self.requests.insert(
            id,
            FetchRequest {
                query,
                status: RequestStatus::Pending,
            },
        );
        self.current = Some(id);

        Ok(id)
    }

    /// Marks the request as done. Returns whether its result should be applied.
    pub fn complete(&mut self, id: Uuid) -> bool {
        self.finish(id, RequestStatus::Completed(chrono::Utc::now().timestamp_millis()))
    }

    /// Marks the request as failed. Returns whether the failure should be shown.
    pub fn fail(&mut self, id: Uuid, reason: String) -> bool {
        self.finish(
            id,
            RequestStatus::Failed(chrono::Utc::now().timestamp_millis(), reason),
        )
    }

    pub fn is_pending(&self) -> bool {
        self.current
            .and_then(|id| self.requests.get(&id))
            .is_some_and(|r| r.status == RequestStatus::Pending)
    }

    /// Drops every tracked request; late responses are then ignored.
    pub fn clear(&mut self) {
        self.requests.clear();
        self.current = None;
    }

    fn finish(&mut self, id: Uuid, status: RequestStatus) -> bool {
        let Some(request) = self.requests.get_mut(&id) else {
            log::warn!("{}", ReqError::Unknown(id));
            return false;
        };

        if request.status == RequestStatus::Superseded || self.current != Some(id) {
            log::debug!("Discarding stale response for {}", request.query.symbol);
            self.requests.remove(&id);
            return false;
        }

        request.status = status;
        true
    }

    fn prune(&mut self) {
        let now = chrono::Utc::now().timestamp_millis();

        self.requests.retain(|_, r| match &r.status {
            RequestStatus::Pending | RequestStatus::Superseded => true,
            RequestStatus::Completed(_) => false,
            RequestStatus::Failed(at, _) => now - at < FAILURE_COOLDOWN_MS,
        });
    }
}
