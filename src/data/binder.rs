use std::time::{Duration, Instant};

use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use crate::data::{TimeSeriesBundle, VariableData, VariableDataPayload, VariableId};
use crate::error::{ChartError, ChartResult};

/// Notification emitted after a complete reshape has been published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataEvent {
    BundleUpdated {
        generation: u64,
        series_count: usize,
    },
}

/// Observer hook for renderers subscribed to data arrival.
pub trait DataObserver {
    fn on_data(&mut self, event: DataEvent);
}

/// Deferred-completion handle returned by `ensure_loaded`.
///
/// Stamped with the request generation; a later `ensure_loaded` supersedes
/// all earlier tickets, which is the cooperative model's cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    #[must_use]
    pub fn generation(self) -> u64 {
        self.generation
    }
}

/// Completion state of a load request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Fetches still outstanding for the requested set.
    Pending,
    /// Every requested id is resident; the active bundle reflects them.
    Ready,
    /// Some ids failed; the succeeded subset is still usable from the
    /// active bundle.
    Failed { failed_ids: Vec<VariableId> },
    /// A newer `ensure_loaded` replaced this request; its result no longer
    /// drives the active bundle.
    Superseded,
}

struct CacheEntry {
    data: VariableData,
    last_touched: Instant,
}

/// Owns the variable-data cache and the reshape into [`TimeSeriesBundle`].
///
/// Single-threaded and cooperative: `ensure_loaded` records fetch intents,
/// the host transport drains them with `take_pending_fetches` and delivers
/// results through `resolve_fetch`. The cache is shared by all chart
/// instances on a page, so fetch dedup happens here, not per chart.
#[derive(Default)]
pub struct VariableDataBinder {
    cache: IndexMap<VariableId, CacheEntry>,
    failed: IndexMap<VariableId, String>,
    pending: Vec<VariableId>,
    in_flight: Vec<VariableId>,
    requested: Vec<VariableId>,
    generation: u64,
    active_bundle: Option<TimeSeriesBundle>,
    observers: Vec<Box<dyn DataObserver>>,
}

impl VariableDataBinder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Box<dyn DataObserver>) {
        self.observers.push(observer);
    }

    /// Requests that `ids` become resident, queueing fetches only for ids
    /// not already cached, pending, or in flight (at most one in-flight
    /// fetch per id). Each call starts a new generation: the latest
    /// requested id set is the only one that drives the active bundle.
    pub fn ensure_loaded(&mut self, ids: &[VariableId]) -> LoadTicket {
        self.generation += 1;
        self.requested.clear();
        for &id in ids {
            if !self.requested.contains(&id) {
                self.requested.push(id);
            }
        }

        let now = Instant::now();
        for &id in &self.requested {
            if let Some(entry) = self.cache.get_mut(&id) {
                entry.last_touched = now;
                continue;
            }
            if self.pending.contains(&id) || self.in_flight.contains(&id) {
                continue;
            }
            // A re-requested id that failed before gets another attempt.
            self.failed.shift_remove(&id);
            self.pending.push(id);
        }

        debug!(
            generation = self.generation,
            requested = self.requested.len(),
            pending = self.pending.len(),
            "ensure_loaded"
        );

        if self.is_settled() {
            self.rebuild_active_bundle();
        }
        LoadTicket {
            generation: self.generation,
        }
    }

    /// Hands the queued fetch intents to the transport, marking them in
    /// flight. Draining twice without resolutions in between yields nothing
    /// the second time, which is the dedup guarantee.
    pub fn take_pending_fetches(&mut self) -> Vec<VariableId> {
        let ids = std::mem::take(&mut self.pending);
        self.in_flight.extend(&ids);
        if !ids.is_empty() {
            trace!(count = ids.len(), "handing fetches to transport");
        }
        ids
    }

    /// Transport callback delivering one id's result.
    ///
    /// Successful data always lands in the cache (it is per-id and a later
    /// selection can reuse it), but the active bundle is rebuilt only when
    /// the newest generation's id set has fully settled, so a resolution
    /// serving a superseded request can never replace newer data.
    pub fn resolve_fetch(&mut self, id: VariableId, result: Result<VariableData, String>) {
        let Some(position) = self.in_flight.iter().position(|&f| f == id) else {
            warn!(variable_id = id, "ignoring unsolicited fetch resolution");
            return;
        };
        self.in_flight.swap_remove(position);

        match result {
            Ok(data) => {
                if let Err(err) = data.validate() {
                    warn!(variable_id = id, error = %err, "rejecting malformed fetch payload");
                    self.failed.insert(id, err.to_string());
                } else if data.id != id {
                    warn!(
                        variable_id = id,
                        payload_id = data.id,
                        "rejecting fetch payload with mismatched variable id"
                    );
                    self.failed
                        .insert(id, format!("payload carries variable {}", data.id));
                } else {
                    trace!(variable_id = id, rows = data.row_count(), "cached variable");
                    self.cache.insert(
                        id,
                        CacheEntry {
                            data,
                            last_touched: Instant::now(),
                        },
                    );
                }
            }
            Err(reason) => {
                warn!(variable_id = id, reason = %reason, "fetch failed");
                self.failed.insert(id, reason);
            }
        }

        if self.is_settled() {
            self.rebuild_active_bundle();
        }
    }

    /// Completion state of a ticket relative to the current generation.
    #[must_use]
    pub fn poll(&self, ticket: LoadTicket) -> LoadStatus {
        if ticket.generation < self.generation {
            return LoadStatus::Superseded;
        }
        if !self.is_settled() {
            return LoadStatus::Pending;
        }
        let failed_ids: Vec<VariableId> = self
            .requested
            .iter()
            .copied()
            .filter(|id| self.failed.contains_key(id))
            .collect();
        if failed_ids.is_empty() {
            LoadStatus::Ready
        } else {
            LoadStatus::Failed { failed_ids }
        }
    }

    /// Synchronous ingestion path used when data is supplied directly (the
    /// baking pipeline). Validates the whole payload before touching any
    /// state, so observers never see a partial reshape.
    pub fn receive_data(&mut self, payload: VariableDataPayload) -> ChartResult<()> {
        for variable in payload.variables.values() {
            variable.validate()?;
        }

        self.generation += 1;
        self.requested = payload.variables.keys().copied().collect();
        let now = Instant::now();
        for (id, data) in payload.variables {
            self.failed.shift_remove(&id);
            self.cache.insert(
                id,
                CacheEntry {
                    data,
                    last_touched: now,
                },
            );
        }
        debug!(
            generation = self.generation,
            variables = self.requested.len(),
            "received data synchronously"
        );
        self.rebuild_active_bundle();
        Ok(())
    }

    /// Bundle for the last requested id set; never a stale one.
    #[must_use]
    pub fn active_bundle(&self) -> Option<&TimeSeriesBundle> {
        self.active_bundle.as_ref()
    }

    #[must_use]
    pub fn is_resident(&self, id: VariableId) -> bool {
        self.cache.contains_key(&id)
    }

    #[must_use]
    pub fn failure_reason(&self, id: VariableId) -> Option<&str> {
        self.failed.get(&id).map(String::as_str)
    }

    /// The recorded failure for `id` as a typed error, for callers that
    /// propagate rather than inspect.
    pub fn fetch_error(&self, id: VariableId) -> Option<ChartError> {
        self.failed.get(&id).map(|reason| ChartError::FetchFailed {
            variable_id: id,
            reason: reason.clone(),
        })
    }

    /// Drops cache entries idle longer than `max_idle` and not referenced by
    /// the latest request. Evicted ids become fetchable again.
    pub fn evict_idle(&mut self, max_idle: Duration) {
        let before = self.cache.len();
        let requested = std::mem::take(&mut self.requested);
        self.cache.retain(|id, entry| {
            requested.contains(id) || entry.last_touched.elapsed() < max_idle
        });
        self.requested = requested;
        let evicted = before - self.cache.len();
        if evicted > 0 {
            debug!(evicted, remaining = self.cache.len(), "evicted idle variables");
        }
    }

    fn is_settled(&self) -> bool {
        self.requested
            .iter()
            .all(|id| !self.pending.contains(id) && !self.in_flight.contains(id))
    }

    /// Rebuilds the active bundle from the cached subset of the requested
    /// set and notifies observers exactly once, after the whole reshape.
    fn rebuild_active_bundle(&mut self) {
        let mut bundle = TimeSeriesBundle::new();
        let now = Instant::now();
        for &id in &self.requested {
            if let Some(entry) = self.cache.get_mut(&id) {
                entry.last_touched = now;
                bundle.ingest(&entry.data);
            }
        }
        let series_count = bundle.series_count();
        self.active_bundle = Some(bundle);

        let event = DataEvent::BundleUpdated {
            generation: self.generation,
            series_count,
        };
        let mut observers = std::mem::take(&mut self.observers);
        for observer in &mut observers {
            observer.on_data(event);
        }
        self.observers = observers;
    }
}
