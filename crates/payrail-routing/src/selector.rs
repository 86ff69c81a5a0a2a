//! Subaccount selector.
//!
//! One metrics record per subaccount id, created lazily on first sighting
//! and never deleted within a process lifetime. The map is shared mutable
//! state across concurrent payments; every `register`/`select`/
//! `record_outcome` runs in a single critical section and no lock is ever
//! held across I/O.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{RoutingError, RoutingResult};

/// Selection weights and thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Weight of the historical success rate. Default: 0.7.
    #[serde(default = "default_success_weight")]
    pub success_weight: f64,
    /// Weight of the recency score. Default: 0.3.
    #[serde(default = "default_recency_weight")]
    pub recency_weight: f64,
    /// Candidates below this success rate are excluded. Default: 0.8.
    #[serde(default = "default_min_success_rate")]
    pub min_success_rate: f64,
    /// Window over which recency decays to zero. Default: 30 days.
    #[serde(default = "default_recency_window_days")]
    pub recency_window_days: i64,
    /// When true, selection fails outright if every subaccount is below
    /// the minimum success rate instead of degrading to best-available.
    #[serde(default)]
    pub strict_health: bool,
}

fn default_success_weight() -> f64 {
    0.7
}

fn default_recency_weight() -> f64 {
    0.3
}

fn default_min_success_rate() -> f64 {
    0.8
}

fn default_recency_window_days() -> i64 {
    30
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            success_weight: default_success_weight(),
            recency_weight: default_recency_weight(),
            min_success_rate: default_min_success_rate(),
            recency_window_days: default_recency_window_days(),
            strict_health: false,
        }
    }
}

/// Rolling metrics for one subaccount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubaccountMetrics {
    pub id: String,
    /// successful / total, in [0, 1]. Seeded to 1.0 for unseen accounts.
    pub success_rate: f64,
    pub total_transactions: u64,
    pub successful_transactions: u64,
    /// Stamped at selection time, not at outcome time, so two selections
    /// made before either settles do not both look stale.
    pub last_used: Option<DateTime<Utc>>,
}

impl SubaccountMetrics {
    fn new(id: String) -> Self {
        Self {
            id,
            success_rate: 1.0,
            total_transactions: 0,
            successful_transactions: 0,
            last_used: None,
        }
    }
}

struct SelectorState {
    metrics: HashMap<String, SubaccountMetrics>,
    /// First-seen insertion order; gives stable iteration and tie-breaks.
    order: Vec<String>,
}

/// Picks the best subaccount for the next payment.
///
/// Owns the metrics map exclusively; callers only ever see cloned
/// snapshots.
pub struct SubaccountSelector {
    config: SelectionConfig,
    state: Mutex<SelectorState>,
}

impl SubaccountSelector {
    pub fn new(config: SelectionConfig) -> Self {
        Self {
            config,
            state: Mutex::new(SelectorState {
                metrics: HashMap::new(),
                order: Vec::new(),
            }),
        }
    }

    /// Ensure metrics exist for every id. Idempotent; existing records keep
    /// their history.
    pub fn register<I, S>(&self, subaccount_ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut state = self.state.lock();
        for id in subaccount_ids {
            let id = id.into();
            if !state.metrics.contains_key(&id) {
                debug!(subaccount = %id, "Registering new subaccount");
                state.metrics.insert(id.clone(), SubaccountMetrics::new(id.clone()));
                state.order.push(id);
            }
        }
    }

    /// Pick the best subaccount among all known ids and stamp its
    /// `last_used`.
    ///
    /// Candidates below the minimum success rate are excluded; if that
    /// empties the set, the default policy rescoring the full set applies
    /// (strict health turns this into an error instead).
    pub fn select(&self) -> RoutingResult<String> {
        self.select_filtered(None)
    }

    /// Like [`select`](Self::select), but restricted to `candidates`.
    ///
    /// Used with the live subaccount set so the chosen id is always a
    /// member of the set most recently fetched from the gateway, even when
    /// metrics for rotated-away subaccounts are still held.
    pub fn select_among(&self, candidates: &[String]) -> RoutingResult<String> {
        self.select_filtered(Some(candidates))
    }

    fn select_filtered(&self, candidates: Option<&[String]>) -> RoutingResult<String> {
        let now = Utc::now();
        let mut state = self.state.lock();

        let pool: Vec<&str> = state
            .order
            .iter()
            .filter(|id| candidates.map_or(true, |c| c.contains(*id)))
            .map(String::as_str)
            .collect();
        if pool.is_empty() {
            return Err(RoutingError::NoSubaccounts);
        }

        let healthy: Vec<&str> = pool
            .iter()
            .copied()
            .filter(|id| state.metrics[*id].success_rate >= self.config.min_success_rate)
            .collect();

        let chosen = if healthy.is_empty() {
            if self.config.strict_health {
                return Err(RoutingError::NoHealthySubaccount);
            }
            warn!(
                min_success_rate = self.config.min_success_rate,
                "All subaccounts below minimum success rate, degrading to best available"
            );
            self.best_of(&state, pool.iter().copied(), now)
        } else {
            self.best_of(&state, healthy.iter().copied(), now)
        };

        let metrics = state
            .metrics
            .get_mut(&chosen)
            .expect("chosen id is always a registered member");
        metrics.last_used = Some(now);
        debug!(subaccount = %chosen, "Selected subaccount");
        Ok(chosen)
    }

    /// Settle an attempt against a subaccount.
    pub fn record_outcome(&self, subaccount_id: &str, success: bool) {
        let mut state = self.state.lock();
        if !state.metrics.contains_key(subaccount_id) {
            // Can happen when an envelope outlives a gateway subaccount
            // rotation; start a fresh record rather than dropping the data.
            state
                .metrics
                .insert(subaccount_id.to_string(), SubaccountMetrics::new(subaccount_id.to_string()));
            state.order.push(subaccount_id.to_string());
        }
        let metrics = state
            .metrics
            .get_mut(subaccount_id)
            .expect("inserted above if missing");
        metrics.total_transactions += 1;
        if success {
            metrics.successful_transactions += 1;
        }
        metrics.success_rate =
            metrics.successful_transactions as f64 / metrics.total_transactions as f64;
        debug!(
            subaccount = %subaccount_id,
            success,
            success_rate = metrics.success_rate,
            total = metrics.total_transactions,
            "Recorded subaccount outcome"
        );
    }

    /// Snapshot of all metrics in first-seen order.
    pub fn snapshot(&self) -> Vec<SubaccountMetrics> {
        let state = self.state.lock();
        state
            .order
            .iter()
            .map(|id| state.metrics[id].clone())
            .collect()
    }

    /// Highest-scoring id among `candidates`; ties go to the first seen.
    fn best_of<'a>(
        &self,
        state: &SelectorState,
        candidates: impl Iterator<Item = &'a str>,
        now: DateTime<Utc>,
    ) -> String {
        let mut best: Option<(&str, f64)> = None;
        for id in candidates {
            let score = self.score(&state.metrics[id], now);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((id, score)),
            }
        }
        best.expect("candidates is never empty here").0.to_string()
    }

    fn score(&self, metrics: &SubaccountMetrics, now: DateTime<Utc>) -> f64 {
        self.config.success_weight * metrics.success_rate
            + self.config.recency_weight * self.recency(metrics, now)
    }

    /// 1.0 for just-used (or never-used) accounts, decaying linearly to 0
    /// over the recency window.
    fn recency(&self, metrics: &SubaccountMetrics, now: DateTime<Utc>) -> f64 {
        let Some(last_used) = metrics.last_used else {
            return 1.0;
        };
        let window_secs = (self.config.recency_window_days * 24 * 3600) as f64;
        let elapsed_secs = (now - last_used).num_seconds().max(0) as f64;
        1.0 - (elapsed_secs / window_secs).min(1.0)
    }
}

impl std::fmt::Debug for SubaccountSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubaccountSelector")
            .field("config", &self.config)
            .field("known", &self.state.lock().order.len())
            .finish()
    }
}
