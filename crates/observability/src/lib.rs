use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bankdesk_core::Intent;
use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

#[derive(Debug)]
pub struct AppMetrics {
    started_at: DateTime<Utc>,
    requests_total: AtomicU64,
    rejected_total: AtomicU64,
    intents: [AtomicU64; Intent::COUNT],
    total_latency_micros: AtomicU64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub started_at: DateTime<Utc>,
    pub uptime_seconds: i64,
    pub requests_total: u64,
    pub rejected_total: u64,
    pub empty_total: u64,
    pub fallback_total: u64,
    pub intents: BTreeMap<&'static str, u64>,
    pub avg_latency_micros: f64,
}

impl Default for AppMetrics {
    fn default() -> Self {
        Self {
            started_at: Utc::now(),
            requests_total: AtomicU64::new(0),
            rejected_total: AtomicU64::new(0),
            intents: Default::default(),
            total_latency_micros: AtomicU64::new(0),
        }
    }
}

impl AppMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_request(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Requests turned away before classification (bad JSON and the like).
    pub fn inc_rejected(&self) {
        self.rejected_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_classification(&self, intent: Intent, duration: Duration) {
        self.intents[intent.index()].fetch_add(1, Ordering::Relaxed);
        self.total_latency_micros
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let intents = Intent::ALL
            .iter()
            .map(|intent| {
                (
                    intent.as_code(),
                    self.intents[intent.index()].load(Ordering::Relaxed),
                )
            })
            .collect::<BTreeMap<_, _>>();
        let classified = intents.values().sum::<u64>();
        let latency = self.total_latency_micros.load(Ordering::Relaxed);

        MetricsSnapshot {
            started_at: self.started_at,
            uptime_seconds: (Utc::now() - self.started_at).num_seconds(),
            requests_total: self.requests_total.load(Ordering::Relaxed),
            rejected_total: self.rejected_total.load(Ordering::Relaxed),
            empty_total: self.intents[Intent::Empty.index()].load(Ordering::Relaxed),
            fallback_total: self.intents[Intent::Unknown.index()].load(Ordering::Relaxed),
            avg_latency_micros: if classified == 0 {
                0.0
            } else {
                latency as f64 / classified as f64
            },
            intents,
        }
    }
}

pub fn init_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}=info,bankdesk_api=info,tower_http=info",
                service_name
            ))
        });

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .with_span_list(true)
            .init();
    });
}
