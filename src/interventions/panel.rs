use std::collections::HashSet;
use std::sync::Arc;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::backend::EventStore;
use crate::engagement::event::{EventType, LearningEvent};
use crate::interventions::{intervention_instance_id, select_intervention, InterventionInput, InterventionKind};
use crate::metrics::Metrics;

/// What the host displays for the current decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterventionView {
    pub kind: InterventionKind,
    pub label: &'static str,
    pub icon_name: &'static str,
    pub message: &'static str,
    pub instance_id: String,
}

/// One mounted intervention banner.
///
/// `render` can be called any number of times with the same inputs; the set
/// of already logged instances lives on the panel, outside the render step,
/// so an instance is written to the event store at most once per mount.
pub struct InterventionPanel<E: EventStore + ?Sized> {
    user_id: String,
    events: Arc<E>,
    metrics: Metrics,
    logged: HashSet<String>,
}

impl<E: EventStore + ?Sized> InterventionPanel<E> {
    pub fn new<S: Into<String>>(user_id: S, events: Arc<E>, metrics: Metrics) -> Self {
        InterventionPanel {
            user_id: user_id.into(),
            events,
            metrics,
            logged: HashSet::new(),
        }
    }

    /// Number of instances this mount has written to the event store
    pub fn logged_count(&self) -> usize {
        self.logged.len()
    }

    /// Decide what to show and write the audit event when it is due.
    ///
    /// A failed write leaves the instance unmarked so a later render retries;
    /// the view is returned either way.
    pub async fn render(&mut self, input: &InterventionInput, now: DateTime<Utc>) -> Option<InterventionView> {
        let kind = select_intervention(input)?;
        let cta = kind.cta();
        let instance_id = intervention_instance_id(&self.user_id, kind, now.date_naive());

        if kind.is_loggable() {
            if self.logged.contains(&instance_id) {
                self.metrics.record_duplicate_suppressed();
            } else {
                let event = LearningEvent::new(
                    self.user_id.clone(),
                    EventType::InterventionShown,
                    kind.as_code(),
                    now,
                );
                match self.events.record_event(&event).await {
                    Ok(()) => {
                        self.logged.insert(instance_id.clone());
                        self.metrics.record_event();
                        self.metrics.record_intervention_logged();
                        tracing::info!(
                            user_id = %self.user_id,
                            intervention = kind.as_code(),
                            "Logged intervention_shown"
                        );
                    }
                    Err(e) => {
                        self.metrics.record_event_failure();
                        tracing::warn!(
                            user_id = %self.user_id,
                            intervention = kind.as_code(),
                            error = %e,
                            "Failed to log intervention_shown"
                        );
                    }
                }
            }
        }

        Some(InterventionView {
            kind,
            label: cta.label,
            icon_name: cta.icon_name,
            message: cta.message,
            instance_id,
        })
    }
}
