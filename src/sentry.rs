use std::sync::Arc;

use tracing::{info, instrument};

use crate::config::ConfigResolver;
use crate::enforcement;
use crate::error::SentryError;
use crate::platform::Platform;
use crate::webhook::{self, Event};
use crate::workflow::{self, Report};

/// Per-event pipeline: resolve config, evaluate, compose, execute.
///
/// Holds no per-event state, so one instance can serve concurrent events.
pub struct Sentry {
    resolver: ConfigResolver,
    platform: Arc<dyn Platform>,
}

impl Sentry {
    pub fn new(resolver: ConfigResolver, platform: Arc<dyn Platform>) -> Self {
        Self { resolver, platform }
    }

    /// Handle a single "collaborator added" event end to end.
    pub async fn handle(&self, event: &Event) -> Report {
        let config = self
            .resolver
            .resolve(self.platform.as_ref(), &event.organization)
            .await;

        let outcome = enforcement::evaluate(&config, event).compose(&event.actor, &config.cc_list);
        info!(
            repo = %event.repository,
            collaborator = %event.member,
            actor = %event.actor,
            outcome = outcome.label(),
            title = outcome.notice().map(|n| n.title.as_str()).unwrap_or_default(),
            "policy evaluated"
        );

        workflow::execute(
            self.platform.as_ref(),
            outcome,
            &event.repository,
            &event.member,
        )
        .await
    }

    /// Parse and handle a raw webhook delivery.
    ///
    /// `Ok(None)` means the delivery was out of scope and ignored. A malformed
    /// payload is rejected before any remote call is made.
    #[instrument(name = "delivery", skip(self, body))]
    pub async fn handle_delivery(
        &self,
        delivery: &str,
        event_name: &str,
        body: &str,
    ) -> Result<Option<Report>, SentryError> {
        let Some(event) = webhook::parse_delivery(event_name, body)? else {
            info!("delivery ignored");
            return Ok(None);
        };
        Ok(Some(self.handle(&event).await))
    }
}
