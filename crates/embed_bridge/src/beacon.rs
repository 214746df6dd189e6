use std::time::{Duration, Instant};

use url::Url;

use crate::messages::{EmbedMessage, MessageSink, MessageTarget};

/// Floor between two height reports (~15 reports/second).
pub const MIN_REPORT_INTERVAL: Duration = Duration::from_millis(66);

/// Height metrics of the embedded document, for both the root element and
/// the body-equivalent. The report uses the tallest of the six.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentMetrics {
    pub body_scroll_height: u32,
    pub root_scroll_height: u32,
    pub body_offset_height: u32,
    pub root_offset_height: u32,
    pub body_client_height: u32,
    pub root_client_height: u32,
}

impl DocumentMetrics {
    pub fn max_height(&self) -> u32 {
        [
            self.body_scroll_height,
            self.root_scroll_height,
            self.body_offset_height,
            self.root_offset_height,
            self.body_client_height,
            self.root_client_height,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }
}

/// Runs inside the embedded surface and posts `EMBED_HEIGHT` reports to the
/// parent browsing context whenever the measured height changes.
///
/// The host environment adapter is expected to call [`measure`](Self::measure)
/// on resize observations, full page load and orientation change, and
/// [`poll`](Self::poll) from its scheduler so a throttled measurement still
/// goes out once the window elapses. Reports target the wildcard origin:
/// the payload carries no secret, and the embed does not know which origin
/// hosts it.
pub struct HeightBeacon<C: MessageSink> {
    channel: C,
    frame_id: Option<String>,
    last_post: Option<Instant>,
    last_height: Option<u32>,
    pending: Option<u32>,
    alive: bool,
}

impl<C: MessageSink> HeightBeacon<C> {
    /// `page_url` is the embedded surface's own location; `frameId` is read
    /// from its query string once and echoed unchanged in every report.
    pub fn new(channel: C, page_url: &Url) -> Self {
        let frame_id = page_url
            .query_pairs()
            .find(|(key, _)| key == "frameId")
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty());

        HeightBeacon {
            channel,
            frame_id,
            last_post: None,
            last_height: None,
            pending: None,
            alive: true,
        }
    }

    pub fn frame_id(&self) -> Option<&str> {
        self.frame_id.as_deref()
    }

    /// Take a measurement. Posts immediately when the height changed and the
    /// throttle window is open; otherwise the value is parked until `poll`.
    pub fn measure(&mut self, metrics: &DocumentMetrics, now: Instant) {
        if !self.alive {
            return;
        }

        let height = metrics.max_height();
        if self.last_height == Some(height) {
            self.pending = None;
            return;
        }

        if self.throttled(now) {
            self.pending = Some(height);
        } else {
            self.post(height, now);
        }
    }

    /// Flush a parked measurement once the throttle window has elapsed.
    pub fn poll(&mut self, now: Instant) {
        if !self.alive || self.throttled(now) {
            return;
        }
        if let Some(height) = self.pending.take() {
            if self.last_height != Some(height) {
                self.post(height, now);
            }
        }
    }

    /// Release observation resources and cancel any pending report. Every
    /// later `measure`/`poll` is a no-op.
    pub fn teardown(&mut self) {
        self.alive = false;
        self.pending = None;
    }

    fn throttled(&self, now: Instant) -> bool {
        match self.last_post {
            Some(last) => now.duration_since(last) < MIN_REPORT_INTERVAL,
            None => false,
        }
    }

    fn post(&mut self, height: u32, now: Instant) {
        let message = EmbedMessage::Height {
            frame_id: self.frame_id.clone(),
            height,
        };
        let payload = match serde_json::to_value(&message) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::debug!(error = %err, "failed to encode height report");
                return;
            }
        };

        // Parent may be gone mid-teardown; that is not our problem to solve.
        if let Err(err) = self.channel.post(&MessageTarget::Any, &payload) {
            tracing::debug!(error = %err, "height report not delivered");
            return;
        }

        self.last_post = Some(now);
        self.last_height = Some(height);
    }
}
