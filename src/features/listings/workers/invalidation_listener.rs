use sqlx::postgres::PgListener;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use crate::core::error::Result;
use crate::features::listings::services::ListingService;

/// Delay before re-subscribing after the listener fails
const RECONNECT_DELAY_SECS: u64 = 5;

/// Background worker that invalidates cached listing pages when listing
/// data changes.
///
/// Database triggers publish on `channel` whenever listings, images,
/// reviews or categories are written.
pub struct ListingInvalidationListener {
    pool: PgPool,
    channel: String,
    listings: Arc<ListingService>,
}

impl ListingInvalidationListener {
    pub fn new(pool: PgPool, channel: impl Into<String>, listings: Arc<ListingService>) -> Self {
        Self {
            pool,
            channel: channel.into(),
            listings,
        }
    }

    /// Run the listener in a background loop
    pub async fn run(&self) {
        tracing::info!(channel = %self.channel, "Starting listing invalidation listener");

        loop {
            if let Err(e) = self.listen().await {
                tracing::error!("Listing invalidation listener failed: {:?}", e);
            }
            tokio::time::sleep(Duration::from_secs(RECONNECT_DELAY_SECS)).await;
        }
    }

    async fn listen(&self) -> Result<()> {
        let mut listener = PgListener::connect_with(&self.pool).await?;
        listener.listen(&self.channel).await?;

        // Anything written before the subscription was live went unnoticed
        self.listings.clear_cache().await;

        loop {
            match listener.try_recv().await? {
                Some(notification) => {
                    let dropped = self.listings.invalidate().await;
                    tracing::debug!(
                        table = notification.payload(),
                        dropped,
                        "Listing data changed"
                    );
                }
                None => {
                    // Connection dropped; the next receive reconnects, but
                    // notifications sent in between are lost
                    tracing::warn!("Listing invalidation listener lost its connection");
                    self.listings.clear_cache().await;
                }
            }
        }
    }
}
