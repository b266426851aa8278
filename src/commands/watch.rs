use crate::{
    commands::status::{ProbeOptions, get_server_status_with},
    models::json_data::ServerStatus,
    utils::transport::Connector,
};

use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_stream::{StreamExt, wrappers::IntervalStream};
use tracing::{info, instrument};

/// Probes the server every `interval` handing each result to `on_status`. The first probe runs immediately.
///
/// Each tick is an independent probe, a failed tick is not retried before the next one. Returns after
/// `count` probes, or never when `count` is `None`.
#[instrument(name = "watch", level = "trace", skip_all)]
pub async fn watch<C, F>(
    connector: &C,
    options: &ProbeOptions,
    interval: Duration,
    count: Option<usize>,
    mut on_status: F,
) where
    C: Connector,
    F: FnMut(&ServerStatus),
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut ticks = IntervalStream::new(ticker).take(count.unwrap_or(usize::MAX));
    let mut prev_online = None;

    while ticks.next().await.is_some() {
        let status = get_server_status_with(connector, options).await;

        if prev_online != Some(status.online) {
            if status.online {
                info!("{}:{} is online", options.host, options.port)
            } else {
                info!("{}:{} is offline", options.host, options.port)
            }
            prev_online = Some(status.online);
        }

        on_status(&status);
    }
}
