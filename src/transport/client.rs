//! Outbound side of the peer transport: POST a round envelope to a single
//! destination, retrying on connection error or a 406 clock mismatch until
//! the destination accepts or the deadline elapses.

use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use super::codec::{RoundEnvelope, HEADER_CLOCK, HEADER_RECEIVER_RANK, HEADER_SENDER_RANK};
use super::TransportError;

const LOG_TARGET: &str = "transport::client";
const RETRY_INTERVAL: Duration = Duration::from_secs(5);

pub async fn send_round(
    client: &Client,
    destination: &str,
    receiver_rank: usize,
    envelope: &RoundEnvelope,
    deadline: Duration,
) -> Result<(), TransportError> {
    let started = Instant::now();
    loop {
        let attempt = client
            .post(format!("{destination}/round"))
            .header(HEADER_CLOCK, envelope.clock.to_string())
            .header(HEADER_SENDER_RANK, envelope.sender_rank.to_string())
            .header(HEADER_RECEIVER_RANK, receiver_rank.to_string())
            .json(envelope)
            .send()
            .await;

        match attempt {
            Ok(resp) if resp.status() == StatusCode::ACCEPTED => return Ok(()),
            Ok(resp) if resp.status() == StatusCode::NOT_ACCEPTABLE => {
                debug!(target: LOG_TARGET, %destination, "peer not yet ready, will retry");
            }
            Ok(resp) => {
                warn!(target: LOG_TARGET, %destination, status = %resp.status(), "unexpected response");
            }
            Err(err) => {
                debug!(target: LOG_TARGET, %destination, error = %err, "connect failed, will retry");
            }
        }

        if started.elapsed() >= deadline {
            return Err(TransportError::Timeout);
        }
        let remaining = deadline.saturating_sub(started.elapsed());
        tokio::time::sleep(RETRY_INTERVAL.min(remaining.max(Duration::from_millis(1)))).await;
        if started.elapsed() >= deadline {
            return Err(TransportError::Timeout);
        }
    }
}
