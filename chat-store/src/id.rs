//! Message id generation.

use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Generates a message id of the form `<prefix>-<unix millis>-<sequence>-<random>`.
///
/// The process-wide sequence keeps ids distinct within one millisecond; the random suffix keeps ids
/// distinct across processes sharing a transcript.
pub fn next_message_id(prefix: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let random = Uuid::new_v4().simple().to_string();
    format!("{}-{}-{}-{}", prefix, millis, seq, &random[..8])
}
