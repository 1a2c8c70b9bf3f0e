//! Splitting `PublishBatch` input into service-sized chunks.

use minisns_model::PublishBatchRequestEntry;
use uuid::Uuid;

/// The most entries SNS accepts in one `PublishBatch` call.
pub const MAX_BATCH_ENTRIES: usize = 10;

/// Split `entries` into chunks of at most `chunk_size`, preserving order.
///
/// Entries without an id get a random UUID first, so every returned entry has
/// `id: Some(..)`. A `chunk_size` of zero is treated as one.
///
/// # Examples
///
/// ```
/// use minisns_core::batch::split_entries;
/// use minisns_model::PublishBatchRequestEntry;
///
/// let entries: Vec<_> = (0..15)
///     .map(|i| PublishBatchRequestEntry::builder().message(format!("m{i}")).build())
///     .collect();
/// let chunks = split_entries(entries, 10);
/// assert_eq!(chunks.iter().map(Vec::len).collect::<Vec<_>>(), vec![10, 5]);
/// ```
#[must_use]
pub fn split_entries(
    entries: Vec<PublishBatchRequestEntry>,
    chunk_size: usize,
) -> Vec<Vec<PublishBatchRequestEntry>> {
    let chunk_size = chunk_size.max(1);
    let mut chunks: Vec<Vec<PublishBatchRequestEntry>> =
        Vec::with_capacity(entries.len().div_ceil(chunk_size));

    for mut entry in entries {
        if entry.id.is_none() {
            entry.id = Some(Uuid::new_v4().to_string());
        }
        match chunks.last_mut() {
            Some(chunk) if chunk.len() < chunk_size => chunk.push(entry),
            _ => {
                let mut chunk = Vec::with_capacity(chunk_size);
                chunk.push(entry);
                chunks.push(chunk);
            }
        }
    }
    chunks
}
