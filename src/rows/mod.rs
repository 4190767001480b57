//! Typed row streams
//!
//! The paginator and executor produce raw (key, bytes) rows; [`RowStream`]
//! is where bytes become caller types, one decode per row, on demand. One
//! stream type fronts both delivery modes - an already-materialized
//! sequence or a live channel fed by a producer task.

pub mod errors;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::mpsc;

use crate::pager::PageResult;
use crate::store::Row;

pub use errors::{RowsError, RowsResult};

enum Delivery {
    /// Materialized rows, handed out in order
    Eager(std::vec::IntoIter<Row>),
    /// Rows arriving from a producer task
    Lazy {
        rx: mpsc::Receiver<PageResult<Row>>,
        cancel: Arc<AtomicBool>,
    },
}

/// A forward-only stream of typed rows.
///
/// `next` decodes into any `DeserializeOwned` type; a decode failure is
/// terminal for the stream and also recorded for [`RowStream::last_error`].
/// Closing (or dropping) a lazy stream cancels its producer task.
pub struct RowStream {
    delivery: Delivery,
    last_error: Option<RowsError>,
    done: bool,
}

impl RowStream {
    /// A stream over already-materialized rows.
    pub fn eager(rows: Vec<Row>) -> Self {
        Self {
            delivery: Delivery::Eager(rows.into_iter()),
            last_error: None,
            done: false,
        }
    }

    /// A stream fed by a producer task through `rx`; flipping `cancel`
    /// stops the producer at its next step.
    pub(crate) fn lazy(rx: mpsc::Receiver<PageResult<Row>>, cancel: Arc<AtomicBool>) -> Self {
        Self {
            delivery: Delivery::Lazy { rx, cancel },
            last_error: None,
            done: false,
        }
    }

    /// Decodes the next row into `T`. `Ok(None)` is the natural end of the
    /// sequence; any error is terminal for this stream.
    pub async fn next<T: DeserializeOwned>(&mut self) -> RowsResult<Option<T>> {
        let row = match self.pull().await? {
            Some(row) => row,
            None => return Ok(None),
        };
        match serde_json::from_slice(&row.value) {
            Ok(decoded) => Ok(Some(decoded)),
            Err(err) => {
                let err = RowsError::Decode(err.to_string());
                self.last_error = Some(err.clone());
                self.close();
                Err(err)
            }
        }
    }

    /// The next raw row, no decoding. Errors end the sequence and are left
    /// in [`RowStream::last_error`].
    pub async fn next_raw(&mut self) -> Option<Row> {
        self.pull().await.unwrap_or(None)
    }

    /// The error that terminated this stream, if any. Mainly for lazily
    /// delivered streams, where the producer's error arrives out-of-band.
    pub fn last_error(&self) -> Option<&RowsError> {
        self.last_error.as_ref()
    }

    /// Releases cursor resources and cancels a lazy producer. Subsequent
    /// `next` calls return end-of-stream.
    pub fn close(&mut self) {
        self.done = true;
        if let Delivery::Lazy { rx, cancel } = &mut self.delivery {
            cancel.store(true, Ordering::Relaxed);
            rx.close();
        }
    }

    async fn pull(&mut self) -> RowsResult<Option<Row>> {
        if self.done {
            return Ok(None);
        }
        let next = match &mut self.delivery {
            Delivery::Eager(rows) => rows.next().map(Ok),
            Delivery::Lazy { rx, .. } => rx.recv().await.map(|res| res.map_err(RowsError::from)),
        };
        match next {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(err)) => {
                self.last_error = Some(err.clone());
                self.close();
                Err(err)
            }
            None => {
                self.done = true;
                Ok(None)
            }
        }
    }
}

impl Drop for RowStream {
    fn drop(&mut self) {
        self.close();
    }
}
