//! Eager and lazy delivery
//!
//! Both modes run the same [`CursorWalk`]; the only difference is who
//! drives it. Eager collection drains it on the calling thread. Lazy
//! streaming hands the walk to a spawned task that pushes one row at a time
//! through a capacity-1 channel - the producer sits blocked on each send
//! until the consumer takes the row, the stream is closed, or the
//! cancellation flag flips.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::observability::Logger;
use crate::rows::RowStream;
use crate::store::{KeyCursor, Row};

use super::errors::PageResult;
use super::walk::CursorWalk;
use super::window::Window;

/// Windowed delivery over backend cursors.
pub struct Paginator {
    logger: Logger,
}

impl Paginator {
    /// Creates a paginator.
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    /// Creates a paginator with a default logger.
    pub fn standard() -> Self {
        Self::new(Logger::new("quarry.pager"))
    }

    /// Materializes the window into an ordered sequence.
    pub fn collect<C: KeyCursor>(&self, cursor: C, window: &Window) -> PageResult<Vec<Row>> {
        let mut walk = CursorWalk::new(cursor, window.clone());
        let mut rows = Vec::new();
        while let Some(row) = walk.next_row()? {
            rows.push(row);
        }
        self.logger
            .trace("PAGE_COLLECTED", &[("rows", &rows.len().to_string())]);
        Ok(rows)
    }

    /// Delivers the window lazily, one row per receive.
    ///
    /// Must be called within a tokio runtime. Dropping or closing the
    /// returned stream stops the producer task; an abandoned stream never
    /// leaks it.
    pub fn stream<C>(&self, cursor: C, window: Window) -> RowStream
    where
        C: KeyCursor + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<PageResult<Row>>(1);
        let cancel = Arc::new(AtomicBool::new(false));
        let producer_cancel = Arc::clone(&cancel);

        tokio::spawn(async move {
            let mut walk = CursorWalk::new(cursor, window);
            loop {
                if producer_cancel.load(Ordering::Relaxed) {
                    break;
                }
                match walk.next_row() {
                    Ok(Some(row)) => {
                        if tx.send(Ok(row)).await.is_err() {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(err) => {
                        let _ = tx.send(Err(err)).await;
                        break;
                    }
                }
            }
        });

        self.logger.trace("PAGE_STREAMING", &[]);
        RowStream::lazy(rx, cancel)
    }
}
