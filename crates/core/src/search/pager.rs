//! Token-following pagination
//!
//! [`paginate`] turns a page fetcher into a record stream that skips
//! `offset` records client-side and stops after `limit` records or when the
//! server stops returning a continuation token, whichever comes first.

use std::collections::VecDeque;
use std::future::Future;

use ctgforge_domain::TransportError;
use futures::stream;
use tracing::debug;

use super::ports::{RawRecord, RecordStream};

/// One page of search results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub records: Vec<RawRecord>,
    /// Continuation token; `None` on the last page
    pub next_page_token: Option<String>,
}

struct PagerState<F> {
    fetch: F,
    buffer: VecDeque<RawRecord>,
    next_token: Option<String>,
    offset: usize,
    limit: usize,
    skipped: usize,
    yielded: usize,
    pages: usize,
    exhausted: bool,
}

/// Build a lazy record stream over `fetch`
///
/// `fetch` receives the continuation token (`None` for the first page). It
/// is called again only once the buffered page has been consumed, and never
/// after `limit` records were yielded. The first error ends the stream.
pub fn paginate<'a, F, Fut>(fetch: F, offset: usize, limit: usize) -> RecordStream<'a>
where
    F: FnMut(Option<String>) -> Fut + Send + 'a,
    Fut: Future<Output = Result<Page, TransportError>> + Send + 'a,
{
    let state = PagerState {
        fetch,
        buffer: VecDeque::new(),
        next_token: None,
        offset,
        limit,
        skipped: 0,
        yielded: 0,
        pages: 0,
        exhausted: false,
    };

    Box::pin(stream::unfold(state, |mut state| async move {
        loop {
            if state.yielded >= state.limit {
                return None;
            }

            if let Some(record) = state.buffer.pop_front() {
                if state.skipped < state.offset {
                    state.skipped += 1;
                    continue;
                }
                state.yielded += 1;
                return Some((Ok(record), state));
            }

            if state.exhausted {
                debug!(pages = state.pages, yielded = state.yielded, "search exhausted");
                return None;
            }

            let token = state.next_token.take();
            match (state.fetch)(token).await {
                Ok(page) => {
                    state.pages += 1;
                    state.next_token = page.next_page_token.filter(|token| !token.is_empty());
                    state.exhausted = state.next_token.is_none();
                    state.buffer.extend(page.records);
                }
                Err(err) => {
                    // Yield the error once, then end on the next poll.
                    state.exhausted = true;
                    state.buffer.clear();
                    return Some((Err(err), state));
                }
            }
        }
    }))
}
