use std::fmt::{Display, Formatter, Result};

use log::{debug, trace};

use crate::model::PageQuery;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Generation(u64);

impl Display for Generation {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Loaded,
    /// Last fetch failed; the next request leaves this state again.
    Error,
}

/// Identifies one issued fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: Generation,
    query: PageQuery,
}

impl FetchTicket {
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn query(&self) -> &PageQuery {
        &self.query
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settle {
    /// The ticket belongs to the latest request; its result must be applied.
    Current,
    /// A newer request was issued; the result must be ignored.
    Stale,
}

/// Latest-request-wins bookkeeping for page fetches.
///
/// Every [`begin`](Self::begin) supersedes all earlier tickets. Settling a
/// superseded ticket changes nothing, so `Loading` keeps reflecting the
/// newest request until that one settles.
#[derive(Debug, Default)]
pub struct FetchCoordinator {
    current: Generation,
    state: FetchState,
}

impl FetchCoordinator {
    pub fn begin(&mut self, query: PageQuery) -> FetchTicket {
        self.current = Generation(self.current.0 + 1);
        self.state = FetchState::Loading;
        debug!("fetch generation {} for {query:?}", self.current);

        FetchTicket {
            generation: self.current,
            query,
        }
    }

    pub fn settle(&mut self, ticket: &FetchTicket, succeeded: bool) -> Settle {
        if ticket.generation != self.current {
            trace!(
                "discarding response of generation {}, current is {}",
                ticket.generation, self.current
            );
            return Settle::Stale;
        }

        self.state = if succeeded {
            FetchState::Loaded
        } else {
            FetchState::Error
        };
        Settle::Current
    }

    pub fn state(&self) -> FetchState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == FetchState::Loading
    }

    pub fn generation(&self) -> Generation {
        self.current
    }
}
