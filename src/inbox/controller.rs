use std::rc::Rc;

use futures::{
    FutureExt as _, StreamExt as _, future::LocalBoxFuture, stream::FuturesUnordered,
};
use log::{debug, error, info, warn};

use crate::{
    api::{Auth, Transport, fetch, send_message},
    error::ApiError,
    inbox::{
        BatchAction, DetailPatch, DetailViewController, FetchCoordinator, FetchState,
        FetchTicket, FilterState, Generation, MutationRequest, Notification, PaginationState,
        ReadToggle, SelectionSet, Settle, page_query,
    },
    model::{FetchResult, Message, MessageId, NewMessage, PageQuery, PageSize, last_page_index},
};

/// What applying one completed network operation did to the controller.
#[derive(Debug)]
pub enum Event {
    Loaded {
        generation: Generation,
        rows: usize,
        total_items: u64,
    },
    /// A superseded fetch completed and was ignored.
    Discarded { generation: Generation },
    FetchFailed {
        generation: Generation,
        error: ApiError,
    },
    Mutated { action: BatchAction, affected: u64 },
    MutationFailed { action: BatchAction, error: ApiError },
    /// `id` is `None` when the server did not name the created message.
    Sent { id: Option<MessageId> },
    SendFailed { error: ApiError },
}

impl Event {
    /// The session is gone; the embedding layer has to re-authenticate.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::FetchFailed {
                error: ApiError::Auth,
                ..
            } | Self::MutationFailed {
                error: ApiError::Auth,
                ..
            } | Self::SendFailed {
                error: ApiError::Auth
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Selection,
    Detail,
}

enum Completion {
    Fetched {
        ticket: FetchTicket,
        result: Result<FetchResult, ApiError>,
    },
    Mutated {
        request: MutationRequest,
        origin: Origin,
        patch: Option<DetailPatch>,
        result: Result<u64, ApiError>,
    },
    Sent {
        result: Result<Option<MessageId>, ApiError>,
    },
}

/// Keeps a page of the remote message collection in sync with the server.
///
/// All state lives here and changes only through the methods below. Methods
/// that trigger network calls return immediately; the calls complete through
/// [`next_event`](Self::next_event), which applies one completion at a time.
/// Fetch results are applied only for the most recently issued fetch.
/// Mutations are never applied locally: a successful one triggers a refetch
/// of the current page.
pub struct InboxController<T, A> {
    transport: Rc<T>,
    auth: A,
    pagination: PaginationState,
    filter: FilterState,
    coordinator: FetchCoordinator,
    rows: Vec<Message>,
    total_items: u64,
    selection: SelectionSet,
    detail: DetailViewController,
    notification: Option<Notification>,
    in_flight: FuturesUnordered<LocalBoxFuture<'static, Completion>>,
}

impl<T: Transport + 'static, A: Auth> InboxController<T, A> {
    pub fn new(transport: Rc<T>, auth: A, page_size: PageSize) -> Self {
        Self {
            transport,
            auth,
            pagination: PaginationState::new(page_size),
            filter: FilterState::default(),
            coordinator: FetchCoordinator::default(),
            rows: Vec::new(),
            total_items: 0,
            selection: SelectionSet::default(),
            detail: DetailViewController::default(),
            notification: None,
            in_flight: FuturesUnordered::new(),
        }
    }

    pub fn rows(&self) -> &[Message] {
        &self.rows
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    pub fn page_query(&self) -> PageQuery {
        page_query(&self.pagination, &self.filter)
    }

    pub fn page_count(&self) -> u64 {
        self.pagination.page_count(self.total_items)
    }

    pub fn fetch_state(&self) -> FetchState {
        self.coordinator.state()
    }

    pub fn is_loading(&self) -> bool {
        self.coordinator.is_loading()
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn read_toggle(&self) -> Option<ReadToggle> {
        self.selection.read_toggle(&self.rows)
    }

    pub fn detail(&self) -> Option<&Message> {
        self.detail.active()
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    /// Whether any network operation is still outstanding.
    pub fn has_pending(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Refetches the current page.
    pub fn refresh(&mut self) -> Generation {
        self.request()
    }

    pub fn set_page(&mut self, page_index: u32) -> Generation {
        self.pagination.set_page(page_index);
        self.request()
    }

    pub fn set_page_size(&mut self, page_size: PageSize) -> Generation {
        self.pagination.set_page_size(page_size, self.total_items);
        self.request()
    }

    /// Switching between the archived and the regular view starts over on
    /// the first page.
    pub fn set_archived_filter(&mut self, archived: bool) -> Generation {
        if self.filter.set_archived(archived) {
            self.pagination.set_page(0);
        }
        self.request()
    }

    /// Jumps to `page_index` of the archived or the regular view with a
    /// single fetch.
    pub fn navigate(&mut self, archived: bool, page_index: u32) -> Generation {
        self.filter.set_archived(archived);
        self.pagination.set_page(page_index);
        self.request()
    }

    /// Returns whether `id` is selected afterwards. Ids that are not on the
    /// current page cannot be selected.
    pub fn toggle_selection(&mut self, id: MessageId) -> bool {
        if !self.rows.iter().any(|row| row.id() == id) {
            warn!("message {id} is not on the current page");
            return false;
        }
        self.selection.toggle(id)
    }

    pub fn select_all(&mut self) {
        self.selection.select_all(self.rows.iter().map(Message::id));
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Returns whether a request was issued.
    pub fn set_read_state(&mut self, ids: Vec<MessageId>, is_read: bool) -> bool {
        self.dispatch(BatchAction::SetRead(is_read), ids, Origin::Selection, None)
    }

    pub fn set_archived_state(&mut self, ids: Vec<MessageId>, is_archived: bool) -> bool {
        self.dispatch(
            BatchAction::SetArchived(is_archived),
            ids,
            Origin::Selection,
            None,
        )
    }

    pub fn delete_messages(&mut self, ids: Vec<MessageId>) -> bool {
        self.dispatch(BatchAction::Delete, ids, Origin::Selection, None)
    }

    pub fn set_read_selected(&mut self, is_read: bool) -> bool {
        self.set_read_state(self.selection.ids(), is_read)
    }

    /// Marks the selection unread if all of it is read, read otherwise.
    pub fn toggle_read_selected(&mut self) -> bool {
        match self.read_toggle() {
            Some(toggle) => self.set_read_selected(toggle.target()),
            None => false,
        }
    }

    pub fn set_archived_selected(&mut self, is_archived: bool) -> bool {
        self.set_archived_state(self.selection.ids(), is_archived)
    }

    pub fn delete_selected(&mut self) -> bool {
        self.delete_messages(self.selection.ids())
    }

    /// Sends a new message. The current page is refetched once the server
    /// accepted it.
    pub fn send_message(&mut self, message: NewMessage) {
        let token = self.auth.current_token();
        let transport = Rc::clone(&self.transport);
        self.in_flight.push(
            async move {
                let result = match &token {
                    Some(token) => send_message(&*transport, token, &message).await,
                    None => Err(ApiError::Auth),
                };
                Completion::Sent { result }
            }
            .boxed_local(),
        );
    }

    /// Opens a message of the current page. An unread message is marked read
    /// on the server, once per opening.
    pub fn open_detail(&mut self, id: MessageId) -> bool {
        let Some(message) = self.rows.iter().find(|row| row.id() == id).cloned() else {
            warn!("cannot open message {id}, it is not on the current page");
            return false;
        };
        if let Some(patch) = self.detail.open(message) {
            self.dispatch(BatchAction::SetRead(true), vec![id], Origin::Detail, Some(patch));
        }
        true
    }

    pub fn close_detail(&mut self) {
        self.detail.close();
    }

    pub fn toggle_detail_read(&mut self) -> bool {
        let Some(message) = self.detail.active() else {
            return false;
        };
        let action = BatchAction::SetRead(!message.is_read());
        self.dispatch_detail(action)
    }

    pub fn set_detail_archived(&mut self, is_archived: bool) -> bool {
        self.dispatch_detail(BatchAction::SetArchived(is_archived))
    }

    /// Waits for the next network operation to complete and applies it.
    /// `None` once nothing is outstanding.
    pub async fn next_event(&mut self) -> Option<Event> {
        let completion = self.in_flight.next().await?;
        Some(self.apply(completion))
    }

    /// Applies completions until nothing is outstanding, including the
    /// refetches they trigger.
    pub async fn settle(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        while let Some(event) = self.next_event().await {
            events.push(event);
        }
        events
    }

    fn request(&mut self) -> Generation {
        let ticket = self.coordinator.begin(self.page_query());
        if self
            .notification
            .as_ref()
            .is_some_and(Notification::is_error)
        {
            self.notification = None;
        }

        let token = self.auth.current_token();
        let transport = Rc::clone(&self.transport);
        self.in_flight.push(
            async move {
                let result = match token {
                    Some(token) => fetch(&*transport, &token, ticket.query()).await,
                    None => Err(ApiError::Auth),
                };
                Completion::Fetched { ticket, result }
            }
            .boxed_local(),
        );

        ticket.generation()
    }

    fn dispatch_detail(&mut self, action: BatchAction) -> bool {
        let Some(id) = self.detail.active_id() else {
            return false;
        };
        let Some(patch) = self.detail.patch(action) else {
            debug!("message {id} is already in the requested state");
            return false;
        };
        self.dispatch(action, vec![id], Origin::Detail, Some(patch))
    }

    fn dispatch(
        &mut self,
        action: BatchAction,
        ids: Vec<MessageId>,
        origin: Origin,
        patch: Option<DetailPatch>,
    ) -> bool {
        let Some(request) = MutationRequest::prepare(action, ids) else {
            return false;
        };
        debug!("{action:?} for {:?}", request.ids());

        let token = self.auth.current_token();
        let transport = Rc::clone(&self.transport);
        self.in_flight.push(
            async move {
                let result = match &token {
                    Some(token) => request.send(&*transport, token).await,
                    None => Err(ApiError::Auth),
                };
                Completion::Mutated {
                    request,
                    origin,
                    patch,
                    result,
                }
            }
            .boxed_local(),
        );

        true
    }

    fn apply(&mut self, completion: Completion) -> Event {
        match completion {
            Completion::Fetched { ticket, result } => self.apply_fetch(&ticket, result),
            Completion::Mutated {
                request,
                origin,
                patch,
                result,
            } => self.apply_mutation(&request, origin, patch, result),
            Completion::Sent { result } => self.apply_send(result),
        }
    }

    fn apply_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: Result<FetchResult, ApiError>,
    ) -> Event {
        let generation = ticket.generation();
        if self.coordinator.settle(ticket, result.is_ok()) == Settle::Stale {
            return Event::Discarded { generation };
        }

        match result {
            Ok(page) => {
                let degraded = page.is_degraded();
                let live_ids = page.ids();
                let (rows, total_items) = page.into_parts();
                self.rows = rows;
                self.total_items = total_items;
                self.selection.reconcile(&live_ids);
                self.detail.sync_from(&self.rows);

                let event = Event::Loaded {
                    generation,
                    rows: self.rows.len(),
                    total_items,
                };
                if !degraded && self.rows.is_empty() && self.pagination.is_past_end(total_items)
                {
                    let last = last_page_index(total_items, self.pagination.page_size());
                    info!(
                        "page {} no longer exists, moving to page {}",
                        u64::from(self.pagination.page_index()) + 1,
                        u64::from(last) + 1
                    );
                    self.set_page(last);
                }
                event
            }
            Err(error) => {
                warn!("loading {} failed: {error}", ticket.query().to_path());
                self.notification = Some(Notification::from(&error));
                Event::FetchFailed { generation, error }
            }
        }
    }

    fn apply_send(&mut self, result: Result<Option<MessageId>, ApiError>) -> Event {
        match result {
            Ok(id) => {
                info!("message sent");
                self.notification = Some(Notification::success("Message sent"));
                self.request();
                Event::Sent { id }
            }
            Err(error) => {
                error!("sending message failed: {error}");
                self.notification = Some(Notification::from(&error));
                Event::SendFailed { error }
            }
        }
    }

    fn apply_mutation(
        &mut self,
        request: &MutationRequest,
        origin: Origin,
        patch: Option<DetailPatch>,
        result: Result<u64, ApiError>,
    ) -> Event {
        let action = request.action();
        match result {
            Ok(affected) => {
                let text = action.success_text(affected);
                info!("{text}");
                self.notification = Some(Notification::success(text));
                if action.removes_from_view() {
                    match origin {
                        Origin::Selection => self.selection.clear(),
                        Origin::Detail => self.selection.remove_all(request.ids()),
                    }
                }
                self.request();
                Event::Mutated { action, affected }
            }
            Err(error) => {
                error!("{action:?} for {:?} failed: {error}", request.ids());
                if let Some(patch) = patch {
                    self.detail.revert(patch);
                }
                self.notification = Some(Notification::from(&error));
                Event::MutationFailed { action, error }
            }
        }
    }
}
