mod fetch_result;
mod message;
mod new_message;
mod page_query;

pub use fetch_result::FetchResult;
pub use message::Message;
pub use message::MessageBuilder;
pub use message::MessageId;
pub use new_message::NewMessage;
pub use page_query::PageQuery;
pub use page_query::PageSize;
pub use page_query::last_page_index;
pub use page_query::page_count;
