use mailview::{
    api::{Auth, Transport},
    inbox::InboxController,
    model::Message,
};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn page<T: Transport + 'static, A: Auth>(inbox: &InboxController<T, A>) -> String {
    let query = inbox.page_query();
    let mut out = format!(
        "Page {}/{} - {} {}messages\n",
        query.page_index() + 1,
        inbox.page_count(),
        inbox.total_items(),
        if query.archived() { "archived " } else { "" }
    );
    for message in inbox.rows() {
        out.push_str(&row(message));
        out.push('\n');
    }
    out
}

/// One line per message, unread ones marked with `*`.
pub fn row(message: &Message) -> String {
    format!(
        "{} {:>6}  {}  {:<24}  {}",
        if message.is_read() { ' ' } else { '*' },
        message.id(),
        message.created_at().strftime(TIME_FORMAT),
        message.sender(),
        message.subject()
    )
}

pub fn detail(message: &Message) -> String {
    format!(
        "From:    {}\nTo:      {}\nDate:    {}\nSubject: {}\n\n{}\n",
        message.sender(),
        message.receiver(),
        message.created_at().strftime(TIME_FORMAT),
        message.subject(),
        message.body()
    )
}
