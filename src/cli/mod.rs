mod render;

use std::{collections::BTreeSet, path::PathBuf, rc::Rc};

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use log::{debug, warn};
use mailview::{
    api::HttpTransport,
    config::{AuthConfig, Config},
    error::ApiError,
    inbox::{Event, InboxController},
    model::{MessageId, NewMessage, PageSize},
};

type Inbox<'a> = InboxController<HttpTransport, &'a AuthConfig>;

#[derive(Parser, Debug)]
#[command(name = "mailview", version, about = "Browse and manage messages on a mail server")]
pub struct Args {
    /// Config file to use instead of $XDG_CONFIG_HOME/mailview/config.toml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Page to work on, starting at 1
    #[arg(
        short,
        long,
        global = true,
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub page: u32,

    /// Messages per page, defaults to the configured page size
    #[arg(long, global = true)]
    pub page_size: Option<u32>,

    /// Work on archived messages
    #[arg(short, long, global = true)]
    pub archived: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the messages of the page (default)
    List,
    /// Show a message of the page, marking it read
    Show { id: u64 },
    /// Mark messages of the page as read
    Read {
        #[arg(required = true)]
        ids: Vec<u64>,
    },
    /// Mark messages of the page as unread
    Unread {
        #[arg(required = true)]
        ids: Vec<u64>,
    },
    /// Archive messages of the page
    Archive {
        #[arg(required = true)]
        ids: Vec<u64>,
    },
    /// Move messages of the page back out of the archive
    Unarchive {
        #[arg(required = true)]
        ids: Vec<u64>,
    },
    /// Delete messages of the page
    Delete {
        #[arg(required = true)]
        ids: Vec<u64>,
    },
    /// Send a message, then list the page again
    Send {
        receiver: String,
        subject: String,
        body: String,
    },
}

pub async fn run(args: Args, config: &Config) -> Result<()> {
    let page_size = match args.page_size {
        Some(size) => PageSize::try_from(size)?,
        None => config.page_size(),
    };
    if !config.page_size_options().contains(&page_size) {
        warn!("page size {page_size} is not one of the configured options");
    }

    let transport = Rc::new(HttpTransport::new(config.base_url(), config.timeout())?);
    let mut inbox: Inbox<'_> = InboxController::new(transport, config.auth(), page_size);

    inbox.navigate(args.archived, args.page - 1);
    settle(&mut inbox).await?;

    match args.command.unwrap_or(Command::List) {
        Command::List => {}
        Command::Show { id } => return show(&mut inbox, MessageId::from(id)).await,
        Command::Read { ids } => {
            select(&mut inbox, &ids)?;
            inbox.set_read_selected(true);
        }
        Command::Unread { ids } => {
            select(&mut inbox, &ids)?;
            inbox.set_read_selected(false);
        }
        Command::Archive { ids } => {
            select(&mut inbox, &ids)?;
            inbox.set_archived_selected(true);
        }
        Command::Unarchive { ids } => {
            select(&mut inbox, &ids)?;
            inbox.set_archived_selected(false);
        }
        Command::Delete { ids } => {
            select(&mut inbox, &ids)?;
            inbox.delete_selected();
        }
        Command::Send {
            receiver,
            subject,
            body,
        } => inbox.send_message(NewMessage::new(receiver, subject, body)),
    }

    settle(&mut inbox).await?;
    if let Some(notification) = inbox.notification() {
        println!("{}\n", notification.text());
    }
    print!("{}", render::page(&inbox));

    Ok(())
}

async fn show(inbox: &mut Inbox<'_>, id: MessageId) -> Result<()> {
    if !inbox.open_detail(id) {
        bail!(
            "message {id} is not on page {}",
            inbox.page_query().page_index() + 1
        );
    }
    if let Some(message) = inbox.detail() {
        print!("{}", render::detail(message));
    }

    settle(inbox).await
}

fn select(inbox: &mut Inbox<'_>, ids: &[u64]) -> Result<()> {
    for id in ids.iter().copied().collect::<BTreeSet<_>>() {
        let id = MessageId::from(id);
        if !inbox.toggle_selection(id) {
            bail!(
                "message {id} is not on page {}",
                inbox.page_query().page_index() + 1
            );
        }
    }

    Ok(())
}

/// Runs all outstanding requests and fails with the last error they reported.
async fn settle(inbox: &mut Inbox<'_>) -> Result<()> {
    let mut failure = None;
    for event in inbox.settle().await {
        debug!("{event:?}");
        match event {
            Event::FetchFailed { error, .. } | Event::MutationFailed { error, .. } => {
                failure = Some(error);
            }
            _ => {}
        }
    }

    match failure {
        None => Ok(()),
        Some(ApiError::Auth) => {
            bail!("not signed in, check the [auth] section of the config")
        }
        Some(error) => bail!("{}", error.notification_text()),
    }
}
