pub mod config;
pub mod controller;
pub mod filters;
pub mod kv;
pub mod models;
pub mod notify;
pub mod registrations;
pub mod source;
pub mod upcoming;
pub mod view;

use std::{
    io::{self, BufRead, Stdout, Write},
    rc::Rc,
    time::Instant,
};

use anyhow::Context;

use config::ConfigStore;
use controller::{EventListController, MyEventsController, ToggleOutcome};
use kv::SqliteKv;
use models::EventId;
use registrations::RegistrationStore;
use source::HttpEventSource;
use view::TextRenderer;

const HELP: &str = "commands:
  search <text>     filter by title (no text clears the search)
  category <name>   filter by category (`all` shows everything)
  toggle <id>       register for / unregister from an event
  mine              show the events you registered for
  unregister <id>   drop a registration on the my-events page
  home              back to the full catalog
  clear             forget every registration
  endpoint <url>    use another events endpoint from the next start
  help              this text
  quit              leave";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Search(String),
    Category(String),
    Toggle(EventId),
    Unregister(EventId),
    Mine,
    Home,
    Clear,
    Endpoint(String),
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    match verb.to_lowercase().as_str() {
        "search" | "s" => Ok(Command::Search(rest.to_string())),
        "category" | "c" => {
            if rest.is_empty() || rest.eq_ignore_ascii_case(filters::ALL_CATEGORIES) {
                Ok(Command::Category(filters::ALL_CATEGORIES.to_string()))
            } else {
                Ok(Command::Category(rest.to_string()))
            }
        }
        "toggle" | "t" if !rest.is_empty() => Ok(Command::Toggle(EventId::parse(rest))),
        "unregister" | "u" if !rest.is_empty() => Ok(Command::Unregister(EventId::parse(rest))),
        "toggle" | "t" | "unregister" | "u" => Err(format!("`{verb}` needs an event id")),
        "mine" => Ok(Command::Mine),
        "home" => Ok(Command::Home),
        "clear" => Ok(Command::Clear),
        "endpoint" if !rest.is_empty() => Ok(Command::Endpoint(rest.to_string())),
        "endpoint" => Err("`endpoint` needs a url".to_string()),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        "" => Err(String::new()),
        other => Err(format!("unknown command `{other}`, try `help`")),
    }
}

type Store = Rc<SqliteKv>;
type Screen = TextRenderer<Stdout>;

enum Page {
    Home(EventListController<HttpEventSource, Store, Screen>),
    Mine(MyEventsController<HttpEventSource, Store, Screen>),
}

impl Page {
    fn tick(&mut self, now: Instant) {
        match self {
            Page::Home(page) => page.notifications_mut().tick(now),
            Page::Mine(page) => page.notifications_mut().tick(now),
        }
    }
}

fn handle_page_command(command: Command, page: &mut Page) {
    match (command, page) {
        (Command::Clear, Page::Home(home)) => home.on_clear_registrations(),
        (Command::Search(text), Page::Home(home)) => home.on_search_input(&text),
        (Command::Category(category), Page::Home(home)) => home.on_category_select(&category),
        (Command::Toggle(id), Page::Home(home)) => {
            if home.on_toggle_registration(&id) == ToggleOutcome::NotFound {
                println!("no event #{id} in the catalog");
            }
        }
        (Command::Unregister(id), Page::Home(home)) => {
            let resolved = home.find_event(&id).map(|event| event.id.clone());
            if let Some(id) = resolved.filter(|id| home.registrations().is_registered(id)) {
                home.on_toggle_registration(&id);
            } else {
                println!("you are not registered for #{id}");
            }
        }
        (Command::Unregister(id), Page::Mine(mine)) => {
            if mine.on_unregister(&id) == ToggleOutcome::NotFound {
                println!("you are not registered for #{id}");
            }
        }
        (_, Page::Mine(_)) => println!("not available here, type `home` first"),
        (other, Page::Home(_)) => tracing::debug!(?other, "command handled elsewhere"),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("redivent_lib=info,warn"));
    // stderr keeps log lines out of the rendered page
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

pub fn run() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let config_store = ConfigStore::load();
    let config = config_store.read().with_env_overrides();
    let db_path = config.database_path();
    let kv: Store = Rc::new(
        SqliteKv::open(&db_path)
            .with_context(|| format!("failed to open registration store {:?}", db_path))?,
    );
    tracing::info!(endpoint = %config.endpoint, db = ?db_path, "starting");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let open_home = |kv: &Store| {
        EventListController::new(
            HttpEventSource::new(config.endpoint.clone()),
            RegistrationStore::new(Rc::clone(kv)),
            TextRenderer::new(io::stdout()),
        )
    };
    let open_mine = |kv: &Store| {
        MyEventsController::new(
            HttpEventSource::new(config.endpoint.clone()),
            RegistrationStore::new(Rc::clone(kv)),
            TextRenderer::new(io::stdout()),
        )
    };

    let mut home = open_home(&kv);
    runtime.block_on(home.init());
    let mut page = Page::Home(home);

    println!("type `help` for commands");
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush().context("failed to flush stdout")?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("failed to read command")?;
        page.tick(Instant::now());

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                if !message.is_empty() {
                    println!("{message}");
                }
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => println!("{HELP}"),
            Command::Endpoint(url) => {
                match config_store.update(|config| config.endpoint = url.clone()) {
                    Ok(_) => println!("endpoint saved, restart to use {url}"),
                    Err(err) => tracing::error!("failed to save endpoint: {err}"),
                }
            }
            Command::Home => {
                let mut home = open_home(&kv);
                runtime.block_on(home.init());
                page = Page::Home(home);
            }
            Command::Mine => {
                let mut mine = open_mine(&kv);
                runtime.block_on(mine.init());
                page = Page::Mine(mine);
            }
            Command::Clear if matches!(page, Page::Mine(_)) => {
                RegistrationStore::new(Rc::clone(&kv)).clear_all();
                let mut mine = open_mine(&kv);
                runtime.block_on(mine.init());
                page = Page::Mine(mine);
            }
            other => handle_page_command(other, &mut page),
        }
    }

    Ok(())
}
