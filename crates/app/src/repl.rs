//! Line-oriented chat, training and staff loops

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

use concierge_agent::{
    AgentError, Concierge, ConversationSession, SessionEvent, SessionState, SubmitOutcome,
};
use concierge_core::{Language, Role};

use crate::render;

const UNAVAILABLE_NOTICE: &str =
    "The concierge is unavailable right now. Please ask a member of staff for help.";
const RATING_PROMPT: &str = "Enjoying the chat? Rate it with /rate 1-5.";

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Command {
    Say(String),
    Mute,
    Unmute,
    Lang(Language),
    Rate(u8),
    Reset,
    Help,
    Quit,
    Invalid(String),
    Empty,
}

pub(crate) fn parse_line(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Say(line.to_string());
    };

    let mut parts = rest.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).unwrap_or_default();
    match name {
        "mute" => Command::Mute,
        "unmute" => Command::Unmute,
        "reset" => Command::Reset,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "lang" => match Language::from_str_loose(arg) {
            Some(lang) => Command::Lang(lang),
            None => Command::Invalid(format!("unknown language '{}'", arg)),
        },
        "rate" => match arg.parse::<u8>() {
            Ok(n) if (1..=5).contains(&n) => Command::Rate(n),
            _ => Command::Invalid("usage: /rate 1-5".to_string()),
        },
        other => Command::Invalid(format!("unknown command '/{}'", other)),
    }
}

const HELP: &str = "Commands: /mute /unmute /lang <tag> /rate <1-5> /reset /help /quit";

pub(crate) async fn run_chat(concierge: &Concierge) -> anyhow::Result<()> {
    let session = concierge.session().clone();
    let printer = tokio::spawn(print_events(session.clone(), concierge.state().clone()));
    let _monitor = concierge.start_background();

    if let Some(theme) = concierge.talk_theme().await {
        println!("== Tonight's talk theme: {} ==", theme);
    }
    if let Some(welcome) = session.messages().first() {
        println!("{}", render::message(welcome, concierge.state()));
    }
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Command::Empty => {}
            Command::Say(text) => {
                if let SubmitOutcome::Ignored(reason) = session.submit(&text).await {
                    tracing::debug!(?reason, "Submission ignored");
                }
            }
            Command::Mute => {
                session.set_muted(true);
                println!("(voice muted)");
            }
            Command::Unmute => {
                session.set_muted(false);
                println!("(voice on)");
            }
            Command::Lang(lang) => {
                session.set_language(lang);
                println!("(language: {})", lang.name());
            }
            Command::Rate(n) => match session.submit_rating(n).await {
                Ok(()) => println!("Thanks for the feedback!"),
                Err(AgentError::AlreadyRated) => println!("You already rated this chat."),
                Err(e) => println!("{}", e),
            },
            Command::Reset => session.reset(),
            Command::Help => println!("{}", HELP),
            Command::Quit => break,
            Command::Invalid(reason) => println!("{}", reason),
        }
    }

    printer.abort();
    tracing::info!(session_id = %concierge.session_id(), "Chat ended");
    Ok(())
}

/// Renders assistant messages and status changes as they happen
async fn print_events(session: ConversationSession, state: std::sync::Arc<SessionState>) {
    let mut events = session.subscribe();
    let mut prompted = false;
    loop {
        match events.recv().await {
            Ok(SessionEvent::MessageAppended(message)) if message.role == Role::Assistant => {
                println!("{}", render::message(&message, &state));
                if !prompted && session.rating_prompt_available() {
                    prompted = true;
                    println!("{}", RATING_PROMPT);
                }
            }
            Ok(SessionEvent::DegradedChanged(true)) if session.should_show_unavailable() => {
                println!("{}", UNAVAILABLE_NOTICE);
            }
            Ok(SessionEvent::Reset) => {
                if let Some(welcome) = session.messages().first() {
                    println!("{}", render::message(welcome, &state));
                }
            }
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Event printer lagged");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

pub(crate) async fn run_training(concierge: &Concierge) -> anyhow::Result<()> {
    let training = concierge.training();
    println!("Roleplay practice: you are the staff, the concierge plays a guest.");
    if let Some(welcome) = training.messages().first() {
        println!("{}", render::message(welcome, concierge.state()));
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Command::Empty => {}
            Command::Quit => break,
            Command::Reset => {
                training.reset();
                if let Some(welcome) = training.messages().first() {
                    println!("{}", render::message(welcome, concierge.state()));
                }
            }
            Command::Say(text) => {
                let outcome = training.submit(&text).await;
                if let Some(message) = outcome.message() {
                    println!("{}", render::message(message, concierge.state()));
                }
                println!("Turn {}/{}", training.turn_count(), training.turn_limit());
                if training.is_complete() && matches!(outcome, SubmitOutcome::Replied(_)) {
                    println!("Practice complete! Keep going or /reset to start over.");
                }
            }
            _ => println!("Training commands: /reset /quit"),
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum StaffCommand {
    List,
    Toggle(String),
    Refresh,
    Quit,
    Unknown,
}

pub(crate) fn parse_staff_line(line: &str) -> StaffCommand {
    let line = line.trim();
    let mut parts = line.splitn(2, char::is_whitespace);
    match (parts.next().unwrap_or_default(), parts.next().map(str::trim)) {
        ("list" | "ls" | "", _) => StaffCommand::List,
        ("toggle", Some(name)) if !name.is_empty() => StaffCommand::Toggle(name.to_string()),
        ("refresh", _) => StaffCommand::Refresh,
        ("quit" | "exit" | "logout", _) => StaffCommand::Quit,
        _ => StaffCommand::Unknown,
    }
}

pub(crate) async fn run_staff(concierge: &Concierge, password: Option<&str>) -> anyhow::Result<()> {
    let staff = concierge.staff();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let password = match password.filter(|p| !p.is_empty()) {
        Some(p) => p.to_string(),
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(b"Staff password: ").await?;
            stdout.flush().await?;
            lines.next_line().await?.unwrap_or_default()
        }
    };

    match staff.login(password.trim()).await {
        Ok(count) => println!("Logged in, {} menu items.", count),
        Err(AgentError::Unauthorized) => anyhow::bail!("wrong staff password"),
        Err(e) => return Err(e.into()),
    }
    print!("{}", render::staff_menu(&staff.grouped()));
    println!("Commands: list, toggle <name>, refresh, quit");

    while let Some(line) = lines.next_line().await? {
        match parse_staff_line(&line) {
            StaffCommand::List => print!("{}", render::staff_menu(&staff.grouped())),
            StaffCommand::Toggle(name) => match staff.toggle(&name).await {
                Ok(true) => println!("{} is back on the menu.", name),
                Ok(false) => println!("{} is sold out.", name),
                Err(e) => println!("Toggle failed: {}", e),
            },
            StaffCommand::Refresh => match staff.refresh().await {
                Ok(_) => print!("{}", render::staff_menu(&staff.grouped())),
                Err(e) => println!("Refresh failed: {}", e),
            },
            StaffCommand::Quit => break,
            StaffCommand::Unknown => println!("Commands: list, toggle <name>, refresh, quit"),
        }
    }

    staff.logout();
    Ok(())
}
