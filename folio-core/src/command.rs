use chrono::{DateTime, FixedOffset, Local};
use std::collections::HashMap;

use crate::profile::Profile;

/// What a command asks the terminal to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Print these lines.
    Text(Vec<String>),
    /// Open this URL outside the terminal.
    Link(String),
    /// Empty the transcript and replay the welcome banner.
    Clear,
}

impl Response {
    pub fn line(s: impl Into<String>) -> Self {
        Response::Text(vec![s.into()])
    }
}

/// Wall-clock source for `date`.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Local time from the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Output format of `date`; stable regardless of locale.
pub const DATE_FORMAT: &str = "%a %b %d %Y %H:%M:%S GMT%z";

/// Inputs a command may read while executing.
pub struct CommandEnv<'a> {
    pub profile: &'a Profile,
    pub clock: &'a dyn Clock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Help,
    About,
    Projects,
    Skills,
    Contact,
    Github,
    Linkedin,
    Cv,
    Clear,
    Whoami,
    Pwd,
    Ls,
    Date,
    Echo,
}

impl Command {
    /// Every command, in `help` order.
    pub const ALL: [Command; 14] = [
        Command::Help,
        Command::About,
        Command::Projects,
        Command::Skills,
        Command::Contact,
        Command::Github,
        Command::Linkedin,
        Command::Cv,
        Command::Clear,
        Command::Whoami,
        Command::Pwd,
        Command::Ls,
        Command::Date,
        Command::Echo,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Command::Help => "help",
            Command::About => "about",
            Command::Projects => "projects",
            Command::Skills => "skills",
            Command::Contact => "contact",
            Command::Github => "github",
            Command::Linkedin => "linkedin",
            Command::Cv => "cv",
            Command::Clear => "clear",
            Command::Whoami => "whoami",
            Command::Pwd => "pwd",
            Command::Ls => "ls",
            Command::Date => "date",
            Command::Echo => "echo",
        }
    }

    /// One-line summary for `help`.
    pub fn description(self) -> &'static str {
        match self {
            Command::Help => "List available commands",
            Command::About => "Learn more about me",
            Command::Projects => "View my featured projects",
            Command::Skills => "See my technical skills",
            Command::Contact => "How to reach me",
            Command::Github => "Visit my GitHub profile",
            Command::Linkedin => "Visit my LinkedIn profile",
            Command::Cv => "Download my CV",
            Command::Clear => "Clear the terminal",
            Command::Whoami => "Display current user",
            Command::Pwd => "Print working directory",
            Command::Ls => "List directory contents",
            Command::Date => "Display current date and time",
            Command::Echo => "Display a message",
        }
    }

    /// Produce the response for `argument` (already whitespace-normalised).
    pub fn execute(self, argument: &str, env: &CommandEnv<'_>) -> Response {
        let p = env.profile;
        match self {
            Command::Help => Response::Text(help_lines()),
            Command::About => Response::Text(p.about.clone()),
            Command::Projects => Response::Text(p.projects.clone()),
            Command::Skills => Response::Text(p.skills.clone()),
            Command::Contact => Response::Text(p.contact.clone()),
            Command::Github => Response::Link(p.links.github.clone()),
            Command::Linkedin => Response::Link(p.links.linkedin.clone()),
            Command::Cv => Response::Link(p.links.cv.clone()),
            Command::Clear => Response::Clear,
            Command::Whoami => Response::line(p.username.clone()),
            Command::Pwd => Response::line(p.working_directory()),
            Command::Ls => Response::Text(p.listing.clone()),
            Command::Date => Response::line(env.clock.now().format(DATE_FORMAT).to_string()),
            Command::Echo => Response::line(argument),
        }
    }
}

fn help_lines() -> Vec<String> {
    let mut out = Vec::with_capacity(Command::ALL.len());
    out.push("Available commands:".to_string());
    out.extend(
        Command::ALL
            .iter()
            .filter(|c| **c != Command::Help)
            .map(|c| format!("{:<10}- {}", c.name(), c.description())),
    );
    out
}

/// A submitted line split into command name and argument string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub name: String,
    /// Remaining words joined by single spaces; empty when there are none.
    pub argument: String,
}

impl CommandLine {
    /// The normalised line as echoed in the transcript.
    pub fn echo(&self) -> String {
        if self.argument.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.name, self.argument)
        }
    }
}

/// Split `input` on whitespace runs. `None` for blank input.
pub fn parse_line(input: &str) -> Option<CommandLine> {
    let mut words = input.split_whitespace();
    let name = words.next()?.to_string();
    let argument = words.collect::<Vec<_>>().join(" ");
    Some(CommandLine { name, argument })
}

/// Immutable name-to-command table, fixed at construction.
#[derive(Debug, Clone)]
pub struct Registry {
    by_name: HashMap<&'static str, Command>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            by_name: Command::ALL.iter().map(|c| (c.name(), *c)).collect(),
        }
    }

    /// Case-sensitive exact lookup.
    pub fn lookup(&self, name: &str) -> Option<Command> {
        self.by_name.get(name).copied()
    }

    /// Names in `help` order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        Command::ALL
            .iter()
            .filter(|c| self.by_name.contains_key(c.name()))
            .map(|c| c.name())
    }

    /// Names starting with `prefix`, compared case-insensitively.
    pub fn completions(&self, prefix: &str) -> Vec<&'static str> {
        let prefix = prefix.to_lowercase();
        self.names().filter(|n| n.starts_with(&prefix)).collect()
    }
}
