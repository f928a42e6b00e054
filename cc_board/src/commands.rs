use chip_clock::{
    app::AppState,
    players::PlayerId,
    tournament::{Blind, Level, SettingsUpdate},
};
use std::{fmt, path::PathBuf};

/// One tournament setting changed with `set`
#[derive(Debug, Clone, PartialEq)]
pub enum SettingChange {
    Name(String),
    EntryFee(f64),
    StartingChips(u64),
    /// Minutes per level
    LevelDuration(u32),
    CashoutPlaces(u32),
    Ante(bool),
}

impl SettingChange {
    /// Partial update carrying only this change
    pub fn into_update(self) -> SettingsUpdate {
        let mut update = SettingsUpdate::default();
        match self {
            Self::Name(name) => update.name = Some(name),
            Self::EntryFee(fee) => update.entry_fee = Some(fee),
            Self::StartingChips(chips) => update.starting_chips = Some(chips),
            Self::LevelDuration(minutes) => update.level_duration = Some(minutes),
            Self::CashoutPlaces(places) => update.cashout_places = Some(places),
            Self::Ante(on) => update.play_with_ante = Some(on),
        }
        update
    }
}

/// Commands typed at the board prompt
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Start,
    Pause,
    Resume,
    Reset,
    Next,
    Prev,
    Set(SettingChange),
    /// Replace the blinds of an existing level
    Level(Level),
    AddLevel,
    Blinds,
    Settings,
    /// Register a player who bought `entries` entries
    Add { name: String, entries: u32 },
    Rebuy(String),
    Eliminate(String),
    /// Correct a player's live chip count
    Chips { player: String, chips: u64 },
    Remove(String),
    /// Final chip count used when saving
    FinalChips { player: String, chips: u64 },
    Status,
    Players,
    Prizes,
    Summary,
    Save,
    History,
    /// Overall statistics, or one player's
    Stats(Option<String>),
    Export(PathBuf),
    Import { path: PathBuf, replace: bool },
    Delete(String),
    Sound,
    Help,
    Quit,
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Command needs more arguments.
    MissingArgument { usage: &'static str },
    /// A count or chip amount was not a number.
    InvalidNumber(String),
    /// A value outside what the command accepts.
    InvalidValue {
        value: String,
        expected: &'static str,
    },
    /// `set` with a field the board does not know.
    UnknownSetting(String),
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingArgument { usage } => write!(f, "Missing argument. Usage: {}", usage),
            Self::InvalidNumber(value) => {
                write!(f, "Invalid number '{}'. Must be a whole number", value)
            }
            Self::InvalidValue { value, expected } => {
                write!(f, "Invalid value '{}'. Expected {}", value, expected)
            }
            Self::UnknownSetting(field) => write!(
                f,
                "Unknown setting '{}'. Use name, fee, chips, duration, places or ante",
                field
            ),
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{}'. Type 'help' to see available commands",
                cmd
            ),
        }
    }
}

impl std::error::Error for ParseError {}

pub const HELP: &str = "\
Clock:    start | pause | resume | next | prev | reset
Setup:    set name|fee|chips|duration|places|ante VALUE | settings
          blinds | level ID SB BB [ANTE] | addlevel
Players:  add NAME [ENTRIES] | rebuy P | elim P | chips P N | remove P | final P N
Board:    status | players | prizes | summary
History:  save | history | stats [P] | export FILE | import FILE [replace] | delete T
Other:    sound | help | quit

P is a player's number from 'players', their id, or their name.
T is a tournament's number from 'history' or its id.
";

/// Parse a command string into a Command.
///
/// # Examples
///
/// ```
/// use cc_board::commands::{Command, parse_command};
///
/// assert_eq!(parse_command("start"), Ok(Command::Start));
/// assert_eq!(
///     parse_command("add Mary Ann 2"),
///     Ok(Command::Add { name: "Mary Ann".to_string(), entries: 2 })
/// );
/// assert!(parse_command("chips 3 lots").is_err());
/// ```
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let trimmed = input.trim();
    let parts: Vec<&str> = trimmed.split_ascii_whitespace().collect();
    let Some((&name, args)) = parts.split_first() else {
        return Err(ParseError::UnrecognizedCommand(String::new()));
    };

    match (name.to_ascii_lowercase().as_str(), args) {
        ("start", []) => Ok(Command::Start),
        ("pause", []) => Ok(Command::Pause),
        ("resume", []) => Ok(Command::Resume),
        ("reset", []) => Ok(Command::Reset),
        ("next", []) => Ok(Command::Next),
        ("prev", []) => Ok(Command::Prev),
        ("addlevel", []) => Ok(Command::AddLevel),
        ("blinds", []) => Ok(Command::Blinds),
        ("settings", []) => Ok(Command::Settings),
        ("status", []) => Ok(Command::Status),
        ("players", []) => Ok(Command::Players),
        ("prizes", []) => Ok(Command::Prizes),
        ("summary", []) => Ok(Command::Summary),
        ("save", []) => Ok(Command::Save),
        ("history", []) => Ok(Command::History),
        ("sound", []) => Ok(Command::Sound),
        ("help", []) => Ok(Command::Help),
        ("quit" | "exit", []) => Ok(Command::Quit),

        ("set", args) => parse_set(args).map(Command::Set),
        ("level", args) => parse_level(args).map(Command::Level),
        ("add", args) => parse_add(args),
        ("rebuy", args) => one_arg(args, "rebuy PLAYER").map(Command::Rebuy),
        ("elim", args) => one_arg(args, "elim PLAYER").map(Command::Eliminate),
        ("remove", args) => one_arg(args, "remove PLAYER").map(Command::Remove),
        ("delete", args) => one_arg(args, "delete TOURNAMENT").map(Command::Delete),
        ("chips", args) => {
            let (player, chips) = player_and_amount(args, "chips PLAYER N")?;
            Ok(Command::Chips { player, chips })
        }
        ("final", args) => {
            let (player, chips) = player_and_amount(args, "final PLAYER N")?;
            Ok(Command::FinalChips { player, chips })
        }
        ("stats", []) => Ok(Command::Stats(None)),
        ("stats", args) => Ok(Command::Stats(Some(args.join(" ")))),
        ("export", [path]) => Ok(Command::Export(PathBuf::from(path))),
        ("export", _) => Err(ParseError::MissingArgument {
            usage: "export FILE",
        }),
        ("import", [path]) => Ok(Command::Import {
            path: PathBuf::from(path),
            replace: false,
        }),
        ("import", [path, "replace"]) => Ok(Command::Import {
            path: PathBuf::from(path),
            replace: true,
        }),
        ("import", _) => Err(ParseError::MissingArgument {
            usage: "import FILE [replace]",
        }),
        _ => Err(ParseError::UnrecognizedCommand(trimmed.to_string())),
    }
}

fn number<T: std::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value
        .parse()
        .map_err(|_| ParseError::InvalidNumber(value.to_string()))
}

/// Parse "set FIELD VALUE"
fn parse_set(args: &[&str]) -> Result<SettingChange, ParseError> {
    const USAGE: &str = "set name|fee|chips|duration|places|ante VALUE";

    let Some((field, values)) = args.split_first() else {
        return Err(ParseError::MissingArgument { usage: USAGE });
    };
    let field = field.to_ascii_lowercase();

    match (field.as_str(), values) {
        (_, []) => Err(ParseError::MissingArgument { usage: USAGE }),
        ("name", words) => Ok(SettingChange::Name(words.join(" "))),
        ("fee", [value]) => {
            let fee: f64 = value
                .parse()
                .map_err(|_| ParseError::InvalidNumber(value.to_string()))?;
            if !fee.is_finite() {
                return Err(ParseError::InvalidNumber(value.to_string()));
            }
            Ok(SettingChange::EntryFee(fee))
        }
        ("chips", [value]) => number(value).map(SettingChange::StartingChips),
        ("duration", [value]) => number(value).map(SettingChange::LevelDuration),
        ("places", [value]) => number(value).map(SettingChange::CashoutPlaces),
        ("ante", [value]) => match value.to_ascii_lowercase().as_str() {
            "on" | "yes" | "true" => Ok(SettingChange::Ante(true)),
            "off" | "no" | "false" => Ok(SettingChange::Ante(false)),
            _ => Err(ParseError::InvalidValue {
                value: value.to_string(),
                expected: "on or off",
            }),
        },
        ("fee" | "chips" | "duration" | "places" | "ante", _) => {
            Err(ParseError::MissingArgument { usage: USAGE })
        }
        _ => Err(ParseError::UnknownSetting(field)),
    }
}

/// Parse "level ID SB BB [ANTE]"
fn parse_level(args: &[&str]) -> Result<Level, ParseError> {
    match args {
        [id, small, big] => Ok(Level::new(
            number(id)?,
            Blind::new(number(small)?, number(big)?),
        )),
        [id, small, big, ante] => Ok(Level::new(
            number(id)?,
            Blind::new(number(small)?, number(big)?).with_ante(number(ante)?),
        )),
        _ => Err(ParseError::MissingArgument {
            usage: "level ID SB BB [ANTE]",
        }),
    }
}

/// Parse "add NAME [ENTRIES]"; a trailing number is the entry count
fn parse_add(args: &[&str]) -> Result<Command, ParseError> {
    let (entries, name_parts) = match args.split_last() {
        Some((last, rest)) if !rest.is_empty() && last.chars().all(|c| c.is_ascii_digit()) => {
            let entries = last
                .parse::<u32>()
                .map_err(|_| ParseError::InvalidNumber(last.to_string()))?;
            (entries, rest)
        }
        _ => (1, args),
    };

    if name_parts.is_empty() {
        return Err(ParseError::MissingArgument {
            usage: "add NAME [ENTRIES]",
        });
    }

    Ok(Command::Add {
        name: name_parts.join(" "),
        entries,
    })
}

fn one_arg(args: &[&str], usage: &'static str) -> Result<String, ParseError> {
    if args.is_empty() {
        return Err(ParseError::MissingArgument { usage });
    }
    Ok(args.join(" "))
}

/// Parse "PLAYER... N"
fn player_and_amount(args: &[&str], usage: &'static str) -> Result<(String, u64), ParseError> {
    match args.split_last() {
        Some((amount, player)) if !player.is_empty() => {
            let chips = amount
                .parse::<u64>()
                .map_err(|_| ParseError::InvalidNumber(amount.to_string()))?;
            Ok((player.join(" "), chips))
        }
        _ => Err(ParseError::MissingArgument { usage }),
    }
}

/// Resolve a player reference typed at the prompt.
///
/// Tries, in order: position in the board listing (1-based), exact id,
/// then a case-insensitive name that matches exactly one player.
pub fn resolve_player(app: &AppState, key: &str) -> Option<PlayerId> {
    let board = app.players.sorted_for_board();

    if let Ok(position) = key.parse::<usize>() {
        if let Some(player) = position.checked_sub(1).and_then(|i| board.get(i)) {
            return Some(player.id.clone());
        }
    }

    if app.players.contains(key) {
        return Some(key.to_string());
    }

    let mut named = board.iter().filter(|p| p.name.eq_ignore_ascii_case(key));
    match (named.next(), named.next()) {
        (Some(player), None) => Some(player.id.clone()),
        _ => None,
    }
}

/// Resolve a saved tournament by its number in the history listing or its id
pub fn resolve_tournament(app: &AppState, key: &str) -> Option<String> {
    if let Ok(position) = key.parse::<usize>() {
        if let Some(record) = position
            .checked_sub(1)
            .and_then(|i| app.history.list().get(i))
        {
            return Some(record.id.clone());
        }
    }
    app.history.get(key).map(|t| t.id.clone())
}
