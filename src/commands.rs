//! Operator commands (`/wwc ...`).
//!
//! Handles command parsing and execution against a [`Session`]. Replies are
//! plain lines for the host to print.

use tracing::{debug, info};

use crate::common::error::{CommandError, CommandResult};
use crate::common::resources::{SoundType, DEFAULT_COOLDOWN_SECONDS};
use crate::host::match_territory_name;
use crate::hud::formatter::{format_time, list_line};
use crate::session::Session;

/// Prefixes that mark a line as an operator command.
pub const COMMAND_PREFIXES: [&str; 2] = ["/wwc", "/wynnwarcooldown"];

const HELP_TEXT: [&str; 11] = [
    "Wynn War Cooldown commands:",
    "/wwc list - Show tracked territories",
    "/wwc add <territory> - Start a timer from the territory's live status",
    "/wwc remove <territory|all> - Remove a timer, or all of them",
    "/wwc clear-expired - Forget expired timers",
    "/wwc toggle - Show or hide the timer HUD",
    "/wwc tracking - Enable or disable cooldown tracking",
    "/wwc test-sound [type] - Play the selected or named sound",
    "/wwc here [territory] - Set or clear the current territory",
    "/wwc world <join|leave> - Mark the game session as started or ended",
    "/wwc help - Show this help message",
];

/// A parsed operator command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorCommand {
    List,
    Remove(String),
    RemoveAll,
    Add(String),
    ClearExpired,
    ToggleHud,
    ToggleTracking,
    TestSound(Option<SoundType>),
    Here(Option<String>),
    World { join: bool },
    Help,
}

/// Parse a command line.
///
/// Returns `None` if the line is not a command at all.
pub fn parse_command(line: &str) -> Option<CommandResult<OperatorCommand>> {
    let rest = strip_prefix(line.trim())?;

    let parts: Vec<&str> = rest.trim().splitn(2, ' ').collect();
    let subcommand = parts[0].to_lowercase();
    let args = parts
        .get(1)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    debug!("Processing command: {} with args: {:?}", subcommand, args);

    let command = match subcommand.as_str() {
        "" | "help" => Ok(OperatorCommand::Help),
        "list" => Ok(OperatorCommand::List),
        "remove" => match args {
            Some(name) if name.eq_ignore_ascii_case("all") => Ok(OperatorCommand::RemoveAll),
            Some(name) => Ok(OperatorCommand::Remove(name)),
            None => Err(CommandError::Usage("/wwc remove <territory|all>")),
        },
        "add" => args
            .map(OperatorCommand::Add)
            .ok_or(CommandError::Usage("/wwc add <territory>")),
        "clear-expired" | "clearexpired" => Ok(OperatorCommand::ClearExpired),
        "toggle" => Ok(OperatorCommand::ToggleHud),
        "tracking" => Ok(OperatorCommand::ToggleTracking),
        "test-sound" | "testsound" => match args {
            Some(name) => SoundType::from_name(&name)
                .map(|sound| OperatorCommand::TestSound(Some(sound)))
                .ok_or(CommandError::UnknownSound(name)),
            None => Ok(OperatorCommand::TestSound(None)),
        },
        "here" => Ok(OperatorCommand::Here(args)),
        "world" => match args.as_deref().map(str::to_lowercase).as_deref() {
            Some("join") => Ok(OperatorCommand::World { join: true }),
            Some("leave") => Ok(OperatorCommand::World { join: false }),
            _ => Err(CommandError::Usage("/wwc world <join|leave>")),
        },
        other => Err(CommandError::UnknownSubcommand(other.to_string())),
    };
    Some(command)
}

fn strip_prefix(line: &str) -> Option<&str> {
    COMMAND_PREFIXES.iter().find_map(|prefix| {
        let head = line.get(..prefix.len())?;
        let rest = &line[prefix.len()..];
        let boundary = rest.is_empty() || rest.starts_with(char::is_whitespace);
        (head.eq_ignore_ascii_case(prefix) && boundary).then_some(rest)
    })
}

/// Execute a command and return the reply lines.
pub fn execute(session: &mut Session, command: OperatorCommand) -> CommandResult<Vec<String>> {
    info!("Operator command: {:?}", command);

    match command {
        OperatorCommand::List => Ok(handle_list(session)),
        OperatorCommand::Remove(name) => {
            if session.engine_mut().remove_cooldown(&name) {
                Ok(vec![format!("Removed cooldown for: {}", name)])
            } else {
                Err(CommandError::NoCooldown(name))
            }
        }
        OperatorCommand::RemoveAll => {
            session.engine_mut().clear_all_timers();
            Ok(vec!["Removed all cooldowns".to_string()])
        }
        OperatorCommand::Add(name) => handle_add(session, name),
        OperatorCommand::ClearExpired => {
            session.engine_mut().clear_expired_timers();
            Ok(vec!["Cleared expired timers".to_string()])
        }
        OperatorCommand::ToggleHud => {
            session.update_config(|config| config.show_timer_hud = !config.show_timer_hud);
            let state = if session.config().show_timer_hud { "shown" } else { "hidden" };
            Ok(vec![format!("Timer HUD {}", state)])
        }
        OperatorCommand::ToggleTracking => {
            session.update_config(|config| config.is_mod_enabled = !config.is_mod_enabled);
            let state = if session.config().is_mod_enabled {
                "enabled"
            } else {
                "disabled"
            };
            Ok(vec![format!("Cooldown tracking {}", state)])
        }
        OperatorCommand::TestSound(sound) => {
            let sound = sound.unwrap_or(session.config().selected_sound);
            session.notifications_mut().play_sound(sound);
            Ok(vec![format!("Playing sound: {}", sound.name())])
        }
        OperatorCommand::Here(name) => {
            if !session.resolver_mut().set_current_territory(name) {
                return Err(CommandError::PositioningUnsupported);
            }
            Ok(vec![match session.resolver().current_territory_name() {
                Some(current) => format!("Current territory: {}", current),
                None => "Current territory cleared".to_string(),
            }])
        }
        OperatorCommand::World { join } => {
            session.engine_mut().set_session_active(join);
            let reply = if join { "Joined world" } else { "Left world" };
            Ok(vec![reply.to_string()])
        }
        OperatorCommand::Help => {
            let mut lines: Vec<String> = HELP_TEXT.iter().map(|line| line.to_string()).collect();
            let sounds: Vec<&str> = SoundType::ALL.iter().map(|sound| sound.key()).collect();
            lines.push(format!("Sounds: {}", sounds.join(", ")));
            Ok(lines)
        }
    }
}

fn handle_list(session: &mut Session) -> Vec<String> {
    let timers = session.engine_mut().get_visible_timers();
    if timers.is_empty() {
        return vec!["No active cooldowns".to_string()];
    }

    let mut lines = Vec::with_capacity(timers.len() + 2);
    lines.push("=== Territory Cooldowns ===".to_string());
    lines.extend(timers.iter().map(|timer| format!("  {}", list_line(timer))));
    lines.push(format!(
        "{} territor{} tracked",
        timers.len(),
        if timers.len() == 1 { "y" } else { "ies" }
    ));
    lines
}

/// Start a timer from the registry's view of how long the territory has been held.
fn handle_add(session: &mut Session, name: String) -> CommandResult<Vec<String>> {
    let resolver = session.resolver();
    let canonical = match_territory_name(&name, &resolver.all_territory_names())
        .ok_or_else(|| CommandError::TerritoryNotFound(name.clone()))?;
    let status = resolver
        .territory_status(&canonical)
        .ok_or_else(|| CommandError::TerritoryNotFound(canonical.clone()))?;

    if !status.is_on_cooldown {
        return Err(CommandError::NotOnCooldown(canonical));
    }

    let remaining = (DEFAULT_COOLDOWN_SECONDS - status.time_held_millis / 1000).max(0);
    if !session.engine_mut().start_cooldown(remaining, &canonical) {
        return Err(CommandError::NotStarted(canonical));
    }
    Ok(vec![format!(
        "Added cooldown for {}: {}",
        canonical,
        format_time(remaining)
    )])
}
