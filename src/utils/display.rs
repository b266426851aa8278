use crate::models::json_data::ServerStatus;

use std::fmt::Display;

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[38;5;38m";
pub const MAGENTA: &str = "\x1b[35m";
pub const GREY: &str = "\x1b[38;5;238m";
pub const RESET: &str = "\x1b[0m";

/// `(count, "singular", "plural")`
pub struct SingularPlural(pub usize, pub &'static str, pub &'static str);

impl Display for SingularPlural {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", if self.0 == 1 { self.1 } else { self.2 })
    }
}

/// `(count, "singular", "plural")`
pub struct DisplayCountOf(pub usize, pub &'static str, pub &'static str);

impl Display for DisplayCountOf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.0, SingularPlural(self.0, self.1, self.2))
    }
}

/// One or two line summary of a probe
pub struct DisplayStatus<'a>(pub &'a ServerStatus);

impl Display for DisplayStatus<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = self.0;
        if !status.online {
            return write!(f, "{RED}Offline{RESET}");
        }

        write!(
            f,
            "{GREEN}Online{RESET} | {} / {}",
            DisplayCountOf(status.players as usize, "player", "players"),
            status.max
        )?;
        if !status.version.is_empty() {
            write!(f, " | {}", status.version)?;
        }
        if !status.motd.is_empty() {
            write!(f, "\n{}", status.motd)?;
        }
        Ok(())
    }
}

/// Player list view, servers may hide their sample even while players are connected
pub struct DisplayPlayerList<'a>(pub &'a ServerStatus);

impl Display for DisplayPlayerList<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = self.0;
        if !status.online {
            return write!(f, "{RED}Offline{RESET}");
        }
        if status.sample.is_empty() {
            return if status.players > 0 {
                write!(f, "{YELLOW}Player list private or unavailable{RESET}")
            } else {
                write!(f, "{GREY}No players online{RESET}")
            };
        }

        write!(f, "{}", DisplayCountOf(status.players as usize, "player", "players"))?;
        for player in status.sample.iter() {
            write!(f, "\n  {}", player.name)?;
        }
        Ok(())
    }
}

pub struct DisplayPanic<'a>(pub &'a std::panic::PanicHookInfo<'a>);

impl Display for DisplayPanic<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(location) = self.0.location() {
            write!(
                f,
                "PANIC {}:{}:{}: ",
                location.file(),
                location.line(),
                location.column(),
            )?;
        } else {
            write!(f, "PANIC: ")?;
        }
        if let Some(msg) = self.0.payload().downcast_ref::<&str>() {
            write!(f, "{msg}")
        } else if let Some(msg) = self.0.payload().downcast_ref::<String>() {
            write!(f, "{msg}")
        } else {
            write!(f, "no attached message")
        }
    }
}
