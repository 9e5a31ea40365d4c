use colored::Colorize;
use std::fmt::{Display, Formatter, Result};

/// A concrete betting action applied to a `Node`. `Raise`/`Call`/`Shove`
/// carry the chip amount the acting seat puts in *this* action (not the
/// resulting total bet).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Fold,
    Check,
    Call(i64),
    Raise(i64),
    Shove(i64),
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            Action::Fold => write!(f, "{}", "fold".red()),
            Action::Check => write!(f, "{}", "check".white()),
            Action::Call(n) => write!(f, "{} {}", "call".green(), n),
            Action::Raise(n) => write!(f, "{} {}", "raise".yellow(), n),
            Action::Shove(n) => write!(f, "{} {}", "shove".magenta(), n),
        }
    }
}
