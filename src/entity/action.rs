//! Player actions that can be applied to a pet

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The closed set of things a player can do with a pet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Nap,
    Play,
    Eat,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Nap, Action::Play, Action::Eat];

    /// Activity log line shown after the action is applied
    pub fn activity_message(&self, name: &str) -> String {
        match self {
            Action::Nap => format!("{} took a nap!", name),
            Action::Play => format!("You played with {}!", name),
            Action::Eat => format!("You fed {}!", name),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::Nap => "nap",
            Action::Play => "play",
            Action::Eat => "eat",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown action: {0}")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nap" => Ok(Action::Nap),
            "play" => Ok(Action::Play),
            "eat" => Ok(Action::Eat),
            _ => Err(UnknownAction(s.to_string())),
        }
    }
}
