#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares the Nuclear Synthesis experience.

use nuclear_synthesis_core::{Command, WELCOME_BANNER};

/// Produces data required to greet the player and seed the first game.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner(&self) -> &'static str {
        WELCOME_BANNER
    }

    /// Command batch that configures the grid and begins the first game.
    #[must_use]
    pub fn initial_commands(&self, grid_size: u32) -> Vec<Command> {
        vec![
            Command::ConfigureGrid { size: grid_size },
            Command::StartGame,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_commands_configure_then_start() {
        let bootstrap = Bootstrap;
        assert_eq!(
            bootstrap.initial_commands(4),
            vec![Command::ConfigureGrid { size: 4 }, Command::StartGame]
        );
        assert!(!bootstrap.welcome_banner().is_empty());
    }
}
