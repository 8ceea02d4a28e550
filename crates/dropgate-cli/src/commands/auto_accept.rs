//! Auto-accept command implementation.

use anyhow::Result;
use dropgate_core::config::{AutoAcceptSwitch, Config};

use super::{AutoAcceptArgs, SwitchState};

/// Run the auto-accept command.
pub async fn run(args: AutoAcceptArgs) -> Result<()> {
    let mut config = Config::load()?;
    let switch = AutoAcceptSwitch::from_config(&config);

    let Some(state) = args.state else {
        println!("Auto-accept is {}", on_off(switch.is_enabled()));
        return Ok(());
    };

    match state {
        SwitchState::On => switch.set(true),
        SwitchState::Off => switch.set(false),
        SwitchState::Toggle => {
            switch.toggle();
        }
    }

    switch.persist(&mut config, &Config::config_path())?;
    println!("Auto-accept is now {}", on_off(switch.is_enabled()));
    if switch.is_enabled() {
        println!("  New transfers from nearby devices will be received without asking.");
    }

    Ok(())
}

const fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}
