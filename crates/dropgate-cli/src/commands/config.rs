//! Config command implementation.

use anyhow::Result;
use dropgate_core::config::Config;

use super::{ConfigAction, ConfigArgs};

/// Run the config command.
pub async fn run(args: ConfigArgs) -> Result<()> {
    let mut config = Config::load()?;

    match args.action {
        ConfigAction::Get { key } => match config.get_value(&key) {
            Some(v) => println!("{}: {}", key, v),
            None => println!("Unknown configuration key: {}", key),
        },

        ConfigAction::Set { key, value } => {
            config.set_value(&key, &value)?;
            config.save()?;
            println!("Set {} = {}", key, value);
        }

        ConfigAction::Show => {
            println!();
            println!("Dropgate Configuration");
            println!("{}", "─".repeat(50));
            println!();
            println!("[general]");
            println!("  device_name = \"{}\"", config.general.device_name);
            println!();
            println!("[consent]");
            println!("  auto_accept = {}", config.consent.auto_accept);
            println!();
            println!("[notifications]");
            println!("  sound = {}", config.notifications.sound);
            println!();
        }

        ConfigAction::List => {
            for key in Config::KEYS {
                println!("{}", key);
            }
        }

        ConfigAction::Path => {
            println!("{}", Config::config_path().display());
        }

        ConfigAction::Reset => {
            Config::default().save()?;
            println!("Configuration reset to defaults.");
        }
    }

    Ok(())
}
