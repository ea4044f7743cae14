mod assets;
mod panels;

use std::{error::Error, time::Duration};

use log::LevelFilter;
use rusty_ui::{ChannelLogger, Descriptors, OpenParams, SIXTY_FPS, Time, UiManager};

use assets::DemoAssets;
use panels::{MainMenu, Settings, StatusBar};

const FRAMES: u64 = 120;

fn main() -> Result<(), Box<dyn Error>> {
    let (logger, log_recv) = ChannelLogger::with_receiver();
    logger.with_level(LevelFilter::Debug).install()?;

    let descriptors = Descriptors::new();
    descriptors
        .register::<MainMenu>()
        .register::<Settings>()
        .register::<StatusBar>()
        .register::<panels::Toast>();

    let mut ui = UiManager::new(descriptors, DemoAssets::new());
    ui.open::<MainMenu>(OpenParams::new())?;
    ui.open::<StatusBar>(OpenParams::new())?;

    let mut time = Time::default();
    while time.frame < FRAMES {
        time = time.advance(Duration::from_nanos(SIXTY_FPS));

        match time.frame {
            30 => {
                ui.open::<Settings>(OpenParams::new().with(7u8))?;
            }
            60 => {
                ui.back("menu/settings");
            }
            90 => {
                ui.navigator().open::<Settings>(OpenParams::new().with(3u8));
            }
            _ => {}
        }

        let report = ui.update(time.delta);
        for (key, error) in &report.failed {
            println!("[frame {}] {key} failed: {error}", time.frame);
        }
        for message in log_recv.try_iter() {
            println!(
                "[frame {}] {:<5} {}: {}",
                time.frame, message.level, message.target, message.message
            );
        }
    }

    if let Some(menu) = ui.get_ui::<MainMenu>("menu/main") {
        println!("main menu was shown {} times", menu.visits);
    }
    println!("closed {} panels on shutdown", ui.close_all());
    println!("{} instances still alive", ui.assets().live);
    Ok(())
}
