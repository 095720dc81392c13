//! Drive a simulated jukebox from a line-based script.
//!
//! Script commands, one per line (`#` starts a comment):
//!
//! ```text
//! press <ms>     hold the button for <ms> milliseconds, then release it
//! send <line>    deliver <line> on the serial port
//! wait <ms>      let <ms> milliseconds pass
//! status         print a JSON snapshot of the jukebox
//! quit           stop reading the script
//! ```

use clap::Parser;
use jukebox_fsm::config::JukeboxConfig;
use jukebox_fsm::hw::SimBoard;
use jukebox_fsm::system::{Hardware, JukeboxSystem, BUTTON_ID, USART_ID};
use std::error::Error;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Time needed after a serial line for it to be read and answered.
const SETTLE_MS: u32 = 5;

#[derive(Parser, Debug)]
#[command(name = "jukebox-sim")]
#[command(about = "Run the jukebox state machines on a simulated board")]
struct Args {
    /// Script to run (reads stdin when omitted)
    script: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

struct Simulator {
    board: Arc<SimBoard>,
    system: JukeboxSystem,
}

impl Simulator {
    fn run(&mut self, ms: u32) {
        for _ in 0..ms {
            self.board.advance_ms(1);
            self.system.run_cycle();
            for line in self.board.take_transmitted(USART_ID) {
                println!("< {line}");
            }
        }
    }

    /// Execute one script line. Returns `false` on `quit`.
    fn execute(&mut self, line: &str) -> Result<bool, Box<dyn Error>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(true);
        }

        let (command, arg) = line.split_once(' ').unwrap_or((line, ""));
        match command {
            "press" => {
                let ms: u32 = arg.trim().parse()?;
                self.board.press_button(BUTTON_ID);
                self.run(ms);
                self.board.release_button(BUTTON_ID);
                self.run(1);
            }
            "send" => {
                println!("> {arg}");
                self.board.receive_line(USART_ID, arg);
                self.run(SETTLE_MS);
            }
            "wait" => self.run(arg.trim().parse()?),
            "status" => println!("{}", serde_json::to_string(&self.system.status())?),
            "quit" => return Ok(false),
            other => warn!(command = other, "unknown script command"),
        }
        Ok(true)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => JukeboxConfig::load(path)?,
        None => JukeboxConfig::default(),
    };

    let script = match &args.script {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let board = Arc::new(SimBoard::default());
    let system = JukeboxSystem::new(&config, Hardware::from_board(board.clone()))?;
    let mut sim = Simulator { board, system };

    info!(melodies = config.playlist.len(), "simulation started");
    for line in script.lines() {
        if !sim.execute(line)? {
            break;
        }
    }
    info!(state = ?sim.system.status().state, "simulation finished");

    Ok(())
}
