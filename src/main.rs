use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use chip8::config::{Config, DEFAULT_IPS};
use chip8::display::MonoTermDisplay;
use chip8::environment::Environment;
use chip8::input::TermInput;

#[derive(Parser, Debug)]
#[command(version, about = "CHIP-8 interpreter in the terminal", long_about = None)]
struct Args {
    /// path to the ROM to run
    rom: PathBuf,

    /// instructions per second
    #[arg(short, long, default_value_t = DEFAULT_IPS, value_parser = clap::value_parser!(u32).range(1..))]
    ips: u32,

    /// seed for the random number instruction
    #[arg(short, long)]
    seed: Option<u64>,

    /// stop after this many instructions
    #[arg(short, long)]
    max_cycles: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = Config::new(args.rom);
    config.ips = args.ips;
    config.seed = args.seed;
    config.max_cycles = args.max_cycles;

    // initialise
    let mut display = MonoTermDisplay::new()?;
    let mut input = TermInput::new()?;
    let mut env = Environment::new(config.clone(), &mut display, &mut input);

    env.load_rom()
        .with_context(|| format!("couldn't load {}", config.rom.display()))?;
    let result = env.main_loop();
    let pc = env.interpreter().machine().pc();

    // put the terminal back before saying anything
    drop(env);
    drop(input);
    drop(display);

    let halt = result.with_context(|| format!("interpreter stopped at {:#05x}", pc))?;
    log::info!("{:?}", halt);
    Ok(())
}
