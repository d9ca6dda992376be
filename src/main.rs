use anyhow::Result;
use log::info;
use treasure_hunt::config::GameConfig;
use treasure_hunt::game;

fn main() -> Result<()> {
    // Initialize logging. Control verbosity with RUST_LOG env var:
    //   RUST_LOG=info   cargo run   # transitions + quest outcomes
    //   RUST_LOG=debug  cargo run   # + random draws, pauses, parsed scenes
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.first().is_some_and(|a| a == "-h" || a == "--help") {
        println!(
            "Usage: treasure-hunt [data_dir] [minimal|extended] [seed]\n\
             \n\
             Example:\n  treasure-hunt ./game extended 42\n\
             \n\
             Reads <data_dir>/data.txt (scenes, one `Title：Description` per line)\n\
             and <data_dir>/data/elements.txt; saves the player to <data_dir>/save.json.\n\
             \n\
             Logging: set RUST_LOG=debug for verbose output"
        );
        return Ok(());
    }

    let config = GameConfig::from_args(&args)?;

    info!("Data directory : {}", config.data_dir.display());
    info!("Quest script   : {}", config.script);
    info!("Seed           : {:?}", config.seed);

    game::run(config)
}
