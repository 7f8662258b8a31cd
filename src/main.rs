use std::error::Error;
use std::path::Path;

use env_logger::Env;

use pipe_dash::app;
use pipe_dash::assets::SpriteBank;
use pipe_dash::audio::{DebugSink, SoundSink, Synth};
use pipe_dash::persistence::ScoreStore;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let sprites = match SpriteBank::load(Path::new("assets/images")) {
        Ok(bank) => bank,
        Err(err) => {
            log::error!("cannot load sprites: {err}");
            return Err(err);
        }
    };

    let audio: Box<dyn SoundSink> = match Synth::open() {
        Some(synth) => Box::new(synth),
        None => Box::new(DebugSink),
    };

    let store = ScoreStore::open();
    let seed = rand::random::<u64>();

    app::run(sprites, audio, store, seed)
}
