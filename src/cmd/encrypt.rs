use clap::Args;
use rotorforge::config::WheelDatabase;
use rotorforge::consts::ALPHABET_SIZE;
use rotorforge::core_types::{letter_to_char, Message};
use rotorforge::error::{RfResult, RotorForgeError};
use rotorforge::machine::{Key, Mechanism, Plugboard};
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Args, Debug, Clone)]
pub struct EncryptArgs {
    /// Wheel names, reflector first
    #[arg(long, default_value = "UKW-B I II III ETW-ABC")]
    pub wheels: String,

    /// Ring settings, one letter per wheel
    #[arg(short, long)]
    pub rings: String,

    /// Start positions, one letter per wheel
    #[arg(short, long)]
    pub positions: String,

    /// Plug pairs such as "ab cd"
    #[arg(long, default_value = "")]
    pub plugs: String,

    /// Add this many random plug pairs
    #[arg(long, default_value_t = 0)]
    pub random_plugs: usize,

    #[arg(short = 'S', long)]
    pub seed: Option<u64>,

    /// stepping or odometer
    #[arg(long, default_value_t = Mechanism::Stepping)]
    pub mechanism: Mechanism,

    /// Wheel database (JSON); built-in wheels when absent
    #[arg(long)]
    pub wheel_file: Option<PathBuf>,

    pub text: String,
}

/// Adds `n` random pairs among the letters `pb` leaves free.
fn add_random_plugs(pb: &str, n: usize, rng: &mut fastrand::Rng) -> RfResult<String> {
    let existing = Plugboard::from_pairs(pb)?;
    let mut free: Vec<u8> = (0..ALPHABET_SIZE as u8).filter(|&x| existing.is_free(x)).collect();
    if n * 2 > free.len() {
        return Err(RotorForgeError::Config(format!(
            "Cannot add {} plug pairs, only {} letters are free",
            n,
            free.len()
        )));
    }
    rng.shuffle(&mut free);

    let mut pairs: Vec<String> = existing
        .pairs()
        .iter()
        .map(|&(a, b)| format!("{}{}", letter_to_char(a), letter_to_char(b)))
        .collect();
    for chunk in free.chunks(2).take(n) {
        pairs.push(format!("{}{}", letter_to_char(chunk[0]), letter_to_char(chunk[1])));
    }
    Ok(pairs.join(" "))
}

pub fn run(args: EncryptArgs) -> RfResult<()> {
    let catalog = WheelDatabase::catalog(args.wheel_file.as_deref())?;
    let wheels = catalog.resolve_list(&args.wheels)?;

    let plugs = if args.random_plugs > 0 {
        let mut rng = match args.seed {
            Some(s) => fastrand::Rng::with_seed(s),
            None => fastrand::Rng::new(),
        };
        add_random_plugs(&args.plugs, args.random_plugs, &mut rng)?
    } else {
        args.plugs.clone()
    };
    let plugboard = Plugboard::from_pairs(&plugs)?;

    let mut key = Key::assemble(
        args.mechanism,
        wheels,
        &args.rings,
        &args.positions,
        plugboard,
    )?;
    debug!("Key: {}", key);
    if args.random_plugs > 0 {
        info!("Plugboard: {}", key.plugboard);
    }

    let message = Message::from_text(&args.text);
    let output = key.encrypt(&message);
    println!("{}", output);
    Ok(())
}
