//! Command-line seed and config path resolution for the desktop app.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use race_core::seed::mix_seed_stream;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedChoice {
    Cli(u64),
    Config(u64),
    Generated(u64),
}

impl SeedChoice {
    pub fn value(self) -> u64 {
        match self {
            Self::Cli(seed) | Self::Config(seed) | Self::Generated(seed) => seed,
        }
    }
}

static GENERATED_SEED_COUNTER: AtomicU64 = AtomicU64::new(0);

pub fn generate_runtime_seed() -> u64 {
    let now_nanos =
        SystemTime::now().duration_since(UNIX_EPOCH).map_or(0_u128, |duration| duration.as_nanos());
    let pid = u64::from(std::process::id());
    let counter = GENERATED_SEED_COUNTER.fetch_add(1, Ordering::Relaxed);

    let entropy = (now_nanos as u64) ^ ((now_nanos >> 64) as u64) ^ pid.rotate_left(17);
    mix_seed_stream(entropy, counter)
}

/// `--seed` wins over the config file's seed, which wins over `generated_seed`.
pub fn resolve_seed_from_args(
    args: &[String],
    config_seed: Option<u64>,
    generated_seed: u64,
) -> Result<SeedChoice, String> {
    let cli_seed = flag_value(args, "--seed")?.map(parse_seed_value).transpose()?;

    Ok(match (cli_seed, config_seed) {
        (Some(seed), _) => SeedChoice::Cli(seed),
        (None, Some(seed)) => SeedChoice::Config(seed),
        (None, None) => SeedChoice::Generated(generated_seed),
    })
}

pub fn resolve_config_path_from_args(args: &[String]) -> Result<Option<PathBuf>, String> {
    Ok(flag_value(args, "--config")?.map(PathBuf::from))
}

/// Finds `flag VALUE` or `flag=VALUE`, rejecting repeats and a missing value.
fn flag_value<'a>(args: &'a [String], flag: &str) -> Result<Option<&'a str>, String> {
    let mut selected = None;
    let mut index = 1usize;

    while index < args.len() {
        let argument = args[index].as_str();

        let value = if argument == flag {
            let Some(value) = args.get(index + 1) else {
                return Err(format!("missing value for {flag}"));
            };
            index += 1;
            Some(value.as_str())
        } else {
            argument.strip_prefix(flag).and_then(|rest| rest.strip_prefix('='))
        };

        if let Some(value) = value {
            if selected.is_some() {
                return Err(format!("{flag} provided more than once"));
            }
            selected = Some(value);
        }
        index += 1;
    }

    Ok(selected)
}

fn parse_seed_value(raw_value: &str) -> Result<u64, String> {
    raw_value.parse::<u64>().map_err(|_| format!("seed value '{raw_value}' must be a number"))
}
