//! Runs classic ABC and G-ABC on shared channel realizations and reports
//! the mean best sum rates.
//!
//! Usage: `compare [config.yaml]`. Set `RUST_LOG=info` to watch cycle
//! progress.

use std::env;
use std::process;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use cellfree_abc::{BeeColony, ChannelModel, Config};

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("compare: {}", err);
        process::exit(1);
    }
}

fn run() -> cellfree_abc::Result<()> {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "config.yaml".to_string());
    let config = Config::from_file(&path)?;
    let (m, k, n) = config.dims();
    let model = ChannelModel::new(m, k, n);
    let realizations = config.simulation.n_realizations;

    let mut rng = match config.simulation.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    println!(
        "cell-free system: M={} APs, K={} users, N={} antennas; {} realization(s)",
        m, k, n, realizations
    );

    let mut classic_sum = 0.0;
    let mut guided_sum = 0.0;
    for round in 0..realizations {
        let channel = model.rayleigh(&mut rng);
        // Both variants search the same channel from the same seed, so the
        // comparison isolates the search rule.
        let search_seed: u64 = rng.gen();

        let (fit_classic, _) =
            BeeColony::classic(&config, channel.clone(), StdRng::seed_from_u64(search_seed))?
                .solve()?;
        let (fit_guided, _) =
            BeeColony::gbest(&config, channel, StdRng::seed_from_u64(search_seed))?.solve()?;

        log::info!(
            "realization {}/{}: ABC {:.4}, G-ABC {:.4} bit/s/Hz",
            round + 1,
            realizations,
            fit_classic,
            fit_guided
        );
        classic_sum += fit_classic;
        guided_sum += fit_guided;
    }

    let classic_mean = classic_sum / realizations as f64;
    let guided_mean = guided_sum / realizations as f64;
    println!("ABC   mean best sum rate: {:.4} bit/s/Hz", classic_mean);
    println!("G-ABC mean best sum rate: {:.4} bit/s/Hz", guided_mean);
    if classic_mean > 0.0 {
        println!(
            "improvement: {:+.1}%",
            (guided_mean - classic_mean) / classic_mean * 100.0
        );
    }
    Ok(())
}
