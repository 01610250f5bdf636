use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use rusty_sorter::data::loader;
use rusty_sorter::data::model::{MetadataValue, SpectralDataset};
use rusty_sorter::data::synthetic::{material_spectrum, mid_infrared_axis, SimpleRng};
use rusty_sorter::Label;

#[derive(Parser)]
#[command(name = "generate_sample")]
#[command(about = "Write synthetic FTIR spectra of every material to a parquet file")]
struct Args {
    #[arg(short, long, default_value = "sample_data.parquet")]
    output: PathBuf,

    /// Spectra per material
    #[arg(short, long, default_value_t = 4)]
    repeats: usize,

    /// Standard deviation of the added noise
    #[arg(short, long, default_value_t = 0.002)]
    noise: f64,

    #[arg(short, long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut rng = SimpleRng::new(args.seed);

    let axis = mid_infrared_axis();

    let mut spectra = Vec::new();
    for label in Label::ALL {
        for repeat in 0..args.repeats {
            let scale = 0.9 + 0.2 * rng.next_f64();
            let sp = material_spectrum(label, &axis, scale, args.noise, &mut rng)?;

            let mut metadata = sp.metadata().clone();
            metadata.insert("repeat".to_string(), MetadataValue::Integer(repeat as i64));
            spectra.push(sp.with_name(format!("{label}-{repeat}")).with_metadata(metadata));
        }
    }

    let dataset = SpectralDataset::from_spectra(spectra);
    loader::write_parquet(&dataset, &args.output)?;

    println!(
        "Wrote {} spectra ({} wavenumbers each) to {}",
        dataset.len(),
        axis.len(),
        args.output.display()
    );
    Ok(())
}
