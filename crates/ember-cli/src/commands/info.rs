use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use ember_core::band::BandId;
use ember_core::io::band_files::BandFiles;
use ember_core::io::geotiff::read_band;
use ember_core::pipeline::config::ReflectanceScaling;

#[derive(Args)]
pub struct InfoArgs {
    /// Band files, or a directory containing them
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let files = BandFiles::discover(&args.inputs)?;
    println!("Scene:       {}", files.base_name);

    let mut georef = None;
    for (id, path) in files.iter() {
        let band = read_band(path, &ReflectanceScaling::default())?;
        let (rows, cols) = band.data.dim();
        let (min, max) = band
            .data
            .iter()
            .filter(|v| v.is_finite())
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        println!(
            "{:<22} {}x{}  range {:.4}..{:.4}  {}",
            id.to_string(),
            cols,
            rows,
            min,
            max,
            path.display()
        );
        if id == BandId::B5 {
            georef = Some(band.georef);
        }
    }

    match georef.filter(|g| !g.is_empty()) {
        Some(g) => {
            let t = g.transform();
            println!(
                "Georeference: origin ({:.3}, {:.3}), pixel {} x {}",
                t.origin_x, t.origin_y, t.pixel_width, t.pixel_height
            );
        }
        None => println!("Georeference: none"),
    }

    Ok(())
}
