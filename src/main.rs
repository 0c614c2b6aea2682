/// Demo binary: assemble a seeded random image batch from a TOML config.
use std::path::PathBuf;

use anyhow::{Context, Result};
use indicatif::ProgressBar;

use gallery_sampler::{encode_png, init_logger, parse_toml, progress_bar_style, scan_images};

fn main() -> Result<()> {
    init_logger();

    let project_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| project_root.join("assets/sampler.toml"));

    let args = parse_toml(&config_path, &project_root).context("Failed to parse TOML config")?;

    let candidates = scan_images(
        &args.image_dir,
        args.subfolders,
        &args.extensions,
        &args.skip_patterns(),
    )?;
    tracing::info!(
        "Found {} candidate images under {:?}",
        candidates.len(),
        args.image_dir
    );

    let batch = args.sampler().sample(&candidates);
    if batch.decode_failures > 0 {
        tracing::warn!("{} candidates failed to decode", batch.decode_failures);
    }
    for path in batch.paths() {
        tracing::info!("Selected: {:?}", path);
    }
    tracing::info!("Batch size: {}", batch.len());

    if let Some(save_dir) = &args.save_dir {
        std::fs::create_dir_all(save_dir)?;
        let bar = ProgressBar::new(batch.len() as u64).with_style(progress_bar_style());
        bar.set_message("Saving");
        for (i, entry) in batch.entries.iter().enumerate() {
            if let Some(image) = &entry.image {
                let name = entry
                    .path
                    .file_stem()
                    .unwrap_or_default()
                    .to_string_lossy()
                    .into_owned();
                let out = save_dir.join(format!("{:03}_{}.png", i, name));
                std::fs::write(&out, encode_png(image)?)?;
            }
            bar.inc(1);
        }
        bar.finish();
        tracing::info!("Saved loaded batch images to {:?}", save_dir);
    }

    Ok(())
}
