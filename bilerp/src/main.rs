use anyhow::Context;
use bilerp::transform::upscale;
use bilerp::{Raster, RunConfig, setup_logging};
use log::info;

fn main() -> anyhow::Result<()> {
    let config = RunConfig::from_env().context("reading configuration")?;
    let _logger = setup_logging(&config.log_level).context("initialising logging")?;

    let source = Raster::test_pattern(config.src_width, config.src_height)
        .context("generating test pattern")?;
    info!(
        "upscaling {}x{} test pattern to {}x{} on {} workers",
        config.src_width, config.src_height, config.dest_width, config.dest_height, config.workers
    );

    let dest = upscale(
        &source,
        config.dest_width,
        config.dest_height,
        &config.upscale_options(),
    )
    .context("upscaling")?;

    bilerp::io::write_image(&dest, &config.output)
        .with_context(|| format!("writing {}", config.output.display()))?;

    Ok(())
}
