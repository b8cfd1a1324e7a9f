//! End-to-end pipeline regression test
//!
//! Runs what the binary runs (pattern, upscale, BMP file) from a
//! `RunConfig`, then reads the file back.

use bilerp::io::{read_image, write_image};
use bilerp::transform::upscale;
use bilerp::{Raster, Rgb, RunConfig};
use bilerp_test::{RegParams, regout_dir};
use std::path::PathBuf;

fn run(config: &RunConfig) -> Raster {
    let source = Raster::test_pattern(config.src_width, config.src_height).expect("pattern");
    let dest = upscale(
        &source,
        config.dest_width,
        config.dest_height,
        &config.upscale_options(),
    )
    .expect("upscale");
    write_image(&dest, &config.output).expect("write");
    dest
}

#[test]
fn pipeline_reg_default_run() {
    let mut rp = RegParams::new("pipeline_default");
    let output = format!("{}/pipeline_default.bmp", regout_dir());
    let config = RunConfig::from_lookup(|var| match var {
        "BILERP_OUTPUT" => Some(output.clone()),
        _ => None,
    })
    .expect("config");
    rp.compare_values(8.0, config.workers as f64, 0.0);
    rp.compare_values(1.0, (config.output == PathBuf::from(&output)) as u8 as f64, 0.0);

    let dest = run(&config);
    rp.compare_values(512.0, dest.width() as f64, 0.0);
    rp.compare_values(512.0, dest.height() as f64, 0.0);
    rp.compare_strings(&Rgb::new(253, 0, 0).to_bgr(), &dest.get_bgr(256, 256).expect("centre"));

    let back = read_image(&config.output).expect("read back");
    rp.compare_raster(&dest, &back);
    rp.write_raster_and_check(&dest).expect("golden");

    assert!(rp.cleanup(), "pipeline_default regression test failed");
}

#[test]
fn pipeline_reg_overridden_run() {
    let mut rp = RegParams::new("pipeline_overridden");
    let output = format!("{}/pipeline_overridden.bmp", regout_dir());
    let config = RunConfig::from_lookup(|var| match var {
        "BILERP_SRC_WIDTH" => Some("5".to_string()),
        "BILERP_DEST_WIDTH" => Some("37".to_string()),
        "BILERP_DEST_HEIGHT" => Some("19".to_string()),
        "BILERP_WORKERS" => Some("3".to_string()),
        "BILERP_OUTPUT" => Some(output.clone()),
        _ => None,
    })
    .expect("config");

    let dest = run(&config);
    let single = run(&RunConfig {
        workers: 1,
        output: PathBuf::from(format!("{}/pipeline_single.bmp", regout_dir())),
        ..config.clone()
    });
    rp.compare_raster(&single, &dest);
    rp.compare_raster(&dest, &read_image(&config.output).expect("read back"));

    assert!(rp.cleanup(), "pipeline_overridden regression test failed");
}
