use anyhow::*;
use fs_extra::copy_items;
use fs_extra::dir::CopyOptions;
use std::env;
use std::path::PathBuf;

/// Files the scene loads at startup, relative to `assets/`.
const SCENE_ASSETS: [&str; 2] = ["model/portal.glb", "texture/baked.jpg"];

fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=assets");

    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let assets_src = manifest_dir.join("assets");

    // Native builds fall back to this copy when started outside the crate root
    println!(
        "cargo:rustc-env=PORTAL_SCENE_ASSET_DIR={}",
        out_dir.join("assets").display()
    );

    if !assets_src.exists() {
        println!("cargo:warning=no assets/ directory, the scene will render without its model");
        return Ok(());
    }
    for asset in SCENE_ASSETS {
        if !assets_src.join(asset).exists() {
            println!("cargo:warning=assets/{asset} is missing");
        }
    }

    let mut copy_options = CopyOptions::new();
    copy_options.overwrite = true;
    copy_items(&[&assets_src], &out_dir, &copy_options)?;

    Ok(())
}
