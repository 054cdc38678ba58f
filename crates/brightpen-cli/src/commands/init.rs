//! The `brightpen init` command.

use std::path::Path;

use anyhow::Result;

use brightpen_core::config::default_config_toml;
use brightpen_core::parser::SEED_DATASET;

pub fn execute() -> Result<()> {
    // Create brightpen.toml
    if Path::new("brightpen.toml").exists() {
        println!("brightpen.toml already exists, skipping.");
    } else {
        std::fs::write("brightpen.toml", default_config_toml())?;
        println!("Created brightpen.toml");
    }

    // Editable copy of the seed dataset
    std::fs::create_dir_all("data")?;
    let dataset_path = Path::new("data/seed.toml");
    if dataset_path.exists() {
        println!("data/seed.toml already exists, skipping.");
    } else {
        std::fs::write(dataset_path, SEED_DATASET)?;
        println!("Created data/seed.toml");
    }

    println!("\nNext steps:");
    println!("  1. Set `dataset = \"data\"` in brightpen.toml to use your own rules");
    println!("  2. Run: brightpen validate --dataset data");
    println!("  3. Run: brightpen suggest \"我有一隻寵物\"");

    Ok(())
}
