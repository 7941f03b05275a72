use clap::Parser;
use log::{error, info};

use coco2yolo_split::{process_dataset, Args};

fn main() {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if !args.coco_json.exists() {
        error!(
            "The specified coco_json does not exist: {}",
            args.coco_json.display()
        );
        std::process::exit(1);
    }
    if !args.image_dir.exists() {
        error!(
            "The specified image_dir does not exist: {}",
            args.image_dir.display()
        );
        std::process::exit(1);
    }

    info!("Starting the conversion process...");

    match process_dataset(&args) {
        Ok(stats) => {
            stats.print_summary();
            info!("Merged and split dataset created successfully.");
        }
        Err(e) => {
            error!("Failed to build datasets: {}", e);
            std::process::exit(1);
        }
    }
}
