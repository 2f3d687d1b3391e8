/*
 * Copyright © 2025, United States Government, as represented by the Administrator of 
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License"); 
 * you may not use this file except in compliance with the License. You may obtain a copy 
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */
#![allow(unused)]

use std::{path::PathBuf, sync::Arc};
use anyhow::{anyhow, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use firescan::{load_config, config::ScanConfig, pipeline::Scan, source::{DataSource, SceneDirectory}};

/// detect thermal and burn-scar anomalies in a directory of scenes
#[derive(Parser,Debug)]
#[command(version, about)]
struct Args {
    /// filename of the RON scan config
    #[arg(short, long)]
    config: PathBuf,

    /// directory tree with JSON scene files
    #[arg(short, long)]
    scenes: PathBuf,

    /// output directory for the CSV tables and report.json
    #[arg(short, long, default_value="scan_out")]
    out: PathBuf,

    /// also print the JSON report to stdout
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let config: ScanConfig = load_config( &args.config)?;
    let source: Arc<dyn DataSource> = Arc::new( SceneDirectory::open( &args.scenes)?);

    let cancel = CancellationToken::new();
    let scan = Scan::new( config)?.with_cancellation( cancel.clone());

    tokio::spawn( async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling pending queries");
            cancel.cancel();
        }
    });

    let report = scan.run( source).await.map_err( |e| anyhow!("scan failed: {e}"))?;
    report.write_to_dir( &args.out)?;
    info!("results written to {:?}", args.out);

    if args.json {
        println!("{}", report.to_json()?);
    }
    Ok(())
}
