// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use cmd::commands::{build_command, social_command};
use cmd::common::SiteContext;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "shopgen")]
struct Cli {
    #[command(flatten)]
    site: SiteContext,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate pages, feeds and assets into the output directory
    Build {
        /// Output directory; replaced only when the build succeeds
        #[arg(short, long, default_value = "_site")]
        output: PathBuf,
    },
    /// Print social media copy for the newest visible products and posts
    Social {
        /// Products and posts to include
        #[arg(short, long, default_value_t = sitegen::DEFAULT_SOCIAL_LIMIT)]
        limit: usize,
    },
}

fn main() -> Result<()> {
    diagnostics::init();

    let cli = Cli::parse();
    let mut out = std::io::stdout().lock();
    let mut lines = Vec::new();

    match cli.command {
        Commands::Build { output } => {
            build_command(&cli.site, output, |line| lines.push(line))?;
        }
        Commands::Social { limit } => social_command(&cli.site, limit, |text| lines.push(text))?,
    }

    for line in lines {
        writeln!(out, "{}", line.trim_end())?;
    }
    Ok(())
}
