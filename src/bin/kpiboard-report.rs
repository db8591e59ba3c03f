use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kpiboard::config::Config;
use kpiboard::report::format::format_duration;
use kpiboard::report::{self, DashboardView, ViewOptions};
use kpiboard::storage::{CachedSource, DatasetSource, FileSource, HttpSource};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "kpiboard-report")]
#[command(about = "Print dashboard KPIs from the terminal", long_about = None)]
struct Cli {
    /// Read the export from a local JSON file instead of the configured URL
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the periods available for a site
    Periods {
        /// Site tag (e.g. FA)
        #[arg(long)]
        site: String,
    },
    /// Show the month or year view of a site
    View {
        /// Site tag (e.g. FA)
        #[arg(long)]
        site: String,
        /// YYYY or YYYY-MM
        #[arg(long)]
        period: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let source: Arc<dyn DatasetSource> = match cli.file {
        Some(path) => Arc::new(FileSource::new(path)),
        None => {
            let url = config
                .source
                .url
                .clone()
                .context("KPIBOARD_SOURCE_URL must be set when --file is not given")?;
            let http = HttpSource::new(url, Duration::from_secs(config.source.timeout_secs))?;
            Arc::new(CachedSource::new(
                Arc::new(http),
                config.source.cache_path.clone(),
            ))
        }
    };

    let dataset = source
        .fetch()
        .await
        .with_context(|| format!("Failed to load dataset from {}", source.describe()))?;

    match cli.command {
        Commands::Periods { site } => {
            let options = report::periods_for(&dataset, &config.sites, &site)?;
            if options.years.is_empty() {
                println!("No data for site '{}'.", site);
            }
            for year in options.years {
                println!("{}", year.label);
                for month in year.months {
                    println!("  {:<10} {}", month.period, month.label);
                }
            }
        }
        Commands::View { site, period } => {
            let options = ViewOptions::from_config(&config.view);
            let view = report::view_for(&dataset, &config.sites, &site, &period, &options)?;
            print_view(&view);
        }
    }

    Ok(())
}

fn print_view(view: &DashboardView) {
    let (label, kpis, top_pages) = match view {
        DashboardView::Month(month) => (&month.label, &month.kpis, &month.top_pages),
        DashboardView::Year(year) => (&year.label, &year.kpis, &year.top_pages),
    };

    println!("{}", label);
    println!("{}", "-".repeat(60));
    if kpis.is_empty() {
        println!("Aucune donnée");
        return;
    }

    for card in kpis {
        let mut line = format!("{:<20} {:>14}", card.title, card.display);
        for comparison in [&card.vs_previous_month, &card.vs_previous_year]
            .into_iter()
            .flatten()
        {
            line.push_str(&format!("   vs {}: {}", comparison.label, comparison.display));
        }
        println!("{}", line);
    }

    if let DashboardView::Year(year) = view {
        if let Some(current) = &year.current {
            println!(
                "{} mois agrégés, durée moyenne {}",
                current.count,
                format_duration(current.avg_duration_secs)
            );
        }
    }

    if !top_pages.is_empty() {
        println!();
        println!("{:<4} {:<6} {:<50} {:>10}", "#", "Évol.", "Page", "Vues");
        for page in top_pages {
            println!(
                "{:<4} {:<6} {:<50} {:>10}",
                page.position, page.evolution, page.title, page.views_display
            );
        }
    }
}
