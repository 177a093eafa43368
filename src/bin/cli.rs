//! Timetable CLI
//!
//! Local entry point for searching the lecture catalog, building a timetable
//! and rendering cached catalog pages.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use timetable::{
    error::{AppError, Result},
    models::{Config, SearchOptionUpdate, Weekday},
    pipeline,
    services::ScheduleTextParser,
    utils::strip_markup,
};

/// timetable - Lecture catalog search and timetable planner
#[derive(Parser, Debug)]
#[command(name = "timetable", version, about = "Lecture catalog search and timetable planner")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Read catalog resources from this directory instead of over HTTP
    #[arg(long, global = true)]
    catalog_dir: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Filter the catalog and print the visible rows
    Search {
        /// Substring of the title or course code
        #[arg(short, long)]
        query: Option<String>,

        /// Grade (repeatable)
        #[arg(long)]
        grade: Vec<u8>,

        /// Day label such as 월 or Mon (repeatable)
        #[arg(long)]
        day: Vec<String>,

        /// Class period (repeatable)
        #[arg(long)]
        time: Vec<u32>,

        /// Major label, raw (repeatable)
        #[arg(long)]
        major: Vec<String>,

        /// Credits prefix
        #[arg(long)]
        credits: Option<u32>,

        /// Number of "load more" steps to take
        #[arg(long, default_value_t = 0)]
        more: usize,
    },

    /// List every major in the catalog
    Majors,

    /// Parse a schedule string and print its slots
    Parse {
        schedule: String,
    },

    /// Place lectures into a timetable and print it
    Plan {
        /// Course codes
        #[arg(required = true)]
        lectures: Vec<String>,
    },

    /// Pre-warm the render cache and render routes
    Render {
        /// Routes including query string, e.g. "/2?grade=1"
        #[arg(default_value = "/")]
        routes: Vec<String>,

        /// Print the rendered markup instead of a summary
        #[arg(long)]
        html: bool,
    },

    /// Validate configuration
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn search_updates(
    query: Option<String>,
    grade: Vec<u8>,
    day: Vec<String>,
    time: Vec<u32>,
    major: Vec<String>,
    credits: Option<u32>,
) -> Result<Vec<SearchOptionUpdate>> {
    let days = day
        .iter()
        .map(|label| {
            Weekday::from_label(label)
                .ok_or_else(|| AppError::validation(format!("unknown day '{label}'")))
        })
        .collect::<Result<_>>()?;

    let mut updates = vec![
        SearchOptionUpdate::Grades(grade.into_iter().collect()),
        SearchOptionUpdate::Days(days),
        SearchOptionUpdate::Times(time.into_iter().collect()),
        SearchOptionUpdate::Majors(major.into_iter().collect()),
        SearchOptionUpdate::Credits(credits),
    ];
    if let Some(query) = query {
        updates.push(SearchOptionUpdate::Query(query));
    }
    Ok(updates)
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);
    if let Some(dir) = cli.catalog_dir {
        config.catalog.local_dir = Some(dir);
    }

    match cli.command {
        Command::Search {
            query,
            grade,
            day,
            time,
            major,
            credits,
            more,
        } => {
            let updates = search_updates(query, grade, day, time, major, credits)?;
            let catalog = pipeline::load_catalog(&config.catalog).await?;
            let session = pipeline::run_search(catalog, &config.search, updates, more)?;

            for lecture in session.visible() {
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    lecture.id,
                    lecture.grade,
                    lecture.title,
                    lecture.credits,
                    strip_markup(&lecture.major),
                    strip_markup(&lecture.schedule)
                );
            }
            println!(
                "-- {} results, page {} of {}",
                session.result_count(),
                session.page(),
                session.last_page()
            );
        }

        Command::Majors => {
            let catalog = pipeline::load_catalog(&config.catalog).await?;
            for major in catalog.all_majors() {
                println!("{major}");
            }
        }

        Command::Parse { schedule } => {
            let slots = ScheduleTextParser::new().parse(&schedule)?;
            if slots.is_empty() {
                log::info!("No slots in schedule");
            }
            for slot in slots {
                println!("{}\t{:?}\t{}", slot.day, slot.range, slot.room.unwrap_or_default());
            }
        }

        Command::Plan { lectures } => {
            let catalog = pipeline::load_catalog(&config.catalog).await?;
            let book = pipeline::run_plan(&catalog, &lectures)?;

            for table in book.tables() {
                println!("[{}]", table.id);
                for slot in &table.slots {
                    println!(
                        "  {}\t{:?}\t{}\t{}",
                        slot.day, slot.range, slot.lecture.id, slot.lecture.title
                    );
                }
            }
        }

        Command::Render { routes, html } => {
            let catalog = pipeline::load_catalog(&config.catalog).await?;
            let pages = pipeline::run_render(catalog, &config.render, &routes).await?;

            for page in pages {
                if html {
                    println!("{}", page.html);
                } else {
                    println!(
                        "{}\t{} bytes\tetag {}\trendered {}",
                        page.route,
                        page.html.len(),
                        page.etag,
                        page.rendered_at.to_rfc3339()
                    );
                }
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!(
                "✓ Config OK ({} catalog resources, {} pre-warm routes)",
                config.catalog.resources.len(),
                config.render.prewarm_routes.len()
            );
        }
    }

    Ok(())
}
