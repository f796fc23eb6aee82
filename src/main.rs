use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use lostfound::prelude::*;
use lostfound::{labeled_image_dirs, load_snapshot, save_snapshot, PrototypeClassifier};
use std::path::{Path, PathBuf};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

const STORE_FILE: &str = "items.bin";

/// Match lost items with found items by photo and description
#[derive(Parser, Debug)]
#[command(name = "lostfound")]
#[command(about = "Multi-modal lost & found matching", long_about = None)]
struct Args {
    /// Path to the data directory
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// JSON engine configuration (matcher weights, visual descriptor geometry)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory of labeled example images, one subdirectory per category
    #[arg(long)]
    prototypes: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit a lost or found report
    Report {
        /// lost | found
        #[arg(long)]
        polarity: Polarity,

        #[arg(long)]
        description: String,

        #[arg(long)]
        image: Option<PathBuf>,

        /// Category name; defaults to the classifier hint, else Other
        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        owner: u64,

        #[arg(long)]
        contact: String,
    },
    /// Rank reports of the opposite kind against a description and/or photo
    Search {
        /// The kind of report you hold: `lost` searches found items
        #[arg(long = "for")]
        report_type: Polarity,

        #[arg(long)]
        text: Option<String>,

        #[arg(long)]
        image: Option<PathBuf>,

        /// Show at most this many matches
        #[arg(long)]
        limit: Option<usize>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Import a folder-per-category image tree as found reports
    Seed {
        dir: PathBuf,

        #[arg(long)]
        owner: u64,

        #[arg(long)]
        contact: String,
    },
    /// Show a stored report, including its contact
    Show { id: u64 },
    /// Delete a stored report
    Remove { id: u64 },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match &args.config {
        Some(path) => EngineConfig::load(path).with_context(|| format!("reading config {:?}", path))?,
        None => EngineConfig::default(),
    };
    let mut engine = Engine::new(config)?;
    if let Some(dir) = &args.prototypes {
        let classifier = load_prototypes(dir, &engine)?;
        info!("Loaded {} category prototypes", classifier.len());
        engine = engine.with_classifier(classifier);
    }

    let store_path = args.data_dir.join(STORE_FILE);
    let store = load_snapshot(&store_path)?;

    match args.command {
        Command::Report {
            polarity,
            description,
            image,
            category,
            owner,
            contact,
        } => {
            let mut request = ReportRequest::new(OwnerId(owner), polarity, description, contact);
            if let Some(path) = image {
                let bytes = read_image(&path)?;
                request = request.with_image(bytes, Some(path.display().to_string()));
            }
            if let Some(name) = category {
                match Category::parse_label(&name) {
                    Some(category) => request = request.with_category(category),
                    None => bail!("unknown category '{}', expected one of {:?}", name, Category::ALL),
                }
            }

            let id = engine.report(&store, request)?;
            save_snapshot(&store, &store_path)?;
            let item = store.get(id).context("report vanished after insert")?;
            println!("Stored {} report #{} ({})", item.polarity, id, item.category);
        }
        Command::Search {
            report_type,
            text,
            image,
            limit,
            json,
        } => {
            let mut request = SearchRequest::new(report_type);
            if let Some(text) = text {
                request = request.with_text(text);
            }
            if let Some(path) = image {
                request = request.with_image(read_image(&path)?);
            }
            if request.text.is_none() && request.image.is_none() {
                bail!("search needs --text, --image or both");
            }

            let candidates_count = store.candidates(report_type.opposite()).len();
            let mut results = engine.search(&store, &request);
            if let Some(limit) = limit {
                results.truncate(limit);
            }
            let response = MatchResponse::from_results(&results, candidates_count);

            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print_matches(&response);
            }
        }
        Command::Seed { dir, owner, contact } => {
            let summary = engine.seed_dir(&store, &dir, OwnerId(owner), &contact)?;
            save_snapshot(&store, &store_path)?;
            println!(
                "Seeded {} found reports ({} files skipped)",
                summary.imported, summary.skipped
            );
        }
        Command::Show { id } => {
            let item = store
                .get(ItemId(id))
                .with_context(|| format!("no report #{}", id))?;
            println!("#{} {} {}", item.id, item.polarity, item.category);
            println!("  {}", item.description);
            if let Some(image) = &item.image_ref {
                println!("  image: {}", image);
            }
            println!("  contact: {}", item.contact);
        }
        Command::Remove { id } => {
            let item = store.remove(ItemId(id))?;
            save_snapshot(&store, &store_path)?;
            println!("Removed {} report #{}", item.polarity, item.id);
        }
    }

    Ok(())
}

fn read_image(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("reading image {:?}", path))
}

fn print_matches(response: &MatchResponse) {
    if response.result.is_empty() {
        println!("No matches among {} reports", response.stats.candidates_count);
        return;
    }
    for m in &response.result {
        let band = match m.band {
            ConfidenceBand::High => "high",
            ConfidenceBand::Medium => "medium",
            ConfidenceBand::Low => "low",
        };
        println!("{:>3}% [{}] #{} {}: {}", m.percent, band, m.id, m.category, m.description);
        if !m.keywords.is_empty() {
            println!("       matched: {}", m.keywords.join(", "));
        }
    }
    println!(
        "{} of {} reports matched (best {:.2}, mean {:.2})",
        response.stats.results_count,
        response.stats.candidates_count,
        response.stats.best_score,
        response.stats.avg_score
    );
}

fn load_prototypes(dir: &Path, engine: &Engine) -> anyhow::Result<PrototypeClassifier> {
    let mut classifier =
        PrototypeClassifier::new(engine.visual_extractor().clone(), engine.ranker().config().visual);

    let labeled = labeled_image_dirs(dir).with_context(|| format!("reading prototypes {:?}", dir))?;
    for group in labeled {
        if Category::parse_label(&group.label).is_none() {
            warn!("Skipping prototype directory '{}': not a category", group.label);
            continue;
        }
        for file in group.files {
            let bytes = std::fs::read(&file)?;
            if let Err(e) = classifier.add_image(group.label.clone(), &bytes) {
                warn!("Skipping prototype {:?}: {}", file, e);
            }
        }
    }
    Ok(classifier)
}
