use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use time::format_description::well_known::Rfc3339;

use autoinspect::core::db::{InspectionRepository, LedgerDb};
use autoinspect::{Annotator, FsImageStore, InspectionPipeline, JsonDetector, OperatorRef};

const LEDGER_FILE: &str = "inspections.db";

#[derive(Parser)]
#[command(name = "autoinspect")]
#[command(about = "Record vehicle quality-inspection outcomes from detector output")]
struct Cli {
    /// Directory holding the ledger database and stored images
    #[arg(long, value_name = "DIR", default_value = "data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Process one uploaded image against a detector run
    Inspect {
        /// Path to the image file (JPEG or PNG)
        #[arg(value_name = "IMAGE")]
        image_path: PathBuf,

        /// Detector output for this image, as a JSON array of findings
        #[arg(long, value_name = "FILE")]
        detections: PathBuf,

        /// Operator identity the record is filed under
        #[arg(short, long)]
        operator: String,

        /// Detection timeout in seconds
        #[arg(long, default_value_t = 30)]
        timeout: u64,

        /// Minimum confidence forwarded to the detection capability
        #[arg(long, default_value_t = autoinspect::detection::DEFAULT_MIN_CONFIDENCE)]
        min_confidence: f32,
    },
    /// List an operator's inspection records, newest first
    History {
        #[arg(short, long)]
        operator: String,

        /// Only show the most recent N records
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Aggregate pass/fail counts for an operator
    Stats {
        #[arg(short, long)]
        operator: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Cli::parse();

    tokio::fs::create_dir_all(&args.data_dir).await?;
    let ledger = LedgerDb::open(args.data_dir.join(LEDGER_FILE)).await?;

    match args.command {
        Command::Inspect {
            image_path,
            detections,
            operator,
            timeout,
            min_confidence,
        } => {
            let operator = OperatorRef::new(operator);
            let detector = JsonDetector::new(detections).with_min_confidence(min_confidence);
            let store = FsImageStore::new(&args.data_dir).await?;
            let pipeline = InspectionPipeline::new(detector, store, Annotator::default(), ledger)
                .with_detect_timeout(Duration::from_secs(timeout));

            let image_bytes = tokio::fs::read(&image_path).await?;
            let summary = pipeline.process(&operator, &image_bytes).await?;

            println!("=== Inspection Result ===");
            println!("Record id:       {}", summary.record_id);
            println!("Vehicle status:  {}", summary.status);
            println!("Findings:        {}", summary.finding_count);
            for detection in &summary.detections {
                println!("  {} ({})", detection.class_name, detection.confidence);
            }
            println!("Source image:    {}", summary.source_image);
            println!("Annotated image: {}", summary.annotated_image);
        }
        Command::History { operator, limit } => {
            let repo = ledger.operator(&OperatorRef::new(operator));
            let records = match limit {
                Some(limit) => repo.recent(limit).await?,
                None => repo.all().await?,
            };

            println!("=== Inspection History ({} records) ===", records.len());
            for record in &records {
                println!(
                    "#{} [{}] {} - {} ({} findings: {} | {})",
                    record.id,
                    record.created_at.format(&Rfc3339)?,
                    record.operator,
                    record.status,
                    record.finding_count,
                    record.defect_classes,
                    record.confidence_scores,
                );
            }
        }
        Command::Stats { operator } => {
            let stats = ledger.operator(&OperatorRef::new(operator)).aggregate().await?;
            println!("=== Inspection Stats ===");
            println!("Total inspections: {}", stats.total);
            println!("Passed:            {}", stats.pass_count);
            println!("Failed:            {}", stats.fail_count);
        }
    }

    Ok(())
}
