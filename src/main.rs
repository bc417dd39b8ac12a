mod analytics;
mod chatbot;
mod config;
mod error;
mod ident;
mod lookup;
mod models;
mod storage;
mod store;
mod table;
mod tui;
mod views;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use models::{timestamp, ComplaintStatus, Priority, Rating, Sentiment};
use std::path::PathBuf;
use storage::{FileStorage, MemoryStorage, TableStorage};
use store::{ComplaintForm, RecordStore, ReviewForm, Submitter};
use views::{ComplaintRow, ReviewRow};

#[derive(Parser)]
#[command(name = "feedhub")]
#[command(about = "Customer feedback tracking - complaints, reviews, vendor insights")]
struct Cli {
    /// Directory holding the table files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log store activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Run against an in-memory copy of the tables; nothing is written
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create any missing table files
    Init,

    #[command(flatten)]
    Records(RecordCommands),

    /// Ask the help assistant
    Chat {
        /// Question text
        question: Option<String>,

        /// Reply language (en, hi)
        #[arg(short, long, default_value = "en")]
        lang: chatbot::Language,

        /// List example questions
        #[arg(long)]
        examples: bool,
    },
}

/// Commands that work on the loaded tables.
#[derive(Subcommand)]
enum RecordCommands {
    /// Quick stats and the most recent complaints
    Home {
        /// Number of recent complaints to show
        #[arg(short, long, default_value = "5")]
        limit: usize,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage users
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Manage vendors
    Vendor {
        #[command(subcommand)]
        command: VendorCommands,
    },

    /// Manage products
    Product {
        #[command(subcommand)]
        command: ProductCommands,
    },

    /// Submit and track complaints
    Complaint {
        #[command(subcommand)]
        command: ComplaintCommands,
    },

    /// Submit and list reviews
    Review {
        #[command(subcommand)]
        command: ReviewCommands,
    },

    /// Top products and vendors
    Analytics {
        /// Entries per chart
        #[arg(short, long, default_value = "5")]
        limit: usize,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Register a user
    Add {
        name: String,

        /// Home state
        #[arg(short, long)]
        state: Option<String>,
    },

    /// List users
    List,
}

#[derive(Subcommand)]
enum VendorCommands {
    /// Register a vendor
    Add { name: String },

    /// List vendors
    List,

    /// Vendor dashboard: totals, complaints and reviews
    Show {
        /// Vendor name or ID
        name: String,
    },
}

#[derive(Subcommand)]
enum ProductCommands {
    /// Register a product
    Add {
        name: String,

        /// Vendor name or ID
        #[arg(long)]
        vendor: String,

        /// FSSAI licence number
        #[arg(long)]
        fssai: Option<String>,
    },

    /// List products
    List,
}

#[derive(Subcommand)]
enum ComplaintCommands {
    /// File a complaint against a product
    Submit {
        #[command(flatten)]
        submitter: SubmitterArgs,

        /// Product name or ID
        #[arg(short, long)]
        product: String,

        /// Complaint text
        #[arg(short, long, default_value = "")]
        text: String,

        /// Low, Medium or High
        #[arg(long, default_value = "Low")]
        priority: Priority,

        /// Pending or Resolved
        #[arg(long, default_value = "Pending")]
        status: ComplaintStatus,
    },

    /// List complaints with names resolved
    List {
        /// Filter by status (Pending, Resolved)
        #[arg(short, long)]
        status: Option<ComplaintStatus>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set a complaint's status
    Status {
        /// Complaint ID
        id: String,

        /// Pending or Resolved
        status: ComplaintStatus,
    },

    /// Browse complaints interactively and update their status
    Browse {
        /// Filter by status (Pending, Resolved)
        #[arg(short, long)]
        status: Option<ComplaintStatus>,
    },
}

#[derive(Subcommand)]
enum ReviewCommands {
    /// Review a product
    Submit {
        #[command(flatten)]
        submitter: SubmitterArgs,

        /// Product name or ID
        #[arg(short, long)]
        product: String,

        /// Rating from 1 to 5
        #[arg(short, long, default_value = "5")]
        rating: Rating,

        /// Review text
        #[arg(short, long, default_value = "")]
        text: String,

        /// Positive, Neutral or Negative
        #[arg(long, default_value = "Positive")]
        sentiment: Sentiment,
    },

    /// List reviews with names resolved
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Args)]
#[group(required = true, multiple = false)]
struct SubmitterArgs {
    /// Existing user name or ID
    #[arg(short, long)]
    user: Option<String>,

    /// Register a new user with this name
    #[arg(long)]
    new_user: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    config::init_logging(cli.verbose)?;

    let data_dir = config::resolve_data_dir(cli.data_dir);
    let storage = FileStorage::new(&data_dir);

    let command = match cli.command {
        Commands::Init => {
            let created = init_tables(&storage, cli.dry_run)?;
            let verb = if cli.dry_run { "Would create" } else { "Created" };
            if created.is_empty() {
                println!("All tables already present in {}", data_dir.display());
            } else {
                println!("{} {} in {}", verb, created.join(", "), data_dir.display());
            }
            return Ok(());
        }
        Commands::Chat {
            question,
            lang,
            examples,
        } => return run_chat(question.as_deref(), lang, examples),
        Commands::Records(command) => command,
    };

    let missing = || {
        format!(
            "Failed to load tables from {}. Run 'feedhub init' first.",
            data_dir.display()
        )
    };

    if cli.dry_run {
        let memory = MemoryStorage::new();
        for table in store::TABLE_NAMES {
            let bytes = storage.read_table(table).with_context(missing)?;
            memory.insert(table, bytes);
        }
        let mut store = RecordStore::open(memory)?;
        run(&mut store, command)?;
        let skipped = store.storage().write_count();
        if skipped > 0 {
            eprintln!("(Dry run - {} table write(s) skipped)", skipped);
        }
        return Ok(());
    }

    let mut store = RecordStore::open(storage).with_context(missing)?;
    run(&mut store, command)
}

/// Create the data directory and any missing table files. On a dry run
/// only reports which tables would be created.
fn init_tables(storage: &FileStorage, dry_run: bool) -> Result<Vec<&'static str>> {
    if dry_run {
        let memory = MemoryStorage::new();
        for table in store::TABLE_NAMES {
            if storage.exists(table) {
                memory.insert(table, Vec::<u8>::new());
            }
        }
        return Ok(RecordStore::init(&memory)?);
    }

    storage
        .create_dir()
        .with_context(|| format!("Failed to create data directory: {}", storage.describe()))?;
    Ok(RecordStore::init(storage)?)
}

fn run<S: TableStorage>(store: &mut RecordStore<S>, command: RecordCommands) -> Result<()> {
    match command {
        RecordCommands::Home { limit, json } => {
            let kpis = analytics::kpis(store.tables());
            let recent = views::recent_complaints(store.tables(), limit);
            if json {
                let out = serde_json::json!({ "kpis": kpis, "recent_complaints": recent });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("Quick Stats");
                println!("  Total complaints:    {}", kpis.total_complaints);
                println!("  Resolved complaints: {}", kpis.resolved_complaints);
                println!("  Pending complaints:  {}", kpis.pending_complaints);
                println!("  Average rating:      {}", kpis.average_rating);
                println!("  Total users:         {}", kpis.total_users);
                println!("  Total vendors:       {}", kpis.total_vendors);
                println!("\nRecent Complaints");
                if recent.is_empty() {
                    println!("No complaints yet.");
                } else {
                    print_complaints(&recent);
                }
            }
        }

        RecordCommands::User { command } => match command {
            UserCommands::Add { name, state } => {
                let user = store.register_user(&name, state.as_deref())?;
                println!("Added user '{}' ({})", user.name, user.user_id);
            }
            UserCommands::List => {
                let users = store.table::<models::User>();
                if users.is_empty() {
                    println!("No users found.");
                } else {
                    println!("{:<6} {:<30} {:<20}", "ID", "NAME", "STATE");
                    println!("{}", "-".repeat(58));
                    for user in users {
                        println!(
                            "{:<6} {:<30} {:<20}",
                            user.user_id,
                            truncate(&user.name, 28),
                            user.state
                        );
                    }
                }
            }
        },

        RecordCommands::Vendor { command } => match command {
            VendorCommands::Add { name } => {
                let vendor = store.register_vendor(&name)?;
                println!("Added vendor '{}' ({})", vendor.vendor_name, vendor.vendor_id);
            }
            VendorCommands::List => {
                let vendors = store.table::<models::Vendor>();
                if vendors.is_empty() {
                    println!("No vendors found.");
                } else {
                    println!("{:<6} {:<30}", "ID", "NAME");
                    println!("{}", "-".repeat(37));
                    for vendor in vendors {
                        println!(
                            "{:<6} {:<30}",
                            vendor.vendor_id,
                            truncate(&vendor.vendor_name, 28)
                        );
                    }
                }
            }
            VendorCommands::Show { name } => {
                let vendor_id = lookup::find_vendor(store, &name)?.vendor_id.clone();
                let summary = analytics::vendor_summary(store.tables(), &vendor_id)
                    .with_context(|| format!("Vendor {} not found", vendor_id))?;

                println!("Vendor {} - {}", summary.vendor_id, summary.vendor_name);
                println!("  Total complaints: {}", summary.total_complaints);
                println!("  Resolved:         {}", summary.resolved_complaints);
                println!("  Pending:          {}", summary.pending_complaints);
                println!("  Avg. rating:      {}", summary.average_rating);

                println!("\nComplaints");
                let complaints = views::vendor_complaints(store.tables(), &vendor_id);
                if complaints.is_empty() {
                    println!("No complaints for this vendor.");
                } else {
                    print_complaints(&complaints);
                }

                println!("\nReviews");
                let reviews = views::vendor_reviews(store.tables(), &vendor_id);
                if reviews.is_empty() {
                    println!("No reviews for this vendor.");
                } else {
                    print_reviews(&reviews);
                }
            }
        },

        RecordCommands::Product { command } => match command {
            ProductCommands::Add { name, vendor, fssai } => {
                let vendor_id = lookup::find_vendor(store, &vendor)?.vendor_id.clone();
                let product = store.register_product(&name, &vendor_id, fssai.as_deref())?;
                println!(
                    "Added product '{}' ({}) for vendor {}",
                    product.product_name, product.product_id, product.vendor_id
                );
            }
            ProductCommands::List => {
                let names = views::Names::new(store.tables());
                let products = store.table::<models::Product>();
                if products.is_empty() {
                    println!("No products found.");
                } else {
                    println!("{:<6} {:<28} {:<20} {:<16}", "ID", "NAME", "VENDOR", "FSSAI");
                    println!("{}", "-".repeat(73));
                    for product in products {
                        let vendor = names
                            .vendor(&product.vendor_id)
                            .unwrap_or(views::UNKNOWN_NAME);
                        println!(
                            "{:<6} {:<28} {:<20} {:<16}",
                            product.product_id,
                            truncate(&product.product_name, 26),
                            truncate(vendor, 18),
                            product.fssai_code.as_deref().unwrap_or("-")
                        );
                    }
                }
            }
        },

        RecordCommands::Complaint { command } => match command {
            ComplaintCommands::Submit {
                submitter,
                product,
                text,
                priority,
                status,
            } => {
                let submitter = submitter.resolve(store)?;
                let product_id = lookup::find_product(store, &product)?.product_id.clone();
                let form = ComplaintForm {
                    submitter,
                    product_id,
                    text,
                    priority,
                    status,
                };
                let complaint = store.submit_complaint(form, now())?;
                let vendor_name = views::Names::new(store.tables())
                    .vendor(&complaint.vendor_id)
                    .unwrap_or(views::UNKNOWN_NAME)
                    .to_string();
                println!("Complaint {} submitted successfully!", complaint.complaint_id);
                println!("  Vendor: {}", vendor_name);
                println!("  FSSAI Code: {}", complaint.fssai_code);
            }
            ComplaintCommands::List { status, json } => {
                let rows = views::complaint_rows(store.tables(), status);
                if json {
                    println!("{}", serde_json::to_string_pretty(&rows)?);
                } else if rows.is_empty() {
                    println!("No complaints found.");
                } else {
                    print_complaints(&rows);
                }
            }
            ComplaintCommands::Status { id, status } => {
                let complaint = store.set_complaint_status(&id, status)?;
                println!(
                    "Complaint {} status updated to {}!",
                    complaint.complaint_id, complaint.complaint_status
                );
            }
            ComplaintCommands::Browse { status } => {
                tui::run_browse(store, status)?;
            }
        },

        RecordCommands::Review { command } => match command {
            ReviewCommands::Submit {
                submitter,
                product,
                rating,
                text,
                sentiment,
            } => {
                let submitter = submitter.resolve(store)?;
                let product_id = lookup::find_product(store, &product)?.product_id.clone();
                let form = ReviewForm {
                    submitter,
                    product_id,
                    rating,
                    text,
                    sentiment,
                };
                let review = store.submit_review(form, now())?;
                println!("Review {} submitted successfully!", review.review_id);
            }
            ReviewCommands::List { json } => {
                let rows = views::review_rows(store.tables());
                if json {
                    println!("{}", serde_json::to_string_pretty(&rows)?);
                } else if rows.is_empty() {
                    println!("No reviews found.");
                } else {
                    print_reviews(&rows);
                }
            }
        },

        RecordCommands::Analytics { limit, json } => {
            let tables = store.tables();
            let kpis = analytics::kpis(tables);
            let by_product = analytics::top_products_by_complaints(tables, limit);
            let by_vendor = analytics::top_vendors_by_complaints(tables, limit);
            let by_rating = analytics::top_products_by_rating(tables, limit);

            if json {
                let out = serde_json::json!({
                    "kpis": kpis,
                    "top_products_by_complaints": by_product,
                    "top_vendors_by_complaints": by_vendor,
                    "top_products_by_rating": by_rating,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!(
                    "Complaints: {} total, {} resolved, {} pending | Avg rating: {} | Users: {}",
                    kpis.total_complaints,
                    kpis.resolved_complaints,
                    kpis.pending_complaints,
                    kpis.average_rating,
                    kpis.total_users
                );
                print_ranked(&format!("Top {} Products by Complaints", limit), &by_product, 0);
                print_ranked(&format!("Top {} Vendors by Complaints", limit), &by_vendor, 0);
                if !by_rating.is_empty() {
                    print_ranked(&format!("Top {} Products by Rating", limit), &by_rating, 2);
                }
            }
        }
    }

    Ok(())
}

impl SubmitterArgs {
    fn resolve<S: TableStorage>(self, store: &RecordStore<S>) -> Result<Submitter> {
        match (self.user, self.new_user) {
            (Some(user), None) => Ok(Submitter::Existing(
                lookup::find_user(store, &user)?.user_id.clone(),
            )),
            (None, Some(name)) => Ok(Submitter::New(name)),
            _ => bail!("Specify exactly one of --user or --new-user"),
        }
    }
}

fn run_chat(question: Option<&str>, lang: chatbot::Language, examples: bool) -> Result<()> {
    if examples {
        for (i, q) in chatbot::examples(lang).enumerate() {
            println!("{}. {}", i + 1, q);
        }
        return Ok(());
    }

    match question.map(str::trim) {
        Some(q) if !q.is_empty() => {
            println!("{}", chatbot::respond(q, lang));
            Ok(())
        }
        _ => bail!("Please type a question / कृपया एक प्रश्न टाइप करें"),
    }
}

fn print_complaints(rows: &[ComplaintRow]) {
    println!(
        "{:<6} {:<16} {:<18} {:<16} {:<9} {:<7} {:<19}",
        "ID", "USER", "PRODUCT", "VENDOR", "STATUS", "PRIO", "DATE"
    );
    println!("{}", "-".repeat(97));
    for row in rows {
        println!(
            "{:<6} {:<16} {:<18} {:<16} {:<9} {:<7} {:<19}",
            row.complaint_id,
            truncate(&row.user_name, 14),
            truncate(&row.product_name, 16),
            truncate(&row.vendor_name, 14),
            row.status,
            row.priority,
            row.date.format(timestamp::FORMAT)
        );
        if !row.text.is_empty() {
            println!("       {}", truncate(&row.text, 88));
        }
    }
}

fn print_reviews(rows: &[ReviewRow]) {
    println!(
        "{:<6} {:<16} {:<18} {:<16} {:>6} {:<9} {:<19}",
        "ID", "USER", "PRODUCT", "VENDOR", "RATING", "MOOD", "DATE"
    );
    println!("{}", "-".repeat(96));
    for row in rows {
        println!(
            "{:<6} {:<16} {:<18} {:<16} {:>6} {:<9} {:<19}",
            row.review_id,
            truncate(&row.user_name, 14),
            truncate(&row.product_name, 16),
            truncate(&row.vendor_name, 14),
            row.rating,
            row.sentiment,
            row.date.format(timestamp::FORMAT)
        );
        if !row.text.is_empty() {
            println!("       {}", truncate(&row.text, 88));
        }
    }
}

fn print_ranked(title: &str, ranked: &[analytics::Ranked], precision: usize) {
    println!("\n{}", title);
    if ranked.is_empty() {
        println!("  (no data)");
        return;
    }
    let max = ranked.iter().map(|r| r.value).fold(0.0_f64, f64::max);
    for r in ranked {
        let width = if max > 0.0 { (r.value / max * 30.0).round() as usize } else { 0 };
        println!(
            "  {:<24} {:>6.prec$} {}",
            truncate(&r.name, 22),
            r.value,
            "#".repeat(width),
            prec = precision
        );
    }
}

fn now() -> chrono::NaiveDateTime {
    use chrono::Timelike;

    let now = chrono::Local::now().naive_local();
    // Stored at second precision.
    now.with_nanosecond(0).unwrap_or(now)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::tempdir;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_dry_run_init_writes_nothing() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("data");
        let storage = FileStorage::new(&data);

        let planned = init_tables(&storage, true).unwrap();
        assert_eq!(planned, store::TABLE_NAMES.to_vec());
        assert!(!data.exists());

        let created = init_tables(&storage, false).unwrap();
        assert_eq!(created, planned);
        assert!(data.join("users.csv").is_file());
        assert!(init_tables(&storage, true).unwrap().is_empty());
    }

    #[test]
    fn test_record_commands_parse_at_top_level() {
        let cli = Cli::try_parse_from(["feedhub", "--dry-run", "init"]).unwrap();
        assert!(cli.dry_run);
        assert!(matches!(cli.command, Commands::Init));

        let args = ["feedhub", "complaint", "status", "C001", "resolved"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Records(RecordCommands::Complaint {
                command: ComplaintCommands::Status {
                    status: ComplaintStatus::Resolved,
                    ..
                }
            })
        ));
    }
}
