use clap::{Parser, Subcommand};
use tracing::{error, info};

use helpster::config::Config;
use helpster::directory::DirectoryEngine;
use helpster::logging;
use helpster::registry::CategoryRegistry;
use helpster::store::{DirectoryStore, SupabaseStore};
use helpster::types::{DirectoryView, FilterPredicate, HelperDraft, SocialLinks};
use helpster::workflow::{CreationWorkflow, HelperForm, SubmitOutcome};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "helpster")]
#[command(about = "Helpster helper directory client")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List helpers, optionally narrowed by category and name search
    List {
        /// Exact category to filter by
        #[arg(long)]
        category: Option<String>,
        /// Case-insensitive first/last name substring
        #[arg(long)]
        search: Option<String>,
    },
    /// List the known categories
    Categories,
    /// Register a new helper profile
    Add {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        category: String,
        /// Treat the category as newly typed rather than picked from the list
        #[arg(long)]
        new_category: bool,
        #[arg(long, default_value = "")]
        instagram: String,
        #[arg(long, default_value = "")]
        twitter: String,
        #[arg(long, default_value = "")]
        linkedin: String,
    },
}

fn print_view(view: &DirectoryView) {
    if let Some(err) = &view.last_error {
        println!("\n⚠️  {} (showing the last good list)", err);
    }
    println!("\n📋 {} helper(s):", view.helpers.len());
    for helper in &view.helpers {
        println!("   {} [{}]", helper.full_name(), helper.category);
        println!("      {}", helper.description);
        for (platform, link) in helper.social_media.entries() {
            if let Some(url) = link {
                println!("      {}: {}", platform, url);
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load()?;
    let store: Arc<dyn DirectoryStore> = Arc::new(SupabaseStore::from_config(&config.store)?);

    match cli.command {
        Commands::List { category, search } => {
            let engine = DirectoryEngine::new(store);
            let predicate = FilterPredicate::new(category, search);
            let view = engine.fetch(predicate).await;
            print_view(&view);
        }
        Commands::Categories => {
            let registry = CategoryRegistry::new(store);
            match registry.load().await {
                Ok(names) => {
                    println!("\n🏷️  {} categories:", names.len());
                    for name in names {
                        println!("   {}", name);
                    }
                }
                Err(e) => {
                    error!("Failed to load categories: {}", e);
                    return Err(e.into());
                }
            }
        }
        Commands::Add {
            first_name,
            last_name,
            description,
            category,
            new_category,
            instagram,
            twitter,
            linkedin,
        } => {
            let registry = Arc::new(CategoryRegistry::new(store.clone()));
            let engine = Arc::new(DirectoryEngine::new(store.clone()));

            // Populate the registry so the known-category check sees the
            // store's current names.
            registry.load().await?;

            let workflow = CreationWorkflow::new(store, registry, engine.clone());
            let form = HelperForm {
                draft: HelperDraft {
                    first_name,
                    last_name,
                    description,
                    category,
                    social_media: SocialLinks {
                        instagram,
                        twitter,
                        linkedin,
                    },
                },
                new_category,
            };

            match workflow.submit(&form).await {
                Ok(SubmitOutcome::Created(helper)) => {
                    info!("Submission succeeded");
                    println!("\n✅ Added helper {}", helper.full_name());
                    if helper.id.is_none() {
                        println!("   (store did not echo the new row; it will appear after the next refresh)");
                    }
                    print_view(&engine.snapshot());
                }
                Ok(SubmitOutcome::Ignored) => {
                    println!("\n⚠️  Submission ignored: another one was already in flight");
                }
                Err(e) => {
                    error!("Submission failed: {}", e);
                    return Err(e.into());
                }
            }
        }
    }

    Ok(())
}
