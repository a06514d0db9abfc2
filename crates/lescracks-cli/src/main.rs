use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use sqlx::PgPool;

use lescracks_cli::admin::create_admin;
use lescracks_cli::seeder::{self, SeedConfig};
use lescracks_config::DatabaseConfig;
use lescracks_db::{init_db_pool, run_migrations};

#[derive(Parser)]
#[command(name = "lescracks-cli")]
#[command(about = "LesCracks CLI - Administrative tools for LesCracks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an admin account
    CreateAdmin {
        /// Display name
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with fake categories, tags, courses, events and documents
    Seed {
        #[arg(long, default_value = "6")]
        categories: usize,

        #[arg(long, default_value = "15")]
        tags: usize,

        #[arg(long, default_value = "30")]
        courses: usize,

        #[arg(long, default_value = "10")]
        events: usize,

        #[arg(long, default_value = "10")]
        documents: usize,
    },
    /// Delete all catalogue data (keeps admins)
    ClearSeed,
}

fn fail(context: &str, e: impl std::fmt::Display) -> ! {
    eprintln!("\n❌ {}: {}", context, e);
    std::process::exit(1);
}

async fn connect() -> PgPool {
    let config = DatabaseConfig::from_env().unwrap_or_else(|e| fail("Invalid configuration", e));
    let pool = init_db_pool(&config)
        .await
        .unwrap_or_else(|e| fail("Failed to connect to database", e));
    run_migrations(&pool)
        .await
        .unwrap_or_else(|e| fail("Failed to run migrations", e));
    pool
}

fn prompt(label: &str) -> String {
    Input::new()
        .with_prompt(label)
        .interact_text()
        .unwrap_or_else(|e| fail("Failed to read input", e))
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();
    let pool = connect().await;

    match cli.command {
        Commands::CreateAdmin {
            name,
            email,
            password,
        } => handle_create_admin(&pool, name, email, password).await,
        Commands::Seed {
            categories,
            tags,
            courses,
            events,
            documents,
        } => {
            let config = SeedConfig::new(categories, tags)
                .with_courses(courses)
                .with_events(events)
                .with_documents(documents);
            if let Err(e) = seeder::seed_all(&pool, config).await {
                fail("Error seeding database", e);
            }
        }
        Commands::ClearSeed => {
            if let Err(e) = seeder::clear_all(&pool).await {
                fail("Error clearing seeded data", e);
            }
        }
    }
}

async fn handle_create_admin(
    pool: &PgPool,
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) {
    let name = name.unwrap_or_else(|| prompt("Name"));
    let email = email.unwrap_or_else(|| prompt("Email address"));
    let password = password.unwrap_or_else(|| {
        Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .unwrap_or_else(|e| fail("Failed to read password", e))
    });

    match create_admin(pool, &name, &email, &password).await {
        Ok(id) => {
            println!("\n✅ Admin created successfully!");
            println!("   ID: {}", id);
            println!("   Email: {}", email.trim().to_lowercase());
            println!("   Name: {}", name.trim());
        }
        Err(e) => fail("Error creating admin", e),
    }
}
