use anyhow::Context;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use storefront_cli::seeder::{self, SeedConfig};
use storefront_config::{AppConfig, DatabaseConfig};
use storefront_core::hash_password_with_cost;
use storefront_db::{
    PgPool, PgProductStore, PgUserStore, UserStore, init_db_pool, run_migrations, seed_defaults,
};
use storefront_models::{CreateUserDto, NewUser, UserRole};
use validator::Validate;

#[derive(Parser)]
#[command(name = "storefront-cli")]
#[command(about = "Storefront CLI - Administrative tools for the Storefront API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Create a new administrator account
    CreateAdmin {
        /// Username (letters and digits, 3-30 characters)
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the default admin and the sample catalogue
    SeedDefaults,
    /// Seed the database with fake products and users
    Seed {
        /// Number of products to create
        #[arg(short = 'p', long, default_value = "50")]
        products: usize,

        /// Number of regular users to create
        #[arg(short = 'u', long, default_value = "10")]
        users: usize,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();
    let app_config = AppConfig::from_env();

    let pool = match init_db_pool(&DatabaseConfig::from_env()).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("❌ Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Migrate => handle_migrate(&pool).await,
        Commands::CreateAdmin {
            username,
            email,
            password,
        } => handle_create_admin(&pool, &app_config, username, email, password).await,
        Commands::SeedDefaults => handle_seed_defaults(&pool, &app_config).await,
        Commands::Seed { products, users } => {
            handle_seed(&pool, &app_config, SeedConfig::new(products, users)).await
        }
    };

    if let Err(e) = result {
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn handle_migrate(pool: &PgPool) -> anyhow::Result<()> {
    run_migrations(pool)
        .await
        .context("failed to run migrations")?;
    println!("✅ Migrations applied");
    Ok(())
}

async fn handle_create_admin(
    pool: &PgPool,
    app_config: &AppConfig,
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let username = match username {
        Some(username) => username,
        None => Input::<String>::new()
            .with_prompt("Username")
            .interact_text()
            .context("failed to read username")?,
    };

    let email = match email {
        Some(email) => email,
        None => Input::<String>::new()
            .with_prompt("Email address")
            .interact_text()
            .context("failed to read email")?,
    };

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .context("failed to read password")?,
    };

    let dto = CreateUserDto {
        username: username.trim().to_string(),
        email: email.trim().to_lowercase(),
        password,
        role: Some(UserRole::Admin),
    };
    if let Err(errors) = dto.validate() {
        for violation in storefront_core::errors::violations(&errors) {
            eprintln!("   {}: {}", violation.field, violation.message);
        }
        anyhow::bail!("invalid admin details");
    }

    let password_hash = hash_password_with_cost(&dto.password, app_config.bcrypt_cost)
        .map_err(|e| e.error)?;

    let users = PgUserStore::new(pool.clone());
    let user = users
        .create(NewUser {
            username: dto.username,
            email: dto.email,
            password_hash,
            role: UserRole::Admin,
        })
        .await
        .map_err(|e| e.error)?;

    println!("\n✅ Admin created successfully!");
    println!("   Id: {}", user.id);
    println!("   Username: {}", user.username);
    println!("   Email: {}", user.email);
    Ok(())
}

async fn handle_seed_defaults(pool: &PgPool, app_config: &AppConfig) -> anyhow::Result<()> {
    let users = PgUserStore::new(pool.clone());
    let products = PgProductStore::new(pool.clone());

    let report = seed_defaults(&users, &products, app_config.bcrypt_cost)
        .await
        .map_err(|e| e.error)?;

    if report.admin_created {
        println!("✅ Default admin created");
    } else {
        println!("ℹ️  Default admin already exists");
    }
    println!("✅ Created {} sample products", report.products_created);
    Ok(())
}

async fn handle_seed(
    pool: &PgPool,
    app_config: &AppConfig,
    config: SeedConfig,
) -> anyhow::Result<()> {
    let users = PgUserStore::new(pool.clone());
    let products = PgProductStore::new(pool.clone());

    seeder::seed_fake(&users, &products, config, app_config.bcrypt_cost)
        .await
        .map_err(|e| e.error)?;
    Ok(())
}
