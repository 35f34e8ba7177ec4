use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use portal_cli::admin;
use portal_cli::seeder::{self, SeedConfig};
use portal_config::{DatabaseConfig, JwtConfig};
use portal_models::UpdateAccessControlDto;
use sqlx::PgPool;

#[derive(Parser)]
#[command(name = "portal-cli")]
#[command(about = "Student portal CLI - administrative tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an administrator account
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
    /// Print a signed access token for an existing user
    IssueToken {
        #[arg(short = 'u', long)]
        user_id: i64,
    },
    /// Change a student's feature flags or status
    SetAccess {
        #[arg(short = 's', long)]
        student_id: i64,

        #[arg(long)]
        course: Option<bool>,

        #[arg(long)]
        library: Option<bool>,

        #[arg(long)]
        exams: Option<bool>,

        /// One of active, alumni, dropped_out, supplementary, suspended, or none
        #[arg(long)]
        status: Option<String>,
    },
    /// Seed the database with fake degrees, courses, books and students
    Seed {
        #[arg(short = 'd', long, default_value = "3")]
        degrees: usize,

        /// Number of courses per degree
        #[arg(long, default_value = "8")]
        courses: usize,

        /// Number of library books
        #[arg(long, default_value = "50")]
        books: usize,

        /// Number of students per degree
        #[arg(long, default_value = "40")]
        students: usize,
    },
    /// Remove all seeded data
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = run(cli.command).await {
        eprintln!("\n❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn connect() -> anyhow::Result<PgPool> {
    let config = DatabaseConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;
    Ok(sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.url)
        .await?)
}

async fn run(command: Commands) -> anyhow::Result<()> {
    let pool = connect().await?;

    match command {
        Commands::CreateAdmin {
            name,
            email,
            password,
        } => handle_create_admin(&pool, name, email, password).await,
        Commands::IssueToken { user_id } => {
            let token = admin::issue_token(&pool, user_id, &JwtConfig::from_env()).await?;
            println!("{}", token);
            Ok(())
        }
        Commands::SetAccess {
            student_id,
            course,
            library,
            exams,
            status,
        } => {
            let dto = UpdateAccessControlDto {
                status: status.as_deref().map(admin::parse_status).transpose()?,
                access_course: course,
                access_library: library,
                access_exams: exams,
            };
            let record = admin::set_access(&pool, student_id, dto).await?;
            println!("✅ Access control updated for student {}", record.student_id);
            println!(
                "   Status: {}",
                record.status.map_or("none".to_string(), |s| s.to_string())
            );
            println!(
                "   Course: {}  Library: {}  Exams: {}",
                record.access_course, record.access_library, record.access_exams
            );
            Ok(())
        }
        Commands::Seed {
            degrees,
            courses,
            books,
            students,
        } => {
            let config = SeedConfig::new(degrees)
                .with_courses(courses)
                .with_books(books)
                .with_students(students);
            seeder::seed_all(&pool, config).await
        }
        Commands::ClearSeed => seeder::clear_all(&pool).await,
    }
}

async fn handle_create_admin(
    pool: &PgPool,
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let name = match name {
        Some(name) => name,
        None => Input::new().with_prompt("Name").interact_text()?,
    };

    let email = match email {
        Some(email) => email,
        None => Input::new().with_prompt("Email address").interact_text()?,
    };

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()?,
    };

    let user_id = admin::create_admin(pool, &name, &email, &password).await?;

    println!("\n✅ Admin created successfully!");
    println!("   Id: {}", user_id);
    println!("   Email: {}", email);
    println!("   Name: {}", name);
    Ok(())
}
