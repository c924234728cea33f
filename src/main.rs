// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! stemlab CLI
//!
//! Account and content management against the STEM lab backend from the
//! terminal. The session is kept in a token file between runs.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use stemlab_client::{
    client::{ApiClient, UploadFile},
    config::ClientConfig,
    error::ApiError,
    models::{
        ChangePasswordRequest, ContactRequest, GalleryFilter, LoginRequest, PostFilter,
        PostStatus, RegisterRequest,
    },
    notify::{Navigator, Notifier},
    otp::OtpLogin,
    storage::FileTokenStore,
    Api,
};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "stemlab", version, about = "STEM lab site API client")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "STEMLAB_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long, env = "STEMLAB_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// One-time passcode login
    #[command(subcommand)]
    Otp(OtpCommand),
    /// End the current session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Change the account password
    Password {
        #[arg(long, env = "STEMLAB_PASSWORD", hide_env_values = true)]
        current: String,
        #[arg(long)]
        new: String,
    },
    /// List blog posts
    Posts {
        #[arg(long)]
        status: Option<PostStatus>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show one blog post by slug
    Post { slug: String },
    /// List blog categories
    Categories,
    /// List FAQs in display order
    Faqs {
        #[arg(long)]
        category: Option<String>,
    },
    /// List testimonials
    Testimonials {
        /// Include inactive testimonials
        #[arg(long)]
        all: bool,
    },
    /// Gallery images
    #[command(subcommand)]
    Gallery(GalleryCommand),
    /// Upload files and print their URLs
    Upload {
        #[arg(required = true)]
        files: Vec<std::path::PathBuf>,
        #[arg(long)]
        folder: Option<String>,
    },
    /// Send a contact enquiry
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        message: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        school: Option<String>,
        #[arg(long)]
        city: Option<String>,
    },
    /// Admin dashboard statistics
    Dashboard,
}

#[derive(Subcommand)]
enum OtpCommand {
    /// Send a code to an email address or phone number
    Send { identifier: String },
    /// Verify a code received earlier
    Verify { identifier: String, code: String },
    /// Interactive: send a code, then prompt for it (type `r` to resend)
    Login { identifier: String },
}

#[derive(Subcommand)]
enum GalleryCommand {
    List {
        #[arg(long)]
        folder: Option<String>,
    },
    Upload {
        #[arg(required = true)]
        files: Vec<std::path::PathBuf>,
        #[arg(long)]
        folder: Option<String>,
    },
}

/// Prints notifications for a terminal user.
struct CliNotifier;

impl Notifier for CliNotifier {
    fn success(&self, message: &str) {
        eprintln!("✓ {message}");
    }

    fn error(&self, message: &str) {
        eprintln!("✗ {message}");
    }

    fn session_expired(&self) {
        eprintln!("✗ Session expired. Please log in again.");
    }
}

struct CliNavigator;

impl Navigator for CliNavigator {
    fn redirect_to_login(&self, _login_path: &str) {
        eprintln!("  Run `stemlab login` or `stemlab otp login` to start a new session.");
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Everything else was already shown by the notifier
            match err.downcast_ref::<ApiError>() {
                Some(ApiError::InvalidInput(msg)) => eprintln!("error: {msg}"),
                Some(e @ ApiError::Config(_)) => eprintln!("error: {e}"),
                Some(_) => {}
                None => eprintln!("error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> anyhow::Result<()> {
    let config = ClientConfig::from_env().context("Failed to load configuration")?;
    tracing::debug!(api_url = %config.api_url, token_file = %config.token_file.display(), "Starting");

    let client = ApiClient::builder()
        .config(&config)
        .token_store(Arc::new(FileTokenStore::new(&config.token_file)))
        .notifier(Arc::new(CliNotifier))
        .navigator(Arc::new(CliNavigator))
        .build()?;
    let api = Api::new(client);

    match command {
        Command::Login { email, password } => {
            let session = api.auth.login(&LoginRequest { email, password }).await?;
            eprintln!("Logged in as {}", session.user.name);
        }
        Command::Register {
            name,
            email,
            phone,
            password,
        } => {
            let session = api
                .auth
                .register(&RegisterRequest {
                    name,
                    email,
                    phone,
                    password,
                })
                .await?;
            eprintln!("Registered and logged in as {}", session.user.name);
        }
        Command::Otp(OtpCommand::Send { identifier }) => {
            api.auth.send_otp(&identifier).await?;
            eprintln!("Code sent to {identifier}");
        }
        Command::Otp(OtpCommand::Verify { identifier, code }) => {
            let session = api.auth.verify_otp(&identifier, &code).await?;
            eprintln!("Logged in as {}", session.user.name);
        }
        Command::Otp(OtpCommand::Login { identifier }) => otp_login(&api, &identifier).await?,
        Command::Logout => api.auth.logout().await?,
        Command::Whoami => print_json(&api.auth.profile().await?)?,
        Command::Password { current, new } => {
            api.auth
                .change_password(&ChangePasswordRequest {
                    current_password: current,
                    new_password: new,
                })
                .await?
        }
        Command::Posts {
            status,
            category,
            search,
            page,
            limit,
        } => {
            let filter = PostFilter {
                status,
                category,
                search,
                page: Some(page),
                limit,
            };
            let page = api.blog.list_posts(&filter).await?;
            print_json(&page)?;
            eprintln!(
                "page {} of {} ({} posts)",
                page.meta.page,
                page.total_pages(),
                page.meta.total
            );
        }
        Command::Post { slug } => print_json(&api.blog.get_post_by_slug(&slug).await?)?,
        Command::Categories => print_json(&api.blog.list_categories().await?)?,
        Command::Faqs { category } => print_json(&api.faqs.list(category.as_deref()).await?)?,
        Command::Testimonials { all } => print_json(&api.testimonials.list(!all).await?)?,
        Command::Gallery(GalleryCommand::List { folder }) => {
            let filter = GalleryFilter {
                folder,
                ..GalleryFilter::default()
            };
            print_json(&api.gallery.list(&filter).await?)?
        }
        Command::Gallery(GalleryCommand::Upload { files, folder }) => {
            let files = read_files(&files).await?;
            print_json(&api.gallery.upload_images(files, folder).await?)?
        }
        Command::Upload { files, folder } => {
            let files = read_files(&files).await?;
            print_json(&api.gallery.upload_files(files, folder).await?)?
        }
        Command::Contact {
            name,
            email,
            message,
            phone,
            school,
            city,
        } => {
            let receipt = api
                .contact
                .submit(&ContactRequest {
                    name,
                    email,
                    phone,
                    school_name: school,
                    city,
                    message,
                })
                .await?;
            print_json(&receipt)?
        }
        Command::Dashboard => print_json(&api.dashboard.stats().await?)?,
    }

    Ok(())
}

/// Send a code, then read it from stdin. `r` requests a resend.
async fn otp_login(api: &Api, identifier: &str) -> anyhow::Result<()> {
    let mut flow = OtpLogin::new(api.auth.clone());
    flow.send_code(identifier).await?;
    eprintln!("Code sent to {identifier}. Enter it below (or `r` to resend).");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        if input.eq_ignore_ascii_case("r") {
            let wait = flow.resend_remaining(chrono::Utc::now());
            if wait > 0 {
                eprintln!("You can resend in {wait}s");
                continue;
            }
            flow.resend_code().await?;
            eprintln!("New code sent");
            continue;
        }

        match flow.verify(input).await {
            Ok(session) => {
                eprintln!("Logged in as {}", session.user.name);
                return Ok(());
            }
            Err(ApiError::InvalidInput(msg)) => eprintln!("{msg}"),
            // The server rejected the code; the notifier already said why
            Err(ApiError::Unauthorized(_)) | Err(ApiError::Validation { .. }) => {}
            Err(ApiError::Api { status: 400, .. }) => {}
            Err(e) => return Err(e.into()),
        }
    }

    anyhow::bail!("No code entered")
}

async fn read_files(paths: &[std::path::PathBuf]) -> anyhow::Result<Vec<UploadFile>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        files.push(UploadFile::from_path(path).await?);
    }
    Ok(files)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Initialize structured JSON logging on stderr.
fn init_logging(verbose: bool) {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let level = if verbose { "debug" } else { "warn" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("stemlab_client={level}").parse().unwrap())
                .add_directive("warn".parse().unwrap()),
        )
        .with(format)
        .init();
}
