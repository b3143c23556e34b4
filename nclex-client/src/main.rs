//! nclex-client - Review board command-line client

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use nclex_client::{HttpReviewApi, ListView, NoticeKind, ReviewApi, Session, SubmitError};
use nclex_common::config::ConfigResolver;
use nclex_common::models::{EnglishLevel, PassStatus, Review, RESOURCE_OPTIONS};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "nclex-client")]
#[command(about = "Browse and post NCLEX exam reviews")]
#[command(version)]
struct Args {
    /// Config file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Review API base URL, overrides the config file
    #[arg(long, env = "NCLEX_API_BASE", global = true)]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show aggregate statistics
    Stats,

    /// List reviews matching the filters
    List {
        #[arg(short, long, default_value = "")]
        search: String,
        /// yes, no or all
        #[arg(long, default_value = "all")]
        working: String,
        /// High, Medium, Low or all
        #[arg(long, default_value = "all")]
        level: String,
        #[arg(long, default_value = "all")]
        resource: String,
        #[arg(long)]
        page: Option<u32>,
    },

    /// Show one review with its comments
    Show { id: String },

    /// Like a review
    Like { id: String },

    /// List comments on a review
    Comments { id: String },

    /// Comment on a review
    Comment {
        id: String,
        #[arg(long)]
        author: String,
        #[arg(long)]
        content: String,
    },

    /// Submit a new review
    Submit {
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        #[arg(long)]
        content: String,
        /// Free text, e.g. "3 months" or "1 year"
        #[arg(long, default_value = "")]
        study_period: String,
        #[arg(long, default_value = "Pass")]
        pass_status: PassStatus,
        /// YYYY-MM-DD
        #[arg(long, default_value = "")]
        exam_date: String,
        #[arg(long, default_value = "New Grad")]
        experience: String,
        #[arg(long, default_value = "Medium")]
        level: EnglishLevel,
        #[arg(long)]
        working: bool,
        /// Repeat for each resource used
        #[arg(long = "resource")]
        resources: Vec<String>,
        #[arg(long, default_value = "")]
        center_tips: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nclex_client=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let mut client = ConfigResolver::new(args.config.clone())
        .load()
        .context("Failed to load configuration")?
        .client;
    if let Some(api_base) = args.api_base {
        client.api_base = api_base;
    }
    let api = HttpReviewApi::from_config(&client)?;
    let mut session = Session::new();

    match args.command {
        Command::Stats => {
            session.load_stats(&api).await;
            let stats = session.stats();
            println!("Reviews:          {}", stats.total_reviews);
            println!("Pass rate:        {}%", stats.pass_rate);
            println!("Avg study months: {}", stats.avg_study_months);
        }

        Command::List {
            search,
            working,
            level,
            resource,
            page,
        } => {
            let mut ticket = session
                .update_filters(|f| {
                    f.search = search;
                    f.is_working = working;
                    f.english_level = level;
                    f.resource = resource;
                })
                .unwrap_or_else(|| session.begin_list_fetch());
            if let Some(page) = page {
                ticket.query = ticket.query.with_page(page);
            }
            let page = api
                .fetch_reviews(&ticket.query)
                .await
                .context("Failed to load reviews")?;
            session.apply_list_result(ticket, Ok(page));

            match session.list_view() {
                ListView::Loading => bail!("Failed to load reviews"),
                ListView::Empty => println!("No reviews found. Try resetting the filters."),
                ListView::Results(reviews) => {
                    for review in reviews {
                        print_summary(review);
                    }
                    println!("-- {} total", session.total());
                }
            }
        }

        Command::Show { id } => {
            if !session.select_review(&api, &id).await {
                bail!("Could not load review {}", id);
            }
            if let Some(review) = session.selected_review() {
                print_detail(review);
            }
            print_comments(&session);
        }

        Command::Like { id } => {
            if !session.select_review(&api, &id).await {
                bail!("Could not load review {}", id);
            }
            if let Some(likes) = session.like_selected(&api).await {
                println!("Likes: {}", likes);
            }
        }

        Command::Comments { id } => {
            if !session.select_review(&api, &id).await {
                bail!("Could not load review {}", id);
            }
            print_comments(&session);
        }

        Command::Comment {
            id,
            author,
            content,
        } => {
            if !session.select_review(&api, &id).await {
                bail!("Could not load review {}", id);
            }
            match session.post_comment(&api, &author, &content).await {
                Ok(created) => println!("Comment {} posted", created.id),
                Err(SubmitError::Blocked) => bail!("Author and content are required"),
                Err(SubmitError::Api(_)) => {}
            }
        }

        Command::Submit {
            title,
            author,
            content,
            study_period,
            pass_status,
            exam_date,
            experience,
            level,
            working,
            resources,
            center_tips,
        } => {
            for resource in &resources {
                if !RESOURCE_OPTIONS.contains(&resource.as_str()) {
                    tracing::warn!("Unlisted resource: {}", resource);
                }
            }

            session.open_write();
            let draft = session.draft_mut();
            draft.title = title;
            draft.author = author;
            draft.content = content;
            draft.study_period = study_period;
            draft.pass_status = pass_status;
            draft.exam_date = exam_date;
            draft.experience = experience;
            draft.english_level = level;
            draft.is_working = if working { "yes" } else { "no" }.to_string();
            draft.center_tips = center_tips;
            for resource in &resources {
                draft.toggle_resource(resource);
            }

            match session.submit(&api).await {
                Ok(created) => println!("Review {} created", created.id),
                Err(SubmitError::Blocked) => bail!("Title, author and content are required"),
                Err(SubmitError::Api(_)) => {}
            }
        }
    }

    let mut failed = false;
    for notice in session.take_notices() {
        match notice.kind {
            NoticeKind::Success => println!("{}", notice.message),
            NoticeKind::Failure => {
                eprintln!("{}", notice.message);
                failed = true;
            }
        }
    }
    if failed {
        std::process::exit(1);
    }

    Ok(())
}

fn print_summary(review: &Review) {
    println!(
        "[{}] {} ({}) by {} | {} | {} views, {} likes",
        review.id,
        review.title,
        review.pass_status,
        review.author,
        review.study_period,
        review.view_count,
        review.likes
    );
}

fn print_detail(review: &Review) {
    println!("{}", review.title);
    println!("by {} on {}", review.author, review.created_at);
    println!("Result:       {}", review.pass_status);
    if let Some(date) = &review.exam_date {
        println!("Exam date:    {}", date);
    }
    println!(
        "Study period: {} ({} months)",
        review.study_period, review.study_period_months
    );
    println!(
        "Background:   {}, English {}, {}",
        review.base_info.experience,
        review.base_info.english_level,
        if review.base_info.is_working { "working" } else { "not working" }
    );
    if !review.resources.is_empty() {
        println!("Resources:    {}", review.resources.join(", "));
    }
    println!("Views: {}  Likes: {}", review.view_count, review.likes);
    println!();
    println!("{}", review.content);
    if let Some(tips) = &review.center_tips {
        println!();
        println!("Test center tips: {}", tips);
    }
}

fn print_comments(session: &Session) {
    let comments = session.comments();
    println!();
    println!("Comments ({})", comments.len());
    for comment in comments {
        println!("  {} ({}): {}", comment.author, comment.created_at, comment.content);
    }
}
