use crate::infra::{parse_timestamp, InMemoryJobRepository, LoggingOutbox};
use chrono::{DateTime, Duration, Utc};
use clap::Args;
use job_board::error::AppError;
use job_board::listings::{
    JobBoardError, JobBoardService, JobCsvImporter, JobListingView, JobSet, JobStatus, NewJob,
    WorkflowSettings,
};
use std::path::PathBuf;
use std::sync::Arc;

type Board = JobBoardService<InMemoryJobRepository, LoggingOutbox>;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print the visible listings as JSON instead of a text report.
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ImportArgs {
    /// CSV export with Title, Company, City, Region, Country, ... columns.
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Print the imported listings as JSON instead of a text report.
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ExpireArgs {
    /// Reference time for the sweep (RFC 3339 or YYYY-MM-DD). Defaults to now.
    #[arg(long, value_parser = parse_timestamp)]
    pub(crate) now: Option<DateTime<Utc>>,
}

fn build_board(settings: WorkflowSettings) -> (Board, Arc<LoggingOutbox>) {
    let outbox = Arc::new(LoggingOutbox::default());
    let service = JobBoardService::new(
        Arc::new(InMemoryJobRepository::default()),
        outbox.clone(),
        settings,
    );
    (service, outbox)
}

/// Populate a board that exercises every moderation state.
pub(crate) fn seed_board(board: &Board, now: DateTime<Utc>) -> Result<(), JobBoardError> {
    let full_time = board.create_job_type("Full Time")?;
    let contract = board.create_job_type("Contract")?;
    board.create_job_type("Part Time")?;
    let web = board.create_job_category("Web Development")?;
    let embedded = board.create_job_category("Embedded Systems")?;
    board.create_job_category("Data Science")?;

    let backend = board.create_at(
        NewJob::draft("Backend Engineer", "Beale Street Labs", "Memphis", Some("TN"), "USA")
            .featured(),
        now - Duration::days(20),
    )?;
    board.assign_job_type(backend.id, full_time.id)?;
    board.set_category(backend.id, Some(web.id))?;
    board.submit_for_review(backend.id)?;
    board.approve(backend.id)?;

    let django = board.create_at(
        NewJob::draft("Django Developer", "Rhone Analytics", "Lyon", None, "France")
            .with_expires(now + Duration::days(30)),
        now - Duration::days(3),
    )?;
    board.assign_job_type(django.id, contract.id)?;
    board.set_category(django.id, Some(web.id))?;
    board.approve(django.id)?;

    let legacy = board.create_at(
        NewJob::draft("Legacy Maintainer", "Rose City Data", "Portland", Some("OR"), "USA")
            .with_expires(now - Duration::days(1)),
        now - Duration::days(40),
    )?;
    board.approve(legacy.id)?;

    let firmware = board.create_at(
        NewJob::draft("Firmware Engineer", "Hill Country Devices", "Austin", Some("TX"), "USA"),
        now - Duration::days(1),
    )?;
    board.assign_job_type(firmware.id, contract.id)?;
    board.set_category(firmware.id, Some(embedded.id))?;

    board.create_at(
        NewJob::draft("Data Scientist", "Spree Insights", "Berlin", None, "Germany")
            .with_status(JobStatus::Review),
        now - Duration::hours(6),
    )?;

    let spam = board.create_at(
        NewJob::draft("Crypto Rockstar", "", "Anywhere", None, "Earth"),
        now - Duration::hours(2),
    )?;
    board.submit_for_review(spam.id)?;
    board.reject(spam.id)?;

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs, settings: WorkflowSettings) -> Result<(), AppError> {
    let (board, outbox) = build_board(settings);
    seed_board(&board, Utc::now())?;

    let jobs = board.jobs()?;
    let visible = board.visible()?;

    if args.json {
        return print_json(&board, &visible);
    }

    println!("Job board demo");
    print_status_counts(&jobs);

    println!("\nVisible listings");
    for job in &visible {
        let view = board.listing_view(job);
        let previous = board.previous_listing(job.id)?;
        let next = board.next_listing(job.id)?;
        println!(
            "- #{} {} ({}){}{}",
            view.id,
            view.display_name,
            view.display_location,
            if view.is_new { " [new]" } else { "" },
            if view.is_featured { " [featured]" } else { "" },
        );
        println!(
            "    slug {} | previous {} | next {}",
            view.location_slug,
            describe(previous.as_ref().map(|job| job.id)),
            describe(next.as_ref().map(|job| job.id)),
        );
    }

    let types = board.job_types_with_active_jobs()?;
    println!(
        "\nJob types with active jobs: {}",
        join_names(types.iter().map(|job_type| job_type.name.as_str()))
    );
    let categories = board.job_categories_with_active_jobs()?;
    println!(
        "Categories with active jobs: {}",
        join_names(categories.iter().map(|category| category.name.as_str()))
    );

    print_notifications(&outbox)
}

pub(crate) fn run_import(args: ImportArgs, settings: WorkflowSettings) -> Result<(), AppError> {
    let (board, outbox) = build_board(settings);
    let imported = JobCsvImporter::from_path(&args.csv, &board)?;
    let jobs: JobSet = imported.into_iter().collect();

    if args.json {
        return print_json(&board, &jobs);
    }

    println!("Imported {} listings from {}", jobs.count(), args.csv.display());
    print_status_counts(&jobs);
    print_notifications(&outbox)
}

pub(crate) fn run_expire(args: ExpireArgs, settings: WorkflowSettings) -> Result<(), AppError> {
    let now = args.now.unwrap_or_else(Utc::now);
    let (board, _) = build_board(settings);
    seed_board(&board, Utc::now())?;

    let expired = board.expire_stale(now)?;
    println!("Expiry sweep at {}", now.format("%Y-%m-%d %H:%M UTC"));
    if expired.is_empty() {
        println!("No listings past their expiry date");
    } else {
        for id in &expired {
            let job = board.get(*id)?;
            println!("- expired #{} {}", job.id, job.display_name());
        }
    }

    print_status_counts(&board.jobs()?);
    Ok(())
}

fn print_status_counts(jobs: &JobSet) {
    println!("\nListings by status");
    for status in JobStatus::ordered() {
        println!("- {}: {}", status.label(), jobs.with_status(status).count());
    }
}

fn print_notifications(outbox: &LoggingOutbox) -> Result<(), AppError> {
    let sent = outbox.sent().map_err(JobBoardError::from)?;
    if sent.is_empty() {
        println!("\nNotifications: none");
        return Ok(());
    }

    println!("\nNotifications");
    for notification in sent {
        println!(
            "- to {}: {}",
            notification.recipients.join(", "),
            notification.subject
        );
    }
    Ok(())
}

fn print_json(board: &Board, jobs: &JobSet) -> Result<(), AppError> {
    let views: Vec<JobListingView> = jobs.iter().map(|job| board.listing_view(job)).collect();
    let rendered = serde_json::to_string_pretty(&views).map_err(std::io::Error::from)?;
    println!("{rendered}");
    Ok(())
}

fn describe(id: Option<job_board::listings::JobId>) -> String {
    match id {
        Some(id) => format!("#{id}"),
        None => "none".to_string(),
    }
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    let joined = names.collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        "none".to_string()
    } else {
        joined
    }
}
