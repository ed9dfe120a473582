//! # Seed Data Generator
//!
//! Populates the database with demo venues, coaches, equipment and slots.
//!
//! ## Usage
//! ```bash
//! # One week of hourly slots (default)
//! cargo run -p courtside-db --bin seed
//!
//! # Custom window and database path
//! cargo run -p courtside-db --bin seed -- --db ./courtside.db --days 14
//! ```
//!
//! ## Generated Data
//! - One venue owner (`owner-demo`) with a court in each city
//! - Coaches serving one or more cities, one of them unverified
//! - Rackets, shuttlecocks and balls per venue
//! - Hourly slots 08:00-22:00 starting today, for venues and coaches

use chrono::{Duration, NaiveTime, Utc};
use courtside_core::{Money, SlotKind};
use courtside_db::{Database, DbConfig};
use std::env;

/// (name, city, rate)
const VENUES: &[(&str, &str, i64)] = &[
    ("Arena Badminton Dago", "Bandung", 100_000),
    ("Senayan Futsal Court", "Jakarta", 150_000),
    ("Surabaya Tennis Club", "Surabaya", 120_000),
];

/// (name, rate, service areas, verified)
const COACHES: &[(&str, i64, &[&str], bool)] = &[
    ("Rina Kusuma", 50_000, &["Bandung", "Jakarta"], true),
    ("Agus Prasetyo", 75_000, &["Jakarta"], true),
    ("Dewi Lestari", 60_000, &["Surabaya", "Bandung"], true),
    ("Budi Santoso", 40_000, &["Bandung"], false),
];

/// (name, unit price, stock)
const EQUIPMENT: &[(&str, i64, i64)] = &[
    ("Racket", 20_000, 10),
    ("Shuttlecock (tube)", 35_000, 25),
    ("Ball", 10_000, 15),
];

const FIRST_HOUR: u32 = 8;
const LAST_HOUR: u32 = 22;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut days: i64 = 7;
    let mut db_path = "./courtside.db".to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--days" | "-n" => {
                if i + 1 < args.len() {
                    days = args[i + 1].parse().unwrap_or(7);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Courtside Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -n, --days <N>     Days of slots to generate (default: 7)");
                println!("  -d, --db <PATH>    Database file path (default: ./courtside.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Courtside Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!("Days:     {}", days);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.catalog().list_venues().await?;
    if !existing.is_empty() {
        println!("⚠ Database already has {} venues", existing.len());
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = std::time::Instant::now();
    let today = Utc::now().date_naive();
    let mut slot_count = 0;

    println!();
    println!("Generating venues...");
    for (name, city, rate) in VENUES {
        let venue = db.catalog().insert_venue("owner-demo", name, city, *rate).await?;
        println!("  {} ({}) rate {}", venue.name, venue.city, Money::from_minor(venue.rate));

        for (item, price, stock) in EQUIPMENT {
            db.equipment().insert(&venue.id, item, *price, *stock).await?;
        }

        slot_count += generate_slots(&db, SlotKind::Venue, &venue.id, today, days).await?;
    }

    println!();
    println!("Generating coaches...");
    for (index, (name, rate, areas, verified)) in COACHES.iter().enumerate() {
        let user_id = format!("coach-demo-{}", index + 1);
        let coach = db
            .catalog()
            .insert_coach(&user_id, name, *rate, areas, *verified)
            .await?;
        println!(
            "  {} rate {} [{}]{}",
            coach.name,
            Money::from_minor(coach.rate),
            coach.service_areas,
            if coach.is_verified { "" } else { " (unverified)" }
        );

        slot_count += generate_slots(&db, SlotKind::Coach, &coach.id, today, days).await?;
    }

    println!();
    println!("✓ Generated {} slots in {:?}", slot_count, start.elapsed());
    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Inserts hourly slots for one owner over `days` days.
async fn generate_slots(
    db: &Database,
    kind: SlotKind,
    owner_id: &str,
    today: chrono::NaiveDate,
    days: i64,
) -> Result<usize, Box<dyn std::error::Error>> {
    let mut count = 0;

    for day in 0..days {
        let date = today + Duration::days(day);
        for hour in FIRST_HOUR..LAST_HOUR {
            let (Some(start), Some(end)) = (
                NaiveTime::from_hms_opt(hour, 0, 0),
                NaiveTime::from_hms_opt(hour + 1, 0, 0),
            ) else {
                continue;
            };

            if let Err(e) = db.slots().insert(kind, owner_id, date, start, end).await {
                eprintln!("Failed to insert slot {} {}: {}", date, start, e);
                continue;
            }
            count += 1;
        }
    }

    Ok(count)
}
