// ABOUTME: Demo data generator for local development
// ABOUTME: Registers random coaches and spreads coaching requests over recent weeks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Coachhub Contributors

//! # Demo Data Seeder
//!
//! Requests are created through the same service the API uses, so every request
//! also lands in its weekly aggregate.
//!
//! ```bash
//! cargo run --bin seed-demo-data
//! cargo run --bin seed-demo-data -- --coaches 5 --requests 300 --weeks 8 --seed 42
//! ```

use chrono::{Duration, Utc};
use clap::Parser;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use coachhub::config::ServerConfig;
use coachhub::database::Database;
use coachhub::logging::init_logging;
use coachhub::resources::ServerResources;
use coachhub_core::errors::AppResult;
use coachhub_core::models::{Coach, CoachRole, CreateCoachRequest, CreateCoachingRequest};

const FIRST_NAMES: &[&str] = &[
    "Ada", "Grace", "Alan", "Barbara", "Dennis", "Edsger", "Frances", "Guido", "Hedy", "Ken",
    "Linus", "Margaret", "Niklaus", "Radia", "Tim",
];

const LAST_NAMES: &[&str] = &[
    "Lovelace", "Hopper", "Turing", "Liskov", "Ritchie", "Dijkstra", "Allen", "Rossum",
    "Lamarr", "Thompson", "Torvalds", "Hamilton", "Wirth", "Perlman", "Berners-Lee",
];

const EXPERTISE: &[&str] = &[
    "html", "css", "aws", "azure", "haskell", "networking", "big-data", "javascript", "java",
    "rust", "node.js", "python", "machine-learning", "postgresql", "mongodb", "ui-ux", "scala",
    "clojure", "swift", "ios", "android", "docker",
];

#[derive(Parser)]
#[command(
    name = "seed-demo-data",
    about = "Coachhub demo data seeder",
    long_about = "Generate random coaches and coaching requests spread over recent weeks"
)]
struct SeedArgs {
    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// Coaches to register, in addition to the admin
    #[arg(long, default_value_t = 10)]
    coaches: u32,

    /// Coaching requests to create
    #[arg(long, default_value_t = 200)]
    requests: u32,

    /// Spread requests over this many past weeks
    #[arg(long, default_value_t = 4)]
    weeks: u32,

    /// RNG seed for reproducible data
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = SeedArgs::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }
    init_logging(&config)?;

    info!("=== Coachhub Demo Data Seeder ===");
    info!("Connecting to database: {}", config.database_url);
    let database = Database::new(&config.database_url).await?;
    let resources = ServerResources::new(database, &config);

    let mut rng = args
        .seed
        .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

    let mut coaches = Vec::with_capacity(args.coaches as usize);
    match register(&resources, admin_coach()).await {
        Ok(admin) => info!(coach_id = %admin.id, "admin coach registered"),
        Err(e) => warn!(error = %e, "admin coach not registered"),
    }
    for i in 1..=args.coaches {
        match register(&resources, random_coach(&mut rng, i)).await {
            Ok(coach) => coaches.push(coach),
            Err(e) => warn!(error = %e, "skipping coach {i}"),
        }
    }
    info!("Registered {} coaches", coaches.len());

    if coaches.is_empty() {
        warn!("No coaches available, not creating coaching requests");
        return Ok(());
    }

    let window_secs = i64::from(args.weeks.max(1)) * 7 * 24 * 3600;
    let now = Utc::now();
    let mut created = 0u32;
    for _ in 0..args.requests {
        let Some(coach) = coaches.choose(&mut rng) else {
            break;
        };
        let created_at = now - Duration::seconds(rng.gen_range(0..window_secs));
        let payload = random_request(&mut rng, coach);
        match resources
            .coaching_requests
            .create_at(payload, created_at)
            .await
        {
            Ok(_) => created += 1,
            Err(e) => warn!(error = %e, "skipping coaching request"),
        }
    }

    info!(
        coaches = coaches.len(),
        requests = created,
        weeks = args.weeks,
        "Seeding complete"
    );
    Ok(())
}

async fn register(resources: &ServerResources, request: CreateCoachRequest) -> AppResult<Coach> {
    resources.coaches.register(request).await
}

fn admin_coach() -> CreateCoachRequest {
    CreateCoachRequest {
        email: "admin@coachhub.dev".to_owned(),
        first_name: "admin".to_owned(),
        last_name: "admin".to_owned(),
        description: "Marketplace administrator".to_owned(),
        expertise: vec!["admin".to_owned()],
        hourly_rate: 100,
        image_url: Some("/avatars/avatar1.png".to_owned()),
        roles: Some(vec![CoachRole::Admin]),
    }
}

fn pick<'a>(rng: &mut StdRng, items: &[&'a str]) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}

fn random_coach(rng: &mut StdRng, index: u32) -> CreateCoachRequest {
    let first_name = pick(rng, FIRST_NAMES);
    let last_name = pick(rng, LAST_NAMES);
    let expertise_count = rng.gen_range(2..=5);
    let expertise = EXPERTISE
        .choose_multiple(rng, expertise_count)
        .map(|e| (*e).to_owned())
        .collect();
    let email = if index == 1 {
        "user@coachhub.dev".to_owned()
    } else {
        format!(
            "{}.{}.{index}@coachhub.dev",
            first_name.to_lowercase(),
            last_name.to_lowercase()
        )
    };

    CreateCoachRequest {
        email,
        first_name: first_name.to_owned(),
        last_name: last_name.to_owned(),
        description: format!("{first_name} has been coaching developers for years."),
        expertise,
        hourly_rate: rng.gen_range(1..=250),
        image_url: Some(format!("/avatars/avatar{}.png", rng.gen_range(1..=4))),
        roles: None,
    }
}

fn random_request(rng: &mut StdRng, coach: &Coach) -> CreateCoachingRequest {
    let student = pick(rng, FIRST_NAMES);
    let topic = coach
        .expertise
        .choose(rng)
        .map_or("programming", String::as_str);
    CreateCoachingRequest {
        coach_id: coach.id.clone(),
        from_email: format!("{}{}@student.dev", student.to_lowercase(), rng.gen_range(1..1000)),
        message: format!(
            "Hello {}, my name is {student} and I need coaching for {topic}",
            coach.first_name
        ),
    }
}
