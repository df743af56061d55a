use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use sqlx::SqlitePool;
use tracing::info;

use confdesk::models::{
    Conference, CreateConference, CreateSpeaker, CreateTalk, CreateVenue, Qualification, Region,
    Speaker, Talk, TalkLength, Venue,
};

#[derive(Parser, Debug)]
#[command(name = "seed_demo")]
#[command(about = "Populate a ConfDesk database with demo speakers, talks and conferences")]
struct Args {
    /// Database to seed (falls back to DATABASE_URL, then sqlite://confdesk.db)
    #[arg(long)]
    database_url: Option<String>,

    /// Delete all existing rows before seeding
    #[arg(long)]
    wipe: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let database_url = args
        .database_url
        .clone()
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| "sqlite://confdesk.db".to_string());

    let pool = confdesk::db::connect(&database_url)
        .await
        .context("Failed to open database")?;

    info!("Connected to {}", database_url);

    if args.wipe {
        wipe(&pool).await?;
    } else {
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM speakers")
            .fetch_one(&pool)
            .await
            .context("Failed to inspect database")?;
        if existing > 0 {
            anyhow::bail!(
                "Database already contains {} speaker(s). Use --wipe to reseed from scratch.",
                existing
            );
        }
    }

    let venues = seed_venues(&pool).await?;
    let speakers = seed_speakers(&pool).await?;
    let talks = seed_talks(&pool, &speakers).await?;
    review_talks(&pool, &talks).await?;
    seed_conferences(&pool, &venues, &speakers, &talks).await?;

    info!(
        "Seeding complete: {} venues, {} speakers, {} talks",
        venues.len(),
        speakers.len(),
        talks.len()
    );
    Ok(())
}

async fn wipe(pool: &SqlitePool) -> Result<()> {
    // Join tables first, then the referencing side of each foreign key
    let tables = [
        "conference_speaker",
        "conference_talk",
        "conferences",
        "talks",
        "speakers",
        "venues",
    ];
    for table in tables {
        sqlx::query(&format!("DELETE FROM {}", table))
            .execute(pool)
            .await
            .with_context(|| format!("Failed to clear {}", table))?;
    }
    info!("Cleared existing data");
    Ok(())
}

async fn seed_venues(pool: &SqlitePool) -> Result<Vec<Venue>> {
    let sites = [
        ("Beurs van Berlage", "Amsterdam", "Netherlands", "1012 JS", Region::Eu),
        ("Gilley's Dallas", "Dallas", "United States", "75215", Region::Us),
    ];

    let mut venues = Vec::new();
    for (name, city, country, postal_code, region) in sites {
        let venue = Venue::create(
            pool,
            CreateVenue {
                name: name.to_string(),
                city: city.to_string(),
                country: country.to_string(),
                postal_code: postal_code.to_string(),
                region: Some(region),
            },
        )
        .await
        .with_context(|| format!("Failed to seed venue {}", name))?;
        info!("Seeded venue {} ({})", venue.name, venue.city);
        venues.push(venue);
    }
    Ok(venues)
}

async fn seed_speakers(pool: &SqlitePool) -> Result<Vec<Speaker>> {
    let roster = [
        (
            "Mia Sørensen",
            "mia@confdesk.test",
            Some("avatars/mia.jpg"),
            Some("@miasorensen"),
            "Maintains a stack of open source queue tooling.",
            vec![Qualification::OpenSource, Qualification::Charisma],
        ),
        (
            "Tomás Herrera",
            "tomas@confdesk.test",
            None,
            None,
            "Shipped his first package last winter and wants to talk about it.",
            vec![Qualification::FirstTime, Qualification::UniquePerspective],
        ),
        (
            "Priya Nair",
            "priya@confdesk.test",
            Some("avatars/priya.jpg"),
            Some("@priyabuilds"),
            "Bootstrapped a SaaS from a weekend project.",
            vec![Qualification::BusinessLeader, Qualification::TwitterInfluencer],
        ),
        (
            "Jack Whitfield",
            "jack@confdesk.test",
            None,
            Some("@jackwhit"),
            "Records screencasts about testing and developer habits.",
            vec![Qualification::LaracastsContributor, Qualification::YoutubeInfluencer],
        ),
        (
            "Amara Okafor",
            "amara@confdesk.test",
            Some("avatars/amara.jpg"),
            None,
            "Builds coordination software for disaster relief teams.",
            vec![Qualification::Humanitarian],
        ),
        (
            "Lars Viklund",
            "lars@confdesk.test",
            None,
            None,
            "Runs the local meetup and half the city's deployment pipelines.",
            vec![Qualification::HometownHero],
        ),
    ];

    let mut speakers = Vec::new();
    for (name, email, avatar, twitter_handle, bio, qualifications) in roster {
        let speaker = Speaker::create(
            pool,
            CreateSpeaker {
                name: name.to_string(),
                email: email.to_string(),
                avatar: avatar.map(String::from),
                bio: Some(bio.to_string()),
                twitter_handle: twitter_handle.map(String::from),
                qualifications,
            },
        )
        .await
        .with_context(|| format!("Failed to seed speaker {}", name))?;
        info!("Seeded speaker {} ({})", speaker.name, speaker.id);
        speakers.push(speaker);
    }
    Ok(speakers)
}

async fn seed_talks(pool: &SqlitePool, speakers: &[Speaker]) -> Result<Vec<Talk>> {
    // (speaker index, title, abstract, length, new_talk)
    let program = [
        (
            0,
            "Queues at Scale",
            "What actually happens when a million jobs land at once.",
            TalkLength::Normal,
            true,
        ),
        (
            0,
            "Livewire Under the Hood",
            "A guided tour of the request lifecycle nobody reads the source for.",
            TalkLength::Keynote,
            false,
        ),
        (
            1,
            "My First Package",
            "Everything I got wrong publishing a package, in ten minutes.",
            TalkLength::Lightning,
            true,
        ),
        (
            2,
            "From Side Project to SaaS",
            "The boring operational work that turned a demo into a business.",
            TalkLength::Normal,
            false,
        ),
        (
            3,
            "Testing Habits That Stick",
            "Small test-writing rituals that survive deadline pressure.",
            TalkLength::Normal,
            true,
        ),
        (
            4,
            "Tech for Crisis Response",
            "Field lessons from shipping software where connectivity is a luxury.",
            TalkLength::Keynote,
            true,
        ),
        (
            5,
            "SQLite in Production",
            "One file, no ops team, and the workloads where that is enough.",
            TalkLength::Normal,
            false,
        ),
        (
            2,
            "Pricing Pages That Convert",
            "A/B results from two years of tinkering with the same page.",
            TalkLength::Lightning,
            false,
        ),
    ];

    let mut talks = Vec::new();
    for (idx, title, abstract_text, length, new_talk) in program {
        let talk = Talk::create(
            pool,
            CreateTalk {
                title: title.to_string(),
                abstract_text: abstract_text.to_string(),
                speaker_id: speakers[idx].id,
                length: Some(length),
                new_talk: Some(new_talk),
            },
        )
        .await
        .with_context(|| format!("Failed to seed talk {}", title))?;
        info!("Seeded talk \"{}\"", talk.title);
        talks.push(talk);
    }
    Ok(talks)
}

/// Run a few talks through the real review transition so the seeded data
/// contains all three statuses.
async fn review_talks(pool: &SqlitePool, talks: &[Talk]) -> Result<()> {
    for idx in [0, 3, 5] {
        let talk = Talk::approve(pool, talks[idx].id).await?;
        info!("Approved \"{}\"", talk.title);
    }
    for idx in [2, 7] {
        let talk = Talk::reject(pool, talks[idx].id).await?;
        info!("Rejected \"{}\"", talk.title);
    }
    Ok(())
}

async fn seed_conferences(
    pool: &SqlitePool,
    venues: &[Venue],
    speakers: &[Speaker],
    talks: &[Talk],
) -> Result<()> {
    let eu = Conference::create(
        pool,
        CreateConference {
            name: "Laracon EU".to_string(),
            description: Some("Two days of talks in the heart of Amsterdam.".to_string()),
            start_date: Some(date(2027, 2, 1)),
            end_date: Some(date(2027, 2, 2)),
            region: Some(Region::Eu),
            venue_id: Some(venues[0].id),
        },
    )
    .await
    .context("Failed to seed Laracon EU")?;

    let us = Conference::create(
        pool,
        CreateConference {
            name: "Laracon US".to_string(),
            description: Some("The flagship US edition.".to_string()),
            start_date: Some(date(2026, 10, 6)),
            end_date: Some(date(2026, 10, 7)),
            region: Some(Region::Us),
            venue_id: Some(venues[1].id),
        },
    )
    .await
    .context("Failed to seed Laracon US")?;

    let online = Conference::create(
        pool,
        CreateConference {
            name: "Laracon Online".to_string(),
            description: Some("One day, one stream, every timezone.".to_string()),
            start_date: Some(date(2026, 9, 12)),
            end_date: Some(date(2026, 9, 12)),
            region: Some(Region::Online),
            venue_id: None,
        },
    )
    .await
    .context("Failed to seed Laracon Online")?;

    info!("Seeded conferences {}, {}, {}", eu.name, us.name, online.name);

    // Line-ups. A talk may appear at more than one conference.
    for speaker_idx in [0, 1, 5] {
        Conference::attach_speaker(pool, eu.id, speakers[speaker_idx].id).await?;
    }
    for talk_idx in [0, 1, 2, 6] {
        Conference::attach_talk(pool, eu.id, talks[talk_idx].id).await?;
    }

    for speaker_idx in [2, 3, 4] {
        Conference::attach_speaker(pool, us.id, speakers[speaker_idx].id).await?;
    }
    for talk_idx in [3, 4, 5] {
        Conference::attach_talk(pool, us.id, talks[talk_idx].id).await?;
    }

    for speaker_idx in [0, 2] {
        Conference::attach_speaker(pool, online.id, speakers[speaker_idx].id).await?;
    }
    for talk_idx in [0, 3] {
        Conference::attach_talk(pool, online.id, talks[talk_idx].id).await?;
    }

    info!("Attached line-ups");
    Ok(())
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}
