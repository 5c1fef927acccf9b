//! Demo data seeder for Potluck development and testing.
//!
//! Writes two demo groups into the configured data directory:
//! a multi-currency trip and a single-currency dinner club.
//!
//! Usage: cargo run --bin seeder

use chrono::{TimeZone, Utc};
use potluck_core::expense::NewExpense;
use potluck_shared::AppConfig;
use potluck_shared::types::{CurrencyCode, ExpenseId, GroupId, MemberId};
use potluck_store::{GroupRecord, JsonStore, MemberRecord};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Demo trip group ID (consistent for all seeds)
const TRIP_GROUP_ID: &str = "demo-trip";
/// Demo dinner group ID (consistent for all seeds)
const DINNER_GROUP_ID: &str = "demo-dinner";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    let store = JsonStore::new(&config.storage.data_dir);
    println!("Seeding into {}...", store.path().display());

    println!("Seeding trip group...");
    store.upsert_group(trip_group()?).await?;

    println!("Seeding dinner group...");
    store.upsert_group(dinner_group()?).await?;

    println!("Seeding complete!");
    Ok(())
}

fn members(names: &[(&str, &str)]) -> Vec<MemberRecord> {
    names
        .iter()
        .map(|(id, name)| MemberRecord {
            id: MemberId::from(*id),
            name: (*name).to_string(),
        })
        .collect()
}

/// Unix millis at noon UTC on the given day.
fn noon(year: i32, month: u32, day: u32) -> anyhow::Result<i64> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0)
        .single()
        .map(|at| at.timestamp_millis())
        .ok_or_else(|| anyhow::anyhow!("invalid date {year}-{month}-{day}"))
}

struct Seed<'a> {
    id: &'a str,
    payer: &'a str,
    amount: Decimal,
    currency: CurrencyCode,
    participants: &'a [&'a str],
    category: Option<&'a str>,
    description: &'a str,
    at: i64,
}

impl Seed<'_> {
    fn into_expense(self) -> NewExpense {
        NewExpense {
            id: ExpenseId::from(self.id),
            payer_id: MemberId::from(self.payer),
            amount: self.amount,
            currency: self.currency,
            participant_ids: self.participants.iter().map(|p| MemberId::from(*p)).collect(),
            category: self.category.map(str::to_string),
            description: Some(self.description.to_string()),
            timestamp_millis: Some(self.at),
            created_at_millis: self.at,
        }
    }
}

/// Three friends in Buenos Aires paying in pesos, dollars and euros.
fn trip_group() -> anyhow::Result<GroupRecord> {
    let everyone: &[&str] = &["ana", "bruno", "carla"];
    let expenses = vec![
        Seed {
            id: "trip-hotel",
            payer: "ana",
            amount: dec!(450),
            currency: CurrencyCode::USD,
            participants: everyone,
            category: Some("Lodging"),
            description: "Hotel, three nights",
            at: noon(2024, 3, 1)?,
        },
        Seed {
            id: "trip-asado",
            payer: "bruno",
            amount: dec!(96000),
            currency: CurrencyCode::ARS,
            participants: everyone,
            category: Some("Food"),
            description: "Asado dinner",
            at: noon(2024, 3, 2)?,
        },
        Seed {
            id: "trip-museum",
            payer: "carla",
            amount: dec!(36),
            currency: CurrencyCode::EUR,
            participants: &["ana", "carla"],
            category: Some("Fun"),
            description: "Museum tickets",
            at: noon(2024, 3, 3)?,
        },
        Seed {
            id: "trip-taxi",
            payer: "ana",
            amount: dec!(18500.50),
            currency: CurrencyCode::ARS,
            participants: everyone,
            category: None,
            description: "Airport taxi",
            at: noon(2024, 4, 1)?,
        },
    ];

    Ok(GroupRecord {
        id: GroupId::from(TRIP_GROUP_ID),
        name: "Buenos Aires trip".to_string(),
        base_currency: CurrencyCode::USD,
        members: members(&[("ana", "Ana"), ("bruno", "Bruno"), ("carla", "Carla")]),
        expenses: expenses.into_iter().map(Seed::into_expense).collect(),
    })
}

/// Four-person dinner club in one currency, with a member who never pays.
fn dinner_group() -> anyhow::Result<GroupRecord> {
    let everyone: &[&str] = &["diego", "elena", "fede", "gabi"];
    let expenses = vec![
        Seed {
            id: "dinner-jan",
            payer: "diego",
            amount: dec!(120),
            currency: CurrencyCode::EUR,
            participants: everyone,
            category: Some("Food"),
            description: "January dinner",
            at: noon(2024, 1, 20)?,
        },
        Seed {
            id: "dinner-feb",
            payer: "elena",
            amount: dec!(95.40),
            currency: CurrencyCode::EUR,
            participants: everyone,
            category: Some("Food"),
            description: "February dinner",
            at: noon(2024, 2, 17)?,
        },
        Seed {
            id: "dinner-wine",
            payer: "diego",
            amount: dec!(42.75),
            currency: CurrencyCode::EUR,
            participants: everyone,
            category: Some("Drinks"),
            description: "Wine",
            at: noon(2024, 2, 17)?,
        },
    ];

    Ok(GroupRecord {
        id: GroupId::from(DINNER_GROUP_ID),
        name: "Dinner club".to_string(),
        base_currency: CurrencyCode::EUR,
        members: members(&[
            ("diego", "Diego"),
            ("elena", "Elena"),
            ("fede", "Fede"),
            ("gabi", "Gabi"),
        ]),
        expenses: expenses.into_iter().map(Seed::into_expense).collect(),
    })
}
