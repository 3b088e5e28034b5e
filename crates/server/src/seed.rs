//! Demo data for local runs, enabled by `features.seed_demo`.
//!
//! Idempotent: accounts are keyed by email and nothing is inserted when the
//! admin account already exists.

use chrono::{Datelike, Duration, NaiveDate, Utc};
use shared_types::Role;
use sqlx::{Pool, Postgres};

use crate::auth::password::hash_password;

pub const DEMO_PASSWORD: &str = "policydesk-demo";

struct DemoUser {
    username: &'static str,
    display_name: &'static str,
    email: &'static str,
    role: Role,
}

const DEMO_USERS: [DemoUser; 4] = [
    DemoUser {
        username: "admin",
        display_name: "Ada Admin",
        email: "admin@policydesk.test",
        role: Role::Admin,
    },
    DemoUser {
        username: "agent",
        display_name: "Alex Agent",
        email: "agent@policydesk.test",
        role: Role::Agent,
    },
    DemoUser {
        username: "agent2",
        display_name: "Bea Broker",
        email: "agent2@policydesk.test",
        role: Role::Agent,
    },
    DemoUser {
        username: "reviewer",
        display_name: "Rene Reviewer",
        email: "reviewer@policydesk.test",
        role: Role::Reviewer,
    },
];

const DEMO_CLIENTS: [(&str, &str, Option<&str>); 4] = [
    ("Maria Lopez", "maria.lopez@example.com", Some("+1 555 0101")),
    ("Tom Becker", "tom.becker@example.com", None),
    ("Yuki Sato", "yuki.sato@example.com", Some("+1 555 0144")),
    ("Omar Haddad", "omar.haddad@example.com", None),
];

/// Signing date, status, review state and premium for the n-th demo contract.
fn demo_contract(n: usize, today: NaiveDate) -> (NaiveDate, &'static str, &'static str, f64) {
    let signed_on = today - Duration::days(17 * n as i64);
    let status = ["active", "active", "pending", "cancelled"][n % 4];
    let review = ["approved", "pending", "pending", "rejected"][n % 4];
    let premium = 250.0 + 75.0 * (n % 5) as f64 + f64::from(signed_on.month());
    (signed_on, status, review, premium)
}

pub async fn seed_demo_data(pool: &Pool<Postgres>) -> Result<(), sqlx::Error> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
            .bind(DEMO_USERS[0].email)
            .fetch_one(pool)
            .await?;
    if exists {
        tracing::debug!("demo data already present");
        return Ok(());
    }

    let password_hash = hash_password(DEMO_PASSWORD).map_err(|e| {
        sqlx::Error::Protocol(format!("could not hash demo password: {e}"))
    })?;

    let mut tx = pool.begin().await?;
    let mut agent_ids = Vec::new();
    for user in &DEMO_USERS {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (username, display_name, email, password_hash, role) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(user.username)
        .bind(user.display_name)
        .bind(user.email)
        .bind(&password_hash)
        .bind(user.role.as_str())
        .fetch_one(&mut *tx)
        .await?;
        if user.role == Role::Agent {
            agent_ids.push(id);
        }
    }

    let today = Utc::now().date_naive();
    let mut contract_no = 0;
    for (i, (name, email, phone)) in DEMO_CLIENTS.iter().enumerate() {
        let agent_id = agent_ids[i % agent_ids.len()];
        let client_id: i64 = sqlx::query_scalar(
            "INSERT INTO clients (agent_id, full_name, email, phone) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(agent_id)
        .bind(name)
        .bind(email)
        .bind(phone)
        .fetch_one(&mut *tx)
        .await?;

        for _ in 0..4 {
            let (signed_on, status, review, premium) = demo_contract(contract_no, today);
            sqlx::query(
                "INSERT INTO contracts \
                 (client_id, agent_id, status, review_status, premium, signed_on) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(client_id)
            .bind(agent_id)
            .bind(status)
            .bind(review)
            .bind(premium)
            .bind(signed_on)
            .execute(&mut *tx)
            .await?;
            contract_no += 1;
        }
    }

    tx.commit().await?;
    tracing::info!(
        users = DEMO_USERS.len(),
        clients = DEMO_CLIENTS.len(),
        contracts = contract_no,
        "demo data seeded"
    );
    Ok(())
}
