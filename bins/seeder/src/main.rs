//! Database seeder for Isotrack development and testing.
//!
//! Seeds one user per role, a demo hospital customer, a demo FDG
//! product, and an order review workflow for local development.
//!
//! Usage: cargo run --bin seeder

use std::str::FromStr;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use isotrack_core::UserRole;
use isotrack_core::workflow::EntityKind;
use isotrack_db::entities::{customers, products, workflow_definitions};
use isotrack_db::repositories::customer::NewCustomer;
use isotrack_db::repositories::product::NewProduct;
use isotrack_db::repositories::workflow::{NewStep, NewWorkflow};
use isotrack_db::repositories::{
    CustomerRepository, ProductRepository, RequestMeta, UserRepository,
    WorkflowDefinitionRepository, user::NewUser,
};

/// Fixed seeder actor ID stamped on audited rows.
const SEED_ACTOR_ID: &str = "00000000-0000-0000-0000-000000000001";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = isotrack_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding users...");
    seed_users(&db).await;

    println!("Seeding demo customer...");
    seed_customer(&db).await;

    println!("Seeding demo product...");
    seed_product(&db).await;

    println!("Seeding order review workflow...");
    seed_order_workflow(&db).await;

    println!("Seeding complete!");
}

fn seed_actor_id() -> Uuid {
    Uuid::parse_str(SEED_ACTOR_ID).unwrap()
}

/// Seeds one user per role with a known development password.
async fn seed_users(db: &DatabaseConnection) {
    let repo = UserRepository::new(db.clone());

    let fixtures = [
        ("admin@isotrack.dev", "Astrid Admin", UserRole::Admin),
        ("sales@isotrack.dev", "Sven Sales", UserRole::Sales),
        (
            "planner@isotrack.dev",
            "Petra Planner",
            UserRole::ProductionPlanner,
        ),
        (
            "operator@isotrack.dev",
            "Otto Operator",
            UserRole::ProductionOperator,
        ),
        ("qc@isotrack.dev", "Quinn Analyst", UserRole::QcAnalyst),
        (
            "qp@isotrack.dev",
            "Greta Qualified",
            UserRole::QualifiedPerson,
        ),
        (
            "logistics@isotrack.dev",
            "Lars Logistics",
            UserRole::Logistics,
        ),
        ("finance@isotrack.dev", "Frida Finance", UserRole::Finance),
    ];

    for (email, full_name, role) in fixtures {
        match repo.find_by_email(email).await {
            Ok(Some(_)) => {
                println!("  User {email} already exists, skipping...");
                continue;
            }
            Ok(None) => {}
            Err(e) => {
                eprintln!("Failed to look up user {email}: {e}");
                continue;
            }
        }

        let result = repo
            .create(NewUser {
                email: email.to_string(),
                password: "isotrack-dev".to_string(),
                full_name: full_name.to_string(),
                role,
            })
            .await;

        match result {
            Ok(_) => println!("  Created user: {email} ({role})"),
            Err(e) => eprintln!("Failed to insert user {email}: {e}"),
        }
    }
}

/// Seeds a demo hospital customer with a license valid for two years.
async fn seed_customer(db: &DatabaseConnection) {
    let license_number = "NRC-DEMO-0001";

    let existing = customers::Entity::find()
        .filter(customers::Column::LicenseNumber.eq(license_number))
        .one(db)
        .await
        .ok()
        .flatten();
    if existing.is_some() {
        println!("  Demo customer already exists, skipping...");
        return;
    }

    let result = CustomerRepository::new(db.clone())
        .create(
            NewCustomer {
                name: "St. Botulph University Hospital".to_string(),
                license_number: license_number.to_string(),
                license_expires_at: (Utc::now() + Duration::days(730)).date_naive(),
                address: "1 Infirmary Lane, Boston, MA".to_string(),
                contact_email: "nucmed@stbotulph.example.org".to_string(),
                contact_phone: Some("+1-617-555-0142".to_string()),
            },
            seed_actor_id(),
            RequestMeta::default(),
        )
        .await;

    match result {
        Ok(customer) => println!("  Created demo customer: {}", customer.name),
        Err(e) => eprintln!("Failed to insert demo customer: {e}"),
    }
}

/// Seeds the FDG demo product.
async fn seed_product(db: &DatabaseConnection) {
    let existing = products::Entity::find()
        .filter(products::Column::Code.eq("FDG"))
        .one(db)
        .await
        .ok()
        .flatten();
    if existing.is_some() {
        println!("  Demo product already exists, skipping...");
        return;
    }

    let unit_price = Decimal::from_str("310.00").unwrap();
    let result = ProductRepository::new(db.clone())
        .create(
            NewProduct {
                code: "FDG".to_string(),
                name: "Fludeoxyglucose F-18".to_string(),
                radionuclide: "F-18".to_string(),
                // F-18 physical half-life, rounded to whole minutes
                half_life_minutes: 110,
                unit_price,
                daily_batch_capacity: 4,
            },
            seed_actor_id(),
            RequestMeta::default(),
        )
        .await;

    match result {
        Ok(product) => println!("  Created demo product: {} ({})", product.name, product.code),
        Err(e) => eprintln!("Failed to insert demo product: {e}"),
    }
}

/// Seeds a two-step review workflow triggered when an order is submitted.
async fn seed_order_workflow(db: &DatabaseConnection) {
    let existing = workflow_definitions::Entity::find()
        .filter(workflow_definitions::Column::TriggerStatus.eq("SUBMITTED"))
        .filter(workflow_definitions::Column::IsActive.eq(true))
        .one(db)
        .await
        .ok()
        .flatten();
    if existing.is_some() {
        println!("  Order review workflow already exists, skipping...");
        return;
    }

    let result = WorkflowDefinitionRepository::new(db.clone())
        .create(NewWorkflow {
            name: "Order review".to_string(),
            entity_type: EntityKind::Order,
            trigger_status: Some("SUBMITTED".to_string()),
            requires_all_steps: true,
            steps: vec![
                NewStep {
                    step_order: 1,
                    label: "Sales review".to_string(),
                    approver_role: UserRole::Sales,
                    timeout_hours: Some(24),
                },
                NewStep {
                    step_order: 2,
                    label: "Production planning".to_string(),
                    approver_role: UserRole::ProductionPlanner,
                    timeout_hours: Some(24),
                },
            ],
        })
        .await;

    match result {
        Ok((workflow, steps)) => println!(
            "  Created workflow: {} ({} steps)",
            workflow.name,
            steps.len()
        ),
        Err(e) => eprintln!("Failed to insert order review workflow: {e}"),
    }
}
