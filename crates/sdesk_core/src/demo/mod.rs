use time::macros::datetime;
use time::Duration;

use crate::domain::{Category, NewIncident, Priority};
use crate::error::AppError;
use crate::lifecycle;
use crate::store::IncidentStore;

/// Seed a deterministic demo dataset: incidents across every priority and
/// category, advanced to a spread of lifecycle stages with fixed timestamps,
/// so monitor views and breach flags are meaningful on a fresh database.
/// Returns the number of incidents created.
pub fn seed_demo_dataset(store: &dyn IncidentStore) -> Result<usize, AppError> {
    let base = datetime!(2026-02-01 08:00:00 UTC);
    let priorities = Priority::ALL;
    let categories = [
        Category::Hardware,
        Category::Software,
        Category::Network,
        Category::Other,
    ];
    let descriptions = [
        "Laptop will not power on after the overnight firmware update",
        "Expense application crashes when attaching a receipt",
        "VPN drops every few minutes from the Berlin office",
        "Access badge reader at the east entrance is unresponsive",
        "Monitor flickers when docked",
        "Browser login loop on the HR portal",
        "Wifi dead zone on the third floor",
        "Projector remote missing from room 4B",
    ];

    let mut created = 0usize;
    for i in 0..16 {
        let priority = priorities[i % priorities.len()];
        let category = categories[(i / 4) % categories.len()];
        let created_at = base + Duration::hours(i as i64);

        let fields = NewIncident {
            reporter_name: format!("Demo Reporter {}", i + 1),
            reporter_email: format!("reporter{}@example.com", i + 1),
            description: descriptions[i % descriptions.len()].to_string(),
            category,
            priority,
        };
        let incident = store.create(&fields, created_at)?;
        created += 1;

        // Stages cycle: New, Acknowledged, Resolved, Closed. Acknowledgments
        // land 5 minutes in (inside every ack deadline), resolutions an hour
        // after that.
        match i % 4 {
            0 => {}
            1 => {
                lifecycle::acknowledge(
                    store,
                    incident.id,
                    "demo-seed",
                    created_at + Duration::minutes(5),
                )?;
            }
            2 => {
                lifecycle::acknowledge(
                    store,
                    incident.id,
                    "demo-seed",
                    created_at + Duration::minutes(5),
                )?;
                lifecycle::resolve(
                    store,
                    incident.id,
                    "demo-seed",
                    created_at + Duration::minutes(65),
                )?;
            }
            _ => {
                lifecycle::acknowledge(
                    store,
                    incident.id,
                    "demo-seed",
                    created_at + Duration::minutes(5),
                )?;
                lifecycle::resolve(
                    store,
                    incident.id,
                    "demo-seed",
                    created_at + Duration::minutes(65),
                )?;
                lifecycle::close(
                    store,
                    incident.id,
                    "demo-seed",
                    created_at + Duration::minutes(70),
                )?;
            }
        }
    }

    Ok(created)
}
