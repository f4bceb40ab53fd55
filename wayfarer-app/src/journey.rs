use anyhow::{Context, Result};
use std::path::Path;
use tracing::warn;
use wayfarer_journey::{PlannerResponse, TransitStops};
use wayfarer_screen::JourneyLoad;

/// A journey to load plus anything the traveller should be told about it.
pub struct Prepared {
    pub load: JourneyLoad,
    pub message: Option<String>,
}

/// Read the planner response and stop catalog from disk.
///
/// Unreadable files are errors. Content problems are not: a planner failure
/// or an undecodable plan yields an empty journey and a message, a bad stop
/// catalog yields no stops.
pub fn prepare(plan: Option<&Path>, stops: Option<&Path>) -> Result<Prepared> {
    let catalog = match stops {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read stop catalog: {}", path.display()))?;
            TransitStops::from_json(&json).unwrap_or_else(|e| {
                warn!(target: "wayfarer::app", path = %path.display(), error = %e, "ignoring stop catalog");
                TransitStops::new()
            })
        }
        None => TransitStops::new(),
    };

    let Some(path) = plan else {
        return Ok(Prepared {
            load: JourneyLoad::default(),
            message: None,
        });
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read route plan: {}", path.display()))?;

    match PlannerResponse::from_json(&json).and_then(PlannerResponse::into_journey) {
        Ok(journey) => {
            let message = format!(
                "{} to {}{}",
                journey.origin,
                journey.destination,
                journey
                    .duration
                    .as_deref()
                    .map(|d| format!(", about {d}"))
                    .unwrap_or_default()
            );
            Ok(Prepared {
                load: JourneyLoad::from_plan(journey, catalog),
                message: Some(message),
            })
        }
        Err(e) => {
            warn!(target: "wayfarer::app", error = %e, "route plan unusable");
            Ok(Prepared {
                load: JourneyLoad::default(),
                message: Some(e.to_string()),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let p = dir.path().join(name);
        fs::write(&p, body).unwrap();
        p
    }

    #[test]
    fn planner_error_becomes_a_message_and_an_empty_route() {
        let dir = TempDir::new().unwrap();
        let plan = write(&dir, "plan.json", r#"{"status": "error", "message": "No route found"}"#);
        let prepared = prepare(Some(&plan), None).unwrap();
        assert!(prepared.load.route.is_empty());
        assert_eq!(prepared.message.as_deref(), Some("route planner error: No route found"));
    }

    #[test]
    fn plan_and_catalog_are_combined() {
        let dir = TempDir::new().unwrap();
        let plan = write(
            &dir,
            "plan.json",
            r#"{"status": "success", "data": {"origin": "Derby", "destination": "Nottingham",
                "duration": "45 mins",
                "steps": [{"travel_mode": "transit", "transit": {"line": {"name": "Skylink"}}}]}}"#,
        );
        let stops = write(
            &dir,
            "stops.json",
            r#"[{"line": "Skylink", "direction": "outbound", "stops": []}]"#,
        );
        let prepared = prepare(Some(&plan), Some(&stops)).unwrap();
        assert_eq!(prepared.load.route.len(), 1);
        assert_eq!(prepared.load.tables.stops.len(), 1);
        assert_eq!(prepared.message.as_deref(), Some("Derby to Nottingham, about 45 mins"));
    }

    #[test]
    fn bad_catalog_is_ignored_but_missing_plan_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let stops = write(&dir, "stops.json", "not json");
        let prepared = prepare(None, Some(&stops)).unwrap();
        assert!(prepared.load.tables.stops.is_empty());

        assert!(prepare(Some(&dir.path().join("absent.json")), None).is_err());
    }
}
