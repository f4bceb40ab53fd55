use std::fmt::Write;
use wayfarer_journey::LegView;
use wayfarer_screen::{Notice, ScreenPhase, ScreenSnapshot};

pub const NO_ROUTE: &str = "No route data available.";

/// Plain-text rendering of a screen snapshot.
pub fn render(snap: &ScreenSnapshot) -> String {
    let mut out = String::new();
    match snap.phase {
        ScreenPhase::NoRoute => {
            let _ = writeln!(out, "{NO_ROUTE}");
        }
        ScreenPhase::Complete { legs } => {
            let _ = writeln!(out, "All {legs} steps done.");
        }
        ScreenPhase::Active { .. } => {
            if let Some(view) = &snap.view {
                render_leg(&mut out, view);
            }
            if let Some(map) = &snap.map {
                let _ = writeln!(
                    out,
                    "  map: {:.5},{:.5} -> {:.5},{:.5} ({} stops drawn)",
                    map.start.lat,
                    map.start.lng,
                    map.end.lat,
                    map.end.lng,
                    map.waypoints.len()
                );
            }
        }
    }

    match snap.notice {
        Some(Notice::JourneyCompleted) => {
            let _ = writeln!(out, "You have arrived. Journey complete.");
        }
        Some(Notice::AnnouncementUnavailable) => {
            let _ = writeln!(out, "Voice guidance unavailable. Type /repeat to try again.");
        }
        None => {}
    }
    if snap.advance_enabled {
        let _ = writeln!(out, "[Enter] next step   /repeat   /help");
    }
    out
}

fn render_leg(out: &mut String, view: &LegView) {
    let pos = view.position();
    let _ = writeln!(
        out,
        "== Step {} of {} ({:.0}% done) ==",
        pos.number,
        pos.total,
        view.progress_percent()
    );
    match view {
        LegView::Walking(w) => {
            let _ = writeln!(out, "  Walk: {}", w.instruction);
            let _ = writeln!(out, "  Time: {}", w.duration);
            let _ = writeln!(out, "  Next stop: {}", w.next_stop_name);
        }
        LegView::Transit(t) => {
            let _ = writeln!(out, "  {} {} towards {}", t.vehicle, t.line_name, t.headsign);
            let _ = writeln!(out, "  Board:  {} at {}", t.departure_stop, t.departure_time);
            let _ = writeln!(out, "  Alight: {} at {}", t.arrival_stop, t.arrival_time);
            match t.num_stops {
                Some(n) => {
                    let _ = writeln!(out, "  {n} stops, {}", t.arrival_text());
                }
                None => {
                    let _ = writeln!(out, "  Ride time: {}", t.arrival_text());
                }
            }
            let _ = writeln!(out, "  Next stop: {}", t.next_stop_name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfarer_journey::{LegPosition, WalkingLegView};

    fn empty() -> ScreenSnapshot {
        ScreenSnapshot {
            journey_id: None,
            phase: ScreenPhase::NoRoute,
            view: None,
            map: None,
            announcement: None,
            notice: None,
            repeat_available: false,
            advance_enabled: false,
        }
    }

    #[test]
    fn no_route_message() {
        assert_eq!(render(&empty()), "No route data available.\n");
    }

    #[test]
    fn walking_leg_lines() {
        let mut snap = empty();
        snap.phase = ScreenPhase::Active { index: 0, total: 2 };
        snap.advance_enabled = true;
        snap.view = Some(LegView::Walking(WalkingLegView {
            position: LegPosition { number: 1, total: 2 },
            step_number: 1,
            instruction: "Walk to Derby Bus Station".into(),
            duration: "5 mins".into(),
            next_stop_name: "Derby Bus Station".into(),
            progress_percent: 0.0,
        }));
        let text = render(&snap);
        assert!(text.starts_with("== Step 1 of 2 (0% done) ==\n"));
        assert!(text.contains("  Walk: Walk to Derby Bus Station\n"));
        assert!(text.ends_with("[Enter] next step   /repeat   /help\n"));
    }

    #[test]
    fn completion_notice() {
        let mut snap = empty();
        snap.phase = ScreenPhase::Complete { legs: 3 };
        snap.notice = Some(Notice::JourneyCompleted);
        assert_eq!(
            render(&snap),
            "All 3 steps done.\nYou have arrived. Journey complete.\n"
        );
    }
}
