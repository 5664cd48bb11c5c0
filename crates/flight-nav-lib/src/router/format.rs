//! Text renderings of routes

use super::{RoutePlan, RouteSegment};

/// `"A -> B -> C (<int> NM)"`, or `"<origin> direct to <destination> (<int> NM)"` for a
/// direct fallback
pub fn route_description<S: AsRef<str>>(ids: &[S], total_distance_nm: f64, is_direct: bool) -> String {
    // Whole miles, truncated
    let nm = total_distance_nm as i64;
    match ids {
        [origin, .., destination] if is_direct => {
            format!("{} direct to {} ({nm} NM)", origin.as_ref(), destination.as_ref())
        }
        _ => {
            let joined = ids.iter().map(|id| id.as_ref()).collect::<Vec<&str>>().join(" -> ");
            format!("{joined} ({nm} NM)")
        }
    }
}

/// ICAO-style route string, consecutive legs on one airway collapsed
///
/// `KJFK DCT JFK J80 KORD J94 KDEN DCT KLAX`
pub(super) fn icao_route(plan: &RoutePlan) -> String {
    let Some(first) = plan.segments.first() else {
        return plan.origin.clone();
    };

    let mut tokens: Vec<&str> = vec![first.from.as_str()];
    let mut previous: Option<&RouteSegment> = None;
    for segment in &plan.segments {
        let continues_airway = matches!(
            (previous.and_then(|p| p.airway.as_deref()), segment.airway.as_deref()),
            (Some(a), Some(b)) if a == b
        );
        if continues_airway {
            // Replace the exit waypoint of the running airway
            tokens.pop();
        } else {
            tokens.push(segment.airway.as_deref().unwrap_or("DCT"));
        }
        tokens.push(segment.to.as_str());
        previous = Some(segment);
    }
    tokens.join(" ")
}
