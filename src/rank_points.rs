use serde_json::Value;

/// Ladder tiers, lowest to highest. A tier's score is its index here.
/// Everything from Master up shares one continuous LP ladder.
pub const TIERS: [&str; 10] = [
    "Iron",
    "Bronze",
    "Silver",
    "Gold",
    "Platinum",
    "Emerald",
    "Diamond",
    "Master",
    "Grandmaster",
    "Challenger",
];

const APEX_START: usize = 7;
const TIER_WIDTH: i32 = 400;

fn tier_index(tier: &str) -> Option<usize> {
    TIERS.iter().position(|t| *t == tier)
}

#[allow(dead_code)]
pub fn is_apex_tier(tier: &str) -> bool {
    match tier_index(tier) {
        Some(i) => i >= APEX_START,
        None => false,
    }
}

fn division_offset(division: &str) -> i32 {
    match division {
        "IV" => 0,
        "III" => 100,
        "II" => 200,
        "I" => 300,
        // Unrecognized divisions score the same as IV rather than erroring
        _ => 0,
    }
}

/// Maps a (tier, division, LP) triple to a single comparable score.
///
/// An unknown tier is worth 0; bad upstream data must never stop the
/// leaderboard from rendering a total order. `tier` must already be in
/// canonical case, see [`normalize_tier`].
pub fn points_for_rank(tier: &str, division: &str, lp: i32) -> i32 {
    let index = match tier_index(tier) {
        Some(i) => i,
        None => return 0,
    };

    // Master, Grandmaster and Challenger are distinguished only by LP,
    // so they collapse onto one ladder based at Master. Division is
    // ignored there even when the lookup supplies one.
    if index >= APEX_START {
        return (APEX_START as i32) * TIER_WIDTH + lp;
    }

    (index as i32) * TIER_WIDTH + division_offset(division) + lp
}

/// First letter uppercase, rest lowercase: "GOLD" -> "Gold",
/// "master" -> "Master". The ranked endpoint is not consistent about
/// case, the canonical table is.
pub fn normalize_tier(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => {
            let mut out: String = first.to_uppercase().collect();
            out.push_str(&chars.as_str().to_lowercase());
            out
        }
        None => String::new(),
    }
}

/// LP arrives as a number, a numeric string, or not at all. Anything
/// unusable coerces to 0. Negative values pass through unchanged.
pub fn coerce_lp(value: &Value) -> i32 {
    match value {
        Value::Number(n) => n.as_f64().map(|x| x as i32).unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Helper function for tests
    fn check(rank: (&str, &str, i32), points: i32) {
        assert_eq!(points_for_rank(rank.0, rank.1, rank.2), points);
    }

    #[test]
    fn test_points_for_rank() {
        check(("Iron", "IV", 0), 0);
        check(("Iron", "I", 0), 300);
        check(("Iron", "IV", -21), -21);
        check(("Bronze", "II", 54), 400 + 200 + 54);
        check(("Silver", "I", 16), 800 + 300 + 16);
        check(("Gold", "IV", 0), 1200);
        check(("Gold", "II", 50), 1450);
        check(("Platinum", "I", 10), 1910);
        check(("Emerald", "III", 75), 2000 + 100 + 75);
        check(("Diamond", "I", 99), 2400 + 300 + 99);
    }

    #[test]
    fn test_apex_ladder() {
        check(("Master", "", 0), 2800);
        check(("Master", "", 120), 2920);
        // Division is ignored above Diamond
        check(("Master", "I", 120), 2920);
        check(("Grandmaster", "", 640), 3440);
        check(("Grandmaster", "IV", 640), 3440);
        check(("Challenger", "", 1500), 4300);
    }

    #[test]
    fn test_fail_open_inputs() {
        // Unknown tiers are worth nothing, not an error
        check(("Nonsense", "II", 50), 0);
        check(("GOLD", "II", 50), 0);
        check(("", "", 0), 0);
        // Unrecognized division on a divisioned tier adds no offset
        check(("Gold", "V", 10), 1210);
        check(("Gold", "", 10), 1210);
    }

    #[test]
    fn test_total_ordering() {
        let divisions = ["IV", "III", "II", "I"];
        let mut last = -1;
        for tier in TIERS.iter().take(APEX_START) {
            for division in &divisions {
                let p = points_for_rank(tier, division, 0);
                assert!(p > last, "{} {} not above previous step", tier, division);
                last = p;
            }
        }
        // Apex band sits above every divisioned step and orders by LP alone
        assert!(points_for_rank("Master", "", 0) > last);
        assert!(points_for_rank("Grandmaster", "", 10) > points_for_rank("Master", "", 5));
        assert!(points_for_rank("Challenger", "", 900) > points_for_rank("Grandmaster", "", 450));
    }

    #[test]
    fn test_normalize_tier() {
        assert_eq!(normalize_tier("GOLD"), "Gold");
        assert_eq!(normalize_tier("master"), "Master");
        assert_eq!(normalize_tier("eMeRaLd"), "Emerald");
        assert_eq!(normalize_tier("Challenger"), "Challenger");
        assert_eq!(normalize_tier(""), "");
    }

    #[test]
    fn test_coerce_lp() {
        assert_eq!(coerce_lp(&json!(42)), 42);
        assert_eq!(coerce_lp(&json!(12.0)), 12);
        assert_eq!(coerce_lp(&json!("17")), 17);
        assert_eq!(coerce_lp(&json!(" 8 ")), 8);
        assert_eq!(coerce_lp(&json!(-30)), -30);
        assert_eq!(coerce_lp(&json!("junk")), 0);
        assert_eq!(coerce_lp(&json!(null)), 0);
        assert_eq!(coerce_lp(&json!({})), 0);
    }

    #[test]
    fn test_is_apex_tier() {
        assert!(is_apex_tier("Master"));
        assert!(is_apex_tier("Grandmaster"));
        assert!(is_apex_tier("Challenger"));
        assert!(!is_apex_tier("Diamond"));
        assert!(!is_apex_tier("Nonsense"));
    }
}
