use chrono::Utc;
use rand::Rng;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Builds a fresh submission ID: the EFIN, the current time in base-36
/// millis, and six random base-36 characters, all uppercased.
///
/// IDs only need to be unique per EFIN; the gateway treats a re-used ID as a
/// duplicate submission.
pub fn generate_submission_id(efin: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..6)
        .map(|_| BASE36[rng.gen_range(0..36)] as char)
        .collect();
    compose(efin, Utc::now().timestamp_millis(), &suffix)
}

fn compose(efin: &str, millis: i64, suffix: &str) -> String {
    format!("{efin}{}{suffix}", base36(millis.max(0) as u64)).to_uppercase()
}

fn base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut reversed = String::new();
    while n > 0 {
        reversed.push(BASE36[(n % 36) as usize] as char);
        n /= 36;
    }
    reversed.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn base36_encodes_known_values() {
        assert_eq!(base36(0), "0");
        assert_eq!(base36(35), "z");
        assert_eq!(base36(36), "10");
        assert_eq!(base36(1295), "zz");
        assert_eq!(base36(1296), "100");
    }

    #[test]
    fn composed_ids_are_uppercase_and_prefixed_with_the_efin() {
        let id = compose("358459", 1_700_000_000_000, "a1b2c3");
        assert!(id.starts_with("358459"));
        assert!(id.ends_with("A1B2C3"));
        assert!(id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn generated_ids_differ_between_calls() {
        let first = generate_submission_id("358459");
        let second = generate_submission_id("358459");
        assert_ne!(first, second);
    }
}
