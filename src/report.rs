//! Human-readable and JSON rendering of probe results

use serde_json::{json, Value};

use crate::crypto::hash_format::StoredHash;
use crate::error::PasswordResult;
use crate::probe::{GeneratedHash, ProbeReport, Verification};

pub fn verification_line(verification: &Verification) -> String {
    format!(
        "Password '{}' matches stored hash: {}",
        verification.password,
        if verification.matched { "yes" } else { "no" }
    )
}

pub fn generation_line(generation: &PasswordResult<GeneratedHash>, preview_len: usize) -> String {
    match generation {
        Ok(generated) => format!(
            "bcrypt is operational, sample hash: {}",
            generated.preview(preview_len)
        ),
        Err(e) => format!("bcrypt error: {}", e),
    }
}

/// The two stdout lines of a probe run
pub fn render_lines(report: &ProbeReport, preview_len: usize) -> [String; 2] {
    [
        verification_line(&report.verification),
        generation_line(&report.generation, preview_len),
    ]
}

pub fn render_json(report: &ProbeReport, preview_len: usize) -> Value {
    let generation = match &report.generation {
        Ok(generated) => json!({ "ok": true, "preview": generated.preview(preview_len) }),
        Err(e) => json!({ "ok": false, "error": e.to_string() }),
    };
    json!({
        "verification": report.verification,
        "generation": generation,
    })
}

/// Field listing for `inspect`
pub fn inspect_lines(stored: &StoredHash, needs_rehash: bool) -> Vec<String> {
    vec![
        format!("version      : {}", stored.version),
        format!("cost         : {}", stored.cost),
        format!("salt         : {}", stored.salt),
        format!("digest       : {}", stored.digest),
        format!("needs rehash : {}", if needs_rehash { "yes" } else { "no" }),
    ]
}

pub fn inspect_json(stored: &StoredHash, needs_rehash: bool) -> Value {
    json!({
        "hash": stored,
        "needs_rehash": needs_rehash,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PasswordError;

    fn report(generation: PasswordResult<GeneratedHash>) -> ProbeReport {
        ProbeReport {
            verification: Verification {
                password: "Al3m4nJ=".to_string(),
                matched: true,
            },
            generation,
        }
    }

    fn sample() -> GeneratedHash {
        GeneratedHash {
            encoded: "$2b$12$R9h/cIPz0gi.URNNX3kh2OPST9/PgBkqquzi.Ss7KIUgO2t0jWMUW".to_string(),
        }
    }

    #[test]
    fn test_success_lines() {
        let [first, second] = render_lines(&report(Ok(sample())), 30);

        assert_eq!(first, "Password 'Al3m4nJ=' matches stored hash: yes");
        assert_eq!(
            second,
            "bcrypt is operational, sample hash: $2b$12$R9h/cIPz0gi.URNNX3kh2OP..."
        );
    }

    #[test]
    fn test_mismatch_line() {
        let verification = Verification {
            password: "x".to_string(),
            matched: false,
        };
        assert_eq!(verification_line(&verification), "Password 'x' matches stored hash: no");
    }

    #[test]
    fn test_error_line() {
        let failed = report(Err(PasswordError::InvalidCost(40)));
        let [_, second] = render_lines(&failed, 30);
        assert_eq!(second, "bcrypt error: Cost factor 40 not allowed (expected 4..=31)");
    }

    #[test]
    fn test_json() {
        let value = render_json(&report(Ok(sample())), 10);
        assert_eq!(value["verification"]["matched"], true);
        assert_eq!(value["generation"]["ok"], true);
        assert_eq!(value["generation"]["preview"], "$2b$12$R9h...");

        let value = render_json(&report(Err(PasswordError::PasswordTooLong(80))), 10);
        assert_eq!(value["generation"]["ok"], false);
    }

    #[test]
    fn test_inspect() {
        let stored = StoredHash::parse(&sample().encoded).unwrap();

        let lines = inspect_lines(&stored, false);
        assert_eq!(lines[0], "version      : 2b");
        assert_eq!(lines[1], "cost         : 12");
        assert_eq!(lines[4], "needs rehash : no");

        let value = inspect_json(&stored, true);
        assert_eq!(value["hash"]["version"], "2b");
        assert_eq!(value["hash"]["cost"], 12);
        assert_eq!(value["needs_rehash"], true);
    }
}
