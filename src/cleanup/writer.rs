//! Applying accepted values back onto a parsed config.
//!
//! Both operations return a new [`ConfigFile`] and leave the input alone, so
//! a failed edit never has anything to roll back.

use super::parser::{ConfigFile, Line, LineEnding};
use super::validate::Accepted;
use crate::error::{Error, Result};

fn canonical(accepted: &Accepted) -> String {
    format!("{}=\"{}\"", accepted.key(), accepted.value)
}

/// Replace the single active assignment of the accepted key.
pub fn set(file: &ConfigFile, accepted: &Accepted) -> Result<ConfigFile> {
    let key = accepted.key();
    let indices = file.assignment_indices(key);

    let &[idx] = indices.as_slice() else {
        return Err(Error::WriteConflict {
            key: key.to_string(),
            found: indices.len(),
        });
    };

    let mut updated = file.clone();
    let ending = updated.lines[idx].ending;
    updated.lines[idx] = Line::new(canonical(accepted), ending);

    tracing::debug!(key, line = idx + 1, value = %accepted.value, "setting replaced");
    Ok(updated)
}

/// Add an assignment for a key that has none yet.
pub fn append(file: &ConfigFile, accepted: &Accepted) -> Result<ConfigFile> {
    let key = accepted.key();
    let found = file.assignment_indices(key).len();
    if found != 0 {
        return Err(Error::WriteConflict {
            key: key.to_string(),
            found,
        });
    }

    let mut updated = file.clone();

    // follow the file's own convention, default to plain newlines
    let ending = updated
        .lines
        .iter()
        .map(|l| l.ending)
        .find(|e| *e != LineEnding::None)
        .unwrap_or(LineEnding::Lf);

    if let Some(last) = updated.lines.last_mut() {
        if last.ending == LineEnding::None {
            last.ending = ending;
        }
    }
    updated.lines.push(Line::new(canonical(accepted), ending));

    tracing::debug!(key, value = %accepted.value, "setting appended");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleanup::parser::parse;
    use crate::cleanup::validate::validate;

    const SAMPLE: &str = "\
# snapper config
SUBVOLUME=\"/\"

TIMELINE_CREATE=\"yes\"
TIMELINE_LIMIT_HOURLY=\"10\"
TIMELINE_LIMIT_DAILY=\"7\"
";

    #[test]
    fn only_the_edited_line_changes() {
        let parsed = parse(SAMPLE);
        let accepted = validate("TIMELINE_LIMIT_HOURLY", "20").unwrap();
        let updated = set(&parsed.file, &accepted).unwrap();

        assert_eq!(
            updated.render(),
            SAMPLE.replace("TIMELINE_LIMIT_HOURLY=\"10\"", "TIMELINE_LIMIT_HOURLY=\"20\"")
        );

        let reparsed = parse(&updated.render());
        assert_eq!(reparsed.values["TIMELINE_LIMIT_HOURLY"], "20");
        assert_eq!(reparsed.values["TIMELINE_LIMIT_DAILY"], "7");
        assert_eq!(reparsed.values["TIMELINE_CREATE"], "yes");
        assert_eq!(reparsed.file.get("SUBVOLUME"), Some("/"));

        // input untouched
        assert_eq!(parsed.file.render(), SAMPLE);
    }

    #[test]
    fn indented_line_is_rewritten_canonically() {
        let parsed = parse("  NUMBER_LIMIT=\"50\"\r\nX=\"1\"");
        let accepted = validate("NUMBER_LIMIT", "unlimited").unwrap();
        let updated = set(&parsed.file, &accepted).unwrap();
        assert_eq!(updated.render(), "NUMBER_LIMIT=\"unlimited\"\r\nX=\"1\"");
    }

    #[test]
    fn canonical_form_for_durations() {
        let parsed = parse("NUMBER_MIN_AGE=\"1800\"\n");
        let accepted = validate("NUMBER_MIN_AGE", "1h").unwrap();
        let updated = set(&parsed.file, &accepted).unwrap();
        assert_eq!(updated.render(), "NUMBER_MIN_AGE=\"3600\"\n");
    }

    #[test]
    fn missing_key_is_a_conflict() {
        let parsed = parse(SAMPLE);
        let accepted = validate("NUMBER_LIMIT", "10").unwrap();
        assert!(matches!(
            set(&parsed.file, &accepted),
            Err(Error::WriteConflict { found: 0, .. })
        ));
    }

    #[test]
    fn duplicate_key_is_a_conflict() {
        let parsed = parse("NUMBER_LIMIT=\"1\"\nNUMBER_LIMIT=\"2\"\n");
        let accepted = validate("NUMBER_LIMIT", "10").unwrap();
        assert!(matches!(
            set(&parsed.file, &accepted),
            Err(Error::WriteConflict { found: 2, .. })
        ));
    }

    #[test]
    fn append_adds_a_line_at_the_end() {
        let parsed = parse("SUBVOLUME=\"/\"");
        let accepted = validate("NUMBER_LIMIT", "10").unwrap();
        let updated = append(&parsed.file, &accepted).unwrap();
        assert_eq!(updated.render(), "SUBVOLUME=\"/\"\nNUMBER_LIMIT=\"10\"\n");

        let again = validate("NUMBER_LIMIT", "11").unwrap();
        assert!(matches!(
            append(&updated, &again),
            Err(Error::WriteConflict { found: 1, .. })
        ));
    }

    #[test]
    fn append_to_empty_file() {
        let parsed = parse("");
        let accepted = validate("TIMELINE_CREATE", "no").unwrap();
        let updated = append(&parsed.file, &accepted).unwrap();
        assert_eq!(updated.render(), "TIMELINE_CREATE=\"no\"\n");
    }
}
