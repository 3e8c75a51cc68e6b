use uuid::Uuid;

/// Fresh random (v4) session id for an anonymous assessment.
///
/// Carries no information about the caller.
pub fn new_session_id() -> Uuid {
    Uuid::new_v4()
}

/// Parses a session id as handed out by [`new_session_id`].
///
/// Only the hyphenated lowercase/uppercase form is accepted.
pub fn parse_session_id(raw: &str) -> Option<Uuid> {
    let raw = raw.trim();
    if raw.len() != 36 {
        return None;
    }
    Uuid::try_parse(raw).ok()
}
