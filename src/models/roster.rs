//! Roster model.
//!
//! A roster is the full input of one scheduling run: the teachers who can
//! invigilate, the exam rooms, the exam sessions, and the subset of
//! (room, session) combinations that actually hold an exam.
//!
//! Identifier lists keep their input order. That order is the fixed
//! exploration order used by the solver, so identical rosters always
//! produce identical schedules.

use serde::{Deserialize, Serialize};

/// A (room, session) combination requiring two supervisors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActivePair {
    /// Room identifier.
    pub room: String,
    /// Session identifier.
    pub session: String,
}

impl ActivePair {
    /// Creates a new active pair.
    pub fn new(room: impl Into<String>, session: impl Into<String>) -> Self {
        Self {
            room: room.into(),
            session: session.into(),
        }
    }
}

/// Input of one scheduling run.
///
/// # Example
/// ```
/// use u_invigilate::models::Roster;
///
/// let roster = Roster::new()
///     .with_teachers(["A", "B", "C"])
///     .with_rooms(["R1"])
///     .with_sessions(["S1"])
///     .with_active_pair("R1", "S1");
///
/// assert!(roster.is_active("R1", "S1"));
/// assert_eq!(roster.pairs_in_session("S1").count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    /// Invigilator identifiers.
    pub teachers: Vec<String>,
    /// Exam room identifiers.
    pub rooms: Vec<String>,
    /// Exam session identifiers.
    pub sessions: Vec<String>,
    /// Combinations that require supervision.
    pub active_pairs: Vec<ActivePair>,
}

impl Roster {
    /// Creates an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the teacher list.
    pub fn with_teachers<I, S>(mut self, teachers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.teachers = teachers.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the room list.
    pub fn with_rooms<I, S>(mut self, rooms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rooms = rooms.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the session list.
    pub fn with_sessions<I, S>(mut self, sessions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sessions = sessions.into_iter().map(Into::into).collect();
        self
    }

    /// Adds one active (room, session) pair.
    pub fn with_active_pair(mut self, room: impl Into<String>, session: impl Into<String>) -> Self {
        self.active_pairs.push(ActivePair::new(room, session));
        self
    }

    /// Adds several active pairs.
    pub fn with_active_pairs<I>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = ActivePair>,
    {
        self.active_pairs.extend(pairs);
        self
    }

    /// Marks every room active in every session.
    pub fn with_all_pairs_active(mut self) -> Self {
        self.active_pairs = self
            .sessions
            .iter()
            .flat_map(|s| self.rooms.iter().map(move |r| ActivePair::new(r, s)))
            .collect();
        self
    }

    /// Whether an exam is held in `room` during `session`.
    pub fn is_active(&self, room: &str, session: &str) -> bool {
        self.active_pairs
            .iter()
            .any(|p| p.room == room && p.session == session)
    }

    /// Active pairs held during `session`.
    pub fn pairs_in_session<'a>(&'a self, session: &'a str) -> impl Iterator<Item = &'a ActivePair> {
        self.active_pairs.iter().filter(move |p| p.session == session)
    }

    /// Active pairs held in `room`.
    pub fn pairs_in_room<'a>(&'a self, room: &'a str) -> impl Iterator<Item = &'a ActivePair> {
        self.active_pairs.iter().filter(move |p| p.room == room)
    }

    /// Number of teachers.
    pub fn teacher_count(&self) -> usize {
        self.teachers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_builder() {
        let roster = Roster::new()
            .with_teachers(["T1", "T2"])
            .with_rooms(["R1", "R2"])
            .with_sessions(["S1", "S2"])
            .with_active_pair("R1", "S1")
            .with_active_pairs([ActivePair::new("R2", "S2"), ActivePair::new("R1", "S2")]);

        assert_eq!(roster.teacher_count(), 2);
        assert_eq!(roster.rooms, vec!["R1".to_string(), "R2".to_string()]);
        assert!(roster.is_active("R1", "S1"));
        assert!(!roster.is_active("R2", "S1"));
        assert!(roster.is_active("R2", "S2"));
        // Appended after the single pair, in the given order
        assert_eq!(roster.active_pairs.len(), 3);
        assert_eq!(roster.active_pairs[2], ActivePair::new("R1", "S2"));
        assert_eq!(roster.pairs_in_room("R1").count(), 2);
    }

    #[test]
    fn test_all_pairs_active() {
        let roster = Roster::new()
            .with_rooms(["R1", "R2"])
            .with_sessions(["S1", "S2", "S3"])
            .with_all_pairs_active();

        assert_eq!(roster.active_pairs.len(), 6);
        assert_eq!(roster.pairs_in_session("S2").count(), 2);
        assert_eq!(roster.pairs_in_room("R1").count(), 3);
        // Session-major order
        assert_eq!(roster.active_pairs[1], ActivePair::new("R2", "S1"));
    }

    #[test]
    fn test_roster_deserialize() {
        let json = r#"{
            "teachers": ["A", "B"],
            "rooms": ["R1"],
            "sessions": ["S1"],
            "active_pairs": [{"room": "R1", "session": "S1"}]
        }"#;
        let roster: Roster = serde_json::from_str(json).unwrap();
        assert_eq!(roster.teachers.len(), 2);
        assert_eq!(roster.active_pairs, vec![ActivePair::new("R1", "S1")]);
    }
}
