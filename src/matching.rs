/// Match simulation
///
/// There is no real matching backend yet. `MatchingService` is the seam a
/// backend client will plug into; until then `RandomMatching` rolls dice and
/// `ScriptedMatching` gives tests a fixed answer.
use crate::config::MatchingConfig;
use rand::Rng;
use std::collections::HashSet;

pub trait MatchingService: Send + Sync {
    /// Whether liking `profile_id` produces a match
    fn is_match(&self, profile_id: &str) -> bool;

    /// Whether `profile_id` is flagged as new on the liked-you page
    fn is_new(&self, profile_id: &str) -> bool;
}

/// Coin-flip matching with configurable odds
#[derive(Debug, Clone)]
pub struct RandomMatching {
    match_probability: f64,
    new_flag_probability: f64,
}

impl RandomMatching {
    pub fn new(match_probability: f64, new_flag_probability: f64) -> Self {
        Self {
            match_probability: match_probability.clamp(0.0, 1.0),
            new_flag_probability: new_flag_probability.clamp(0.0, 1.0),
        }
    }

    pub fn from_config(config: &MatchingConfig) -> Self {
        Self::new(config.match_probability, config.new_flag_probability)
    }
}

impl MatchingService for RandomMatching {
    fn is_match(&self, _profile_id: &str) -> bool {
        rand::thread_rng().gen_bool(self.match_probability)
    }

    fn is_new(&self, _profile_id: &str) -> bool {
        rand::thread_rng().gen_bool(self.new_flag_probability)
    }
}

/// Deterministic matching: only the listed ids match or are new
#[derive(Debug, Clone, Default)]
pub struct ScriptedMatching {
    matches: HashSet<String>,
    new_ids: HashSet<String>,
}

impl ScriptedMatching {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn matching<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.matches.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn new_profiles<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.new_ids.extend(ids.into_iter().map(Into::into));
        self
    }
}

impl MatchingService for ScriptedMatching {
    fn is_match(&self, profile_id: &str) -> bool {
        self.matches.contains(profile_id)
    }

    fn is_new(&self, profile_id: &str) -> bool {
        self.new_ids.contains(profile_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_extremes() {
        let never = RandomMatching::new(0.0, 0.0);
        let always = RandomMatching::new(1.0, 1.0);

        for _ in 0..50 {
            assert!(!never.is_match("1"));
            assert!(!never.is_new("1"));
            assert!(always.is_match("1"));
            assert!(always.is_new("1"));
        }
    }

    #[test]
    fn test_random_rate_is_roughly_configured() {
        let matching = RandomMatching::new(0.3, 0.5);
        let hits = (0..10_000).filter(|_| matching.is_match("1")).count();
        assert!((2_500..3_500).contains(&hits), "got {} matches", hits);
    }

    #[test]
    fn test_scripted() {
        let matching = ScriptedMatching::new().matching(["2"]).new_profiles(["3", "4"]);
        assert!(matching.is_match("2"));
        assert!(!matching.is_match("3"));
        assert!(matching.is_new("4"));
        assert!(!matching.is_new("2"));
    }
}
