use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Junior,
    #[default]
    Mid,
    Senior,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Technical,
    Behavioral,
    Situational,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Technical, Category::Behavioral, Category::Situational];

    /// The category `steps` places after this one, wrapping around.
    pub fn rotated(self, steps: usize) -> Category {
        let start = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(start + steps) % Self::ALL.len()]
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Difficulty::Junior => "junior",
            Difficulty::Mid => "mid",
            Difficulty::Senior => "senior",
        })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Category::Technical => "technical",
            Category::Behavioral => "behavioral",
            Category::Situational => "situational",
        })
    }
}

/// Static question used when the model is unavailable.
pub fn fallback_question(category: Category, difficulty: Difficulty) -> &'static str {
    use Category::*;
    use Difficulty::*;

    match (category, difficulty) {
        (Technical, Junior) => "What is the difference between a stack and a heap allocation?",
        (Technical, Mid) => "How would you implement token-based authentication for a web API?",
        (Technical, Senior) => {
            "How would you design a microservice architecture for an e-commerce platform?"
        }
        (Behavioral, Junior) => {
            "Describe a time you had to learn a new technology quickly. How did you approach it?"
        }
        (Behavioral, Mid) => {
            "Tell me about a challenging project you worked on. How did you get it over the line?"
        }
        (Behavioral, Senior) => "How have you mentored junior engineers on your team?",
        (Situational, Junior) => "What would you do if you found a bug in a teammate's code?",
        (Situational, Mid) => {
            "How would you prioritise your work when several urgent deadlines collide?"
        }
        (Situational, Senior) => {
            "How would you lead the migration of a legacy application to a modern stack?"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_cell_has_a_question() {
        for category in Category::ALL {
            for difficulty in [Difficulty::Junior, Difficulty::Mid, Difficulty::Senior] {
                assert!(fallback_question(category, difficulty).ends_with('?'));
            }
        }
    }

    #[test]
    fn test_rotation_wraps() {
        assert_eq!(Category::Technical.rotated(0), Category::Technical);
        assert_eq!(Category::Behavioral.rotated(1), Category::Situational);
        assert_eq!(Category::Situational.rotated(1), Category::Technical);
        assert_eq!(Category::Technical.rotated(4), Category::Behavioral);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Difficulty::default(), Difficulty::Mid);
        assert_eq!(Category::default(), Category::Technical);
    }

    #[test]
    fn test_lowercase_serde() {
        let d: Difficulty = serde_json::from_str("\"senior\"").unwrap();
        assert_eq!(d, Difficulty::Senior);
        assert_eq!(serde_json::to_string(&Category::Behavioral).unwrap(), "\"behavioral\"");
    }
}
