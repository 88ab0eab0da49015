use cogassess_cache::AssetId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ink colours used by the Stroop test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InkColor {
    Red,
    Green,
    Blue,
    Yellow,
}

impl InkColor {
    pub const ALL: [InkColor; 4] = [
        InkColor::Red,
        InkColor::Green,
        InkColor::Blue,
        InkColor::Yellow,
    ];

    pub fn name(self) -> &'static str {
        match self {
            InkColor::Red => "RED",
            InkColor::Green => "GREEN",
            InkColor::Blue => "BLUE",
            InkColor::Yellow => "YELLOW",
        }
    }

}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Add,
    Sub,
    Mul,
}

impl Operator {
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '×',
        }
    }

    pub fn apply(self, lhs: i64, rhs: i64) -> i64 {
        match self {
            Operator::Add => lhs + rhs,
            Operator::Sub => lhs - rhs,
            Operator::Mul => lhs * rhs,
        }
    }
}

/// What the participant is shown for one trial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Stimulus {
    Image { asset: AssetId },
    Equation { lhs: i64, op: Operator, rhs: i64 },
    ColorWord { word: InkColor, ink: InkColor },
}

impl fmt::Display for Stimulus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stimulus::Image { asset } => write!(f, "{asset}"),
            Stimulus::Equation { lhs, op, rhs } => write!(f, "{lhs} {} {rhs} = ?", op.symbol()),
            Stimulus::ColorWord { word, ink } => write!(f, "{} in {:?}", word.name(), ink),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ChoiceContent {
    Image(AssetId),
    Number(i64),
    Color(InkColor),
}

impl ChoiceContent {
    pub fn label(&self) -> String {
        match self {
            ChoiceContent::Image(asset) => asset.path(),
            ChoiceContent::Number(n) => n.to_string(),
            ChoiceContent::Color(c) => c.name().to_string(),
        }
    }

    /// Whether a typed answer names this option. Numbers compare by value,
    /// colours by name ignoring case. Images cannot be typed.
    pub fn accepts(&self, entry: &str) -> bool {
        let entry = entry.trim();
        match self {
            ChoiceContent::Image(_) => false,
            ChoiceContent::Number(n) => entry.parse::<i64>().is_ok_and(|v| v == *n),
            ChoiceContent::Color(c) => entry.eq_ignore_ascii_case(c.name()),
        }
    }
}

/// One presented option, tagged with whether choosing it is correct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub content: ChoiceContent,
    pub correct: bool,
}

impl Choice {
    pub fn correct(content: ChoiceContent) -> Self {
        Self {
            content,
            correct: true,
        }
    }

    pub fn distractor(content: ChoiceContent) -> Self {
        Self {
            content,
            correct: false,
        }
    }
}

/// How a sub-test expects the participant to answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    /// Click one of the presented options.
    Select,
    /// Type an answer that is matched against the options.
    Entry,
}

/// A participant's answer. `question` is the 1-based trial number the answer
/// was given for, as shown in the trial view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Response {
    Select { question: usize, option: usize },
    Entry { question: usize, value: String },
}

impl Response {
    pub fn question(&self) -> usize {
        match self {
            Response::Select { question, .. } | Response::Entry { question, .. } => *question,
        }
    }

    pub fn mode(&self) -> ResponseMode {
        match self {
            Response::Select { .. } => ResponseMode::Select,
            Response::Entry { .. } => ResponseMode::Entry,
        }
    }
}
