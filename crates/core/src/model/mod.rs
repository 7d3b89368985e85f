mod answer;
mod ids;
mod level;
mod question;
mod report;

pub use ids::{ParseIdError, QuestionId, SessionId};
pub use level::{CefrLevel, ParseLevelError};

pub use answer::AnswerRecord;
pub use question::{Question, QuestionBank, QuestionDraft, QuestionError};
pub use report::{LevelStat, PlacementReport, Weakness, WeaknessKind};
